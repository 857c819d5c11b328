use handy::domain::config::AppConfig;
use handy::domain::regions::RegionDirectory;
use handy::events::EventBus;
use handy::features;
use std::sync::Arc;

#[tokio::test]
async fn every_slice_is_built() {
    let backend = handy::backend::Backend::builder().url("mem://").init().unwrap();
    let regions = Arc::new(RegionDirectory::new([("Lagos", ["Ikeja"])]));

    let slices = handy::init(&AppConfig::default(), &backend, &regions, &EventBus::new()).unwrap();

    assert_eq!(slices.len(), features::SLICES.len());
    let ids: Vec<_> = slices.iter().map(|s| s.id).collect();
    assert!(ids.contains(&std::any::TypeId::of::<features::registration::Registration>()));
    assert!(ids.contains(&std::any::TypeId::of::<features::dashboard::Dashboard>()));
}

#[tokio::test]
async fn zero_form_ttl_fails_initialization() {
    let mut config = AppConfig::default();
    config.registration.form_ttl_seconds = 0;
    let backend = handy::backend::Backend::builder().url("mem://").init().unwrap();
    let regions = Arc::new(RegionDirectory::new([("Lagos", ["Ikeja"])]));

    assert!(handy::init(&config, &backend, &regions, &EventBus::new()).is_err());
}

#[test]
fn slice_names_are_introspectable() {
    assert!(features::is_enabled("registration"));
    assert!(!features::is_enabled("licensing"));
}
