use handy_domain::regions::RegionDirectory;
use handy_registration::{FormField, RegistrationForm};
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

fn directories() -> impl Strategy<Value = RegionDirectory> {
    btree_map("[A-Z][a-z]{2,8}", vec("[A-Z][a-z]{2,8}( [A-Z][a-z]{2,6})?", 0..6), 1..6)
        .prop_map(RegionDirectory::new)
}

proptest! {
    #[test]
    fn options_are_exactly_the_region_list(dir in directories()) {
        for region in dir.regions() {
            let mut form = RegistrationForm::default();
            form.set_field(FormField::Region, region);
            prop_assert!(form.locality_enabled());
            prop_assert_eq!(form.locality_options(&dir), dir.localities(region));
        }
    }

    #[test]
    fn changing_region_always_clears_locality(
        dir in directories(),
        first in any::<prop::sample::Index>(),
        second in any::<prop::sample::Index>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let regions: Vec<&str> = dir.regions().collect();
        let from = regions[first.index(regions.len())];
        let to = regions[second.index(regions.len())];

        let mut form = RegistrationForm::default();
        form.set_field(FormField::Region, from);
        if let Some(locality) = dir.localities(from).get(pick.index(dir.localities(from).len().max(1))) {
            form.set_field(FormField::Locality, locality.as_str());
        }

        form.set_field(FormField::Region, to);
        prop_assert_eq!(form.locality.as_str(), "");
        prop_assert_eq!(form.locality_options(&dir), dir.localities(to));
    }

    #[test]
    fn unknown_regions_never_panic(dir in directories(), region in "\\PC{0,12}") {
        let mut form = RegistrationForm::default();
        form.set_field(FormField::Region, region.as_str());
        let expected: &[String] = if region.is_empty() { &[] } else { dir.localities(&region) };
        prop_assert_eq!(form.locality_options(&dir), expected);
    }
}
