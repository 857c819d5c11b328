use handy_backend::{Backend, BackendError, CallCounts, MemoryBackend};
use handy_domain::account::{AccountId, NewProfile, Role};
use std::sync::Arc;
use std::time::Duration;

fn profile_for(id: AccountId) -> NewProfile {
    NewProfile {
        id,
        full_name: "Ada Obi".to_owned(),
        role: Role::Technician,
        skill: Some("Plumber".to_owned()),
        region: "Lagos".to_owned(),
        locality: "Ikeja".to_owned(),
        address: "12 Allen Avenue".to_owned(),
    }
}

#[tokio::test]
async fn signup_then_sign_in_round_trip() {
    let memory = Arc::new(MemoryBackend::new());
    let backend = Backend::memory(memory.clone());

    let created = backend.accounts().create_account("ada@example.com", "secret-1").await.unwrap();
    let id = created.account_id.unwrap();

    let session = backend.accounts().sign_in("ADA@example.com", "secret-1").await.unwrap();
    assert_eq!(session.account_id, id);

    let resolved = backend.accounts().current_account(&session.access_token).await.unwrap();
    assert_eq!(resolved, Some(id));
    assert_eq!(memory.account_count(), 1);
}

#[tokio::test]
async fn duplicate_signup_uses_provider_message() {
    let backend = Backend::memory(Arc::new(MemoryBackend::new()));
    backend.accounts().create_account("ada@example.com", "secret-1").await.unwrap();

    let err = backend.accounts().create_account("ada@example.com", "secret-2").await.unwrap_err();
    assert_eq!(err.user_message(), "User already registered");
}

#[tokio::test]
async fn short_password_and_bad_credentials_are_rejected() {
    let backend = Backend::memory(Arc::new(MemoryBackend::new()));

    let err = backend.accounts().create_account("ada@example.com", "123").await.unwrap_err();
    assert_eq!(err.user_message(), "Password should be at least 6 characters.");

    backend.accounts().create_account("ada@example.com", "secret-1").await.unwrap();
    let err = backend.accounts().sign_in("ada@example.com", "wrong-pass").await.unwrap_err();
    assert!(matches!(err, BackendError::Rejected { .. }));
    assert_eq!(err.user_message(), "Invalid login credentials");
}

#[tokio::test]
async fn unknown_token_resolves_to_nobody() {
    let backend = Backend::memory(Arc::new(MemoryBackend::new()));
    assert_eq!(backend.accounts().current_account("nope").await.unwrap(), None);
}

#[tokio::test]
async fn scripted_failures_apply_once_or_while_set() {
    let memory = Arc::new(MemoryBackend::new());
    let backend = Backend::memory(memory.clone());

    memory.fail_next_signup("Signups not allowed for this instance");
    let err = backend.accounts().create_account("ada@example.com", "secret-1").await.unwrap_err();
    assert_eq!(err.user_message(), "Signups not allowed for this instance");
    assert!(backend.accounts().create_account("ada@example.com", "secret-1").await.is_ok());

    memory.withhold_account_id(true);
    let created = backend.accounts().create_account("bo@example.com", "secret-1").await.unwrap();
    assert!(created.account_id.is_none());
    assert_eq!(memory.account_count(), 1);
}

#[tokio::test]
async fn profiles_are_written_once_and_read_back() {
    let memory = Arc::new(MemoryBackend::new());
    let backend = Backend::memory(memory.clone());
    let id = AccountId::new("acc-1").unwrap();

    backend.profiles().create_profile(&profile_for(id.clone()), None).await.unwrap();
    let err = backend.profiles().create_profile(&profile_for(id.clone()), None).await.unwrap_err();
    assert!(err.user_message().starts_with("duplicate key value"));

    let stored = backend.profiles().read_profile(&id, None).await.unwrap().unwrap();
    assert_eq!(stored.full_name.as_deref(), Some("Ada Obi"));
    assert_eq!(stored.skill.as_deref(), Some("Plumber"));
    assert_eq!(stored.locality.as_deref(), Some("Ikeja"));

    assert_eq!(
        memory.calls(),
        CallCounts { create_profile: 2, read_profile: 1, ..CallCounts::default() }
    );
}

#[tokio::test]
async fn failing_profile_writes_leave_no_row() {
    let memory = Arc::new(MemoryBackend::new());
    let backend = Backend::memory(memory.clone());
    memory.fail_profile_writes(Some("permission denied for table profiles".to_owned()));

    let id = AccountId::new("acc-2").unwrap();
    let err = backend.profiles().create_profile(&profile_for(id.clone()), None).await.unwrap_err();
    assert_eq!(err.user_message(), "permission denied for table profiles");
    assert!(memory.profile(&id).is_none());
    assert_eq!(memory.profile_count(), 0);
}

#[tokio::test]
async fn owner_only_profiles_need_the_signup_token() {
    let memory = Arc::new(MemoryBackend::new());
    let backend = Backend::memory(memory.clone());
    memory.owner_only_profiles(true);

    let created = backend.accounts().create_account("ada@example.com", "secret-1").await.unwrap();
    let id = created.account_id.clone().unwrap();
    let token = created.access_token.as_deref();
    assert!(token.is_some());

    let err = backend.profiles().create_profile(&profile_for(id.clone()), None).await.unwrap_err();
    assert!(err.user_message().contains("row-level security"));

    let other = AccountId::new("someone-else").unwrap();
    assert!(backend.profiles().create_profile(&profile_for(other), token).await.is_err());

    backend.profiles().create_profile(&profile_for(id.clone()), token).await.unwrap();
    assert!(memory.profile(&id).is_some());
}

#[tokio::test(start_paused = true)]
async fn latency_is_simulated() {
    let memory = Arc::new(MemoryBackend::new().with_latency(Duration::from_millis(250)));
    let backend = Backend::memory(memory);

    let started = tokio::time::Instant::now();
    backend.accounts().create_account("ada@example.com", "secret-1").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(250));
}

#[test]
fn builder_selects_backend_by_url() {
    assert_eq!(Backend::builder().url("mem://").init().unwrap().kind(), "memory");

    let hosted = Backend::builder().url("https://project.supabase.co").anon_key("anon").init();
    assert_eq!(hosted.unwrap().kind(), "hosted");

    let err = Backend::builder().url("https://project.supabase.co").init().unwrap_err();
    assert!(matches!(err, BackendError::Validation { .. }));

    let err = Backend::builder().url("ftp://example.com").anon_key("anon").init().unwrap_err();
    assert!(matches!(err, BackendError::Validation { .. }));

    assert!(Backend::builder().init().is_err());
}
