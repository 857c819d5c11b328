use crate::server::session::SessionStore;
use axum::extract::FromRef;
use fxhash::FxHashMap;
use handy_backend::Backend;
use handy_domain::config::AppConfig;
use handy_domain::regions::RegionDirectory;
use handy_domain::registry::{FeatureSlice, InitializedSlice};
use handy_event_bus::EventBus;
use std::any::TypeId;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

#[handy_derive::handy_error]
pub enum AppStateError {
    #[error("State validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("State missing feature slice{}: {message}", format_context(.context))]
    MissingSlice { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
pub struct AppStateInner {
    pub config: AppConfig,
    pub backend: Backend,
    pub regions: Arc<RegionDirectory>,
    pub sessions: SessionStore,
    pub events: EventBus,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

/// Everything a handler can reach, shared behind one `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    #[must_use]
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }

    #[must_use]
    pub fn get_slice<T: FeatureSlice>(&self) -> Option<&T> {
        self.inner
            .slices
            .get(&TypeId::of::<T>())
            .and_then(|initialized| initialized.state.as_any().downcast_ref::<T>())
    }

    /// # Errors
    /// [`AppStateError::MissingSlice`] if `T` was never registered.
    pub fn try_get_slice<T: FeatureSlice>(&self) -> Result<&T, AppStateError> {
        self.get_slice::<T>().ok_or_else(|| AppStateError::MissingSlice {
            message: std::any::type_name::<T>().into(),
            context: None,
        })
    }

    /// Names of the registered slices, for startup diagnostics.
    pub fn slice_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inner.slices.values().map(|slice| slice.name)
    }
}

impl Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(state: &AppState) -> Self {
        state.inner.config.clone()
    }
}

impl FromRef<AppState> for Backend {
    fn from_ref(state: &AppState) -> Self {
        state.inner.backend.clone()
    }
}

impl FromRef<AppState> for Arc<RegionDirectory> {
    fn from_ref(state: &AppState) -> Self {
        state.inner.regions.clone()
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.inner.sessions.clone()
    }
}

impl FromRef<AppState> for EventBus {
    fn from_ref(state: &AppState) -> Self {
        state.inner.events.clone()
    }
}

#[derive(Debug, Default)]
pub struct AppStateBuilder {
    config: Option<AppConfig>,
    backend: Option<Backend>,
    regions: Option<Arc<RegionDirectory>>,
    sessions: Option<SessionStore>,
    events: Option<EventBus>,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn regions(mut self, regions: impl Into<Arc<RegionDirectory>>) -> Self {
        self.regions = Some(regions.into());
        self
    }

    /// Overrides the store otherwise built from `security.session`.
    #[must_use]
    pub fn sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = Some(sessions);
        self
    }

    #[must_use]
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn register_slice(mut self, slice: InitializedSlice) -> Self {
        self.slices.insert(slice.id, slice);
        self
    }

    #[must_use]
    pub fn register_slices<I>(mut self, slices: I) -> Self
    where
        I: IntoIterator<Item = InitializedSlice>,
    {
        self.slices.extend(slices.into_iter().map(|slice| (slice.id, slice)));
        self
    }

    /// # Errors
    /// [`AppStateError::Validation`] if the config, backend or regions are missing.
    pub fn build(self) -> Result<AppState, AppStateError> {
        let config = self.config.ok_or_else(|| AppStateError::Validation {
            message: "AppConfig not provided".into(),
            context: None,
        })?;
        let backend = self.backend.ok_or_else(|| AppStateError::Validation {
            message: "Backend not provided".into(),
            context: None,
        })?;
        let regions = self.regions.ok_or_else(|| AppStateError::Validation {
            message: "RegionDirectory not provided".into(),
            context: None,
        })?;
        let sessions = self.sessions.unwrap_or_else(|| SessionStore::new(&config.security.session));
        let events = self.events.unwrap_or_default();

        Ok(AppState {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                regions,
                sessions,
                events,
                slices: self.slices,
            }),
        })
    }
}
