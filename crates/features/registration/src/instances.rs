//! Live registration form instances, one per browser tab.
//!
//! Each instance is private to the form id issued when the page was first
//! served. Instances idle out after a TTL; anything recorded against an
//! instance that is already gone is dropped silently.

use crate::error::RegistrationError;
use crate::form::RegistrationForm;
use handy_domain::account::Role;
use handy_kernel::safe_nanoid;
use moka::sync::Cache;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const FORM_ID_LEN: usize = 24;

#[derive(Debug, Default)]
struct Instance {
    form: RegistrationForm,
    in_flight: bool,
}

type Slot = Arc<Mutex<Instance>>;

#[derive(Clone)]
pub struct FormRegistry {
    forms: Cache<String, Slot>,
}

impl std::fmt::Debug for FormRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormRegistry").field("live", &self.forms.entry_count()).finish()
    }
}

impl FormRegistry {
    #[must_use]
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self { forms: Cache::builder().max_capacity(capacity).time_to_idle(ttl).build() }
    }

    /// Opens a fresh instance and returns its id.
    #[must_use]
    pub fn open(&self, role: Role) -> String {
        let id = safe_nanoid!(FORM_ID_LEN);
        let instance = Instance { form: RegistrationForm::with_role(role), in_flight: false };
        self.forms.insert(id.clone(), Arc::new(Mutex::new(instance)));
        debug!(form = %id, %role, "Registration form opened");
        id
    }

    /// Current values, or `None` if the instance expired or never existed.
    #[must_use]
    pub fn snapshot(&self, id: &str) -> Option<RegistrationForm> {
        self.forms.get(id).map(|slot| slot.lock().form.clone())
    }

    /// Applies `edit` and returns the updated values.
    pub fn update(
        &self,
        id: &str,
        edit: impl FnOnce(&mut RegistrationForm),
    ) -> Option<RegistrationForm> {
        let slot = self.forms.get(id)?;
        let mut instance = slot.lock();
        edit(&mut instance.form);
        Some(instance.form.clone())
    }

    /// Applies the last `edit`, marks the instance as submitting and hands out
    /// the values to submit.
    ///
    /// Returns `Ok(None)` if the instance is gone.
    ///
    /// # Errors
    /// [`RegistrationError::SubmissionInFlight`] while an earlier submission
    /// of the same instance has not finished. The stored values are left
    /// untouched in that case.
    pub fn begin_submit(
        &self,
        id: &str,
        edit: impl FnOnce(&mut RegistrationForm),
    ) -> Result<Option<RegistrationForm>, RegistrationError> {
        let Some(slot) = self.forms.get(id) else { return Ok(None) };
        let mut instance = slot.lock();
        if instance.in_flight {
            return Err(RegistrationError::SubmissionInFlight { context: Some(id.to_owned().into()) });
        }
        edit(&mut instance.form);
        instance.in_flight = true;
        Ok(Some(instance.form.clone()))
    }

    /// Records how a submission ended. A success retires the instance; a
    /// failure re-opens it for editing. Returns `false` when the instance was
    /// already discarded, in which case nothing happens.
    pub fn finish_submit(&self, id: &str, succeeded: bool) -> bool {
        let Some(slot) = self.forms.get(id) else {
            debug!(form = %id, "Submission finished after form was discarded");
            return false;
        };

        if succeeded {
            self.forms.invalidate(id);
        } else {
            slot.lock().in_flight = false;
        }
        true
    }

    pub fn discard(&self, id: &str) {
        self.forms.invalidate(id);
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.forms.contains_key(id)
    }
}
