//! Background listeners that turn account events into log records.

use handy_domain::events::{AccountRegistered, OrphanedAccount, SignedIn};
use handy_event_bus::{Event, Subscription};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Handle;
use tracing::{info, warn};

/// How many events of each kind have been recorded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AuditTotals {
    pub registered: u64,
    pub orphaned: u64,
    pub signed_in: u64,
}

#[derive(Debug, Default)]
struct Counters {
    registered: AtomicU64,
    orphaned: AtomicU64,
    signed_in: AtomicU64,
}

/// Running audit listeners and their tallies.
#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    counters: Arc<Counters>,
}

impl AuditTrail {
    #[must_use]
    pub fn totals(&self) -> AuditTotals {
        AuditTotals {
            registered: self.counters.registered.load(Ordering::Relaxed),
            orphaned: self.counters.orphaned.load(Ordering::Relaxed),
            signed_in: self.counters.signed_in.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn spawn_registered(&self, runtime: &Handle, events: Subscription<AccountRegistered>) {
        let counters = self.counters.clone();
        listen(runtime, events, move |event| {
            counters.registered.fetch_add(1, Ordering::Relaxed);
            info!(target: "audit", account = %event.account_id, role = %event.role, "Account registered");
        });
    }

    pub(crate) fn spawn_orphaned(&self, runtime: &Handle, events: Subscription<OrphanedAccount>) {
        let counters = self.counters.clone();
        listen(runtime, events, move |event| {
            counters.orphaned.fetch_add(1, Ordering::Relaxed);
            warn!(
                target: "audit",
                account = %event.account_id,
                email = %event.email,
                reason = %event.reason,
                "Account has no profile row; clean up manually"
            );
        });
    }

    pub(crate) fn spawn_signed_in(&self, runtime: &Handle, events: Subscription<SignedIn>) {
        let counters = self.counters.clone();
        listen(runtime, events, move |event| {
            counters.signed_in.fetch_add(1, Ordering::Relaxed);
            info!(target: "audit", account = %event.account_id, "Signed in");
        });
    }
}

fn listen<T: Event>(
    runtime: &Handle,
    mut events: Subscription<T>,
    record: impl Fn(&T) + Send + 'static,
) {
    runtime.spawn(async move {
        while let Some(event) = events.next().await {
            record(&event);
        }
        tracing::debug!(event = std::any::type_name::<T>(), "Audit listener stopped");
    });
}
