//! Where the browser goes next.

use std::time::Duration;

/// A navigation target, optionally fired after a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    pub delay: Option<Duration>,
}

impl Redirect {
    /// Navigate right away.
    pub fn to(path: impl Into<String>) -> Self {
        Self { to: path.into(), delay: None }
    }

    /// Navigate after `delay`; a zero delay is the same as [`Redirect::to`].
    pub fn after(path: impl Into<String>, delay: Duration) -> Self {
        Self { to: path.into(), delay: (!delay.is_zero()).then_some(delay) }
    }

    #[must_use]
    pub const fn is_immediate(&self) -> bool {
        self.delay.is_none()
    }

    /// Delay in whole seconds, as used by an HTML meta refresh.
    #[must_use]
    pub fn delay_secs(&self) -> u64 {
        self.delay.map_or(0, |d| d.as_secs())
    }
}
