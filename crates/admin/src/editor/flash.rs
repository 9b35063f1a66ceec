//! Transient banner messages.

use std::time::{Duration, Instant};

/// Severity of a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    /// A remote failure that was rolled back.
    Error,
    /// Partial success; nothing was rolled back.
    Warning,
    Info,
}

/// A message raised at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
    raised_at: Instant,
}

impl Flash {
    #[must_use]
    pub const fn raised_at(&self) -> Instant {
        self.raised_at
    }
}

/// Holds at most one banner and hides it once its display window passes.
///
/// Raising a new banner replaces the old one; repeated failures never stack.
#[derive(Debug, Clone)]
pub struct FlashSlot {
    current: Option<Flash>,
    window: Duration,
}

impl FlashSlot {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            current: None,
            window,
        }
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    pub fn raise(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.raise_at(level, message, Instant::now());
    }

    pub fn raise_at(&mut self, level: FlashLevel, message: impl Into<String>, at: Instant) {
        self.current = Some(Flash {
            level,
            message: message.into(),
            raised_at: at,
        });
    }

    /// The visible banner, if it has not expired yet.
    #[must_use]
    pub fn current(&self) -> Option<&Flash> {
        self.current_at(Instant::now())
    }

    #[must_use]
    pub fn current_at(&self, now: Instant) -> Option<&Flash> {
        self.current
            .as_ref()
            .filter(|flash| now.saturating_duration_since(flash.raised_at) < self.window)
    }

    /// Drop the banner if its window has passed.
    pub fn expire(&mut self, now: Instant) {
        if self.current.is_some() && self.current_at(now).is_none() {
            self.current = None;
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(3);

    #[test]
    fn test_flash_expires_after_window() {
        let mut slot = FlashSlot::new(WINDOW);
        let t0 = Instant::now();
        slot.raise_at(FlashLevel::Error, "Failed to save", t0);

        assert_eq!(
            slot.current_at(t0 + Duration::from_millis(2999)).unwrap().message,
            "Failed to save"
        );
        assert!(slot.current_at(t0 + WINDOW).is_none());

        slot.expire(t0 + WINDOW);
        assert!(slot.current_at(t0).is_none());
    }

    #[test]
    fn test_newer_flash_replaces_older() {
        let mut slot = FlashSlot::new(WINDOW);
        let t0 = Instant::now();
        slot.raise_at(FlashLevel::Error, "first", t0);
        slot.raise_at(FlashLevel::Warning, "second", t0 + Duration::from_secs(2));

        let now = t0 + Duration::from_secs(4);
        let flash = slot.current_at(now).unwrap();
        assert_eq!(flash.message, "second");
        assert_eq!(flash.level, FlashLevel::Warning);
    }

    #[test]
    fn test_dismiss() {
        let mut slot = FlashSlot::new(WINDOW);
        slot.raise(FlashLevel::Info, "Saved");
        assert!(slot.current().is_some());
        slot.dismiss();
        assert!(slot.current().is_none());
    }
}
