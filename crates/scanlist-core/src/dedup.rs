//! # Duplicate Suppression Window
//!
//! A camera keeps reporting the same barcode for as long as it stays in
//! frame. The window remembers recently accepted values so that, in
//! continuous mode, repeats inside the window are dropped.
//!
//! ## Timeline (window = 3000 ms)
//! ```text
//!   t=0     "A" accepted      window: {A@0}
//!   t=1200  "A" suppressed    window: {A@0}
//!   t=1500  "B" accepted      window: {A@0, B@1500}
//!   t=3000  "A" accepted      A@0 aged out (age == window), window: {B@1500, A@3000}
//! ```
//!
//! Suppressed repeats do not refresh an entry's timestamp.
//!
//! Timestamps are monotonic [`Instant`]s supplied by the caller so the
//! window itself never reads a clock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::DEFAULT_DEDUP_WINDOW_MS;

/// Outcome of offering a decoded value to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupVerdict {
    Accepted,
    Suppressed,
}

impl DedupVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DedupVerdict::Accepted)
    }
}

/// Recently accepted values and when they were accepted.
///
/// One window belongs to one scan session and is never shared.
#[derive(Debug, Clone)]
pub struct RecentScanWindow {
    window: Duration,
    entries: HashMap<String, Instant>,
}

impl Default for RecentScanWindow {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEDUP_WINDOW_MS))
    }
}

impl RecentScanWindow {
    pub fn new(window: Duration) -> Self {
        RecentScanWindow {
            window,
            entries: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Drops every entry at least `window` old.
    pub fn purge(&mut self, now: Instant) {
        let window = self.window;
        self.entries
            .retain(|_, seen| now.saturating_duration_since(*seen) < window);
    }

    /// Exact-match membership, without purging.
    pub fn contains(&self, value: &str) -> bool {
        self.entries.contains_key(value)
    }

    /// Records `value` as accepted at `now`.
    pub fn record(&mut self, value: impl Into<String>, now: Instant) {
        self.entries.insert(value.into(), now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Purges, then decides whether `value` is accepted.
    ///
    /// Repeats are only suppressed in continuous mode. An accepted value
    /// is recorded in either mode.
    ///
    /// ## Example
    /// ```rust
    /// use std::time::{Duration, Instant};
    /// use scanlist_core::dedup::{DedupVerdict, RecentScanWindow};
    ///
    /// let mut window = RecentScanWindow::new(Duration::from_millis(3000));
    /// let t0 = Instant::now();
    ///
    /// assert_eq!(window.check_and_record("A", t0, true), DedupVerdict::Accepted);
    /// assert_eq!(
    ///     window.check_and_record("A", t0 + Duration::from_millis(1200), true),
    ///     DedupVerdict::Suppressed
    /// );
    /// ```
    pub fn check_and_record(&mut self, value: &str, now: Instant, continuous: bool) -> DedupVerdict {
        self.purge(now);

        if continuous && self.contains(value) {
            return DedupVerdict::Suppressed;
        }

        self.record(value, now);
        DedupVerdict::Accepted
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
