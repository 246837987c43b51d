//! Navigation-lifecycle loading state.
//!
//! DESIGN
//! ======
//! A refcounted in-flight counter instead of a bare boolean: `begin`
//! returns an RAII guard, and the indicator stays on until every guard is
//! dropped. Dropping covers normal completion, early returns, and panic
//! unwinds, so show and hide are always symmetric. An atomic counter keeps
//! this lock-free; nothing is held across awaits.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared tracker of in-flight navigations. Cheap to clone.
#[derive(Clone, Default)]
pub struct LoadingTracker {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a navigation. The navigation ends when the guard drops.
    #[must_use = "dropping the guard immediately ends the navigation"]
    pub fn begin(&self) -> NavigationGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        NavigationGuard { in_flight: Arc::clone(&self.in_flight) }
    }

    /// True while at least one navigation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Number of navigations currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Ends its navigation on drop, on success and error paths alike.
pub struct NavigationGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for NavigationGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "loading_test.rs"]
mod tests;
