// src/state/store.rs
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::state::action::Action;
use crate::state::reducer::reduce;
use crate::state::AnalysisState;

/// Shared handle to the single state instance. Each dispatch runs the reducer
/// under the lock, so two dispatches never interleave.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<Mutex<AnalysisState>>,
}

impl Store {
    pub fn new(initial: AnalysisState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    pub fn dispatch(&self, action: Action) {
        self.apply(|current| reduce(current, action));
    }

    /// Replaces the state only once `step` has returned, so a panic inside
    /// it leaves the previous state in place.
    fn apply(&self, step: impl FnOnce(AnalysisState) -> AnalysisState) {
        let mut guard = self.lock();
        let next = step(guard.clone());
        *guard = next;
    }

    pub fn snapshot(&self) -> AnalysisState {
        self.lock().clone()
    }

    /// Reads without cloning the whole state.
    pub fn read<R>(&self, f: impl FnOnce(&AnalysisState) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, AnalysisState> {
        // State is only ever assigned whole, so a poisoned lock still holds
        // the last committed value.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::View;

    #[test]
    fn clones_share_state() {
        let store = Store::default();
        let handle = store.clone();
        handle.dispatch(Action::Navigate(View::Settings));
        assert_eq!(store.read(|s| s.current_view), View::Settings);
        assert_eq!(store.snapshot().current_view, View::Settings);
    }

    #[test]
    fn panicking_step_keeps_previous_state() {
        let store = Store::default();
        store.dispatch(Action::Navigate(View::Settings));

        let handle = store.clone();
        let outcome = std::thread::spawn(move || {
            handle.apply(|_| panic!("reducer failure"));
        })
        .join();
        assert!(outcome.is_err());

        assert_eq!(store.read(|s| s.current_view), View::Settings);
        store.dispatch(Action::Navigate(View::Dashboard));
        assert_eq!(store.read(|s| s.current_view), View::Dashboard);
    }
}
