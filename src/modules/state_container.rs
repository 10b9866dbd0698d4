// Multi-source boolean state - no IO, no host imports.
// Several independent callers assert or retract a condition under their own key;
// the container ORs them together and reports only genuine transitions.

use std::collections::HashMap;
use std::fmt;

pub type StateChangeFn = Box<dyn FnMut(bool) + Send>;

/// Named boolean flags merged with OR, with an edge-triggered change callback.
///
/// Batch several writes with [`stage`](Self::stage) and finish with a single
/// [`update`](Self::update) so the callback fires once per transition rather
/// than once per contributing signal.
pub struct MultipleStateContainer {
    states: HashMap<String, bool>,
    current_state: bool,
    on_state_change: StateChangeFn,
}

impl MultipleStateContainer {
    pub fn new<F>(on_state_change: F, initial_state: bool) -> Self
    where
        F: FnMut(bool) + Send + 'static,
    {
        Self {
            states: HashMap::new(),
            current_state: initial_state,
            on_state_change: Box::new(on_state_change),
        }
    }

    /// Store `value` under `name` and recompute immediately.
    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.set_with(name, value, true);
    }

    /// Store `value` under `name` without recomputing. Call `update` afterwards.
    pub fn stage(&mut self, name: impl Into<String>, value: bool) {
        self.set_with(name, value, false);
    }

    pub fn set_with(&mut self, name: impl Into<String>, value: bool, update: bool) {
        self.states.insert(name.into(), value);
        if update {
            self.update();
        }
    }

    /// Retract a source entirely. Returns the value it held, if any.
    pub fn remove(&mut self, name: &str, update: bool) -> Option<bool> {
        let previous = self.states.remove(name);
        if update {
            self.update();
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.states.get(name).copied()
    }

    /// Recompute the aggregate and fire the callback if it changed.
    /// Returns true when the callback was invoked.
    pub fn update(&mut self) -> bool {
        let new_state = self.state();
        if new_state == self.current_state {
            return false;
        }
        (self.on_state_change)(new_state);
        self.current_state = new_state;
        true
    }

    /// OR of every stored flag. Empty is false.
    pub fn state(&self) -> bool {
        self.states.values().any(|v| *v)
    }

    /// Value observed by the last `update` (or the initial state).
    pub fn current_state(&self) -> bool {
        self.current_state
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl fmt::Debug for MultipleStateContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultipleStateContainer")
            .field("states", &self.states)
            .field("current_state", &self.current_state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::{Arc, Mutex};

    fn recording(initial: bool) -> (MultipleStateContainer, Arc<Mutex<Vec<bool>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let container = MultipleStateContainer::new(
            move |state| sink.lock().unwrap().push(state),
            initial,
        );
        (container, calls)
    }

    #[rstest]
    #[case(&[], false)]
    #[case(&[("a", false)], false)]
    #[case(&[("a", false), ("b", false)], false)]
    #[case(&[("a", true)], true)]
    #[case(&[("a", false), ("b", true)], true)]
    #[case(&[("a", true), ("a", false)], false)]
    #[case(&[("a", true), ("b", true), ("a", false)], true)]
    fn test_aggregate_is_or(#[case] writes: &[(&str, bool)], #[case] expected: bool) {
        let (mut container, _) = recording(false);
        for (key, value) in writes {
            container.set(*key, *value);
        }
        assert_eq!(container.state(), expected);
    }

    #[test]
    fn test_fires_once_per_transition() {
        let (mut container, calls) = recording(false);

        container.set("a", true);
        container.set("b", true);

        assert_eq!(*calls.lock().unwrap(), vec![true]);
        assert!(container.current_state());
    }

    #[test]
    fn test_batched_update_fires_once() {
        let (mut container, calls) = recording(false);

        container.stage("a", true);
        container.stage("b", true);
        assert!(calls.lock().unwrap().is_empty());
        // Stale until update
        assert!(!container.current_state());

        assert!(container.update());
        assert_eq!(*calls.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_repeated_update_is_noop() {
        let (mut container, calls) = recording(false);
        container.stage("a", true);

        assert!(container.update());
        assert!(!container.update());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_initial_true_drops_to_false() {
        let (mut container, calls) = recording(true);

        container.set("scrollTop", false);

        assert_eq!(*calls.lock().unwrap(), vec![false]);
        assert!(!container.current_state());
    }

    #[test]
    fn test_initial_state_matching_aggregate_does_not_fire() {
        let (mut container, calls) = recording(true);
        container.set("pinned", true);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[rstest]
    #[case("scrollTop", true)]
    #[case("scrollTop", false)]
    #[case("", true)]
    #[case("pointer near top", false)]
    fn test_get_returns_what_was_set(#[case] key: &str, #[case] value: bool) {
        let (mut container, _) = recording(false);
        container.set(key, value);
        assert_eq!(container.get(key), Some(value));
    }

    #[test]
    fn test_get_unknown_key() {
        let (container, _) = recording(false);
        assert_eq!(container.get("never"), None);
        assert!(container.is_empty());
    }

    #[test]
    fn test_remove_retracts_source() {
        let (mut container, calls) = recording(false);
        container.set("a", true);

        assert_eq!(container.remove("a", true), Some(true));
        assert_eq!(container.remove("a", true), None);
        assert_eq!(*calls.lock().unwrap(), vec![true, false]);
        assert_eq!(container.len(), 0);
    }
}
