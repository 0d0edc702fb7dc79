//! Toggle selection over a scenario store.

use crate::store::{Scenario, ScenarioStore};

/// Which record's detail view is expanded, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<K> {
    selected: Option<K>,
}

impl<K> Default for Selection<K> {
    fn default() -> Self {
        Self { selected: None }
    }
}

impl<K: Clone + PartialEq + std::fmt::Debug> Selection<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle `id`: selecting the selected id collapses it.
    ///
    /// Ids missing from `store` are ignored. Returns whether the selection changed.
    pub fn toggle<R>(&mut self, id: &K, store: &ScenarioStore<R>) -> bool
    where
        R: Scenario<Id = K>,
    {
        if !store.contains(id) {
            tracing::debug!(store = R::STORE, id = ?id, "ignoring selection of unknown id");
            return false;
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.clone());
        }
        true
    }

    pub fn selected(&self) -> Option<&K> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &K) -> bool {
        self.selected.as_ref() == Some(id)
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Tool(String);

    impl Scenario for Tool {
        type Id = String;
        const STORE: &'static str = "tools";

        fn id(&self) -> &String {
            &self.0
        }
    }

    fn tools() -> ScenarioStore<Tool> {
        ScenarioStore::from_records(vec![Tool("console".into()), Tool("chrome".into())]).unwrap()
    }

    #[test]
    fn selecting_twice_collapses() {
        let store = tools();
        let mut sel = Selection::new();
        assert!(sel.toggle(&"console".to_string(), &store));
        assert!(sel.is_selected(&"console".to_string()));
        assert!(sel.toggle(&"console".to_string(), &store));
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn selecting_another_id_moves_selection() {
        let store = tools();
        let mut sel = Selection::new();
        sel.toggle(&"console".to_string(), &store);
        sel.toggle(&"chrome".to_string(), &store);
        assert_eq!(sel.selected().map(String::as_str), Some("chrome"));
    }

    #[test]
    fn unknown_id_is_a_no_op() {
        let store = tools();
        let mut sel = Selection::new();
        sel.toggle(&"console".to_string(), &store);
        assert!(!sel.toggle(&"vscode".to_string(), &store));
        assert_eq!(sel.selected().map(String::as_str), Some("console"));
    }
}
