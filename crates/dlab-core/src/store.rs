//! Ordered scenario stores with monotonic completion flags.
//!
//! A [`ScenarioStore`] is loaded once from catalog records. Records keep
//! their catalog order. Completion is tracked beside the records so the
//! content itself stays immutable; a flag only goes from unset to set and
//! is cleared by [`ScenarioStore::clear`] or [`ScenarioStore::reset_completion`].

use std::collections::HashSet;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::error::{Error, Result};

/// A fixed, pre-authored record that lives in a store.
pub trait Scenario {
    /// Stable key of the record within its store.
    type Id: Clone + Eq + Hash + Debug + Display;

    /// Name of the store kind, used in error messages.
    const STORE: &'static str;

    fn id(&self) -> &Self::Id;
}

#[derive(Debug, Clone)]
pub struct ScenarioStore<R: Scenario> {
    records: Vec<R>,
    completed: HashSet<R::Id>,
}

impl<R: Scenario> Default for ScenarioStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            completed: HashSet::new(),
        }
    }
}

impl<R: Scenario> ScenarioStore<R> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records, rejecting duplicate ids.
    pub fn from_records(records: Vec<R>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id().clone()) {
                return Err(Error::DuplicateId {
                    store: R::STORE,
                    id: record.id().to_string(),
                });
            }
        }
        Ok(Self {
            records,
            completed: HashSet::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn get_index(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    pub fn contains(&self, id: &R::Id) -> bool {
        self.get(id).is_some()
    }

    /// Mark a record completed.
    ///
    /// Returns `true` only when the flag changed. Unknown ids and records
    /// that are already completed leave the store untouched.
    pub fn mark_completed(&mut self, id: &R::Id) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.completed.insert(id.clone())
    }

    pub fn is_completed(&self, id: &R::Id) -> bool {
        self.completed.contains(id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Drop every record and every completion flag.
    pub fn clear(&mut self) {
        self.records.clear();
        self.completed.clear();
    }

    /// Keep the records but forget which ones were completed.
    pub fn reset_completion(&mut self) {
        self.completed.clear();
    }
}
