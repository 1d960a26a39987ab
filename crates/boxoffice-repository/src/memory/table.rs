//! Keyed row storage shared by the in-memory adapters.

use boxoffice_core::{BoxOfficeError, BoxOfficeResult, Entity};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;

/// A table of rows keyed by entity id.
pub struct MemoryTable<ID, T> {
    resource_type: &'static str,
    rows: RwLock<HashMap<ID, T>>,
}

impl<ID, T> MemoryTable<ID, T>
where
    ID: Copy + Eq + Hash + std::fmt::Display,
    T: Clone + Entity<ID>,
{
    #[must_use]
    pub fn new(resource_type: &'static str) -> Self {
        Self {
            resource_type,
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, id: &ID) -> Option<T> {
        self.rows.read().get(id).cloned()
    }

    /// Inserts a new row. Fails if the id is taken.
    pub fn insert(&self, row: &T) -> BoxOfficeResult<T> {
        let mut rows = self.rows.write();
        let id = *row.id();
        if rows.contains_key(&id) {
            return Err(BoxOfficeError::conflict(format!(
                "{} {id} already exists",
                self.resource_type
            )));
        }
        rows.insert(id, row.clone());
        Ok(row.clone())
    }

    /// Replaces an existing row. Fails if the id is unknown.
    pub fn replace(&self, row: &T) -> BoxOfficeResult<T> {
        let mut rows = self.rows.write();
        let id = *row.id();
        match rows.get_mut(&id) {
            Some(existing) => {
                *existing = row.clone();
                Ok(row.clone())
            }
            None => Err(BoxOfficeError::not_found(self.resource_type, id)),
        }
    }

    pub fn remove(&self, id: &ID) -> bool {
        self.rows.write().remove(id).is_some()
    }

    /// Rows matching `predicate`, in unspecified order.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .read()
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.read().values().find(|row| predicate(row)).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}
