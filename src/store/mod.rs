//! In-memory relational store
//!
//! Four tables back the EAV core: attributes, attribute_possible_values,
//! attribute_values and projects. All rows carry timestamps and a soft-delete
//! marker; hard deletes never happen outside tests.
//!
//! Mutations run through [`Store::transaction`], which holds the single write
//! lock for the whole closure. That makes every multi-table update (catalog
//! mutation plus denormalization refresh, attribute-set reconciliation)
//! atomic with respect to readers.

mod tables;

pub use tables::{Sequence, Tables};

use std::sync::{Arc, RwLock};

/// Handle to the shared table set.
///
/// Cloning is cheap; all clones see the same data.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Tables>>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only closure against the tables.
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        let tables = self.inner.read().unwrap();
        f(&tables)
    }

    /// Run a mutating closure against the tables.
    ///
    /// The write lock is held for the full closure, so everything inside is
    /// one atomic unit: readers observe either none or all of its effects.
    /// Concurrent transactions serialize on the lock; for overlapping writes
    /// to the same entity the last one to commit wins.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut tables = self.inner.write().unwrap();
        f(&mut tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Attribute, AttributeType};
    use chrono::Utc;

    #[test]
    fn test_transaction_is_visible_to_readers() {
        let store = Store::new();

        store.transaction(|t| {
            let id = t.attribute_ids.next();
            let now = Utc::now();
            t.attributes.insert(
                id,
                Attribute {
                    id,
                    name: "budget".to_string(),
                    attribute_type: AttributeType::Number,
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                },
            );
        });

        let count = store.read(|t| t.attributes.len());
        assert_eq!(count, 1);
    }

    #[test]
    fn test_clones_share_data() {
        let store = Store::new();
        let other = store.clone();

        store.transaction(|t| {
            t.project_ids.next();
        });

        let next = other.transaction(|t| t.project_ids.next());
        assert_eq!(next, 2);
    }
}
