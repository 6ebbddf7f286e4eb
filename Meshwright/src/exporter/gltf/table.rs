//! Per-kind entity lists with stable indices.

use std::collections::HashMap;

/// Append-only list where an entity's glTF index is its position.
///
/// Entities registered under a key (material name, image path) are
/// reused: looking the key up again yields the original index.
#[derive(Debug, Clone)]
pub struct EntityTable<T> {
    items: Vec<T>,
    keys: HashMap<String, usize>,
}

impl<T> Default for EntityTable<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            keys: HashMap::new(),
        }
    }
}

impl<T> EntityTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity and return its index.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Append an entity reachable through `key` and return its index.
    pub fn push_keyed(&mut self, key: impl Into<String>, item: T) -> usize {
        let index = self.push(item);
        self.keys.insert(key.into(), index);
        index
    }

    /// Index of the entity registered under `key`.
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.get(key).copied()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Drop every entity and key.
    pub fn clear(&mut self) {
        self.items.clear();
        self.keys.clear();
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_insertion_order() {
        let mut table = EntityTable::new();
        assert_eq!(table.push("a"), 0);
        assert_eq!(table.push("b"), 1);
        assert_eq!(table.push_keyed("lambert1", "c"), 2);
        assert_eq!(table.index_of("lambert1"), Some(2));
        assert_eq!(table.index_of("missing"), None);
        assert_eq!(table.len(), 3);
        assert_eq!(table.into_vec(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clear() {
        let mut table = EntityTable::new();
        table.push_keyed("x", 1);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.index_of("x"), None);
        assert_eq!(table.push(2), 0);
    }
}
