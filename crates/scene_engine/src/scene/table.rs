//! Id-keyed entity tables

use std::collections::hash_map::{self, HashMap};

use super::error::{SceneError, SceneResult};

/// Mapping from string id to entity with uniqueness enforced on insert
#[derive(Debug, Clone, PartialEq)]
pub struct Table<V> {
    kind: &'static str,
    entries: HashMap<String, V>,
}

impl<V> Table<V> {
    /// Create an empty table for entities of `kind` (used in error messages)
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    /// Entity kind stored in this table
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Insert a new entity; an id already present is a fatal error
    pub fn insert(&mut self, id: impl Into<String>, value: V) -> SceneResult<()> {
        match self.entries.entry(id.into()) {
            hash_map::Entry::Occupied(entry) => Err(SceneError::DuplicateId {
                kind: self.kind,
                id: entry.key().clone(),
            }),
            hash_map::Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Look up an entity
    pub fn get(&self, id: &str) -> Option<&V> {
        self.entries.get(id)
    }

    /// Look up an entity, failing with an unknown-reference error naming `context`
    pub fn require(&self, id: &str, context: impl Into<String>) -> SceneResult<&V> {
        self.entries
            .get(id)
            .ok_or_else(|| SceneError::unknown(context, self.kind, id))
    }

    /// Whether an id is present
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(id, entity)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(id, value)| (id.as_str(), value))
    }

    /// Iterate over ids in unspecified order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over entities in unspecified order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut table = Table::new("texture");
        table.insert("wood", 1).unwrap();
        table.insert("marble", 2).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("wood"), Some(&1));
        assert!(table.contains("marble"));
        assert!(table.get("glass").is_none());
    }

    #[test]
    fn test_duplicate_insert_keeps_first() {
        let mut table = Table::new("material");
        table.insert("wood", "first").unwrap();

        let err = table.insert("wood", "second").unwrap_err();
        assert!(matches!(
            err,
            SceneError::DuplicateId { kind: "material", ref id } if id == "wood"
        ));
        assert_eq!(table.get("wood"), Some(&"first"));
    }

    #[test]
    fn test_require_reports_context() {
        let table: Table<u8> = Table::new("primitive");
        let err = table.require("cube", "component 'box'").unwrap_err();
        assert_eq!(err.to_string(), "component 'box': no primitive defined with ID = cube");
    }
}
