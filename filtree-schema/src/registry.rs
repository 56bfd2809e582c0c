//! The read-only field registry consulted during validation.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::{SchemaError, SchemaResult};
use crate::field::FilterField;

/// An ordered set of fields keyed by id.
///
/// The registry is built once and never mutated afterwards; iteration
/// follows declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRegistry {
    fields: IndexMap<SmolStr, FilterField>,
}

impl FieldRegistry {
    /// Build a registry, rejecting empty or duplicate ids.
    pub fn new(fields: impl IntoIterator<Item = FilterField>) -> SchemaResult<Self> {
        let mut map = IndexMap::new();
        for field in fields {
            if field.id.is_empty() {
                return Err(SchemaError::invalid_field(
                    field.label.as_str(),
                    "id must not be empty",
                ));
            }
            if map.contains_key(&field.id) {
                return Err(SchemaError::duplicate("field", field.id.as_str()));
            }
            map.insert(field.id.clone(), field);
        }
        tracing::debug!(fields = map.len(), "Field registry built");
        Ok(Self { fields: map })
    }

    /// An empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a field by id.
    pub fn get(&self, id: &str) -> Option<&FilterField> {
        self.fields.get(id)
    }

    /// Check whether a field id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterField> {
        self.fields.values()
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the registry has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldRegistry {
    type Item = &'a FilterField;
    type IntoIter = indexmap::map::Values<'a, SmolStr, FilterField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn sample() -> Vec<FilterField> {
        vec![
            FilterField::new("name", "Name", DataType::String),
            FilterField::new("age", "Age", DataType::Number),
            FilterField::new("born", "Born", DataType::Date),
        ]
    }

    #[test]
    fn test_lookup() {
        let registry = FieldRegistry::new(sample()).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("age").unwrap().label, "Age");
        assert!(registry.get("missing").is_none());
        assert!(!registry.contains(""));
    }

    #[test]
    fn test_declaration_order() {
        let registry = FieldRegistry::new(sample()).unwrap();
        let ids: Vec<_> = registry.iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec!["name", "age", "born"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut fields = sample();
        fields.push(FilterField::new("age", "Age again", DataType::Numeric));
        let err = FieldRegistry::new(fields).unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate { ref name, .. } if name == "age"));
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = FieldRegistry::new([FilterField::new("", "Nameless", DataType::String)])
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { .. }));
    }

    #[test]
    fn test_empty_registry() {
        let registry = FieldRegistry::empty();
        assert!(registry.is_empty());
        assert_eq!(registry.iter().count(), 0);
    }
}
