//! A fetched or reconstructed OpenAlex entity

use serde_json::Value;

use crate::core::error::{CacheError, Result};
use crate::core::id::{prepend_base_url, strip_base_url};
use crate::core::kind::EntityKind;
use crate::core::mapper::Document;

/// One bibliometric record together with its kind and canonical ID.
///
/// The wrapped document is exactly what the API returned (or what the store
/// reconstructed); the ID is held stripped of the base URL, the way every
/// table keys it.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    kind: EntityKind,
    id: String,
    data: Document,
}

impl Entity {
    /// Wrap a document, extracting and stripping its `id` field.
    pub fn new(kind: EntityKind, data: Document) -> Result<Self> {
        let id = data
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| CacheError::Malformed {
                context: format!("{kind} document"),
                detail: "missing string `id` field".to_string(),
            })?;
        let id = strip_base_url(id).to_string();
        Ok(Self { kind, id, data })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Stripped (canonical) identifier, as stored in tables.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Full identifier with the base URL, as exposed to callers.
    pub fn full_id(&self) -> String {
        prepend_base_url(&self.id)
    }

    pub fn data(&self) -> &Document {
        &self.data
    }

    pub fn into_data(self) -> Document {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strips_the_id_on_construction() {
        let entity = Entity::new(
            EntityKind::Author,
            json!({"id": "https://openalex.org/A5023888391", "display_name": "Jason Priem"}),
        )
        .unwrap();
        assert_eq!(entity.id(), "A5023888391");
        assert_eq!(entity.full_id(), "https://openalex.org/A5023888391");
    }

    #[test]
    fn rejects_documents_without_an_id() {
        let err = Entity::new(EntityKind::Author, json!({"display_name": "nobody"})).unwrap_err();
        assert!(matches!(err, CacheError::Malformed { .. }));
    }
}
