//! Conversions between JSON documents, filters and BSON.

use mongodb::bson::{self, Bson, doc, oid::ObjectId};
use serde_json::Value;

use crate::error::BackendError;
use crate::identifier::Filter;
use crate::types::{CANONICAL_ID_FIELD, CanonicalId, Document};

pub(crate) fn object_id(id: &CanonicalId) -> ObjectId {
    ObjectId::from_bytes(id.bytes())
}

/// Converts a JSON document to BSON, dropping any `_id`.
pub(crate) fn to_bson(document: Document) -> Result<bson::Document, BackendError> {
    let mut document = document;
    document.remove(CANONICAL_ID_FIELD);

    bson::to_document(&document).map_err(serialization_error)
}

fn serialization_error(e: bson::ser::Error) -> BackendError {
    BackendError::SerializationError {
        message: e.to_string(),
    }
}

/// Converts a stored BSON document back to JSON.
///
/// Object ids become 24-character hex strings and dates become RFC 3339
/// strings. Everything else uses relaxed extended JSON.
pub(crate) fn from_bson(document: bson::Document) -> Document {
    document
        .into_iter()
        .map(|(field, value)| (field, bson_to_json(value)))
        .collect()
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(at) => Value::String(
            at.try_to_rfc3339_string()
                .unwrap_or_else(|_| at.timestamp_millis().to_string()),
        ),
        Bson::Document(inner) => Value::Object(from_bson(inner)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Compiles a filter into a query document.
pub(crate) fn filter_document(filter: &Filter) -> Result<bson::Document, BackendError> {
    match filter {
        Filter::CanonicalId(id) => Ok(doc! { "_id": object_id(id) }),
        Filter::FieldEquals { field, value } => {
            let mut query = bson::Document::new();
            query.insert(
                field.clone(),
                bson::to_bson(value).map_err(serialization_error)?,
            );
            Ok(query)
        }
        // `$or` rejects an empty array; `$nor: [{}]` matches nothing.
        Filter::AnyOf(branches) if branches.is_empty() => Ok(doc! { "$nor": [{}] }),
        Filter::AnyOf(branches) => {
            let clauses = branches
                .iter()
                .map(|branch| filter_document(branch).map(Bson::Document))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(doc! { "$or": clauses })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{FilterPolicy, FilterPurpose, custom_id_filter};
    use serde_json::json;

    #[test]
    fn test_canonical_filter_uses_object_id() {
        let id = CanonicalId::parse("507f1f77bcf86cd799439011").unwrap();
        let query = filter_document(&Filter::CanonicalId(id)).unwrap();
        assert_eq!(
            query.get_object_id("_id").unwrap().to_hex(),
            "507f1f77bcf86cd799439011"
        );
    }

    #[test]
    fn test_custom_filter_or_branches() {
        let filter = custom_id_filter("42", FilterPurpose::Read, &FilterPolicy::default());
        let query = filter_document(&filter).unwrap();
        let branches = query.get_array("$or").unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(
            branches[0].as_document().unwrap().get_str("id").unwrap(),
            "42"
        );
        assert_eq!(
            branches[1].as_document().unwrap().get_i64("id").unwrap(),
            42
        );
    }

    #[test]
    fn test_to_bson_drops_canonical_id() {
        let document = json!({"_id": "forged", "name": "Ace"})
            .as_object()
            .cloned()
            .unwrap();
        let converted = to_bson(document).unwrap();
        assert!(!converted.contains_key("_id"));
        assert_eq!(converted.get_str("name").unwrap(), "Ace");
    }

    #[test]
    fn test_from_bson_renders_object_id() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let converted = from_bson(doc! { "_id": oid, "n": 1_i64 });
        assert_eq!(converted["_id"], "507f1f77bcf86cd799439011");
        assert_eq!(converted["n"], 1);
    }
}
