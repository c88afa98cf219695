//! Document Normalization
//!
//! Rewrites BSON values into a form that serializes cleanly to JSON.
//! The single transformation is ObjectId to its 24-character hex string,
//! applied recursively through arrays and embedded documents. Everything
//! else passes through untouched.

use mongodb::bson::{Bson, Document};

/// Replace every ObjectId in `value` with its hex string
///
/// Recurses structurally: arrays map element by element, documents field
/// by field with key order preserved. Values containing no ObjectId come
/// back unchanged.
pub fn normalize(value: Bson) -> Bson {
    match value {
        Bson::Array(items) => Bson::Array(items.into_iter().map(normalize).collect()),
        Bson::Document(doc) => Bson::Document(
            doc.into_iter()
                .map(|(key, val)| (key, normalize(val)))
                .collect::<Document>(),
        ),
        Bson::ObjectId(id) => Bson::String(id.to_hex()),
        other => other,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(normalize(Bson::Int32(7)), Bson::Int32(7));
        assert_eq!(
            normalize(Bson::String("plain".to_string())),
            Bson::String("plain".to_string())
        );
        assert_eq!(normalize(Bson::Null), Bson::Null);
        assert_eq!(normalize(Bson::Boolean(true)), Bson::Boolean(true));
    }

    #[test]
    fn test_top_level_object_id() {
        let id = ObjectId::new();
        assert_eq!(normalize(Bson::ObjectId(id)), Bson::String(id.to_hex()));
    }

    #[test]
    fn test_nested_object_ids() {
        let id_a = ObjectId::new();
        let id_b = ObjectId::new();
        let input = doc! {
            "_id": id_a,
            "refs": [id_b, "literal", { "inner": id_a }],
            "count": 3,
        };

        let normalized = match normalize(Bson::Document(input)) {
            Bson::Document(doc) => doc,
            other => panic!("expected document, got {:?}", other),
        };

        assert_eq!(normalized.get_str("_id").unwrap(), id_a.to_hex());
        let refs = normalized.get_array("refs").unwrap();
        assert_eq!(refs[0], Bson::String(id_b.to_hex()));
        assert_eq!(refs[1], Bson::String("literal".to_string()));
        assert_eq!(
            refs[2],
            Bson::Document(doc! { "inner": id_a.to_hex() })
        );
        assert_eq!(normalized.get_i32("count").unwrap(), 3);
    }

    #[test]
    fn test_key_order_preserved() {
        let input = doc! { "z": 1, "a": 2, "m": 3 };
        let normalized = match normalize(Bson::Document(input)) {
            Bson::Document(doc) => doc,
            other => panic!("expected document, got {:?}", other),
        };
        let keys: Vec<&str> = normalized.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_document_without_ids_unchanged() {
        let input = doc! { "name": "widget", "tags": ["a", "b"], "qty": 12 };
        assert_eq!(
            normalize(Bson::Document(input.clone())),
            Bson::Document(input)
        );
    }
}
