//! Typed values to DynamoDB `AttributeValue`s.
//!
//! Numbers travel as `N` in the exact text they were read with, never
//! through a float.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use dynaload_types::{PrimaryKey, TypedItem, TypedValue};

pub fn to_attribute(value: &TypedValue) -> AttributeValue {
    match value {
        TypedValue::Null => AttributeValue::Null(true),
        TypedValue::Text(s) => AttributeValue::S(s.clone()),
        TypedValue::Decimal(d) => AttributeValue::N(d.as_str().to_string()),
        TypedValue::Integer(i) => AttributeValue::N(i.to_string()),
        TypedValue::Boolean(b) => AttributeValue::Bool(*b),
        TypedValue::Json(v) => json_to_attribute(v),
    }
}

/// JSON documents map onto DynamoDB's document types: arrays become `L`,
/// objects `M`.
pub fn json_to_attribute(value: &serde_json::Value) -> AttributeValue {
    match value {
        serde_json::Value::Null => AttributeValue::Null(true),
        serde_json::Value::Bool(b) => AttributeValue::Bool(*b),
        serde_json::Value::Number(n) => AttributeValue::N(n.to_string()),
        serde_json::Value::String(s) => AttributeValue::S(s.clone()),
        serde_json::Value::Array(items) => {
            AttributeValue::L(items.iter().map(json_to_attribute).collect())
        }
        serde_json::Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

pub fn item_map(item: &TypedItem) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(name, value)| (name.to_string(), to_attribute(value)))
        .collect()
}

/// Delete keys carry the raw CSV text of each key attribute as `S`.
pub fn key_map(key: &PrimaryKey) -> HashMap<String, AttributeValue> {
    key.iter()
        .map(|(name, value)| (name.to_string(), AttributeValue::S(value.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use num_bigint::BigInt;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("0.1")]
    #[case("19.990")]
    #[case("-3.14159265358979323846264338327950288")]
    #[case("0.00000001")]
    #[case("-0.0")]
    fn decimals_keep_their_digits(#[case] text: &str) {
        let value = TypedValue::Decimal(text.parse().unwrap());
        assert_eq!(to_attribute(&value), AttributeValue::N(text.to_string()));
    }

    #[test]
    fn large_integers_are_exact() {
        let text = "123456789012345678901234567890";
        let value = TypedValue::Integer(BigInt::from_str(text).unwrap());
        assert_eq!(to_attribute(&value), AttributeValue::N(text.to_string()));
    }

    #[test]
    fn scalars_map_to_matching_types() {
        assert_eq!(to_attribute(&TypedValue::Null), AttributeValue::Null(true));
        assert_eq!(
            to_attribute(&TypedValue::Boolean(true)),
            AttributeValue::Bool(true)
        );
        assert_eq!(
            to_attribute(&TypedValue::Text("x".into())),
            AttributeValue::S("x".into())
        );
    }

    #[test]
    fn json_documents_nest() {
        let doc: serde_json::Value =
            serde_json::from_str(r#"{"tags": ["a", 1.50], "ok": null}"#).unwrap();
        let AttributeValue::M(map) = json_to_attribute(&doc) else {
            panic!("expected map");
        };
        assert_eq!(map["ok"], AttributeValue::Null(true));
        assert_eq!(
            map["tags"],
            AttributeValue::L(vec![
                AttributeValue::S("a".into()),
                AttributeValue::N("1.50".into()),
            ])
        );
    }

    #[test]
    fn key_map_uses_raw_strings() {
        let key = PrimaryKey::new(vec![("pk".into(), "007".into()), ("sk".into(), "a".into())]);
        let map = key_map(&key);
        assert_eq!(map["pk"], AttributeValue::S("007".into()));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn item_map_covers_every_attribute() {
        let mut item = TypedItem::default();
        item.insert("id", TypedValue::Text("1".into()));
        item.insert("meta", TypedValue::Json(json!([true])));
        let map = item_map(&item);
        assert_eq!(map["meta"], AttributeValue::L(vec![AttributeValue::Bool(true)]));
        assert_eq!(map.len(), 2);
    }
}
