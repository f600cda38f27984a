//! Conversions between [`DocumentValue`] and `serde_json::Value`.
//!
//! JSON is the interchange format for schemas, hardware profiles and the CLI's
//! `--json` output. The mapping is lossy only where JSON has no equivalent:
//! - binary → base64 string
//! - date → `YYYY-MM-DDTHH:MM:SSZ` string
//! - non-finite reals → their textual form
//!
//! Going the other way, `null` has no property-list counterpart and is rejected.
//! Object key order survives in both directions (serde_json `preserve_order`).

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde_json::Value;

use crate::errors::{OcError, OcResult};
use crate::value::{format_date, Dict, DocumentValue};

/// Convert a document value to JSON.
pub fn to_json(v: &DocumentValue) -> Value {
    match v {
        DocumentValue::String(s) => Value::String(s.clone()),
        DocumentValue::Integer(i) => Value::Number((*i).into()),
        DocumentValue::Real(r) => serde_json::Number::from_f64(*r)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(r.to_string())),
        DocumentValue::Boolean(b) => Value::Bool(*b),
        DocumentValue::Date(d) => Value::String(format_date(d)),
        DocumentValue::Binary(b) => Value::String(BASE64_STANDARD.encode(b)),
        DocumentValue::Sequence(items) => Value::Array(items.iter().map(to_json).collect()),
        DocumentValue::Mapping(d) => {
            let mut obj = serde_json::Map::with_capacity(d.len());
            for (k, v2) in d.iter() {
                obj.insert(k.to_string(), to_json(v2));
            }
            Value::Object(obj)
        }
    }
}

/// Convert JSON to a document value.
pub fn from_json(v: &Value) -> OcResult<DocumentValue> {
    match v {
        Value::Null => Err(OcError::invalid_argument(
            "null has no property-list representation",
        )),
        Value::Bool(b) => Ok(DocumentValue::Boolean(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(DocumentValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(DocumentValue::Real(f))
            } else {
                Err(OcError::invalid_argument(format!("unrepresentable number: {n}")))
            }
        }
        Value::String(s) => Ok(DocumentValue::String(s.clone())),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(from_json(item)?);
            }
            Ok(DocumentValue::Sequence(out))
        }
        Value::Object(obj) => {
            let mut d = Dict::with_capacity(obj.len());
            for (k, v2) in obj {
                d.insert(k.clone(), from_json(v2)?);
            }
            Ok(DocumentValue::Mapping(d))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_key_order_survives() {
        let v = json!({"z": 1, "a": [true, "x"], "m": {"k": 1.5}});
        let doc = from_json(&v).unwrap();
        let keys: Vec<&str> = doc.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(to_json(&doc), v);
    }

    #[test]
    fn binary_becomes_base64() {
        let v = DocumentValue::Binary(vec![1, 2, 3]);
        assert_eq!(to_json(&v), json!("AQID"));
    }

    #[test]
    fn null_is_rejected() {
        assert!(from_json(&json!({"a": null})).is_err());
    }
}
