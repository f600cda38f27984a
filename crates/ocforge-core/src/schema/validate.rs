//! Schema validation.
//!
//! Validation walks the document alongside the schema and collects every
//! violation. At each level the checks run in a fixed order:
//! 1. `type` (a node of the wrong type is not descended into)
//! 2. `required`, in declared order
//! 3. declared `properties`, in declared order
//! 4. `additionalProperties`, in document key order
//! 5. `items`, by index

use serde::Serialize;

use super::Schema;
use crate::value::DocumentValue;
use crate::walk::{NodePath, PathSegment};

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub message: String,
    /// Dot-joined location, `root` for the document itself.
    pub path: String,
    /// Rule that failed: `type`, `required` or `additionalProperties`.
    pub validator: String,
    /// Short rendering of the offending value, when there is one.
    pub value: Option<String>,
}

impl ValidationError {
    fn new(path: &NodePath, validator: &str, message: String, value: Option<String>) -> Self {
        Self {
            message,
            path: path.to_string(),
            validator: validator.to_string(),
            value,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate `document` against `schema`, returning all violations in
/// discovery order.
pub fn validate(document: &DocumentValue, schema: &Schema) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut path = NodePath::root();
    check(document, schema, &mut path, &mut errors);
    errors
}

fn check(value: &DocumentValue, schema: &Schema, path: &mut NodePath, out: &mut Vec<ValidationError>) {
    if let Some(ty) = schema.ty {
        if !ty.accepts(value.kind()) {
            out.push(ValidationError::new(
                path,
                "type",
                format!("{} is not of type '{}'", render(value), ty.as_str()),
                Some(value.summary()),
            ));
            return;
        }
    }

    if let DocumentValue::Mapping(d) = value {
        for key in &schema.required {
            if !d.contains_key(key) {
                out.push(ValidationError::new(
                    path,
                    "required",
                    format!("'{key}' is a required property"),
                    None,
                ));
            }
        }

        for (key, sub) in &schema.properties {
            if let Some(child) = d.get(key) {
                path.push(PathSegment::Key(key.clone()));
                check(child, sub, path, out);
                path.pop();
            }
        }

        if !schema.additional_properties {
            for key in d.keys() {
                if schema.property_schema(key).is_none() {
                    out.push(ValidationError::new(
                        path,
                        "additionalProperties",
                        format!("Additional properties are not allowed ('{key}' was unexpected)"),
                        Some(key.to_string()),
                    ));
                }
            }
        }
    }

    if let (DocumentValue::Sequence(items), Some(item_schema)) = (value, schema.items.as_deref()) {
        for (i, item) in items.iter().enumerate() {
            path.push(PathSegment::Index(i));
            check(item, item_schema, path, out);
            path.pop();
        }
    }
}

fn render(value: &DocumentValue) -> String {
    match value {
        DocumentValue::String(s) => format!("'{s}'"),
        other => other.summary(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaType, REQUIRED_SECTIONS};
    use crate::value::Dict;

    fn full_config() -> Dict {
        let mut d = Dict::new();
        for section in REQUIRED_SECTIONS {
            d.insert(section, DocumentValue::empty_mapping());
        }
        d
    }

    #[test]
    fn complete_document_is_valid() {
        let doc = DocumentValue::Mapping(full_config().with("Boot", Dict::new()));
        assert!(validate(&doc, &Schema::opencore_default()).is_empty());
    }

    #[test]
    fn two_missing_sections_two_errors() {
        let mut d = full_config();
        d.remove("Booter");
        d.remove("NVRAM");
        let errors = validate(&DocumentValue::Mapping(d), &Schema::opencore_default());

        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.validator == "required" && e.path == "root"));
        assert_eq!(errors[0].message, "'Booter' is a required property");
        assert_eq!(errors[1].message, "'NVRAM' is a required property");
    }

    #[test]
    fn wrong_type_stops_descent() {
        let doc = DocumentValue::Mapping(full_config().with("Kernel", "oops"));
        let errors = validate(&doc, &Schema::opencore_default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "Kernel");
        assert_eq!(errors[0].validator, "type");
        assert_eq!(errors[0].message, "'oops' is not of type 'object'");
        assert_eq!(errors[0].value.as_deref(), Some("oops"));
    }

    #[test]
    fn unknown_top_level_key() {
        let doc = DocumentValue::Mapping(full_config().with("Extra", 1i64));
        let errors = validate(&doc, &Schema::opencore_default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].validator, "additionalProperties");
        assert_eq!(errors[0].path, "root");
    }

    #[test]
    fn item_errors_carry_index() {
        let schema = Schema::object().property("L", Schema::array_of(Schema::of(SchemaType::Integer)));
        let doc = DocumentValue::Mapping(Dict::new().with(
            "L",
            vec![DocumentValue::Integer(1), DocumentValue::Boolean(true)],
        ));
        let errors = validate(&doc, &schema);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "L.1");
    }

    #[test]
    fn required_before_property_errors() {
        let schema = Schema::object()
            .property("A", Schema::of(SchemaType::String))
            .require("B");
        let doc = DocumentValue::Mapping(Dict::new().with("A", 1i64));
        let kinds: Vec<String> = validate(&doc, &schema)
            .into_iter()
            .map(|e| e.validator)
            .collect();
        assert_eq!(kinds, vec!["required".to_string(), "type".to_string()]);
    }
}
