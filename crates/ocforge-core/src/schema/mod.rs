//! Declarative structural schemas.
//!
//! A schema is written as a small JSON-Schema-like document:
//!
//! ```json
//! {
//!   "type": "object",
//!   "properties": { "ACPI": { "type": "object" } },
//!   "required": ["ACPI"],
//!   "additionalProperties": false
//! }
//! ```
//!
//! Supported keywords: `type`, `properties`, `required`,
//! `additionalProperties` (boolean only) and `items`. Other keywords
//! (`$schema`, `description`, ...) are ignored. Type names are `object`,
//! `array`, `string`, `integer`, `number`, `boolean`, `data` and `date`.
//!
//! A schema document is interpreted once, up front, into a [`Schema`]. Any
//! problem with the schema itself is a [`OcError::Schema`] at that point;
//! validation never fails.

mod validate;

pub use validate::{validate, ValidationError};

use crate::errors::{OcError, OcResult};
use crate::json::from_json;
use crate::value::{DocumentValue, ValueKind};

/// Top-level sections every OpenCore configuration must carry.
pub const REQUIRED_SECTIONS: [&str; 8] = [
    "ACPI",
    "Booter",
    "DeviceProperties",
    "Kernel",
    "Misc",
    "NVRAM",
    "PlatformInfo",
    "UEFI",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Data,
    Date,
}

impl SchemaType {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "object" => Self::Object,
            "array" => Self::Array,
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "data" => Self::Data,
            "date" => Self::Date,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Data => "data",
            Self::Date => "date",
        }
    }

    /// Whether a node of `kind` satisfies this type.
    pub fn accepts(&self, kind: ValueKind) -> bool {
        match self {
            Self::Object => kind == ValueKind::Mapping,
            Self::Array => kind == ValueKind::Sequence,
            Self::String => kind == ValueKind::String,
            Self::Integer => kind == ValueKind::Integer,
            Self::Number => matches!(kind, ValueKind::Integer | ValueKind::Real),
            Self::Boolean => kind == ValueKind::Boolean,
            Self::Data => kind == ValueKind::Binary,
            Self::Date => kind == ValueKind::Date,
        }
    }
}

/// An interpreted schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub ty: Option<SchemaType>,
    /// Declared properties, in declaration order.
    pub properties: Vec<(String, Schema)>,
    pub required: Vec<String>,
    pub additional_properties: bool,
    pub items: Option<Box<Schema>>,
}

impl Default for Schema {
    /// The empty schema accepts everything.
    fn default() -> Self {
        Self {
            ty: None,
            properties: Vec::new(),
            required: Vec::new(),
            additional_properties: true,
            items: None,
        }
    }
}

impl Schema {
    pub fn of(ty: SchemaType) -> Self {
        Self {
            ty: Some(ty),
            ..Self::default()
        }
    }

    pub fn object() -> Self {
        Self::of(SchemaType::Object)
    }

    pub fn array_of(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        match self.properties.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = schema,
            None => self.properties.push((name, schema)),
        }
        self
    }

    pub fn require(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name);
        }
        self
    }

    pub fn deny_additional(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    pub fn property_schema(&self, name: &str) -> Option<&Schema> {
        self.properties.iter().find(|(k, _)| k == name).map(|(_, s)| s)
    }

    /// Interpret a schema document.
    pub fn from_value(v: &DocumentValue) -> OcResult<Self> {
        build(v, "root")
    }

    pub fn from_json(v: &serde_json::Value) -> OcResult<Self> {
        let doc = from_json(v).map_err(|e| OcError::schema(e.to_string()))?;
        Self::from_value(&doc)
    }

    pub fn from_json_str(s: &str) -> OcResult<Self> {
        let v: serde_json::Value =
            serde_json::from_str(s).map_err(|e| OcError::schema(format!("invalid JSON: {e}")))?;
        Self::from_json(&v)
    }

    /// The built-in OpenCore configuration schema.
    ///
    /// Requires the eight mandatory sections, allows `Boot`, rejects unknown
    /// top-level keys and describes the shape of the arrays the snapshot
    /// engine maintains. Nested levels carry no `required` lists.
    pub fn opencore_default() -> Self {
        let entry_list = || Schema::array_of(Schema::object());

        let mut root = Schema::object()
            .property(
                "ACPI",
                Schema::object()
                    .property("Add", entry_list())
                    .property("Delete", entry_list())
                    .property("Patch", entry_list())
                    .property("Quirks", Schema::object()),
            )
            .property(
                "Booter",
                Schema::object()
                    .property("MmioWhitelist", entry_list())
                    .property("Quirks", Schema::object()),
            )
            .property(
                "Boot",
                Schema::object()
                    .property("Timeout", Schema::of(SchemaType::Integer))
                    .property("Quirks", Schema::object()),
            )
            .property(
                "DeviceProperties",
                Schema::object()
                    .property("Add", Schema::object())
                    .property("Delete", Schema::object()),
            )
            .property(
                "Kernel",
                Schema::object()
                    .property("Add", entry_list())
                    .property("Block", entry_list())
                    .property("Patch", entry_list())
                    .property("Quirks", Schema::object()),
            )
            .property(
                "Misc",
                Schema::object()
                    .property("Entries", entry_list())
                    .property("Tools", entry_list()),
            )
            .property(
                "NVRAM",
                Schema::object()
                    .property("Add", Schema::object())
                    .property("Delete", Schema::object()),
            )
            .property(
                "PlatformInfo",
                Schema::object().property(
                    "Generic",
                    Schema::object()
                        .property("SystemProductName", Schema::of(SchemaType::String))
                        .property("SystemSerialNumber", Schema::of(SchemaType::String))
                        .property("MLB", Schema::of(SchemaType::String))
                        .property("SystemUUID", Schema::of(SchemaType::String))
                        .property("ROM", Schema::of(SchemaType::Data)),
                ),
            )
            .property(
                "UEFI",
                Schema::object()
                    .property("Drivers", Schema::of(SchemaType::Array))
                    .property("Quirks", Schema::object()),
            )
            .deny_additional();

        for section in REQUIRED_SECTIONS {
            root = root.require(section);
        }
        root
    }
}

fn build(v: &DocumentValue, at: &str) -> OcResult<Schema> {
    let d = v
        .as_mapping()
        .ok_or_else(|| OcError::schema(format!("{at}: schema must be a dict, found {}", v.kind())))?;

    let mut schema = Schema::default();

    if let Some(t) = d.get("type") {
        let name = t
            .as_str()
            .ok_or_else(|| OcError::schema(format!("{at}: 'type' must be a string")))?;
        schema.ty = Some(
            SchemaType::parse(name)
                .ok_or_else(|| OcError::schema(format!("{at}: unknown type '{name}'")))?,
        );
    }

    if let Some(p) = d.get("properties") {
        let props = p
            .as_mapping()
            .ok_or_else(|| OcError::schema(format!("{at}: 'properties' must be a dict")))?;
        for (name, sub) in props.iter() {
            let child = build(sub, &format!("{at}.{name}"))?;
            schema.properties.push((name.to_string(), child));
        }
    }

    if let Some(r) = d.get("required") {
        let list = r
            .as_sequence()
            .ok_or_else(|| OcError::schema(format!("{at}: 'required' must be an array")))?;
        for item in list {
            let name = item.as_str().ok_or_else(|| {
                OcError::schema(format!("{at}: 'required' entries must be strings"))
            })?;
            schema.required.push(name.to_string());
        }
    }

    if let Some(a) = d.get("additionalProperties") {
        schema.additional_properties = a.as_bool().ok_or_else(|| {
            OcError::schema(format!("{at}: 'additionalProperties' must be a boolean"))
        })?;
    }

    if let Some(i) = d.get("items") {
        schema.items = Some(Box::new(build(i, &format!("{at}[]"))?));
    }

    Ok(schema)
}
