//! The property-list value model.
//!
//! A configuration document is a tree of [`DocumentValue`] nodes. Containers
//! are ordered: sequences keep element order and [`Dict`] keeps key insertion
//! order, which is what the on-disk format preserves and what users expect to
//! see when a document is written back.
//!
//! `Dict` is a small vector-backed map. Configuration documents hold at most a
//! few hundred keys per level, so linear lookup is cheaper than hashing and
//! keeps ordering trivially stable.

use std::fmt;

use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// One node of a configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentValue {
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    /// UTC timestamp with second precision.
    Date(OffsetDateTime),
    Binary(Vec<u8>),
    Sequence(Vec<DocumentValue>),
    Mapping(Dict),
}

/// The kind of a [`DocumentValue`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Real,
    Boolean,
    Date,
    Binary,
    Sequence,
    Mapping,
}

impl ValueKind {
    /// Property-list tag name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Binary => "data",
            Self::Sequence => "array",
            Self::Mapping => "dict",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DocumentValue {
    /// An empty mapping, the value used for auto-created path segments.
    pub fn empty_mapping() -> Self {
        Self::Mapping(Dict::new())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Integer(_) => ValueKind::Integer,
            Self::Real(_) => ValueKind::Real,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Date(_) => ValueKind::Date,
            Self::Binary(_) => ValueKind::Binary,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Mapping(_) => ValueKind::Mapping,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Dict> {
        match self {
            Self::Mapping(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Self::Mapping(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[DocumentValue]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<DocumentValue>> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    /// Short single-line rendering, used for error payloads and outlines.
    ///
    /// Containers render as a count, binary as hex (abbreviated past 16 bytes).
    pub fn summary(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Real(r) => r.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Date(d) => format_date(d),
            Self::Binary(b) => {
                let mut out = String::with_capacity(2 + b.len().min(16) * 2);
                out.push('<');
                for byte in b.iter().take(16) {
                    out.push_str(&format!("{byte:02x}"));
                }
                if b.len() > 16 {
                    out.push_str(&format!("... {} bytes", b.len()));
                }
                out.push('>');
                out
            }
            Self::Sequence(v) => format!("[{} items]", v.len()),
            Self::Mapping(d) => format!("{{{} keys}}", d.len()),
        }
    }
}

impl From<&str> for DocumentValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for DocumentValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for DocumentValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for DocumentValue {
    fn from(r: f64) -> Self {
        Self::Real(r)
    }
}

impl From<bool> for DocumentValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Vec<u8>> for DocumentValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}

impl From<Vec<DocumentValue>> for DocumentValue {
    fn from(v: Vec<DocumentValue>) -> Self {
        Self::Sequence(v)
    }
}

impl From<Dict> for DocumentValue {
    fn from(d: Dict) -> Self {
        Self::Mapping(d)
    }
}

/// Insertion-ordered string-keyed map with unique keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dict {
    entries: Vec<(String, DocumentValue)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DocumentValue>) -> Self {
        self.insert(key, value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&DocumentValue> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut DocumentValue> {
        match self.position(key) {
            Some(i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: DocumentValue) -> Option<DocumentValue> {
        let key = key.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Return the value under `key`, appending `make()` first if it is absent.
    pub fn get_or_insert_with(
        &mut self,
        key: &str,
        make: impl FnOnce() -> DocumentValue,
    ) -> &mut DocumentValue {
        let idx = match self.position(key) {
            Some(i) => i,
            None => {
                self.entries.push((key.to_string(), make()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn remove(&mut self, key: &str) -> Option<DocumentValue> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &DocumentValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocumentValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut DocumentValue)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, DocumentValue)> for Dict {
    fn from_iter<I: IntoIterator<Item = (String, DocumentValue)>>(iter: I) -> Self {
        let mut d = Dict::new();
        for (k, v) in iter {
            d.insert(k, v);
        }
        d
    }
}

impl IntoIterator for Dict {
    type Item = (String, DocumentValue);
    type IntoIter = std::vec::IntoIter<(String, DocumentValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Render a timestamp the way property lists store it: `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_date(d: &OffsetDateTime) -> String {
    let d = d.to_offset(UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        d.year(),
        u8::from(d.month()),
        d.day(),
        d.hour(),
        d.minute(),
        d.second()
    )
}

/// Parse a property-list timestamp.
///
/// Accepts the canonical `YYYY-MM-DDTHH:MM:SSZ` form and, leniently, any
/// RFC 3339 timestamp. The result is normalized to UTC with whole seconds.
pub fn parse_date(s: &str) -> Option<OffsetDateTime> {
    let s = s.trim();
    if let Ok(p) = PrimitiveDateTime::parse(
        s,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z"),
    ) {
        return Some(p.assume_utc());
    }
    OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339)
        .ok()
        .and_then(|d| d.to_offset(UtcOffset::UTC).replace_nanosecond(0).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dict_preserves_insertion_order() {
        let d = Dict::new()
            .with("b", 1i64)
            .with("a", 2i64)
            .with("c", 3i64);
        let keys: Vec<&str> = d.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn dict_replace_keeps_position() {
        let mut d = Dict::new().with("x", 1i64).with("y", 2i64);
        let old = d.insert("x", DocumentValue::Integer(9));
        assert_eq!(old, Some(DocumentValue::Integer(1)));
        let pairs: Vec<(&str, i64)> = d
            .iter()
            .map(|(k, v)| (k, v.as_i64().unwrap()))
            .collect();
        assert_eq!(pairs, vec![("x", 9), ("y", 2)]);
    }

    #[test]
    fn get_or_insert_appends_once() {
        let mut d = Dict::new();
        d.get_or_insert_with("k", DocumentValue::empty_mapping);
        d.get_or_insert_with("k", || DocumentValue::Integer(1));
        assert_eq!(d.len(), 1);
        assert_eq!(d.get("k"), Some(&DocumentValue::empty_mapping()));
    }

    #[test]
    fn summary_of_containers_and_binary() {
        let v = DocumentValue::Sequence(vec![1i64.into(), 2i64.into()]);
        assert_eq!(v.summary(), "[2 items]");
        assert_eq!(DocumentValue::Binary(vec![0xde, 0xad]).summary(), "<dead>");
        assert_eq!(ValueKind::Binary.as_str(), "data");
    }

    #[test]
    fn date_parse_and_format() {
        let d = parse_date("2021-03-04T05:06:07Z").unwrap();
        assert_eq!(format_date(&d), "2021-03-04T05:06:07Z");

        let offset = parse_date("2021-03-04T07:06:07.5+02:00").unwrap();
        assert_eq!(format_date(&offset), "2021-03-04T05:06:07Z");

        assert!(parse_date("yesterday").is_none());
    }
}
