//! Dot-path addressing into a [`DocumentValue`] tree.
//!
//! A path such as `Kernel.Add.0.Enabled` is split on `.`. Each segment is
//! interpreted against the node it is applied to:
//! - on a mapping it is a key (digits included, `0` is a valid key)
//! - on a sequence it must parse as a non-negative index
//! - on any other node it cannot be resolved
//!
//! The empty string addresses the root.

use crate::config::DEFAULT_MAX_PAD;
use crate::value::DocumentValue;

/// Split a dot path into its segments. The empty path has no segments.
pub fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    }
}

/// Resolve `segments` below `root`.
pub fn lookup<'a>(root: &'a DocumentValue, segments: &[&str]) -> Option<&'a DocumentValue> {
    let mut node = root;
    for seg in segments {
        node = match node {
            DocumentValue::Mapping(d) => d.get(seg)?,
            DocumentValue::Sequence(items) => items.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// [`assign_with`] using the default padding limit.
pub fn assign(root: &mut DocumentValue, segments: &[&str], value: DocumentValue) -> bool {
    assign_with(root, segments, value, DEFAULT_MAX_PAD)
}

/// Store `value` at `segments`, creating intermediate containers.
///
/// Missing mapping keys become empty mappings; sequences addressed past their
/// end are padded with empty mappings, at most `max_pad` new elements per
/// sequence. Returns `false` when the path runs into a scalar, a non-numeric
/// segment is applied to a sequence, or an index lies further out than
/// `max_pad` allows. On `false`, `root` may have been partially extended;
/// callers that need atomicity work on a copy (see `PlistDocument::set`).
pub fn assign_with(
    root: &mut DocumentValue,
    segments: &[&str],
    value: DocumentValue,
    max_pad: usize,
) -> bool {
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut node = root;
    for seg in parents {
        node = match node {
            DocumentValue::Mapping(d) => d.get_or_insert_with(seg, DocumentValue::empty_mapping),
            DocumentValue::Sequence(items) => match slot(items, seg, max_pad) {
                Some(item) => item,
                None => return false,
            },
            _ => return false,
        };
    }

    match node {
        DocumentValue::Mapping(d) => {
            d.insert(*last, value);
            true
        }
        DocumentValue::Sequence(items) => match slot(items, last, max_pad) {
            Some(item) => {
                *item = value;
                true
            }
            None => false,
        },
        _ => false,
    }
}

/// Element `seg` of `items`, padding with empty mappings when it lies past
/// the end by no more than `max_pad` elements.
fn slot<'a>(items: &'a mut Vec<DocumentValue>, seg: &str, max_pad: usize) -> Option<&'a mut DocumentValue> {
    let idx = seg.parse::<usize>().ok()?;
    let len = idx.checked_add(1)?;
    if len.saturating_sub(items.len()) > max_pad {
        return None;
    }
    if items.len() < len {
        items.resize_with(len, DocumentValue::empty_mapping);
    }
    items.get_mut(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Dict;

    #[test]
    fn split_handles_empty() {
        assert!(split_path("").is_empty());
        assert_eq!(split_path("A.0.B"), vec!["A", "0", "B"]);
    }

    #[test]
    fn numeric_key_on_mapping() {
        let root = DocumentValue::Mapping(Dict::new().with("0", "zero"));
        assert_eq!(lookup(&root, &["0"]).and_then(|v| v.as_str()), Some("zero"));
    }

    #[test]
    fn assign_pads_sequences() {
        let mut root = DocumentValue::Mapping(Dict::new().with("L", Vec::<DocumentValue>::new()));
        assert!(assign(&mut root, &["L", "2", "x"], 1i64.into()));
        let items = lookup(&root, &["L"]).and_then(|v| v.as_sequence()).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], DocumentValue::empty_mapping());
        assert_eq!(lookup(&root, &["L", "2", "x"]), Some(&DocumentValue::Integer(1)));
    }

    #[test]
    fn assign_refuses_scalars() {
        let mut root = DocumentValue::Mapping(Dict::new().with("T", 5i64));
        assert!(!assign(&mut root, &["T", "x"], true.into()));
        assert!(!assign(&mut root, &[], true.into()));
    }

    #[test]
    fn assign_refuses_overflowing_index() {
        let mut root = DocumentValue::Mapping(Dict::new().with("L", Vec::<DocumentValue>::new()));
        let max = usize::MAX.to_string();
        assert!(!assign(&mut root, &["L", max.as_str()], 1i64.into()));
        assert!(!assign(&mut root, &["L", max.as_str(), "x"], 1i64.into()));
        assert_eq!(lookup(&root, &["L"]), Some(&DocumentValue::Sequence(Vec::new())));
    }

    #[test]
    fn assign_bounds_padding() {
        let mut root = DocumentValue::Mapping(Dict::new().with("L", Vec::<DocumentValue>::new()));
        assert!(!assign(&mut root, &["L", "4000000000"], 1i64.into()));
        assert!(!assign_with(&mut root, &["L", "3"], 1i64.into(), 3));
        assert!(assign_with(&mut root, &["L", "2"], 1i64.into(), 3));
        assert_eq!(lookup(&root, &["L"]).and_then(|v| v.as_sequence()).map(<[_]>::len), Some(3));

        // Overwriting inside the current length never pads.
        assert!(assign_with(&mut root, &["L", "0"], 2i64.into(), 0));
        assert!(!assign_with(&mut root, &["L", "3"], 2i64.into(), 0));
    }

    #[test]
    fn assign_refuses_non_numeric_index() {
        let mut root = DocumentValue::Sequence(vec![]);
        assert!(!assign(&mut root, &["first"], true.into()));
    }
}
