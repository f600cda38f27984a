//! Property tests for the codec, path addressing and history.

use proptest::prelude::*;
use time::OffsetDateTime;

use ocforge_core::codec::{decode, encode};
use ocforge_core::{Dict, DocumentValue, PlistDocument};

fn leaf() -> impl Strategy<Value = DocumentValue> {
    prop_oneof![
        "\\PC{0,12}".prop_map(DocumentValue::String),
        any::<i64>().prop_map(DocumentValue::Integer),
        (-1.0e12f64..1.0e12).prop_map(DocumentValue::Real),
        any::<bool>().prop_map(DocumentValue::Boolean),
        prop::collection::vec(any::<u8>(), 0..24).prop_map(DocumentValue::Binary),
        (0i64..4_000_000_000).prop_map(|secs| {
            DocumentValue::Date(
                OffsetDateTime::from_unix_timestamp(secs).unwrap_or(OffsetDateTime::UNIX_EPOCH),
            )
        }),
    ]
}

fn tree() -> impl Strategy<Value = DocumentValue> {
    leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(DocumentValue::Sequence),
            prop::collection::vec(("[A-Za-z0-9 _<>&]{0,8}", inner), 0..6).prop_map(|pairs| {
                DocumentValue::Mapping(pairs.into_iter().collect::<Dict>())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn codec_round_trip(v in tree()) {
        let bytes = encode(&v);
        let back = decode(&bytes).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn set_then_get(
        segments in prop::collection::vec("[A-Za-z0-9]{1,4}", 1..6),
        value in leaf(),
    ) {
        let path = segments.join(".");
        let mut doc = PlistDocument::new();
        prop_assert!(doc.set(&path, value.clone()));
        prop_assert_eq!(doc.get(&path, DocumentValue::String("missing".into())), value);
    }

    #[test]
    fn history_keeps_exactly_capacity_steps(capacity in 1usize..8, extra in 1usize..8) {
        let mut doc = PlistDocument::with_capacity(capacity);
        for i in 0..(capacity + extra) {
            prop_assert!(doc.set("Counter", DocumentValue::Integer(i as i64)));
        }
        for _ in 0..capacity {
            prop_assert!(doc.undo());
        }
        prop_assert!(!doc.undo());
        prop_assert_eq!(
            doc.get("Counter", DocumentValue::Integer(-1)),
            DocumentValue::Integer((extra - 1) as i64)
        );
    }
}

#[test]
fn set_through_sequence_creates_mappings() {
    let mut doc = PlistDocument::new();
    assert!(doc.set("Kernel.Add", DocumentValue::Sequence(Vec::new())));
    assert!(doc.set("Kernel.Add.1.Enabled", DocumentValue::Boolean(false)));

    let items = doc
        .lookup("Kernel.Add")
        .and_then(|v| v.as_sequence())
        .map(|s| s.len());
    assert_eq!(items, Some(2));
    assert_eq!(
        doc.get("Kernel.Add.1.Enabled", DocumentValue::Boolean(true)),
        DocumentValue::Boolean(false)
    );
}

#[test]
fn loaded_document_starts_without_history() {
    let mut doc = PlistDocument::load(b"<plist><dict><key>A</key><integer>1</integer></dict></plist>")
        .unwrap();
    assert!(!doc.can_undo());
    assert!(!doc.undo());
    assert!(doc.set("A", DocumentValue::Integer(2)));
    assert!(doc.can_undo());
}
