//! An editable configuration document with undo/redo.
//!
//! [`PlistDocument`] owns one mapping root. Edits go through [`PlistDocument::set`],
//! which is atomic: the change is applied to a copy and only committed (and
//! recorded in the history) when the whole path could be realized.

use crate::codec;
use crate::config::{CoreConfig, LimitsConfig, DEFAULT_HISTORY_CAPACITY, DEFAULT_MAX_PAD};
use crate::errors::{OcError, OcResult};
use crate::history::History;
use crate::path::{assign_with, lookup, split_path};
use crate::value::{Dict, DocumentValue};

#[derive(Debug, Clone)]
pub struct PlistDocument {
    root: DocumentValue,
    history: History,
    max_pad: usize,
}

impl Default for PlistDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PlistDocument {
    /// Empty document with the default history capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_root(DocumentValue::empty_mapping(), capacity)
    }

    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::with_capacity(cfg.history.capacity).with_max_pad(cfg.limits.max_pad)
    }

    fn from_root(root: DocumentValue, capacity: usize) -> Self {
        Self {
            history: History::new(root.clone(), capacity),
            root,
            max_pad: DEFAULT_MAX_PAD,
        }
    }

    /// Most elements a single [`PlistDocument::set`] may append to a sequence.
    pub fn with_max_pad(mut self, max_pad: usize) -> Self {
        self.max_pad = max_pad;
        self
    }

    /// Wrap a mapping as a fresh document.
    pub fn from_dict(root: Dict, capacity: usize) -> Self {
        Self::from_root(DocumentValue::Mapping(root), capacity)
    }

    /// Wrap an existing tree. The root must be a mapping.
    pub fn from_value(root: DocumentValue, capacity: usize) -> OcResult<Self> {
        if !matches!(root, DocumentValue::Mapping(_)) {
            return Err(OcError::format(format!(
                "document root must be a dict, found {}",
                root.kind()
            )));
        }
        Ok(Self::from_root(root, capacity))
    }

    /// Decode `bytes` with default limits and history capacity.
    pub fn load(bytes: &[u8]) -> OcResult<Self> {
        Self::load_with(bytes, &CoreConfig::default())
    }

    pub fn load_with(bytes: &[u8], cfg: &CoreConfig) -> OcResult<Self> {
        let root = codec::decode_with(bytes, &cfg.limits)?;
        Ok(Self::from_value(root, cfg.history.capacity)?.with_max_pad(cfg.limits.max_pad))
    }

    /// Replace the content of this document by decoding `bytes`.
    ///
    /// On failure the document is left untouched.
    pub fn reload(&mut self, bytes: &[u8], limits: &LimitsConfig) -> OcResult<()> {
        let root = codec::decode_with(bytes, limits)?;
        if !matches!(root, DocumentValue::Mapping(_)) {
            return Err(OcError::format("document root must be a dict"));
        }
        self.history.reset(root.clone());
        self.root = root;
        self.max_pad = limits.max_pad;
        Ok(())
    }

    pub fn root(&self) -> &DocumentValue {
        &self.root
    }

    pub fn into_root(self) -> DocumentValue {
        self.root
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        codec::encode(&self.root)
    }

    /// Borrowing lookup; `None` when any segment cannot be resolved.
    pub fn lookup(&self, path: &str) -> Option<&DocumentValue> {
        lookup(&self.root, &split_path(path))
    }

    /// Value at `path`, or `default` when it cannot be resolved.
    pub fn get(&self, path: &str, default: DocumentValue) -> DocumentValue {
        match self.lookup(path) {
            Some(v) => v.clone(),
            None => default,
        }
    }

    /// Store `value` at `path`.
    ///
    /// Returns `false`, leaving the document unchanged, when the path is empty,
    /// cannot be realized against the current tree shape, or addresses a
    /// sequence index too far past its end.
    pub fn set(&mut self, path: &str, value: DocumentValue) -> bool {
        let segments = split_path(path);
        let mut next = self.root.clone();
        if !assign_with(&mut next, &segments, value, self.max_pad) {
            return false;
        }
        self.history.record(next.clone());
        self.root = next;
        true
    }

    /// Apply several edits as one history step.
    ///
    /// `edit` works on a copy of the root; the copy is committed only when it
    /// returns `true` and the root is still a mapping.
    pub fn update<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut DocumentValue) -> bool,
    {
        let mut next = self.root.clone();
        if !edit(&mut next) || !matches!(next, DocumentValue::Mapping(_)) {
            return false;
        }
        self.history.record(next.clone());
        self.root = next;
        true
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.root = snapshot.clone();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.root = snapshot.clone();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.undo_depth() > 0
    }

    pub fn can_redo(&self) -> bool {
        self.history.redo_depth() > 0
    }

    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }
}
