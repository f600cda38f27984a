//! ocforge-core
//!
//! Core primitives for ocforge:
//! - Property-list value model (`DocumentValue`, ordered `Dict`)
//! - XML property-list codec with size and depth limits
//! - Path-addressed documents with bounded undo/redo history
//! - Declarative schema validation with path-qualified errors
//! - A shared depth-first traversal used by the encoder, outlines and stats
//!
//! This crate performs no file-system or network I/O. Everything operates on
//! in-memory bytes and trees supplied by the caller.

pub mod codec;
pub mod config;
pub mod document;
pub mod errors;
pub mod history;
pub mod json;
pub mod path;
pub mod schema;
pub mod value;
pub mod walk;

pub use crate::document::PlistDocument;
pub use crate::errors::{OcError, OcResult};
pub use crate::value::{Dict, DocumentValue, ValueKind};

/// Name of the configuration file inside an OpenCore directory.
pub const CONFIG_FILE_NAME: &str = "config.plist";

/// Convenience re-exports.
pub mod prelude {
    pub use crate::codec::{decode, decode_with, encode};
    pub use crate::config::{validate_config, CoreConfig, HistoryConfig, LimitsConfig};
    pub use crate::json::{from_json, to_json};
    pub use crate::schema::{validate, Schema, SchemaType, ValidationError};
    pub use crate::walk::{outline, stats, walk, Flow, NodePath, OutlineRow, TreeStats, Visitor};
    pub use crate::{Dict, DocumentValue, OcError, OcResult, PlistDocument, ValueKind};
}
