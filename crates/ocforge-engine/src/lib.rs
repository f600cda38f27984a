//! ocforge-engine
//!
//! Operations over OpenCore configuration documents:
//! - OC snapshot: reconcile `ACPI.Add`, `Kernel.Add`, `UEFI.Drivers` and
//!   `Misc.Tools` with the files present in an OpenCore directory
//! - kext descriptor reading and dependency ordering
//! - configuration synthesis from a hardware profile
//! - directory audits
//!
//! Hosts build one [`Engine`] from an [`EngineConfig`] and call into it.

pub mod audit;
pub mod config;
pub mod context;
pub mod entries;
pub mod errors;
pub mod kext;
pub mod snapshot;
pub mod synth;

pub use crate::audit::AuditReport;
pub use crate::config::EngineConfig;
pub use crate::context::{load_schema, Engine};
pub use crate::errors::{EngineError, EngineResult};
pub use crate::snapshot::{reconcile, SnapshotMode, SnapshotReport};
pub use crate::synth::{GenerationMode, HardwareProfile, SynthesizedConfig};
