//! Kernel extension descriptors and dependency ordering.

pub mod descriptor;
pub mod graph;

pub use descriptor::{DescriptorError, KextDescriptor};
pub use graph::{KextGraph, KextOrder};
