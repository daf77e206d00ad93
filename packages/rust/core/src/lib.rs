//! Strip orchestration for mtextstrip.
//!
//! This crate groups a drawing's text-bearing entities into content adapters
//! and runs the structural operations and the markup strip over them.

pub mod adapters;
pub mod batch;
pub mod pipeline;
pub mod selection;

pub use adapters::{ContainerKind, ContentAdapter, TextSlot};
pub use batch::{Batch, BatchCounts};
pub use pipeline::{ProgressReporter, SilentProgress, StripReport, run};
pub use selection::{FormatSelection, SelectionStore};
