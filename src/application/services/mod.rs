//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the I/O boundary traits but are themselves concrete
//! structs, not traits.

mod merge;
mod snapshot;

pub use merge::MergeService;
pub use snapshot::{SnapshotService, TreeSnapshot};
