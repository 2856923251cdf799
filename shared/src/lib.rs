pub mod events;
pub mod params;
pub mod snapshot;
pub mod types;

pub use events::*;
pub use params::*;
pub use snapshot::*;
pub use types::*;

/// The snapshot format version - restores must match this exactly
/// Version 1: agent table, occupancy and ChaCha stream position
pub const SNAPSHOT_VERSION: u32 = 1;
