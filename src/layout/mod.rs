//! The two-phase pipeline: coordinate mapping, primary positioning, edge
//! subdivision, bundling, and the scheduler that sequences them.

pub mod bundling;
pub mod mapper;
pub mod primary;
pub mod scheduler;
pub mod segments;
pub mod systems;

pub use bundling::BundlingLayout;
pub use mapper::map_coordinates;
pub use primary::PrimaryLayout;
pub use scheduler::{Phase, PhaseScheduler, Scales};
pub use segments::{generate_segments, segment_count, PositionSnapshot, SegmentBundle, SegmentChain};
