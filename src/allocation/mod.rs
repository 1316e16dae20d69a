//! Item allocation
//!
//! - `engine`: per-player item sets for a round
//! - `utility`: grenade rules
//! - `awp`: AWP turn tracking
//! - `round`: round start service and delivery seam

pub mod awp;
pub mod choice;
pub mod engine;
pub mod round;
pub mod utility;

pub use awp::{AwpRotation, AwpTurn, AwpTurnSet, NoAwpTurns};
pub use choice::choice;
pub use engine::{armor_for_round, AllocationEngine, PlayerRoundContext};
pub use round::{deliver, ItemDelivery, RecordingDelivery, RoundAllocator, RoundSummary};
pub use utility::utility_for_round;
