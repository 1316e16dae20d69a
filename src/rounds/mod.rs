//! Round type selection and next-round votes

pub mod selector;
pub mod votes;

pub use selector::{round_type_for_draw, RoundTypeSelector};
pub use votes::RoundVotes;
