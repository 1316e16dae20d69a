pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, ConfigHandle, ConfigWarning};
pub use error::{AllocatorError, Result};
pub use types::{PlayerId, RoundType, Team};
