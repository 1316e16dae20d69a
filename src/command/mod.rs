//! Chat command pipeline
//!
//! Chat line -> parse_command -> ChatCommand -> CommandExecutor -> ExecutionResult

pub mod executor;
pub mod parser;

pub use executor::{CommandContext, CommandExecutor, ExecutionResult};
pub use parser::{parse_command, ChatCommand};
