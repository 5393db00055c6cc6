//! CLI commands

mod bump;
mod completions;
mod setup;

pub use bump::BumpCommand;
pub use completions::CompletionsCommand;
pub use setup::SetupCommand;
