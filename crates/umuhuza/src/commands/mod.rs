//! CLI command handlers.

pub mod ask;
pub mod chat;
pub mod seed;

use umuhuza_config::UmuhuzaConfig;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolved configuration (file + environment overlay).
    pub config: UmuhuzaConfig,
    /// Verbose output enabled.
    pub verbose: bool,
}
