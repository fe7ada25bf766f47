// ABOUTME: Command module aggregator for the rollguard CLI.
// ABOUTME: Re-exports release and history command handlers.

mod history;
mod provider_connection;
mod release;

pub use history::history;
pub use release::release;
