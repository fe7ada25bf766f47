// ABOUTME: Library root for rollguard - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod health;
pub mod hooks;
pub mod output;
pub mod provider;
pub mod release;
pub mod types;
