//! Command implementations for the WeCreate CLI.

pub mod config;
pub mod generate;
pub mod health;
pub mod studio;
pub mod types;
