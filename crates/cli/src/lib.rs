//! CLI tool for inspecting weighted slot rings.
//!
//! Provides commands for:
//! - Dispatching keys against a membership file
//! - Reporting how slots are distributed across nodes
//! - Measuring how many slots a membership change moves

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::{CliConfig, Membership, NodeEntry};
