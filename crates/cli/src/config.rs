//! Command-line arguments and the membership file format.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use slotring::{Member, Ring, RingConfig};
use tracing::{debug, info};

use crate::commands::Command;

/// Inspect and exercise a weighted slot ring.
#[derive(Debug, Parser)]
#[command(name = "slotring", version, about)]
pub struct CliConfig {
    /// Membership file (JSON) with ring parameters and nodes.
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(&self) -> anyhow::Result<()> {
        let membership = Membership::load(&self.config)?;
        let ring = membership.build_ring()?;
        info!(
            nodes = membership.nodes.len(),
            hash_range = ring.hash_range(),
            hasher = ring.hasher_name(),
            "loaded membership"
        );
        let result = self.command.execute(&ring, &membership)?;
        print!("{result}");
        Ok(())
    }
}

/// One node entry in the membership file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeEntry {
    pub id: String,
    /// Returned by dispatch; defaults to the identifier.
    #[serde(default)]
    pub payload: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl NodeEntry {
    pub fn member(&self) -> Member<String> {
        let payload = self.payload.clone().unwrap_or_else(|| self.id.clone());
        Member::new(self.id.as_str(), payload, self.weight)
    }
}

/// Ring parameters plus the full node list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Membership {
    #[serde(default)]
    pub ring: RingConfig,
    pub nodes: Vec<NodeEntry>,
}

impl Membership {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read membership file {}", path.display()))?;
        let membership = Self::parse(&raw)
            .with_context(|| format!("failed to parse membership file {}", path.display()))?;
        debug!(path = %path.display(), nodes = membership.nodes.len(), "read membership file");
        Ok(membership)
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn members(&self) -> Vec<Member<String>> {
        self.nodes.iter().map(NodeEntry::member).collect()
    }

    /// Builds the ring and publishes the file's membership.
    pub fn build_ring(&self) -> anyhow::Result<Ring<String>> {
        let ring = self.ring.build().context("invalid ring configuration")?;
        ring.rebuild(self.members()).context("invalid membership")?;
        Ok(ring)
    }
}
