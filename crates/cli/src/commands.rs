//! Subcommands and their rendered results.

use std::collections::HashMap;
use std::fmt;

use anyhow::{bail, Context};
use clap::Subcommand;
use slotring::{Member, Ring, SlotDiff};
use tracing::debug;

use crate::config::Membership;

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the node each key dispatches to.
    Dispatch {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Print how many slots each node owns.
    Distribution,
    /// Apply a membership change and report which slots move.
    Churn {
        /// Remove the node with this identifier.
        #[arg(long, value_name = "ID", conflicts_with = "reweight")]
        remove: Option<String>,
        /// Change a node's weight, as ID=WEIGHT.
        #[arg(long, value_name = "ID=WEIGHT", value_parser = parse_reweight)]
        reweight: Option<(String, u32)>,
    },
}

fn parse_reweight(raw: &str) -> Result<(String, u32), String> {
    let (id, weight) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=WEIGHT, got {raw:?}"))?;
    let weight = weight
        .parse()
        .map_err(|err| format!("invalid weight {weight:?}: {err}"))?;
    Ok((id.to_string(), weight))
}

impl Command {
    pub fn execute(&self, ring: &Ring<String>, membership: &Membership) -> anyhow::Result<CommandResult> {
        match self {
            Command::Dispatch { keys } => {
                let mut routes = Vec::with_capacity(keys.len());
                for key in keys {
                    let node = ring
                        .dispatch_node(key)
                        .with_context(|| format!("failed to dispatch {key:?}"))?;
                    routes.push(Route {
                        key: key.clone(),
                        node: node.id.to_string(),
                        payload: node.payload,
                    });
                }
                Ok(CommandResult::Dispatch(routes))
            }
            Command::Distribution => {
                let snapshot = ring.snapshot();
                let weights: HashMap<&str, u32> = snapshot
                    .members()
                    .iter()
                    .map(|m| (m.node.id.as_str(), m.weight))
                    .collect();
                let total_weight: u64 = weights.values().map(|w| u64::from(*w)).sum();
                let rows = snapshot
                    .ownership()
                    .into_iter()
                    .map(|(id, slots)| {
                        let weight = weights.get(id.as_str()).copied().unwrap_or(0);
                        Share {
                            node: id.to_string(),
                            slots,
                            slot_share: ratio(slots as u64, snapshot.hash_range() as u64),
                            weight,
                            weight_share: ratio(u64::from(weight), total_weight),
                        }
                    })
                    .collect();
                Ok(CommandResult::Distribution {
                    hash_range: snapshot.hash_range(),
                    collisions: snapshot.collisions(),
                    rows,
                })
            }
            Command::Churn { remove, reweight } => {
                let members = apply_change(membership.members(), remove.as_deref(), reweight.as_ref())?;
                let before = ring.snapshot();
                ring.rebuild(members).context("changed membership is invalid")?;
                let diff = SlotDiff::between(&before, &ring.snapshot());
                debug!(moved = diff.moved, total = diff.total, "computed slot diff");
                Ok(CommandResult::Churn(diff))
            }
        }
    }
}

fn apply_change(
    mut members: Vec<Member<String>>,
    remove: Option<&str>,
    reweight: Option<&(String, u32)>,
) -> anyhow::Result<Vec<Member<String>>> {
    if let Some(id) = remove {
        let before = members.len();
        members.retain(|m| m.node.id.as_str() != id);
        if members.len() == before {
            bail!("no node named {id:?}");
        }
    }
    if let Some((id, weight)) = reweight {
        match members.iter_mut().find(|m| m.node.id.as_str() == id) {
            Some(member) => member.weight = *weight,
            None => bail!("no node named {id:?}"),
        }
    }
    if remove.is_none() && reweight.is_none() {
        bail!("churn needs --remove or --reweight");
    }
    Ok(members)
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub key: String,
    pub node: String,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub node: String,
    pub slots: usize,
    pub slot_share: f64,
    pub weight: u32,
    pub weight_share: f64,
}

/// Output of a command, rendered with `Display`.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Dispatch(Vec<Route>),
    Distribution {
        hash_range: usize,
        collisions: usize,
        rows: Vec<Share>,
    },
    Churn(SlotDiff),
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Dispatch(routes) => {
                for route in routes {
                    writeln!(f, "{} -> {} ({})", route.key, route.node, route.payload)?;
                }
            }
            CommandResult::Distribution {
                hash_range,
                collisions,
                rows,
            } => {
                writeln!(f, "{hash_range} slots, {collisions} virtual node collisions")?;
                writeln!(f, "{:<24} {:>10} {:>8} {:>8} {:>8}", "node", "slots", "share", "weight", "expect")?;
                for row in rows {
                    writeln!(
                        f,
                        "{:<24} {:>10} {:>7.2}% {:>8} {:>7.2}%",
                        row.node,
                        row.slots,
                        row.slot_share * 100.0,
                        row.weight,
                        row.weight_share * 100.0
                    )?;
                }
            }
            CommandResult::Churn(diff) => {
                writeln!(
                    f,
                    "{} of {} slots moved ({:.2}%)",
                    diff.moved,
                    diff.total,
                    diff.moved_fraction() * 100.0
                )?;
                for (node, slots) in &diff.lost {
                    writeln!(f, "  {node} lost {slots}")?;
                }
                for (node, slots) in &diff.gained {
                    writeln!(f, "  {node} gained {slots}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership() -> Membership {
        Membership::parse(
            r#"{
                "ring": { "hash_range": 2048, "hash_function": "md5" },
                "nodes": [
                    { "id": "a", "payload": "10.0.0.1", "weight": 8 },
                    { "id": "b", "payload": "10.0.0.2", "weight": 8 },
                    { "id": "c", "payload": "10.0.0.3", "weight": 16 }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_reweight() {
        assert_eq!(parse_reweight("a=3"), Ok(("a".to_string(), 3)));
        assert!(parse_reweight("a").is_err());
        assert!(parse_reweight("a=-1").is_err());
    }

    #[test]
    fn test_dispatch_command() {
        let membership = membership();
        let ring = membership.build_ring().unwrap();
        let command = Command::Dispatch {
            keys: vec!["user:1".to_string(), "user:2".to_string()],
        };
        let CommandResult::Dispatch(routes) = command.execute(&ring, &membership).unwrap() else {
            panic!("expected dispatch result");
        };
        assert_eq!(routes.len(), 2);
        for route in &routes {
            assert_eq!(Ok(route.payload.clone()), ring.dispatch(&route.key));
        }
    }

    #[test]
    fn test_distribution_covers_ring() {
        let membership = membership();
        let ring = membership.build_ring().unwrap();
        let result = Command::Distribution.execute(&ring, &membership).unwrap();
        let CommandResult::Distribution { hash_range, rows, .. } = &result else {
            panic!("expected distribution result");
        };
        assert_eq!(*hash_range, 2048);
        assert_eq!(rows.iter().map(|r| r.slots).sum::<usize>(), 2048);
        assert_eq!(rows.iter().find(|r| r.node == "c").unwrap().weight_share, 0.5);
        assert!(result.to_string().starts_with("2048 slots"));
    }

    #[test]
    fn test_churn_remove() {
        let membership = membership();
        let ring = membership.build_ring().unwrap();
        let command = Command::Churn {
            remove: Some("b".to_string()),
            reweight: None,
        };
        let CommandResult::Churn(diff) = command.execute(&ring, &membership).unwrap() else {
            panic!("expected churn result");
        };
        assert!(diff.moved > 0);
        assert_eq!(diff.lost.len(), 1);
        assert!(ring.dispatch_node("anything").unwrap().id.as_str() != "b");
    }

    #[test]
    fn test_churn_unknown_node() {
        let membership = membership();
        let ring = membership.build_ring().unwrap();
        let command = Command::Churn {
            remove: None,
            reweight: Some(("zzz".to_string(), 2)),
        };
        assert!(command.execute(&ring, &membership).is_err());
    }
}
