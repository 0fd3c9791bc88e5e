//! Probe drop target command.

use std::path::Path;

use dockyard_core::Point;

use crate::error::CliError;
use crate::util::{HostOptions, load_host};

/// Probe command handler
pub fn cmd_probe(options: &HostOptions<'_>, layout: &Path, x: f64, y: f64) -> Result<(), CliError> {
    let host = load_host(options, layout)?;
    let hover = host.probe(Point::new(x, y));

    println!("Target: {}", hover.target);
    match hover.node {
        Some(node) => {
            let titles = host
                .tree()
                .group(node)
                .map(|g| g.tabs.iter().map(|t| t.title.as_str()).collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            println!("Group:  {node} ({titles})");
        }
        None if !hover.target.is_none() => println!("Group:  outer edge"),
        None => {}
    }
    if let Some(plan) = hover.plan {
        println!("Split:  {} slot {}", plan.split, plan.index);
    }
    Ok(())
}
