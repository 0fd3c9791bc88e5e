//! Show laid-out tree command.

use std::path::Path;

use dockyard_core::tree::{DockNode, NodeKind};
use dockyard_core::{DockTree, NodeId};
use serde_json::{Value, json};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::{HostOptions, format_rect, load_host};

/// Show command handler
pub fn cmd_show(options: &HostOptions<'_>, layout: &Path, format: OutputFormat) -> Result<(), CliError> {
    let host = load_host(options, layout)?;
    match format {
        OutputFormat::Text => {
            for line in tree_lines(host.tree()) {
                println!("{line}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tree_json(host.tree()))?),
    }
    Ok(())
}

/// One indented line per node, depth first.
pub fn tree_lines(tree: &DockTree) -> Vec<String> {
    let mut lines = Vec::new();
    push_lines(tree, tree.root(), 0, None, &mut lines);
    lines
}

fn push_lines(tree: &DockTree, id: NodeId, depth: usize, weight: Option<u32>, lines: &mut Vec<String>) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let weight = weight.map_or_else(String::new, |w| format!("({w}) "));
    match &node.kind {
        NodeKind::Split(split) => {
            lines.push(format!(
                "{indent}{weight}split {} [{}]",
                split.orientation,
                format_rect(node.bounds)
            ));
            for (w, child) in split.slots() {
                push_lines(tree, child, depth + 1, Some(w), lines);
            }
        }
        NodeKind::TabGroup(group) => {
            let titles: Vec<String> = group
                .tabs
                .iter()
                .enumerate()
                .map(|(i, tab)| {
                    if i == group.selected {
                        format!("*{}", tab.title)
                    } else {
                        tab.title.clone()
                    }
                })
                .collect();
            let titles = if titles.is_empty() {
                "(empty)".to_string()
            } else {
                titles.join(", ")
            };
            lines.push(format!("{indent}{weight}group [{}] {titles}", format_rect(node.bounds)));
        }
    }
}

/// The tree as nested JSON objects.
pub fn tree_json(tree: &DockTree) -> Value {
    tree.get(tree.root()).map_or(Value::Null, |root| node_json(tree, root))
}

fn node_json(tree: &DockTree, node: &DockNode) -> Value {
    match &node.kind {
        NodeKind::Split(split) => {
            let slots: Vec<Value> = split
                .slots()
                .filter_map(|(weight, child)| {
                    tree.get(child).map(|c| json!({ "weight": weight, "node": node_json(tree, c) }))
                })
                .collect();
            json!({
                "type": "split",
                "id": node.id.to_string(),
                "orientation": split.orientation,
                "bounds": node.bounds,
                "slots": slots,
            })
        }
        NodeKind::TabGroup(group) => {
            let tabs: Vec<Value> = group
                .tabs
                .iter()
                .map(|tab| json!({ "title": tab.title, "closable": tab.closable, "header": tab.header }))
                .collect();
            json!({
                "type": "tab_group",
                "id": node.id.to_string(),
                "bounds": node.bounds,
                "tab_bar": group.tab_bar,
                "selected": group.selected,
                "tabs": tabs,
            })
        }
    }
}
