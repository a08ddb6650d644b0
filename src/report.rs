//! Output formatting for navigation results.
//!
//! Supports two output formats:
//! - JSON: the indented node array the visualizer consumes
//! - Pretty: colored terminal listing for humans

use std::io::Write;

use colored::*;

use crate::node::{Node, NodeType};

// =============================================================================
// JSON Format
// =============================================================================

/// Indented JSON encoding of `nodes`.
pub fn json_bytes(nodes: &[Node]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(nodes)
}

/// Write `nodes` as an indented JSON array followed by a newline.
pub fn write_json<W: Write>(mut writer: W, nodes: &[Node]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, nodes)?;
    writeln!(writer)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Print `nodes` to `writer` as a human-readable listing.
///
/// One line per node: a type tag, the display name, and where it lives.
pub fn write_pretty<W: Write>(mut writer: W, target: &str, nodes: &[Node]) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "  {} {}", "gonav".cyan().bold(), target)?;
    writeln!(writer)?;

    if nodes.is_empty() {
        writeln!(writer, "  {}", "(no entries)".dimmed())?;
        return Ok(());
    }

    for node in nodes {
        writeln!(
            writer,
            "    {} {:<32} {}",
            type_tag(node),
            display_name(node),
            location(node).dimmed()
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "  {}", format!("{} entries", nodes.len()).dimmed())?;
    Ok(())
}

fn type_tag(node: &Node) -> ColoredString {
    match node.node_type {
        NodeType::TopLevel => "TOP    ".cyan(),
        NodeType::Folder => "FOLDER ".normal(),
        NodeType::CompilableUnit => "PKG    ".green(),
        NodeType::ExecutableUnit => "PROG   ".green().bold(),
        NodeType::SourceFile => "SOURCE ".blue(),
        NodeType::Declaration => match node.kind {
            Some(kind) => format!("{:<7}", kind.as_str()).yellow(),
            None => "OBJECT ".yellow(),
        },
    }
}

/// Labels carry a `kind\nname` pair for declarations; print it on one line.
fn display_name(node: &Node) -> String {
    node.label.replace('\n', " ")
}

fn location(node: &Node) -> String {
    if !node.node_type.is_filesystem() {
        return format!("{}@{}", node.loc, node.id);
    }
    match node.value {
        Some(size) => format!("{} ({} bytes)", node.loc, size),
        None => node.loc.clone(),
    }
}
