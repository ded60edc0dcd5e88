//! Famiglia CLI - drives a hierarchy from roster and script files
//!
//! Provides:
//! - Configuration loading (TOML file plus `FAMIGLIA_*` overrides)
//! - A line-oriented script language over the hierarchy operations
//! - Text (tree) and JSON rendering of outcomes

pub mod config;
pub mod output;
pub mod script;

use std::path::Path;

use anyhow::Context;
use famiglia_hierarchy::Hierarchy;
use famiglia_protocol::{Roster, RosterFormat};

/// Read a roster file (format inferred from its extension) and build the
/// hierarchy it describes.
pub fn load_hierarchy(path: &Path, journal_capacity: usize) -> anyhow::Result<Hierarchy> {
    let format = RosterFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading roster {}", path.display()))?;
    let roster = Roster::parse(&content, format)
        .with_context(|| format!("parsing roster {}", path.display()))?;
    let hierarchy = Hierarchy::from_roster(&roster, journal_capacity)
        .with_context(|| format!("building hierarchy from {}", path.display()))?;

    tracing::info!(
        roster = %path.display(),
        members = hierarchy.len(),
        "Loaded roster"
    );
    Ok(hierarchy)
}
