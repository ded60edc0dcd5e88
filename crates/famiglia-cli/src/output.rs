//! Rendering of script outcomes and org charts.

use std::fmt::Write as _;

use famiglia_hierarchy::{EventKind, HierarchyEvent, OrgChart, SuccessionSource};
use famiglia_protocol::MemberId;
use termtree::Tree;

use crate::config::OutputFormat;
use crate::script::Outcome;

/// Render one outcome in the requested format. JSON output is a single line.
pub fn render(outcome: &Outcome, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(outcome)),
        OutputFormat::Json => serde_json::to_string(outcome),
    }
}

/// Render a chart on its own, as `show` prints it.
pub fn render_chart(chart: &OrgChart, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(chart_text(chart)),
        OutputFormat::Json => chart.to_json(),
    }
}

pub fn render_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Incarcerated(inc) => {
            let mut line = format!("incarcerated {}: ", inc.member);
            match (inc.successor, inc.source) {
                (Some(successor), Some(source)) => {
                    let _ = write!(
                        line,
                        "successor {successor} ({}), reassigned {}",
                        source_label(source),
                        id_list(&inc.reassigned)
                    );
                }
                (Some(successor), None) => {
                    let _ = write!(line, "successor {successor}");
                }
                (None, _) => line.push_str("no successor"),
            }
            if let Some(godfather) = inc.new_godfather {
                let _ = write!(line, ", new godfather {godfather}");
            }
            line
        }
        Outcome::Released(rel) => format!(
            "released {}: boss {}, reclaimed {}",
            rel.member,
            boss_label(rel.boss),
            id_list(&rel.reclaimed)
        ),
        Outcome::LargeGroups { min_size, members } => {
            format!("large groups (> {min_size}): {}", id_list(members))
        }
        Outcome::Compared { a, b, shallower } => match shallower {
            Some(id) => format!("compare {a} {b}: {id} is closer to the top"),
            None => format!("compare {a} {b}: same depth"),
        },
        Outcome::Chart(chart) => chart_text(chart),
        Outcome::Journal { events } => {
            if events.is_empty() {
                return "journal: empty".to_string();
            }
            events
                .iter()
                .map(event_line)
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

/// Current structure as a tree below the godfather, followed by the
/// incarcerated members and their successors.
pub fn chart_text(chart: &OrgChart) -> String {
    let mut out = match chart_tree(chart) {
        Some(tree) => tree.to_string(),
        None => "(leaderless)".to_string(),
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }

    let jailed: Vec<String> = chart
        .members
        .iter()
        .filter(|entry| entry.incarcerated)
        .map(|entry| match entry.successor {
            Some(successor) => format!("{} (successor {successor})", entry.id),
            None => entry.id.to_string(),
        })
        .collect();
    if !jailed.is_empty() {
        let _ = writeln!(out, "incarcerated: {}", jailed.join(", "));
    }
    out.trim_end().to_string()
}

/// Tree of the active members reachable from the godfather.
pub fn chart_tree(chart: &OrgChart) -> Option<Tree<String>> {
    fn build(chart: &OrgChart, id: MemberId) -> Tree<String> {
        let label = match chart.entry(id) {
            Some(entry) => format!("{} (age {})", entry.id, entry.age),
            None => id.to_string(),
        };
        let leaves: Vec<Tree<String>> = chart
            .entry(id)
            .map(|entry| entry.subordinates.iter().map(|&sub| build(chart, sub)).collect())
            .unwrap_or_default();
        Tree::new(label).with_leaves(leaves)
    }

    chart.godfather.map(|godfather| build(chart, godfather))
}

fn event_line(event: &HierarchyEvent) -> String {
    let what = match &event.kind {
        EventKind::Recruited { member, boss } => {
            format!("recruited {member}, boss {}", boss_label(*boss))
        }
        EventKind::Incarcerated {
            member,
            successor,
            source,
            reassigned,
        } => match (successor, source) {
            (Some(successor), Some(source)) => format!(
                "incarcerated {member}, successor {successor} ({}), reassigned {}",
                source_label(*source),
                id_list(reassigned)
            ),
            (Some(successor), None) => format!("incarcerated {member}, successor {successor}"),
            (None, _) => format!("incarcerated {member}, no successor"),
        },
        EventKind::Released {
            member,
            boss,
            reclaimed,
        } => format!(
            "released {member}, boss {}, reclaimed {}",
            boss_label(*boss),
            id_list(reclaimed)
        ),
    };
    format!("#{} {} {what}", event.sequence, event.at.format("%Y-%m-%dT%H:%M:%SZ"))
}

fn source_label(source: SuccessionSource) -> &'static str {
    match source {
        SuccessionSource::Sibling => "sibling",
        SuccessionSource::Subordinate => "subordinate",
    }
}

fn boss_label(boss: Option<MemberId>) -> String {
    boss.map(|b| b.to_string())
        .unwrap_or_else(|| "none (godfather)".to_string())
}

fn id_list(ids: &[MemberId]) -> String {
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}
