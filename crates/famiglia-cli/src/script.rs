//! Line-oriented scripts over the hierarchy operations.
//!
//! One command per line; `#` starts a comment and blank lines are skipped:
//!
//! ```text
//! incarcerate 5
//! large-groups 4
//! compare 6 14
//! release 5
//! show
//! journal
//! ```

use std::fmt;

use famiglia_hierarchy::{
    Hierarchy, HierarchyError, HierarchyEvent, Incarceration, OrgChart, Release,
};
use famiglia_protocol::{MemberId, ProtocolError};
use serde::Serialize;
use thiserror::Error;

/// Errors from parsing or executing a script, tagged with the 1-based line.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{name}`")]
    UnknownCommand { line: usize, name: String },

    #[error("line {line}: `{command}` expects {expected} argument(s), got {found}")]
    WrongArity {
        line: usize,
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: {source}")]
    InvalidMember {
        line: usize,
        #[source]
        source: ProtocolError,
    },

    #[error("line {line}: invalid group size `{value}`")]
    InvalidSize { line: usize, value: String },

    #[error("line {line}: {source}")]
    Hierarchy {
        line: usize,
        #[source]
        source: HierarchyError,
    },
}

impl ScriptError {
    pub fn line(&self) -> usize {
        match self {
            ScriptError::UnknownCommand { line, .. }
            | ScriptError::WrongArity { line, .. }
            | ScriptError::InvalidMember { line, .. }
            | ScriptError::InvalidSize { line, .. }
            | ScriptError::Hierarchy { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Incarcerate(MemberId),
    Release(MemberId),
    /// Members with more than this many subordinates.
    LargeGroups(usize),
    Compare(MemberId, MemberId),
    Show,
    Journal,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Incarcerate(_) => "incarcerate",
            Command::Release(_) => "release",
            Command::LargeGroups(_) => "large-groups",
            Command::Compare(..) => "compare",
            Command::Show => "show",
            Command::Journal => "journal",
        }
    }

    /// Parse one non-empty, comment-free line.
    pub fn parse(line: usize, text: &str) -> Result<Self, ScriptError> {
        let mut words = text.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        let arity = |command: &'static str, expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(ScriptError::WrongArity {
                    line,
                    command,
                    expected,
                    found: args.len(),
                })
            }
        };
        let member = |raw: &str| {
            raw.parse::<MemberId>()
                .map_err(|source| ScriptError::InvalidMember { line, source })
        };

        match name.to_ascii_lowercase().as_str() {
            "incarcerate" => {
                arity("incarcerate", 1)?;
                Ok(Command::Incarcerate(member(args[0])?))
            }
            "release" => {
                arity("release", 1)?;
                Ok(Command::Release(member(args[0])?))
            }
            "large-groups" => {
                arity("large-groups", 1)?;
                let size = args[0].parse().map_err(|_| ScriptError::InvalidSize {
                    line,
                    value: args[0].to_string(),
                })?;
                Ok(Command::LargeGroups(size))
            }
            "compare" => {
                arity("compare", 2)?;
                Ok(Command::Compare(member(args[0])?, member(args[1])?))
            }
            "show" => {
                arity("show", 0)?;
                Ok(Command::Show)
            }
            "journal" => {
                arity("journal", 0)?;
                Ok(Command::Journal)
            }
            _ => Err(ScriptError::UnknownCommand {
                line,
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Incarcerate(id) | Command::Release(id) => write!(f, "{} {id}", self.name()),
            Command::LargeGroups(size) => write!(f, "{} {size}", self.name()),
            Command::Compare(a, b) => write!(f, "{} {a} {b}", self.name()),
            Command::Show | Command::Journal => write!(f, "{}", self.name()),
        }
    }
}

/// A parsed command together with the line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub line: usize,
    pub command: Command,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse a whole script. Fails on the first malformed line.
    pub fn parse(content: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (idx, raw) in content.lines().enumerate() {
            let text = raw.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }
            let line = idx + 1;
            steps.push(Step {
                line,
                command: Command::parse(line, text)?,
            });
        }
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Result of executing one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Incarcerated(Incarceration),
    Released(Release),
    LargeGroups {
        min_size: usize,
        members: Vec<MemberId>,
    },
    Compared {
        a: MemberId,
        b: MemberId,
        /// `None` when both sit at the same depth.
        shallower: Option<MemberId>,
    },
    Chart(OrgChart),
    Journal {
        events: Vec<HierarchyEvent>,
    },
}

/// Execute a single step against the hierarchy.
pub fn execute(hierarchy: &mut Hierarchy, step: &Step) -> Result<Outcome, ScriptError> {
    let line = step.line;
    let wrap = |source: HierarchyError| ScriptError::Hierarchy { line, source };
    tracing::debug!(line, command = %step.command, "Executing step");

    let outcome = match step.command {
        Command::Incarcerate(id) => Outcome::Incarcerated(hierarchy.incarcerate(id).map_err(wrap)?),
        Command::Release(id) => Outcome::Released(hierarchy.release(id).map_err(wrap)?),
        Command::LargeGroups(min_size) => Outcome::LargeGroups {
            min_size,
            members: hierarchy.find_large_groups(min_size),
        },
        Command::Compare(a, b) => Outcome::Compared {
            a,
            b,
            shallower: hierarchy.compare_depth(a, b).map_err(wrap)?,
        },
        Command::Show => Outcome::Chart(hierarchy.chart()),
        Command::Journal => Outcome::Journal {
            events: hierarchy.journal().entries().cloned().collect(),
        },
    };
    Ok(outcome)
}

/// Execute every step in order, stopping at the first failure.
pub fn run(hierarchy: &mut Hierarchy, script: &Script) -> Result<Vec<Outcome>, ScriptError> {
    script
        .steps
        .iter()
        .map(|step| execute(hierarchy, step))
        .collect()
}
