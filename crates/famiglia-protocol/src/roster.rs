//! Roster documents: the flat member list used to seed a hierarchy.
//!
//! A roster lists every member with its age and (except for the godfather)
//! its boss. Rosters are accepted as TOML (`[[members]]` tables) or JSON
//! (`{"members": [...]}`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{MemberId, ProtocolError};

/// One member in a roster document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: MemberId,
    pub age: u32,
    /// Direct boss; absent only for the godfather.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss: Option<MemberId>,
}

impl RosterEntry {
    pub fn new(id: u64, age: u32, boss: Option<u64>) -> Self {
        Self {
            id: MemberId(id),
            age,
            boss: boss.map(MemberId),
        }
    }
}

/// A complete roster document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub members: Vec<RosterEntry>,
}

/// Serialization format of a roster document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterFormat {
    Toml,
    Json,
}

impl RosterFormat {
    /// Infer the format from a file extension (`.toml` or `.json`).
    pub fn from_path(path: &Path) -> Result<Self, ProtocolError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(RosterFormat::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(RosterFormat::Json),
            other => Err(ProtocolError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl Roster {
    pub fn new(members: Vec<RosterEntry>) -> Self {
        Self { members }
    }

    /// Parse a roster document in the given format.
    pub fn parse(content: &str, format: RosterFormat) -> Result<Self, ProtocolError> {
        let roster = match format {
            RosterFormat::Toml => toml::from_str(content)?,
            RosterFormat::Json => serde_json::from_str(content)?,
        };
        Ok(roster)
    }

    /// Serialize the roster as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Entries without a boss. A well-formed roster has exactly one.
    pub fn godfathers(&self) -> impl Iterator<Item = &RosterEntry> {
        self.members.iter().filter(|entry| entry.boss.is_none())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
