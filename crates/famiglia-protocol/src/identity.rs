use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Unique identifier for a member of the organization.
///
/// Identifiers are assigned by the caller when a member is created and
/// never change afterwards. Ordering is numeric and doubles as the
/// enumeration order for subordinate sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl MemberId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for MemberId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for MemberId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(MemberId)
            .map_err(|_| ProtocolError::InvalidMemberId(s.to_string()))
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
