//! Serializable snapshot of an organization.

use std::collections::{BTreeMap, VecDeque};

use famiglia_protocol::{MemberId, Roster, RosterEntry};
use serde::{Deserialize, Serialize};

use crate::organization::Hierarchy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub id: MemberId,
    pub age: u32,
    pub boss: Option<MemberId>,
    pub subordinates: Vec<MemberId>,
    #[serde(default)]
    pub incarcerated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successor: Option<MemberId>,
}

/// Every member's current links at one point in time, in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgChart {
    pub godfather: Option<MemberId>,
    pub members: Vec<ChartEntry>,
}

impl OrgChart {
    pub fn capture(hierarchy: &Hierarchy) -> Self {
        let members = hierarchy
            .members()
            .map(|member| ChartEntry {
                id: member.id(),
                age: member.age(),
                boss: member.boss(),
                subordinates: member.subordinates().iter().copied().collect(),
                incarcerated: member.is_incarcerated(),
                successor: member.successor(),
            })
            .collect();
        Self {
            godfather: hierarchy.godfather().map(|g| g.id()),
            members,
        }
    }

    pub fn entry(&self, id: MemberId) -> Option<&ChartEntry> {
        self.members
            .binary_search_by_key(&id, |entry| entry.id)
            .ok()
            .map(|idx| &self.members[idx])
    }

    pub fn active(&self) -> impl Iterator<Item = &ChartEntry> {
        self.members.iter().filter(|entry| !entry.incarcerated)
    }

    /// Roster of the members currently reachable from the godfather,
    /// bosses listed before their subordinates.
    pub fn to_roster(&self) -> Roster {
        let by_id: BTreeMap<MemberId, &ChartEntry> =
            self.members.iter().map(|entry| (entry.id, entry)).collect();
        let mut members = Vec::new();
        let mut queue: VecDeque<MemberId> = self.godfather.into_iter().collect();

        while let Some(id) = queue.pop_front() {
            let Some(entry) = by_id.get(&id) else {
                continue;
            };
            if entry.incarcerated {
                continue;
            }
            members.push(RosterEntry {
                id: entry.id,
                age: entry.age,
                boss: entry.boss,
            });
            queue.extend(entry.subordinates.iter().copied());
        }
        Roster::new(members)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Hierarchy {
    /// Snapshot of the current structure.
    pub fn chart(&self) -> OrgChart {
        OrgChart::capture(self)
    }
}
