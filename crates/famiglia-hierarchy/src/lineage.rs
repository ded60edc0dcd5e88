//! Write-once record of the original boss/subordinate assignment.
//!
//! The first time a member is attached anywhere, its boss at that moment is
//! recorded as its original boss and the member joins that boss's original
//! subordinates. Nothing is ever overwritten or removed afterwards, so the
//! lineage is the durable replay log used to restore structure on release.

use std::collections::{BTreeMap, BTreeSet};

use famiglia_protocol::MemberId;

static NO_SUBORDINATES: BTreeSet<MemberId> = BTreeSet::new();

#[derive(Debug, Clone, Default)]
pub struct Lineage {
    /// Child id -> first boss ever assigned (`None` for the original root).
    original_boss: BTreeMap<MemberId, Option<MemberId>>,
    /// Boss id -> ids whose first boss was this member.
    original_subordinates: BTreeMap<MemberId, BTreeSet<MemberId>>,
}

impl Lineage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `boss` as the original boss of `member` unless one is already
    /// recorded. Returns whether the record was written.
    pub fn record(&mut self, member: MemberId, boss: Option<MemberId>) -> bool {
        if self.original_boss.contains_key(&member) {
            return false;
        }
        self.original_boss.insert(member, boss);
        if let Some(boss) = boss {
            self.original_subordinates
                .entry(boss)
                .or_default()
                .insert(member);
        }
        true
    }

    pub fn is_recorded(&self, member: MemberId) -> bool {
        self.original_boss.contains_key(&member)
    }

    /// Original boss of `member`. `None` both for the original root and for
    /// members never attached.
    pub fn original_boss(&self, member: MemberId) -> Option<MemberId> {
        self.original_boss.get(&member).copied().flatten()
    }

    pub fn original_subordinates(&self, member: MemberId) -> &BTreeSet<MemberId> {
        self.original_subordinates
            .get(&member)
            .unwrap_or(&NO_SUBORDINATES)
    }

    /// Whether `member` sits strictly below `ancestor` in the original tree.
    pub fn descends_from(&self, member: MemberId, ancestor: MemberId) -> bool {
        let mut cursor = self.original_boss(member);
        let mut hops = 0usize;
        while let Some(boss) = cursor {
            if boss == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.original_boss.len() {
                break;
            }
            cursor = self.original_boss(boss);
        }
        false
    }
}
