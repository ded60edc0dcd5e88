//! A single member of the organization and its current links.

use std::collections::BTreeSet;

use famiglia_protocol::MemberId;
use serde::{Deserialize, Serialize};

/// Whether a member is serving in the organization or in prison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standing {
    Active,
    /// Removed from the organization. `successor` is the member that took
    /// over the role, if one was found; `former_boss` is where the member
    /// sat when it was removed.
    Incarcerated {
        successor: Option<MemberId>,
        former_boss: Option<MemberId>,
    },
}

/// A member with immutable identity and mutable current links.
///
/// The original assignment is not stored here; see [`crate::Lineage`].
#[derive(Debug, Clone)]
pub struct Member {
    id: MemberId,
    age: u32,
    boss: Option<MemberId>,
    subordinates: BTreeSet<MemberId>,
    standing: Standing,
}

impl Member {
    pub fn new(id: MemberId, age: u32) -> Self {
        Self {
            id,
            age,
            boss: None,
            subordinates: BTreeSet::new(),
            standing: Standing::Active,
        }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// Current direct boss. `None` for the godfather and for members in prison.
    pub fn boss(&self) -> Option<MemberId> {
        self.boss
    }

    /// Current direct subordinates in ascending id order.
    pub fn subordinates(&self) -> &BTreeSet<MemberId> {
        &self.subordinates
    }

    pub fn standing(&self) -> Standing {
        self.standing
    }

    pub fn is_incarcerated(&self) -> bool {
        matches!(self.standing, Standing::Incarcerated { .. })
    }

    /// The member that took over this member's role while it is in prison.
    pub fn successor(&self) -> Option<MemberId> {
        match self.standing {
            Standing::Incarcerated { successor, .. } => successor,
            Standing::Active => None,
        }
    }

    /// Boss this member had when it went to prison.
    pub fn former_boss(&self) -> Option<MemberId> {
        match self.standing {
            Standing::Incarcerated { former_boss, .. } => former_boss,
            Standing::Active => None,
        }
    }

    /// Record that this member went to prison in favor of `successor`.
    /// Links are left untouched.
    pub(crate) fn incarcerate(&mut self, successor: Option<MemberId>, former_boss: Option<MemberId>) {
        self.standing = Standing::Incarcerated {
            successor,
            former_boss,
        };
    }

    /// Clear the incarceration marker. Links are left untouched.
    pub(crate) fn release(&mut self) {
        self.standing = Standing::Active;
    }

    pub(crate) fn set_boss(&mut self, boss: Option<MemberId>) {
        self.boss = boss;
    }

    pub(crate) fn add_subordinate(&mut self, id: MemberId) {
        self.subordinates.insert(id);
    }

    /// Remove a current subordinate. Removing an absent id is a no-op.
    pub(crate) fn detach(&mut self, id: MemberId) -> bool {
        self.subordinates.remove(&id)
    }
}
