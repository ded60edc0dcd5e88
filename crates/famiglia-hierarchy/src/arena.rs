//! Central arena owning every member ever recruited.
//!
//! Links between members are plain ids resolved through the arena, so the
//! boss/subordinate back-references never form owning cycles. All structural
//! edits go through [`MemberArena::attach`] and [`MemberArena::detach`],
//! which keep both sides of a link consistent and feed the [`Lineage`].

use std::collections::BTreeMap;

use famiglia_protocol::MemberId;

use crate::lineage::Lineage;
use crate::member::Member;
use crate::HierarchyError;

#[derive(Debug, Clone, Default)]
pub struct MemberArena {
    members: BTreeMap<MemberId, Member>,
    lineage: Lineage,
}

impl MemberArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// An arena holding only `root`, recorded as the original root.
    pub fn with_root(root: Member) -> Self {
        let id = root.id();
        let mut lineage = Lineage::new();
        lineage.record(id, None);
        let mut members = BTreeMap::new();
        members.insert(id, root);
        Self { members, lineage }
    }

    /// Add a detached member to the arena.
    pub fn insert(&mut self, member: Member) -> Result<(), HierarchyError> {
        let id = member.id();
        if self.members.contains_key(&id) {
            return Err(HierarchyError::DuplicateMember(id));
        }
        self.members.insert(id, member);
        Ok(())
    }

    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// All members, incarcerated ones included, in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn lineage(&self) -> &Lineage {
        &self.lineage
    }

    pub fn boss(&self, id: MemberId) -> Option<MemberId> {
        self.members.get(&id).and_then(Member::boss)
    }

    pub fn is_incarcerated(&self, id: MemberId) -> bool {
        self.members
            .get(&id)
            .map(Member::is_incarcerated)
            .unwrap_or(false)
    }

    /// Place `child` beneath `boss` (or make it parentless for `None`).
    ///
    /// The child leaves its previous boss first. The very first attach of a
    /// member is also written to the lineage; later calls only move the
    /// current links.
    pub fn attach(
        &mut self,
        child: MemberId,
        boss: Option<MemberId>,
    ) -> Result<(), HierarchyError> {
        let previous = self
            .members
            .get(&child)
            .ok_or(HierarchyError::MemberNotFound(child))?
            .boss();
        if let Some(boss) = boss {
            if !self.members.contains_key(&boss) {
                return Err(HierarchyError::MemberNotFound(boss));
            }
        }

        if let Some(previous) = previous {
            if let Some(old) = self.members.get_mut(&previous) {
                old.detach(child);
            }
        }
        if let Some(boss) = boss {
            if let Some(new) = self.members.get_mut(&boss) {
                new.add_subordinate(child);
            }
        }
        if let Some(member) = self.members.get_mut(&child) {
            member.set_boss(boss);
        }

        if self.lineage.record(child, boss) {
            tracing::trace!(member = %child, boss = ?boss, "Original assignment recorded");
        }
        Ok(())
    }

    /// Remove `child` from the current subordinates of `boss`.
    ///
    /// Removing an id that is not a subordinate is a no-op. The lineage is
    /// never touched.
    pub fn detach(&mut self, boss: MemberId, child: MemberId) {
        let removed = self
            .members
            .get_mut(&boss)
            .map(|member| member.detach(child))
            .unwrap_or(false);
        if removed {
            if let Some(member) = self.members.get_mut(&child) {
                if member.boss() == Some(boss) {
                    member.set_boss(None);
                }
            }
        }
    }

    pub(crate) fn mark_incarcerated(
        &mut self,
        id: MemberId,
        successor: Option<MemberId>,
        former_boss: Option<MemberId>,
    ) {
        if let Some(member) = self.members.get_mut(&id) {
            member.incarcerate(successor, former_boss);
        }
    }

    pub(crate) fn mark_released(&mut self, id: MemberId) {
        if let Some(member) = self.members.get_mut(&id) {
            member.release();
        }
    }

    /// Number of members below `id` through current links.
    pub fn subordinate_count(&self, id: MemberId) -> usize {
        let mut count = 0;
        let mut stack: Vec<MemberId> = match self.members.get(&id) {
            Some(member) => member.subordinates().iter().copied().collect(),
            None => return 0,
        };
        while let Some(next) = stack.pop() {
            count += 1;
            if let Some(member) = self.members.get(&next) {
                stack.extend(member.subordinates().iter().copied());
            }
        }
        count
    }

    /// Hops from `id` to the top of its current chain of bosses.
    pub fn depth(&self, id: MemberId) -> usize {
        let mut depth = 0;
        let mut cursor = self.boss(id);
        while let Some(boss) = cursor {
            depth += 1;
            if depth > self.members.len() {
                break;
            }
            cursor = self.boss(boss);
        }
        depth
    }
}
