//! The organization: godfather, active roster and succession orchestration.
//!
//! `Hierarchy` decides who replaces an incarcerated member and where a
//! released member goes back to. Every structural edit is delegated to the
//! [`MemberArena`], which keeps the current links symmetric and the lineage
//! write-once.
//!
//! Incarceration:
//! 1. The member leaves the active roster and its boss
//! 2. A successor is selected (siblings first, then own subordinates)
//! 3. A promoted subordinate takes the member's place under the former boss
//! 4. The successor inherits the member's remaining subordinates
//! 5. If the godfather went to prison, the successor becomes godfather
//!
//! Release walks the lineage back up to the nearest active original boss
//! (following successors through members still in prison) and then pulls
//! every active original subordinate back, transitively.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use famiglia_protocol::{MemberId, Roster, RosterEntry, DEFAULT_JOURNAL_CAPACITY};
use serde::{Deserialize, Serialize};

use crate::arena::MemberArena;
use crate::journal::{EventKind, Journal};
use crate::lineage::Lineage;
use crate::member::Member;
use crate::succession::{self, Succession, SuccessionSource};
use crate::HierarchyError;

/// Result of a successful incarceration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incarceration {
    pub member: MemberId,
    /// The member that took over, or `None` if nobody was eligible.
    pub successor: Option<MemberId>,
    pub source: Option<SuccessionSource>,
    /// Former subordinates moved beneath the successor.
    pub reassigned: Vec<MemberId>,
    /// Set when the godfather was incarcerated and replaced.
    pub new_godfather: Option<MemberId>,
}

/// Result of a successful release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub member: MemberId,
    /// Boss the member was attached to, `None` if it became godfather.
    pub boss: Option<MemberId>,
    /// Original subordinates (at any depth) moved back into place.
    pub reclaimed: Vec<MemberId>,
}

/// A rooted organization of members.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    arena: MemberArena,
    /// Exactly the members not in prison.
    active: BTreeSet<MemberId>,
    /// `None` only while the organization is leaderless.
    godfather: Option<MemberId>,
    journal: Journal,
}

impl Hierarchy {
    /// Create an organization headed by `godfather`.
    pub fn new(godfather: Member) -> Self {
        Self::with_journal_capacity(godfather, DEFAULT_JOURNAL_CAPACITY)
    }

    pub fn with_journal_capacity(godfather: Member, capacity: usize) -> Self {
        let id = godfather.id();
        let mut journal = Journal::with_capacity(capacity);
        journal.record(EventKind::Recruited {
            member: id,
            boss: None,
        });
        Self {
            arena: MemberArena::with_root(godfather),
            active: BTreeSet::from([id]),
            godfather: Some(id),
            journal,
        }
    }

    /// Build an organization from a roster document.
    ///
    /// The roster must contain exactly one member without a boss. Every
    /// other member must name a boss that is itself in the roster, and all
    /// members must be reachable from the godfather.
    pub fn from_roster(roster: &Roster, journal_capacity: usize) -> Result<Self, HierarchyError> {
        let mut entries: BTreeMap<MemberId, &RosterEntry> = BTreeMap::new();
        for entry in &roster.members {
            if entries.insert(entry.id, entry).is_some() {
                return Err(HierarchyError::DuplicateMember(entry.id));
            }
        }

        let mut godfathers = roster.godfathers();
        let root = match (godfathers.next(), godfathers.next()) {
            (Some(root), None) => root,
            (None, _) => {
                return Err(HierarchyError::InvalidRoster(
                    "roster has no godfather".into(),
                ))
            }
            (Some(a), Some(b)) => {
                return Err(HierarchyError::InvalidRoster(format!(
                    "roster has more than one godfather ({} and {})",
                    a.id, b.id
                )))
            }
        };

        let mut crews: BTreeMap<MemberId, Vec<&RosterEntry>> = BTreeMap::new();
        for entry in &roster.members {
            if let Some(boss) = entry.boss {
                if boss == entry.id {
                    return Err(HierarchyError::InvalidRoster(format!(
                        "member {} is its own boss",
                        entry.id
                    )));
                }
                if !entries.contains_key(&boss) {
                    return Err(HierarchyError::InvalidRoster(format!(
                        "member {} reports to unknown boss {}",
                        entry.id, boss
                    )));
                }
                crews.entry(boss).or_default().push(entry);
            }
        }

        let mut hierarchy =
            Self::with_journal_capacity(Member::new(root.id, root.age), journal_capacity);
        let mut queue = VecDeque::from([root.id]);
        while let Some(boss) = queue.pop_front() {
            for entry in crews.get(&boss).into_iter().flatten() {
                hierarchy.recruit(Member::new(entry.id, entry.age), boss)?;
                queue.push_back(entry.id);
            }
        }

        if hierarchy.arena.len() != entries.len() {
            return Err(HierarchyError::InvalidRoster(format!(
                "{} member(s) unreachable from godfather {}",
                entries.len() - hierarchy.arena.len(),
                root.id
            )));
        }

        tracing::debug!(
            godfather = %root.id,
            members = hierarchy.arena.len(),
            "Hierarchy built from roster"
        );
        Ok(hierarchy)
    }

    /// Add a new member directly beneath an active boss.
    pub fn recruit(&mut self, member: Member, boss: MemberId) -> Result<(), HierarchyError> {
        let id = member.id();
        if self.arena.contains(id) {
            return Err(HierarchyError::DuplicateMember(id));
        }
        if !self.arena.contains(boss) {
            return Err(HierarchyError::MemberNotFound(boss));
        }
        if !self.active.contains(&boss) {
            return Err(HierarchyError::NotActive(boss));
        }

        self.arena.insert(member)?;
        self.arena.attach(id, Some(boss))?;
        self.active.insert(id);
        self.journal.record(EventKind::Recruited {
            member: id,
            boss: Some(boss),
        });
        Ok(())
    }

    /// Send an active member to prison and restructure around it.
    ///
    /// Fails with [`HierarchyError::NotActive`] without touching any state if
    /// the member is already in prison. Finding no successor is not an
    /// error: every current subordinate is active, so an empty search means
    /// the member simply leaves without a replacement.
    pub fn incarcerate(&mut self, id: MemberId) -> Result<Incarceration, HierarchyError> {
        if !self.arena.contains(id) {
            return Err(HierarchyError::MemberNotFound(id));
        }
        if !self.active.contains(&id) {
            tracing::warn!(member = %id, "Incarceration rejected, member is not active");
            return Err(HierarchyError::NotActive(id));
        }

        self.active.remove(&id);
        let former_boss = self.arena.boss(id);
        if let Some(boss) = former_boss {
            self.arena.detach(boss, id);
        }

        let was_godfather = self.godfather == Some(id);
        let mut outcome = Incarceration {
            member: id,
            successor: None,
            source: None,
            reassigned: Vec::new(),
            new_godfather: None,
        };

        match succession::select_successor(&self.arena, id, former_boss) {
            Some(Succession { successor, source }) => {
                if source == SuccessionSource::Subordinate {
                    self.arena.attach(successor, former_boss)?;
                }
                self.arena.mark_incarcerated(id, Some(successor), former_boss);

                let former: Vec<MemberId> = self
                    .arena
                    .get(id)
                    .map(|m| m.subordinates().iter().copied().collect())
                    .unwrap_or_default();
                for subordinate in former {
                    if subordinate == successor || self.arena.is_incarcerated(subordinate) {
                        continue;
                    }
                    self.arena.attach(subordinate, Some(successor))?;
                    outcome.reassigned.push(subordinate);
                }

                if was_godfather {
                    self.godfather = Some(successor);
                    outcome.new_godfather = Some(successor);
                }
                outcome.successor = Some(successor);
                outcome.source = Some(source);
            }
            None => {
                self.arena.mark_incarcerated(id, None, former_boss);
                if was_godfather {
                    self.godfather = None;
                    tracing::warn!(member = %id, "Godfather incarcerated without successor");
                }
            }
        }

        tracing::info!(
            member = %id,
            successor = ?outcome.successor,
            source = ?outcome.source,
            reassigned = outcome.reassigned.len(),
            "Member incarcerated"
        );
        self.journal.record(EventKind::Incarcerated {
            member: id,
            successor: outcome.successor,
            source: outcome.source,
            reassigned: outcome.reassigned.clone(),
        });
        Ok(outcome)
    }

    /// Bring an incarcerated member back and restore its original position.
    ///
    /// Fails with [`HierarchyError::NotIncarcerated`] without touching any
    /// state if the member is active.
    pub fn release(&mut self, id: MemberId) -> Result<Release, HierarchyError> {
        let member = self
            .arena
            .get(id)
            .ok_or(HierarchyError::MemberNotFound(id))?;
        if !member.is_incarcerated() {
            tracing::warn!(member = %id, "Release rejected, member is not incarcerated");
            return Err(HierarchyError::NotIncarcerated(id));
        }

        // Resolved while the member's own marker is still set.
        let boss = self.resolve_boss(id);
        let previous_godfather = self.godfather;

        self.active.insert(id);
        self.arena.mark_released(id);
        self.arena.attach(id, boss)?;
        let reclaimed = self.restore_subordinates(id)?;

        if boss.is_none() {
            if let Some(previous) = previous_godfather {
                if previous != id && self.arena.boss(previous).is_none() {
                    self.arena.attach(previous, Some(id))?;
                }
            }
            self.godfather = Some(id);
        }

        tracing::info!(
            member = %id,
            boss = ?boss,
            reclaimed = reclaimed.len(),
            "Member released"
        );
        self.journal.record(EventKind::Released {
            member: id,
            boss,
            reclaimed: reclaimed.clone(),
        });
        Ok(Release {
            member: id,
            boss,
            reclaimed,
        })
    }

    /// Nearest active stand-in for the original boss of `id`.
    ///
    /// Members still in prison are replaced by their successor, or by their
    /// own original boss when nobody succeeded them.
    fn resolve_boss(&self, id: MemberId) -> Option<MemberId> {
        let lineage = self.arena.lineage();
        let mut visited = BTreeSet::new();
        let mut cursor = lineage.original_boss(id);

        let candidate = loop {
            let Some(current) = cursor else {
                break None;
            };
            let Some(member) = self.arena.get(current) else {
                break None;
            };
            if !member.is_incarcerated() {
                break Some(current);
            }
            if !visited.insert(current) {
                tracing::debug!(member = %id, "Succession chain loops, falling back to godfather");
                break self.godfather;
            }
            cursor = if current == id {
                // The member was itself covering this role; go back to the
                // seat it held.
                member.former_boss()
            } else {
                member
                    .successor()
                    .or_else(|| lineage.original_boss(current))
            };
        };

        candidate.and_then(|candidate| self.settle_boss(id, candidate))
    }

    /// Adjust `candidate` so that attaching `id` beneath it cannot create a
    /// cycle once the original subordinates of `id` are pulled back.
    fn settle_boss(&self, id: MemberId, candidate: MemberId) -> Option<MemberId> {
        let lineage = self.arena.lineage();
        let mut topmost = None;
        let mut cursor = Some(candidate);
        let mut hops = 0usize;

        while let Some(node) = cursor {
            if lineage.descends_from(node, id) {
                topmost = Some(node);
            }
            hops += 1;
            if hops > self.arena.len() {
                break;
            }
            cursor = self.arena.boss(node);
        }

        match topmost {
            Some(descendant) => self.arena.boss(descendant),
            None => Some(candidate),
        }
    }

    /// Pull every active original subordinate of `id` back into place,
    /// descending through the original tree. Members in prison are skipped
    /// along with their original subtree.
    fn restore_subordinates(&mut self, id: MemberId) -> Result<Vec<MemberId>, HierarchyError> {
        let mut reclaimed = Vec::new();
        let mut visited = BTreeSet::from([id]);
        let mut worklist = vec![id];

        while let Some(boss) = worklist.pop() {
            let originals: Vec<MemberId> = self
                .arena
                .lineage()
                .original_subordinates(boss)
                .iter()
                .copied()
                .collect();
            for subordinate in originals {
                if !visited.insert(subordinate) {
                    continue;
                }
                if !self.active.contains(&subordinate) {
                    tracing::debug!(
                        boss = %boss,
                        subordinate = %subordinate,
                        "Original subordinate still incarcerated, skipping"
                    );
                    continue;
                }
                if self.arena.boss(subordinate) != Some(boss) {
                    self.arena.attach(subordinate, Some(boss))?;
                    reclaimed.push(subordinate);
                }
                worklist.push(subordinate);
            }
        }
        Ok(reclaimed)
    }

    /// Active members with more than `min_size` subordinates at any depth,
    /// in ascending id order.
    pub fn find_large_groups(&self, min_size: usize) -> Vec<MemberId> {
        self.active
            .iter()
            .copied()
            .filter(|&id| self.arena.subordinate_count(id) > min_size)
            .collect()
    }

    /// The member of `a` and `b` closer to the top of the current structure,
    /// or `None` if both sit at the same depth.
    pub fn compare_depth(
        &self,
        a: MemberId,
        b: MemberId,
    ) -> Result<Option<MemberId>, HierarchyError> {
        let depth_a = self.depth(a)?;
        let depth_b = self.depth(b)?;
        Ok(match depth_a.cmp(&depth_b) {
            std::cmp::Ordering::Less => Some(a),
            std::cmp::Ordering::Greater => Some(b),
            std::cmp::Ordering::Equal => None,
        })
    }

    /// Hops from an active member to the godfather through current links.
    pub fn depth(&self, id: MemberId) -> Result<usize, HierarchyError> {
        self.ensure_active(id)?;
        Ok(self.arena.depth(id))
    }

    /// Number of members beneath an active member, at any depth.
    pub fn subordinate_count(&self, id: MemberId) -> Result<usize, HierarchyError> {
        self.ensure_active(id)?;
        Ok(self.arena.subordinate_count(id))
    }

    fn ensure_active(&self, id: MemberId) -> Result<(), HierarchyError> {
        if !self.arena.contains(id) {
            return Err(HierarchyError::MemberNotFound(id));
        }
        if !self.active.contains(&id) {
            return Err(HierarchyError::NotActive(id));
        }
        Ok(())
    }

    /// The current godfather, if the organization has one.
    pub fn godfather(&self) -> Option<&Member> {
        self.godfather.and_then(|id| self.arena.get(id))
    }

    /// Look up an active member.
    pub fn get(&self, id: MemberId) -> Option<&Member> {
        if self.active.contains(&id) {
            self.arena.get(id)
        } else {
            None
        }
    }

    /// Look up any member, including those in prison.
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.arena.get(id)
    }

    pub fn is_active(&self, id: MemberId) -> bool {
        self.active.contains(&id)
    }

    /// Active members in ascending id order.
    pub fn active_members(&self) -> impl Iterator<Item = &Member> {
        self.active.iter().filter_map(|&id| self.arena.get(id))
    }

    /// Incarcerated members in ascending id order.
    pub fn incarcerated_members(&self) -> impl Iterator<Item = &Member> {
        self.arena.iter().filter(|m| m.is_incarcerated())
    }

    /// Every member ever recruited.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.arena.iter()
    }

    /// Number of active members.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn lineage(&self) -> &Lineage {
        self.arena.lineage()
    }

    pub fn arena(&self) -> &MemberArena {
        &self.arena
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}
