//! Successor selection for an incarcerated member.
//!
//! Selection is a two-phase, one-level search:
//! 1. Phase A: the member's siblings (current subordinates of its former boss)
//! 2. Phase B: the member's own current subordinates, if phase A found nobody
//!
//! Within a phase only active candidates count and the oldest wins. On equal
//! ages the candidate enumerated later (higher id) replaces the earlier one.
//! Nothing below the direct subordinates is searched.

use famiglia_protocol::MemberId;
use serde::{Deserialize, Serialize};

use crate::arena::MemberArena;

/// Where the successor was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuccessionSource {
    /// A sibling absorbs the member's subordinates and keeps its own boss.
    Sibling,
    /// A subordinate is promoted into the member's position.
    Subordinate,
}

/// Outcome of successor selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Succession {
    pub successor: MemberId,
    pub source: SuccessionSource,
}

/// Pick a successor for `member`, whose boss before removal was `former_boss`.
///
/// Returns `None` when neither siblings nor subordinates have an eligible
/// candidate.
pub fn select_successor(
    arena: &MemberArena,
    member: MemberId,
    former_boss: Option<MemberId>,
) -> Option<Succession> {
    if let Some(boss) = former_boss {
        let siblings = arena
            .get(boss)
            .map(|b| b.subordinates().iter().copied().collect::<Vec<_>>())
            .unwrap_or_default();
        if let Some(successor) = oldest_eligible(arena, member, siblings) {
            tracing::debug!(member = %member, successor = %successor, "Successor found among siblings");
            return Some(Succession {
                successor,
                source: SuccessionSource::Sibling,
            });
        }
    }

    let subordinates = arena
        .get(member)
        .map(|m| m.subordinates().iter().copied().collect::<Vec<_>>())
        .unwrap_or_default();
    let successor = oldest_eligible(arena, member, subordinates)?;
    tracing::debug!(member = %member, successor = %successor, "Successor promoted from subordinates");
    Some(Succession {
        successor,
        source: SuccessionSource::Subordinate,
    })
}

/// Oldest active candidate, later candidates winning ties.
fn oldest_eligible<I>(arena: &MemberArena, exclude: MemberId, candidates: I) -> Option<MemberId>
where
    I: IntoIterator<Item = MemberId>,
{
    let mut best: Option<(MemberId, u32)> = None;
    for id in candidates {
        if id == exclude {
            continue;
        }
        let Some(candidate) = arena.get(id) else {
            continue;
        };
        if candidate.is_incarcerated() {
            continue;
        }
        match best {
            Some((_, age)) if candidate.age() < age => {}
            _ => best = Some((id, candidate.age())),
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Member;

    /// 1 -> {2, 3}; 2 -> {4, 5}. Ages given per id.
    fn arena(ages: &[(u64, u32)]) -> MemberArena {
        let mut arena = MemberArena::new();
        for &(id, age) in ages {
            arena.insert(Member::new(MemberId(id), age)).unwrap();
        }
        arena.attach(MemberId(1), None).unwrap();
        arena.attach(MemberId(2), Some(MemberId(1))).unwrap();
        arena.attach(MemberId(3), Some(MemberId(1))).unwrap();
        arena.attach(MemberId(4), Some(MemberId(2))).unwrap();
        arena.attach(MemberId(5), Some(MemberId(2))).unwrap();
        arena
    }

    #[test]
    fn test_sibling_preferred_over_subordinate() {
        let mut arena = arena(&[(1, 80), (2, 60), (3, 40), (4, 70), (5, 75)]);
        arena.detach(MemberId(1), MemberId(2));
        let succession = select_successor(&arena, MemberId(2), Some(MemberId(1))).unwrap();
        assert_eq!(succession.successor, MemberId(3));
        assert_eq!(succession.source, SuccessionSource::Sibling);
    }

    #[test]
    fn test_root_searches_subordinates_only() {
        let arena = arena(&[(1, 80), (2, 60), (3, 65), (4, 70), (5, 75)]);
        let succession = select_successor(&arena, MemberId(1), None).unwrap();
        assert_eq!(succession.successor, MemberId(3));
        assert_eq!(succession.source, SuccessionSource::Subordinate);
    }

    #[test]
    fn test_equal_ages_later_candidate_wins() {
        let arena = arena(&[(1, 80), (2, 60), (3, 60), (4, 70), (5, 70)]);
        let succession = select_successor(&arena, MemberId(1), None).unwrap();
        assert_eq!(succession.successor, MemberId(3));

        let mut arena = arena;
        arena.detach(MemberId(1), MemberId(2));
        arena.detach(MemberId(1), MemberId(3));
        let succession = select_successor(&arena, MemberId(2), Some(MemberId(1))).unwrap();
        assert_eq!(succession.successor, MemberId(5));
    }

    #[test]
    fn test_incarcerated_candidates_skipped() {
        let mut arena = arena(&[(1, 80), (2, 60), (3, 40), (4, 70), (5, 75)]);
        arena.detach(MemberId(1), MemberId(3));
        arena.mark_incarcerated(MemberId(5), None, Some(MemberId(2)));
        arena.detach(MemberId(1), MemberId(2));
        let succession = select_successor(&arena, MemberId(2), Some(MemberId(1))).unwrap();
        assert_eq!(succession.successor, MemberId(4));
    }

    #[test]
    fn test_no_candidates_yields_none() {
        let mut arena = arena(&[(1, 80), (2, 60), (3, 40), (4, 70), (5, 75)]);
        arena.detach(MemberId(1), MemberId(2));
        assert!(select_successor(&arena, MemberId(3), Some(MemberId(1))).is_none());
    }
}
