//! Scenario tests for incarceration, succession and release.
//!
//! All scenarios run against the reference organization:
//!
//! ```text
//! 1(80)
//! ├── 2(74)
//! │   ├── 5(68) ── 6(52), 10(54), 11(56)
//! │   ├── 7(64)
//! │   ├── 8(63)
//! │   └── 9(65)
//! ├── 3(70)
//! └── 4(73)
//!     └── 12(48) ── 13(61), 14(55), 15(69)
//! ```

use famiglia_hierarchy::{Hierarchy, HierarchyError, Member, SuccessionSource};
use famiglia_protocol::MemberId;

fn id(n: u64) -> MemberId {
    MemberId(n)
}

/// Helper: build the reference organization.
fn populate() -> Hierarchy {
    let mut h = Hierarchy::new(Member::new(id(1), 80));
    let crew: [(u64, u32, u64); 14] = [
        (2, 74, 1),
        (3, 70, 1),
        (4, 73, 1),
        (5, 68, 2),
        (6, 52, 5),
        (7, 64, 2),
        (8, 63, 2),
        (9, 65, 2),
        (10, 54, 5),
        (11, 56, 5),
        (12, 48, 4),
        (13, 61, 12),
        (14, 55, 12),
        (15, 69, 12),
    ];
    for (member, age, boss) in crew {
        h.recruit(Member::new(id(member), age), id(boss)).unwrap();
    }
    h
}

/// Helper: current boss of an active member.
fn boss_of(h: &Hierarchy, member: u64) -> Option<u64> {
    h.get(id(member))
        .expect("member should be active")
        .boss()
        .map(|b| b.as_u64())
}

/// Helper: number of direct subordinates of an active member.
fn crew_size(h: &Hierarchy, member: u64) -> usize {
    h.get(id(member))
        .expect("member should be active")
        .subordinates()
        .len()
}

// ═══════════════════════════════════════════════════════════════
// Construction and lookup
// ═══════════════════════════════════════════════════════════════

#[test]
fn godfather_is_the_first_member() {
    let h = populate();
    let godfather = h.godfather().unwrap();
    assert_eq!(godfather.id(), id(1));
    assert_eq!(godfather.age(), 80);
    assert_eq!(h.len(), 15);
}

#[test]
fn middle_member_links() {
    let h = populate();
    let five = h.get(id(5)).unwrap();
    assert_eq!(five.age(), 68);
    assert_eq!(boss_of(&h, 5), Some(2));
    assert_eq!(five.subordinates().len(), 3);
    for sub in five.subordinates() {
        assert_eq!(h.get(*sub).unwrap().boss(), Some(id(5)));
    }
}

#[test]
fn lineage_matches_initial_assignment() {
    let h = populate();
    assert_eq!(h.lineage().original_boss(id(14)), Some(id(12)));
    assert!(h.lineage().original_boss(id(1)).is_none());
    let originals: Vec<u64> = h
        .lineage()
        .original_subordinates(id(2))
        .iter()
        .map(|m| m.as_u64())
        .collect();
    assert_eq!(originals, vec![5, 7, 8, 9]);
}

// ═══════════════════════════════════════════════════════════════
// Incarceration
// ═══════════════════════════════════════════════════════════════

#[test]
fn incarcerated_member_leaves_active_roster() {
    let mut h = populate();
    let outcome = h.incarcerate(id(5)).unwrap();

    assert!(h.get(id(5)).is_none());
    assert!(h.member(id(5)).unwrap().is_incarcerated());
    assert_eq!(outcome.successor, Some(id(9)));
    assert_eq!(outcome.source, Some(SuccessionSource::Sibling));
    assert_eq!(outcome.reassigned, vec![id(6), id(10), id(11)]);

    // The oldest sibling absorbs the crew.
    assert_eq!(boss_of(&h, 10), Some(9));
    assert_eq!(crew_size(&h, 9), 3);
    assert_eq!(boss_of(&h, 9), Some(2));
}

#[test]
fn subordinate_promoted_when_no_sibling_left() {
    let mut h = populate();
    h.incarcerate(id(5)).unwrap();
    h.incarcerate(id(7)).unwrap();
    h.incarcerate(id(9)).unwrap();
    let outcome = h.incarcerate(id(8)).unwrap();

    assert_eq!(outcome.successor, Some(id(11)));
    assert_eq!(outcome.source, Some(SuccessionSource::Subordinate));
    assert_eq!(boss_of(&h, 10), Some(11));
    assert_eq!(boss_of(&h, 11), Some(2));
    assert_eq!(crew_size(&h, 2), 1);
}

#[test]
fn godfather_replaced_by_oldest_subordinate() {
    let mut h = populate();
    let outcome = h.incarcerate(id(1)).unwrap();

    assert_eq!(outcome.new_godfather, Some(id(2)));
    assert_eq!(h.godfather().unwrap().id(), id(2));
    assert_eq!(boss_of(&h, 2), None);
    assert_eq!(boss_of(&h, 3), Some(2));
    assert_eq!(boss_of(&h, 4), Some(2));
}

#[test]
fn incarcerating_twice_fails_without_change() {
    let mut h = populate();
    h.incarcerate(id(5)).unwrap();
    let before = h.chart();
    assert_eq!(h.incarcerate(id(5)), Err(HierarchyError::NotActive(id(5))));
    assert_eq!(h.chart(), before);
}

#[test]
fn unknown_member_reported() {
    let mut h = populate();
    assert_eq!(
        h.incarcerate(id(99)),
        Err(HierarchyError::MemberNotFound(id(99)))
    );
}

// ═══════════════════════════════════════════════════════════════
// Release
// ═══════════════════════════════════════════════════════════════

#[test]
fn release_restores_sibling_succession() {
    let mut h = populate();
    h.incarcerate(id(5)).unwrap();

    let release = h.release(id(5)).unwrap();
    assert_eq!(release.boss, Some(id(2)));
    assert!(h.get(id(5)).is_some());
    assert_eq!(boss_of(&h, 5), Some(2));
    assert_eq!(crew_size(&h, 5), 3);
    assert_eq!(boss_of(&h, 10), Some(5));
    assert_eq!(crew_size(&h, 9), 0);
}

#[test]
fn release_restores_promoted_subordinate() {
    let mut h = populate();
    h.incarcerate(id(12)).unwrap();
    assert_eq!(boss_of(&h, 15), Some(4));

    h.release(id(12)).unwrap();
    assert_eq!(boss_of(&h, 12), Some(4));
    assert_eq!(crew_size(&h, 12), 3);
    assert_eq!(boss_of(&h, 15), Some(12));
    assert_eq!(crew_size(&h, 4), 1);
}

#[test]
fn release_of_active_member_fails() {
    let mut h = populate();
    assert_eq!(h.release(id(5)), Err(HierarchyError::NotIncarcerated(id(5))));
}

#[test]
fn release_two_levels_of_promotion() {
    let mut h = populate();
    assert_eq!(boss_of(&h, 14), Some(12));

    h.incarcerate(id(12)).unwrap();
    assert_eq!(boss_of(&h, 14), Some(15));
    h.incarcerate(id(15)).unwrap();

    h.release(id(12)).unwrap();
    assert_eq!(boss_of(&h, 14), Some(12));

    h.release(id(15)).unwrap();
    assert_eq!(boss_of(&h, 14), Some(12));
    assert_eq!(boss_of(&h, 12), Some(4));
    assert_eq!(crew_size(&h, 12), 3);
    assert_eq!(boss_of(&h, 15), Some(12));
}

#[test]
fn release_two_levels_with_boss_in_prison() {
    let mut h = populate();

    h.incarcerate(id(12)).unwrap();
    assert_eq!(boss_of(&h, 14), Some(15));
    h.incarcerate(id(15)).unwrap();
    h.incarcerate(id(4)).unwrap();
    assert_eq!(boss_of(&h, 14), Some(13));

    // 12's original boss 4 is in prison; 2 covers for 4.
    h.release(id(12)).unwrap();
    assert_eq!(boss_of(&h, 14), Some(12));
    assert_eq!(boss_of(&h, 12), Some(2));

    h.release(id(15)).unwrap();
    assert_eq!(boss_of(&h, 14), Some(12));
    assert_eq!(boss_of(&h, 15), Some(12));
    assert_eq!(crew_size(&h, 2), 5);
    assert_eq!(crew_size(&h, 12), 3);

    h.release(id(4)).unwrap();
    assert_eq!(boss_of(&h, 12), Some(4));
    assert_eq!(boss_of(&h, 4), Some(1));
    assert_eq!(crew_size(&h, 12), 3);
    assert_eq!(crew_size(&h, 2), 4);
}

#[test]
fn release_attaches_to_successor_of_original_boss() {
    let mut h = populate();
    h.incarcerate(id(5)).unwrap();
    let boss = h.incarcerate(id(2)).unwrap();
    assert_eq!(boss.successor, Some(id(4)));

    let release = h.release(id(5)).unwrap();
    assert_eq!(release.boss, Some(id(4)));
    assert_eq!(boss_of(&h, 5), Some(4));
    assert_eq!(crew_size(&h, 5), 3);
    assert_eq!(crew_size(&h, 9), 0);
}

#[test]
fn reverse_order_release_restores_original_shape() {
    let mut h = populate();
    let original = h.chart();

    for member in [12, 15, 4] {
        h.incarcerate(id(member)).unwrap();
    }
    for member in [4, 15, 12] {
        h.release(id(member)).unwrap();
    }
    assert_eq!(h.chart(), original);
}

#[test]
fn reverse_order_release_restores_nested_siblings() {
    let mut h = populate();
    let original = h.chart();

    for member in [5, 9, 2] {
        h.incarcerate(id(member)).unwrap();
    }
    for member in [2, 9, 5] {
        h.release(id(member)).unwrap();
    }
    assert_eq!(h.chart(), original);
}

#[test]
fn godfather_succession_chain_fully_restored() {
    let mut h = populate();
    let original = h.chart();

    h.incarcerate(id(1)).unwrap();
    h.incarcerate(id(2)).unwrap();
    assert_eq!(h.godfather().unwrap().id(), id(4));

    h.release(id(2)).unwrap();
    assert_eq!(h.godfather().unwrap().id(), id(2));
    h.release(id(1)).unwrap();
    assert_eq!(h.godfather().unwrap().id(), id(1));
    assert_eq!(h.chart(), original);
}

#[test]
fn godfather_released_before_successor() {
    let mut h = populate();
    let original = h.chart();

    h.incarcerate(id(1)).unwrap();
    h.incarcerate(id(2)).unwrap();
    h.release(id(1)).unwrap();
    assert_eq!(h.godfather().unwrap().id(), id(1));
    assert_eq!(boss_of(&h, 4), Some(1));

    h.release(id(2)).unwrap();
    assert_eq!(h.chart(), original);
}

// ═══════════════════════════════════════════════════════════════
// Queries
// ═══════════════════════════════════════════════════════════════

#[test]
fn large_groups_counts_all_levels() {
    let h = populate();
    assert_eq!(h.find_large_groups(4), vec![id(1), id(2)]);
    assert_eq!(h.find_large_groups(13), vec![id(1)]);
    assert!(h.find_large_groups(14).is_empty());
}

#[test]
fn large_groups_ignore_incarcerated() {
    let mut h = populate();
    h.incarcerate(id(2)).unwrap();
    // 4 absorbed 2's crew: 5, 7, 8, 9, 6, 10, 11, 12, 13, 14, 15.
    assert_eq!(h.find_large_groups(4), vec![id(1), id(4)]);
    assert_eq!(h.subordinate_count(id(4)), Ok(11));
}

#[test]
fn compare_depth_returns_shallower_member() {
    let h = populate();
    assert_eq!(h.compare_depth(id(6), id(8)), Ok(Some(id(8))));
    assert_eq!(h.compare_depth(id(3), id(14)), Ok(Some(id(3))));
    assert_eq!(h.compare_depth(id(7), id(12)), Ok(None));
}

#[test]
fn compare_depth_uses_current_links() {
    let mut h = populate();
    // 12 leaves; 15 moves up to depth 2, level with 5.
    h.incarcerate(id(12)).unwrap();
    assert_eq!(h.compare_depth(id(15), id(5)), Ok(None));
    assert_eq!(h.compare_depth(id(14), id(5)), Ok(Some(id(5))));
}

#[test]
fn compare_depth_rejects_incarcerated() {
    let mut h = populate();
    h.incarcerate(id(6)).unwrap();
    assert_eq!(
        h.compare_depth(id(6), id(8)),
        Err(HierarchyError::NotActive(id(6)))
    );
}
