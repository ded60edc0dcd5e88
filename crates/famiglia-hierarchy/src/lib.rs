//! Famiglia Hierarchy - succession and restoration for a rooted organization
//!
//! Models a strict tree of members that survives the incarceration and
//! later release of arbitrary members:
//! - Arena of members keyed by id, links stored as ids
//! - Write-once lineage of the original boss/subordinate assignment
//! - Deterministic one-level succession (siblings first, then subordinates)
//! - Transitive restoration of the original shape on release
//! - Bounded journal of structural events and serializable org charts

pub mod arena;
pub mod chart;
pub mod journal;
pub mod lineage;
pub mod member;
pub mod organization;
pub mod succession;

pub use arena::MemberArena;
pub use chart::{ChartEntry, OrgChart};
pub use journal::{EventKind, HierarchyEvent, Journal};
pub use lineage::Lineage;
pub use member::{Member, Standing};
pub use organization::{Hierarchy, Incarceration, Release};
pub use succession::{Succession, SuccessionSource};

use famiglia_protocol::MemberId;
use thiserror::Error;

/// Errors originating from the hierarchy layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Member is not active: {0}")]
    NotActive(MemberId),

    #[error("Member is not incarcerated: {0}")]
    NotIncarcerated(MemberId),

    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Duplicate member: {0}")]
    DuplicateMember(MemberId),

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),
}
