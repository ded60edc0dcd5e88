//! Journal of structural events.
//!
//! Every recruitment, incarceration and release is appended with a sequence
//! number and timestamp. The journal is bounded; once full, the oldest
//! entries are evicted first. Sequence numbers keep increasing across
//! evictions.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use famiglia_protocol::{MemberId, DEFAULT_JOURNAL_CAPACITY};
use serde::{Deserialize, Serialize};

use crate::succession::SuccessionSource;

/// What happened to the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    Recruited {
        member: MemberId,
        boss: Option<MemberId>,
    },
    Incarcerated {
        member: MemberId,
        successor: Option<MemberId>,
        source: Option<SuccessionSource>,
        reassigned: Vec<MemberId>,
    },
    Released {
        member: MemberId,
        boss: Option<MemberId>,
        reclaimed: Vec<MemberId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEvent {
    pub sequence: u64,
    pub at: DateTime<Utc>,
    pub kind: EventKind,
}

#[derive(Debug, Clone)]
pub struct Journal {
    entries: VecDeque<HierarchyEvent>,
    max_entries: usize,
    next_sequence: u64,
}

impl Journal {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_JOURNAL_CAPACITY)
    }

    /// A journal retaining at most `max_entries` events. Zero disables
    /// retention but sequence numbers still advance.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
            next_sequence: 1,
        }
    }

    pub fn record(&mut self, kind: EventKind) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        if self.max_entries == 0 {
            return sequence;
        }
        while self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(HierarchyEvent {
            sequence,
            at: Utc::now(),
            kind,
        });
        sequence
    }

    pub fn entries(&self) -> impl Iterator<Item = &HierarchyEvent> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&HierarchyEvent> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}
