//! In-flight request tagging.
//!
//! Every external call is issued against a slot and tagged with that slot's sequence number.
//! Issuing a newer request (or invalidating the slot) supersedes older tags; completions that
//! carry a superseded tag are discarded instead of applied.

use serde::Serialize;
use std::fmt;

/// Independent request slots of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Makes,
    Models,
    Lookup,
    Generation,
}

impl Slot {
    const COUNT: usize = 4;

    fn index(self) -> usize {
        match self {
            Slot::Makes => 0,
            Slot::Models => 1,
            Slot::Lookup => 2,
            Slot::Generation => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Makes => "makes",
            Slot::Models => "models",
            Slot::Lookup => "lookup",
            Slot::Generation => "generation",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTag {
    pub slot: Slot,
    pub seq: u64,
}

/// Per-slot sequence numbers plus a count of calls whose completion has not been received
#[derive(Debug, Default)]
pub struct InFlightTracker {
    latest: [u64; Slot::COUNT],
    outstanding: usize,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request for `slot`, superseding every earlier one
    pub fn issue(&mut self, slot: Slot) -> RequestTag {
        let seq = self.bump(slot);
        self.outstanding += 1;
        RequestTag { slot, seq }
    }

    /// Supersede outstanding requests for `slot` without issuing a new one
    pub fn invalidate(&mut self, slot: Slot) {
        self.bump(slot);
    }

    pub fn is_current(&self, tag: RequestTag) -> bool {
        self.latest[tag.slot.index()] == tag.seq
    }

    /// Record the arrival of `tag`'s completion; returns whether it is still current
    pub fn complete(&mut self, tag: RequestTag) -> bool {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.is_current(tag)
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    fn bump(&mut self, slot: Slot) -> u64 {
        let seq = &mut self.latest[slot.index()];
        *seq += 1;
        *seq
    }
}
