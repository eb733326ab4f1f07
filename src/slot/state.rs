//! Slot state and decoded slot definitions

use serde::Serialize;

/// Occupancy state of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    /// Never written, or reset by a clear
    Empty,

    /// Holds a live record
    Occupied,

    /// Tombstone left by a delete; reusable by inserts, skipped by lookups
    Deleted,

    /// Unrecognized tag byte. Probes pass over it; inserts never reuse it.
    Unknown(u8),
}

impl SlotState {
    /// On-disk tag byte
    pub fn as_byte(self) -> u8 {
        match self {
            SlotState::Empty => 0,
            SlotState::Occupied => 1,
            SlotState::Deleted => 2,
            SlotState::Unknown(byte) => byte,
        }
    }
}

impl From<u8> for SlotState {
    fn from(byte: u8) -> Self {
        match byte {
            0 => SlotState::Empty,
            1 => SlotState::Occupied,
            2 => SlotState::Deleted,
            other => SlotState::Unknown(other),
        }
    }
}

/// A decoded slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub state: SlotState,

    /// FNV-1a hash of the stored key (zero for empty and deleted slots)
    pub fingerprint: u32,

    pub payload: Vec<u8>,
}

impl Slot {
    /// An empty slot
    pub fn empty() -> Self {
        Self {
            state: SlotState::Empty,
            fingerprint: 0,
            payload: Vec::new(),
        }
    }

    /// An occupied slot holding `payload`
    pub fn occupied(fingerprint: u32, payload: Vec<u8>) -> Self {
        Self {
            state: SlotState::Occupied,
            fingerprint,
            payload,
        }
    }

    /// A tombstone: fingerprint cleared, no payload
    pub fn tombstone() -> Self {
        Self {
            state: SlotState::Deleted,
            fingerprint: 0,
            payload: Vec::new(),
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.state == SlotState::Occupied
    }
}
