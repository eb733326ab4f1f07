//! Slot Module
//!
//! Fixed-size record layout of the backing file.
//!
//! ## Responsibilities
//! - Define the slot states and their on-disk tags (0 Empty, 1 Occupied,
//!   2 Deleted; any other byte is kept as Unknown)
//! - Encode one slot into exactly `SLOT_SIZE` bytes
//! - Decode a slot and reject payload lengths past capacity
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Slot 0                                    (512 bytes) │
//! │ ┌───────────┬─────────────┬──────────┬──────────────┐ │
//! │ │ State (1) │ Finger (4)  │ Len (2)  │ Payload (505)│ │
//! │ └───────────┴─────────────┴──────────┴──────────────┘ │
//! ├──────────────────────────────────────────────────────┤
//! │ Slot 1                                                │
//! │ ...                                                   │
//! ├──────────────────────────────────────────────────────┤
//! │ Slot N-1                                              │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. Payload bytes past the declared length are
//! zero. An all-zero slot decodes as Empty, so freshly grown file regions need
//! no initialization.

mod codec;
mod state;

pub use codec::{decode, encode};
pub use state::{Slot, SlotState};

/// Size of one slot on disk
pub const SLOT_SIZE: usize = 512;

/// Header size: state (1) + fingerprint (4) + payload length (2)
pub const HEADER_SIZE: usize = 1 + 4 + 2;

/// Maximum payload bytes a slot can hold
pub const PAYLOAD_CAPACITY: usize = SLOT_SIZE - HEADER_SIZE;
