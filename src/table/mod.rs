//! Table Module
//!
//! The file-backed hash table engine.
//!
//! ## Responsibilities
//! - Create and size the backing file
//! - Insert/select/delete with linear probing and tombstone reuse
//! - Full scans for stats, occupancy snapshots and clear
//! - Serialize access with a single readers-writer lock
//!
//! ## Slot Lifecycle
//! ```text
//!            insert               delete
//!   Empty ───────────▶ Occupied ───────────▶ Deleted
//!     ▲                   ▲                     │
//!     │                   └─────── insert ──────┘
//!     └──────────────── clear (any state) ─────────
//! ```

mod engine;
mod io;
mod stats;

pub use engine::Table;
pub use stats::{SlotDetail, TableStats};
