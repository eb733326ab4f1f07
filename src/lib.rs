//! # SlotKV
//!
//! A minimal persistent key-value store with:
//! - A fixed number of 512-byte slots in a single file
//! - Open addressing with linear probing and tombstone reuse
//! - JSON envelopes that carry the original key for exact matching
//! - Dense-zone diagnostics for probe-chain clustering
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Shell / Generator (bins)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Envelope                                │
//! │              {key, type, data} as JSON                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Table                                  │
//! │          (RwLock, positioned reads and writes)               │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │  Probe (FNV-1a, │                │   Slot codec    │
//!   │  prime modulus) │                │  (512 bytes)    │
//!   └─────────────────┘                └────────┬────────┘
//!                                               │
//!                                               ▼
//!                                       ┌───────────────┐
//!                                       │ Backing file  │
//!                                       └───────────────┘
//! ```
//!
//! Diagnostics flow the other way: `Table::states()` feeds the
//! [`analyzer`], which reports maximal runs of occupied slots.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod slot;
pub mod probe;
pub mod envelope;
pub mod table;
pub mod analyzer;
pub mod shell;
pub mod models;
pub mod generate;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SlotError, Result};
pub use config::Config;
pub use envelope::{Envelope, Record};
pub use slot::SlotState;
pub use table::{SlotDetail, Table, TableStats};
pub use analyzer::{DenseZone, DenseZoneAnalyzer, DenseZoneReport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SlotKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
