//! Dense-Zone Analyzer
//!
//! Surfaces probe-chain clustering by finding maximal runs of occupied slots.
//!
//! ## Responsibilities
//! - Detect runs in an occupancy snapshot (single linear pass)
//! - Filter by minimum length and sort longest first
//! - Render a full textual report and a short console summary
//!
//! Long runs mean long probe chains: every lookup whose start lands inside a
//! run walks to its end before it can hit an Empty slot.

mod report;
mod zones;

pub use report::{DenseZoneAnalyzer, DenseZoneReport, ZoneReport, ZoneSlot, SUMMARY_TOP_ZONES};
pub use zones::{find_dense_zones, DenseZone};
