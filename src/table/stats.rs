//! Diagnostic views of the table: state counts and single-slot detail

use serde::Serialize;

use crate::error::Result;

/// Counts of slot states from a full scan
///
/// `total` also includes slots with an unknown state tag, so it can exceed
/// `empty + occupied + deleted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub empty: usize,
    pub occupied: usize,
    pub deleted: usize,
    pub total: usize,
}

impl TableStats {
    /// Fraction of slots holding live records
    pub fn load_factor(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.occupied as f64 / self.total as f64
    }
}

/// Decoded contents of one occupied slot
#[derive(Debug, Clone, Serialize)]
pub struct SlotDetail {
    pub index: usize,
    pub key: String,
    pub kind: String,
    pub fingerprint: u32,
    pub data: serde_json::Value,
}

impl SlotDetail {
    pub fn pretty_data(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }
}
