//! Run detection over an occupancy snapshot

use serde::Serialize;

use crate::slot::SlotState;

/// A maximal run of consecutive Occupied slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DenseZone {
    pub start: usize,
    pub length: usize,
}

impl DenseZone {
    /// Last slot index in the run (inclusive)
    pub fn end(&self) -> usize {
        self.start + self.length - 1
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.length
    }
}

/// Find runs of Occupied slots at least `threshold` long, longest first
///
/// Single pass over `states`; runs do not wrap from the last slot to the
/// first. A threshold of 0 behaves like 1.
pub fn find_dense_zones(states: &[SlotState], threshold: usize) -> Vec<DenseZone> {
    let threshold = threshold.max(1);
    let mut zones = Vec::new();
    let mut run_start: Option<usize> = None;

    for (index, state) in states.iter().enumerate() {
        match (state, run_start) {
            (SlotState::Occupied, None) => run_start = Some(index),
            (SlotState::Occupied, Some(_)) => {}
            (_, Some(start)) => {
                zones.push(DenseZone {
                    start,
                    length: index - start,
                });
                run_start = None;
            }
            (_, None) => {}
        }
    }
    if let Some(start) = run_start {
        zones.push(DenseZone {
            start,
            length: states.len() - start,
        });
    }

    zones.retain(|zone| zone.length >= threshold);
    zones.sort_by(|a, b| b.length.cmp(&a.length));
    zones
}
