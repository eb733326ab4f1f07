//! Dense-zone analysis and textual reports

use std::fmt::Write as _;
use std::io::Write;

use super::{find_dense_zones, DenseZone};
use crate::error::Result;
use crate::table::{SlotDetail, Table};

/// Number of zones listed in the console summary
pub const SUMMARY_TOP_ZONES: usize = 10;

/// One slot of a zone, as read after the occupancy snapshot
#[derive(Debug, Clone)]
pub enum ZoneSlot {
    Detail(SlotDetail),

    /// The slot changed or could not be decoded between snapshot and read
    Unreadable { index: usize, reason: String },
}

/// A zone together with the contents of its slots
#[derive(Debug, Clone)]
pub struct ZoneReport {
    pub zone: DenseZone,
    pub slots: Vec<ZoneSlot>,
}

/// Result of a dense-zone analysis, longest zones first
#[derive(Debug, Clone)]
pub struct DenseZoneReport {
    pub threshold: usize,
    pub total_slots: usize,
    pub zones: Vec<ZoneReport>,
}

impl DenseZoneReport {
    /// Zone lengths in report order
    pub fn lengths(&self) -> Vec<usize> {
        self.zones.iter().map(|z| z.zone.length).collect()
    }

    /// Total slots covered by reported zones
    pub fn covered_slots(&self) -> usize {
        self.zones.iter().map(|z| z.zone.length).sum()
    }

    /// Write the full report: every zone, every slot with pretty-printed data
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "Dense zones: {} (threshold {}, {} of {} slots)",
            self.zones.len(),
            self.threshold,
            self.covered_slots(),
            self.total_slots
        )?;

        for (rank, report) in self.zones.iter().enumerate() {
            writeln!(out)?;
            writeln!(
                out,
                "=== Zone {}: slots {}..={} (length {}) ===",
                rank + 1,
                report.zone.start,
                report.zone.end(),
                report.zone.length
            )?;

            for slot in &report.slots {
                match slot {
                    ZoneSlot::Detail(detail) => {
                        writeln!(
                            out,
                            "[{}] key={} type={} fingerprint=0x{:08x}",
                            detail.index, detail.key, detail.kind, detail.fingerprint
                        )?;
                        writeln!(out, "{}", detail.pretty_data()?)?;
                    }
                    ZoneSlot::Unreadable { index, reason } => {
                        writeln!(out, "[{}] unreadable: {}", index, reason)?;
                    }
                }
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Short listing of the `top` longest zones
    pub fn summary(&self, top: usize) -> String {
        let mut text = String::new();
        let _ = writeln!(
            text,
            "Dense zones: {} (threshold {})",
            self.zones.len(),
            self.threshold
        );

        let shown = top.min(self.zones.len());
        if shown > 0 {
            let _ = writeln!(text, "Top {} by length:", shown);
        }
        for (rank, report) in self.zones.iter().take(shown).enumerate() {
            let _ = writeln!(
                text,
                "  {:>2}. start={} end={} length={}",
                rank + 1,
                report.zone.start,
                report.zone.end(),
                report.zone.length
            );
        }
        text
    }
}

/// Reads an occupancy snapshot from a table and reports its dense zones
///
/// Read-only: only `states()` and `slot_detail()` are called.
pub struct DenseZoneAnalyzer<'a> {
    table: &'a Table,
    threshold: usize,
}

impl<'a> DenseZoneAnalyzer<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            threshold: 1,
        }
    }

    /// Minimum run length to report
    pub fn threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn analyze(&self) -> Result<DenseZoneReport> {
        let states = self.table.states()?;
        let zones = find_dense_zones(&states, self.threshold);

        let zones = zones
            .into_iter()
            .map(|zone| ZoneReport {
                zone,
                slots: zone.indices().map(|index| self.read_slot(index)).collect(),
            })
            .collect();

        Ok(DenseZoneReport {
            threshold: self.threshold.max(1),
            total_slots: states.len(),
            zones,
        })
    }

    fn read_slot(&self, index: usize) -> ZoneSlot {
        match self.table.slot_detail(index) {
            Ok(detail) => ZoneSlot::Detail(detail),
            Err(e) => {
                tracing::warn!("Slot {} unreadable during dense-zone analysis: {}", index, e);
                ZoneSlot::Unreadable {
                    index,
                    reason: e.to_string(),
                }
            }
        }
    }
}
