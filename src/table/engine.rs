//! Table engine
//!
//! Open addressing over a fixed array of slots in one file.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::io::{read_exact_at, write_all_at};
use super::{SlotDetail, TableStats};
use crate::config::Config;
use crate::envelope::{Envelope, Record};
use crate::error::{Result, SlotError};
use crate::probe::{fingerprint, ProbeStrategy};
use crate::slot::{self, Slot, SlotState, PAYLOAD_CAPACITY, SLOT_SIZE};

/// A fixed-capacity hash table stored in a single file
///
/// ## Concurrency Model
///
/// - **Readers** (select/stats/states/slot_detail): shared lock, run
///   concurrently with each other
/// - **Writers** (insert/delete/clear/close): exclusive lock for the whole
///   operation, including the O(N) scan of `clear`
///
/// Every slot mutation is one positioned write of `SLOT_SIZE` bytes, so a
/// reader never observes half of a slot update. Nothing coordinates two
/// processes opening the same file.
pub struct Table {
    /// Backing file path
    path: PathBuf,

    /// Probe parameters, derived from the slot count at open
    probe: ProbeStrategy,

    /// File handle; `None` once closed
    file: RwLock<Option<File>>,
}

impl Table {
    /// Open or create a table file with `slot_count` slots
    ///
    /// On open:
    /// 1. Create the parent directory if missing
    /// 2. Create the file if absent
    /// 3. Resize it to `slot_count * SLOT_SIZE` if the size differs
    ///    (grown regions read back as zero, which decodes as Empty)
    pub fn open(path: impl AsRef<Path>, slot_count: usize) -> Result<Self> {
        if slot_count == 0 {
            return Err(SlotError::Config("slot count must be > 0".to_string()));
        }
        if slot_count > u32::MAX as usize {
            return Err(SlotError::Config(format!(
                "slot count {} exceeds {}",
                slot_count,
                u32::MAX
            )));
        }

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let wanted_size = slot_count as u64 * SLOT_SIZE as u64;
        let current_size = file.metadata()?.len();
        if current_size != wanted_size {
            tracing::info!(
                "Resizing {} from {} to {} bytes",
                path.display(),
                current_size,
                wanted_size
            );
            file.set_len(wanted_size)?;
        }

        let probe = ProbeStrategy::new(slot_count);
        tracing::info!(
            "Opened table {} ({} slots, probe modulus {})",
            path.display(),
            slot_count,
            probe.mod_prime()
        );

        Ok(Self {
            path: path.to_path_buf(),
            probe,
            file: RwLock::new(Some(file)),
        })
    }

    /// Open using a config (path and slot count)
    pub fn open_with_config(config: &Config) -> Result<Self> {
        Self::open(&config.path, config.slot_count)
    }

    /// Release the file handle
    ///
    /// Idempotent. Later operations fail with `SlotError::Closed`.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.file.write();
        if let Some(file) = guard.take() {
            file.sync_all()?;
            tracing::info!("Closed table {}", self.path.display());
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.file.read().is_none()
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Insert a value under `key`, tagged with `kind`
    ///
    /// The probe stops at the first Empty slot. The record lands in the first
    /// tombstone passed on the way, or in that Empty slot if there was none.
    /// If the whole table was probed without an Empty slot, the first
    /// tombstone is used, otherwise the table is full.
    ///
    /// Errors:
    /// - `PayloadTooBig`: envelope exceeds the slot capacity (nothing written)
    /// - `KeyExists`: an occupied slot already holds exactly this key
    /// - `TableFull`: no Empty or Deleted slot left
    pub fn insert<T: Serialize + ?Sized>(&self, key: &str, kind: &str, value: &T) -> Result<()> {
        let payload = Envelope::marshal(key, kind, value)?;
        if payload.len() > PAYLOAD_CAPACITY {
            return Err(SlotError::PayloadTooBig {
                size: payload.len(),
                capacity: PAYLOAD_CAPACITY,
            });
        }
        let hash = fingerprint(key);

        let guard = self.file.write();
        let file = guard.as_ref().ok_or(SlotError::Closed)?;

        let mut first_deleted: Option<usize> = None;
        for index in self.probe.sequence(hash) {
            let slot = read_slot(file, index)?;
            match slot.state {
                SlotState::Empty => {
                    let target = first_deleted.unwrap_or(index);
                    write_slot(file, target, SlotState::Occupied, hash, &payload)?;
                    tracing::debug!("Inserted {} at slot {}", key, target);
                    return Ok(());
                }
                SlotState::Deleted => {
                    if first_deleted.is_none() {
                        first_deleted = Some(index);
                    }
                }
                SlotState::Occupied => {
                    if slot.fingerprint == hash && matching_envelope(&slot, key, index).is_some() {
                        return Err(SlotError::KeyExists(key.to_string()));
                    }
                    // Fingerprint collision or another key; keep probing
                }
                SlotState::Unknown(tag) => {
                    tracing::trace!("Passing slot {} with unknown state 0x{:02x}", index, tag);
                }
            }
        }

        match first_deleted {
            Some(target) => {
                write_slot(file, target, SlotState::Occupied, hash, &payload)?;
                tracing::debug!("Inserted {} into tombstone at slot {}", key, target);
                Ok(())
            }
            None => Err(SlotError::TableFull {
                slots: self.slot_count(),
            }),
        }
    }

    /// Insert a record, using its kind tag
    pub fn insert_record<R: Record>(&self, key: &str, record: &R) -> Result<()> {
        self.insert(key, R::KIND, record)
    }

    /// Look up `key` and deserialize its value
    ///
    /// Returns:
    /// - `Ok(Some(value))`: key found
    /// - `Ok(None)`: key not present
    /// - `Err(Serialization)`: key found but its value does not fit `T`
    pub fn select<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.select_envelope(key)?
            .map(|envelope| envelope.value())
            .transpose()
    }

    /// Look up `key` and return its envelope as stored
    pub fn select_envelope(&self, key: &str) -> Result<Option<Envelope>> {
        let guard = self.file.read();
        let file = guard.as_ref().ok_or(SlotError::Closed)?;

        Ok(self.find(file, key)?.map(|(_, envelope)| envelope))
    }

    /// Delete `key`, leaving a tombstone
    ///
    /// Returns `true` if the key was present. A missing key leaves the table
    /// untouched.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let guard = self.file.write();
        let file = guard.as_ref().ok_or(SlotError::Closed)?;

        match self.find(file, key)? {
            Some((index, _)) => {
                let tombstone = Slot::tombstone();
                write_slot(file, index, tombstone.state, tombstone.fingerprint, &tombstone.payload)?;
                tracing::debug!("Deleted {} at slot {}", key, index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // =========================================================================
    // Scans
    // =========================================================================

    /// Count slot states with a full scan
    ///
    /// Slots with an unknown state tag count toward `total` only.
    pub fn stats(&self) -> Result<TableStats> {
        let mut stats = TableStats::default();
        for state in self.states()? {
            stats.total += 1;
            match state {
                SlotState::Empty => stats.empty += 1,
                SlotState::Occupied => stats.occupied += 1,
                SlotState::Deleted => stats.deleted += 1,
                SlotState::Unknown(_) => {}
            }
        }
        Ok(stats)
    }

    /// State of every slot, in slot order
    pub fn states(&self) -> Result<Vec<SlotState>> {
        let guard = self.file.read();
        let file = guard.as_ref().ok_or(SlotError::Closed)?;

        (0..self.slot_count())
            .map(|index| read_slot(file, index).map(|slot| slot.state))
            .collect()
    }

    /// Decode one occupied slot for diagnostics
    pub fn slot_detail(&self, index: usize) -> Result<SlotDetail> {
        if index >= self.slot_count() {
            return Err(SlotError::SlotOutOfRange {
                index,
                slots: self.slot_count(),
            });
        }

        let guard = self.file.read();
        let file = guard.as_ref().ok_or(SlotError::Closed)?;

        let slot = read_slot(file, index)?;
        if !slot.is_occupied() {
            return Err(SlotError::SlotNotOccupied {
                index,
                state: slot.state,
            });
        }

        let envelope = Envelope::unmarshal(&slot.payload)?;
        let data = envelope.value()?;
        Ok(SlotDetail {
            index,
            key: envelope.key,
            kind: envelope.kind,
            fingerprint: slot.fingerprint,
            data,
        })
    }

    /// Reset every slot to Empty, keeping the file size
    pub fn clear(&self) -> Result<()> {
        let guard = self.file.write();
        let file = guard.as_ref().ok_or(SlotError::Closed)?;

        let zero = [0u8; SLOT_SIZE];
        for index in 0..self.slot_count() {
            write_all_at(file, &zero, slot_offset(index))
                .map_err(|source| SlotError::SlotIo { index, source })?;
        }

        tracing::info!("Cleared {} slots in {}", self.slot_count(), self.path.display());
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the number of slots
    pub fn slot_count(&self) -> usize {
        self.probe.slot_count()
    }

    /// Get the prime used for probe starts
    pub fn mod_prime(&self) -> u32 {
        self.probe.mod_prime()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Probe for `key`; caller holds the lock
    ///
    /// An Empty slot ends the search. Deleted and unknown-state slots, other
    /// keys and undecodable payloads are passed over.
    fn find(&self, file: &File, key: &str) -> Result<Option<(usize, Envelope)>> {
        let hash = fingerprint(key);

        for index in self.probe.sequence(hash) {
            let slot = read_slot(file, index)?;
            match slot.state {
                SlotState::Empty => return Ok(None),
                SlotState::Deleted | SlotState::Unknown(_) => continue,
                SlotState::Occupied => {
                    if slot.fingerprint != hash {
                        continue;
                    }
                    if let Some(envelope) = matching_envelope(&slot, key, index) {
                        return Ok(Some((index, envelope)));
                    }
                }
            }
        }

        Ok(None)
    }
}

/// Byte offset of a slot in the file
fn slot_offset(index: usize) -> u64 {
    index as u64 * SLOT_SIZE as u64
}

fn read_slot(file: &File, index: usize) -> Result<Slot> {
    let mut buf = [0u8; SLOT_SIZE];
    read_exact_at(file, &mut buf, slot_offset(index))
        .map_err(|source| SlotError::SlotIo { index, source })?;

    slot::decode(&buf).map_err(|e| match e {
        SlotError::Corruption(msg) => SlotError::Corruption(format!("slot {}: {}", index, msg)),
        other => other,
    })
}

fn write_slot(file: &File, index: usize, state: SlotState, hash: u32, payload: &[u8]) -> Result<()> {
    let buf = slot::encode(state, hash, payload)?;
    write_all_at(file, &buf, slot_offset(index))
        .map_err(|source| SlotError::SlotIo { index, source })
}

/// Decode the slot's envelope if it belongs to exactly `key`
fn matching_envelope(slot: &Slot, key: &str, index: usize) -> Option<Envelope> {
    match Envelope::unmarshal(&slot.payload) {
        Ok(envelope) if envelope.key == key => Some(envelope),
        Ok(_) => None,
        Err(e) => {
            tracing::trace!("Skipping undecodable envelope at slot {}: {}", index, e);
            None
        }
    }
}
