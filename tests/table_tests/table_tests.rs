//! Tests for the Table engine
//!
//! These tests verify:
//! - Open/create/resize of the backing file
//! - Insert/select/delete round trips
//! - Duplicate keys, capacity limit, table exhaustion
//! - Tombstone reuse and fingerprint collisions
//! - Stats, states, slot detail and clear
//! - Close semantics

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use slotkv::envelope::Envelope;
use slotkv::probe::{fingerprint, ProbeStrategy};
use slotkv::slot::{encode, SlotState, PAYLOAD_CAPACITY, SLOT_SIZE};
use slotkv::{Config, DenseZoneAnalyzer, Record, SlotError, Table, TableStats};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_table(slots: usize) -> (TempDir, Table) {
    let temp_dir = TempDir::new().unwrap();
    let table = Table::open(temp_dir.path().join("db.bin"), slots).unwrap();
    (temp_dir, table)
}

/// Overwrite one slot directly in the file, bypassing the engine
fn write_raw_slot(path: &Path, index: usize, bytes: &[u8]) {
    let mut file = OpenOptions::new().write(true).open(path).unwrap();
    file.seek(SeekFrom::Start((index * SLOT_SIZE) as u64)).unwrap();
    file.write_all(bytes).unwrap();
    file.sync_all().unwrap();
}

/// First index probed for `key` in a table of `slots` slots
fn home_slot(key: &str, slots: usize) -> usize {
    ProbeStrategy::new(slots).sequence(fingerprint(key)).next().unwrap()
}

/// Two distinct keys whose probes start at the same slot
fn keys_sharing_home(slots: usize) -> (String, String) {
    let mut seen = HashMap::new();
    (0..)
        .map(|i| format!("k{}", i))
        .find_map(|key| {
            seen.insert(home_slot(&key, slots), key.clone())
                .map(|first| (first, key))
        })
        .unwrap()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Client {
    id: i64,
    name: String,
}

impl Record for Client {
    const KIND: &'static str = "client";
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_sized_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("db.bin");

    let table = Table::open(&path, 100).unwrap();

    assert!(path.exists());
    assert_eq!(fs::metadata(&path).unwrap().len(), 100 * SLOT_SIZE as u64);
    assert_eq!(table.slot_count(), 100);
    assert_eq!(table.path(), path.as_path());
}

#[test]
fn test_open_zero_slots_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = Table::open(temp_dir.path().join("db.bin"), 0);

    assert!(matches!(result, Err(SlotError::Config(_))));
}

#[test]
fn test_open_computes_probe_modulus() {
    let (_temp, table) = setup_temp_table(5000);
    assert_eq!(table.mod_prime(), 4999);
}

#[test]
fn test_open_with_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .path(temp_dir.path().join("cfg.bin"))
        .slot_count(64)
        .build();

    let table = Table::open_with_config(&config).unwrap();

    assert_eq!(table.slot_count(), 64);
    assert_eq!(table.stats().unwrap().total, 64);
}

#[test]
fn test_reopen_grows_file_with_empty_slots() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("db.bin");

    {
        let table = Table::open(&path, 10).unwrap();
        table.insert("k", "json", &json!(1)).unwrap();
        table.close().unwrap();
    }

    let table = Table::open(&path, 20).unwrap();
    let stats = table.stats().unwrap();

    assert_eq!(fs::metadata(&path).unwrap().len(), 20 * SLOT_SIZE as u64);
    assert_eq!(stats.total, 20);
    assert_eq!(stats.occupied, 1);
    assert_eq!(stats.empty, 19);
}

#[test]
fn test_data_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("db.bin");

    {
        let table = Table::open(&path, 50).unwrap();
        for i in 0..20 {
            table.insert(&format!("key:{}", i), "json", &json!({ "n": i })).unwrap();
        }
        table.close().unwrap();
    }

    let table = Table::open(&path, 50).unwrap();
    for i in 0..20 {
        let value: Option<Value> = table.select(&format!("key:{}", i)).unwrap();
        assert_eq!(value, Some(json!({ "n": i })));
    }
}

// =============================================================================
// Insert / Select Tests
// =============================================================================

#[test]
fn test_insert_select_roundtrip() {
    let (_temp, table) = setup_temp_table(100);
    let value = json!({"id": 1, "name": "Client 1", "tags": ["a", "b"], "score": 1.5});

    table.insert("client:1", "client", &value).unwrap();

    let result: Option<Value> = table.select("client:1").unwrap();
    assert_eq!(result, Some(value));
}

#[test]
fn test_select_nonexistent_key() {
    let (_temp, table) = setup_temp_table(100);

    let result: Option<Value> = table.select("missing").unwrap();
    assert_eq!(result, None);
}

#[test]
fn test_insert_record_uses_kind() {
    let (_temp, table) = setup_temp_table(100);
    let client = Client {
        id: 7,
        name: "Client 7".to_string(),
    };

    table.insert_record("client:7", &client).unwrap();

    let envelope = table.select_envelope("client:7").unwrap().unwrap();
    assert_eq!(envelope.kind, "client");
    assert_eq!(envelope.key, "client:7");
    assert_eq!(table.select::<Client>("client:7").unwrap(), Some(client));
}

#[test]
fn test_select_wrong_type_is_serialization_error() {
    let (_temp, table) = setup_temp_table(100);
    table.insert("k", "json", &json!("text")).unwrap();

    let result = table.select::<Client>("k");
    assert!(matches!(result, Err(SlotError::Serialization(_))));
}

#[test]
fn test_insert_duplicate_key() {
    let (_temp, table) = setup_temp_table(100);

    table.insert("client:1", "json", &json!({"v": 1})).unwrap();
    let result = table.insert("client:1", "json", &json!({"v": 2}));

    assert!(matches!(result, Err(SlotError::KeyExists(ref k)) if k == "client:1"));
    let value: Option<Value> = table.select("client:1").unwrap();
    assert_eq!(value, Some(json!({"v": 1})));
    assert_eq!(table.stats().unwrap().occupied, 1);
}

#[test]
fn test_insert_payload_at_capacity() {
    let (_temp, table) = setup_temp_table(10);
    let overhead = Envelope::marshal("k", "json", "").unwrap().len();
    let fits = "x".repeat(PAYLOAD_CAPACITY - overhead);

    table.insert("k", "json", &fits).unwrap();

    assert_eq!(table.select::<String>("k").unwrap(), Some(fits));
}

#[test]
fn test_insert_payload_too_big_leaves_table_unchanged() {
    let (_temp, table) = setup_temp_table(10);
    let overhead = Envelope::marshal("k", "json", "").unwrap().len();
    let too_big = "x".repeat(PAYLOAD_CAPACITY - overhead + 1);

    let result = table.insert("k", "json", &too_big);

    match result {
        Err(SlotError::PayloadTooBig { size, capacity }) => {
            assert_eq!(size, PAYLOAD_CAPACITY + 1);
            assert_eq!(capacity, PAYLOAD_CAPACITY);
        }
        other => panic!("expected PayloadTooBig, got {:?}", other),
    }
    assert_eq!(table.stats().unwrap().empty, 10);
    assert_eq!(table.select::<String>("k").unwrap(), None);
}

#[test]
fn test_table_full() {
    let (_temp, table) = setup_temp_table(4);

    for i in 0..4 {
        table.insert(&format!("k{}", i), "json", &json!(i)).unwrap();
    }
    let result = table.insert("one-more", "json", &json!(4));

    assert!(matches!(result, Err(SlotError::TableFull { slots: 4 })));
    for i in 0..4 {
        assert_eq!(table.select::<i32>(&format!("k{}", i)).unwrap(), Some(i));
    }
}

#[test]
fn test_full_table_reuses_tombstone() {
    let (_temp, table) = setup_temp_table(4);
    for i in 0..4 {
        table.insert(&format!("k{}", i), "json", &json!(i)).unwrap();
    }

    assert!(table.delete("k2").unwrap());
    table.insert("fresh", "json", &json!("new")).unwrap();

    assert_eq!(table.select::<String>("fresh").unwrap(), Some("new".to_string()));
    assert_eq!(
        table.stats().unwrap(),
        TableStats {
            empty: 0,
            occupied: 4,
            deleted: 0,
            total: 4
        }
    );
    // No space left again
    assert!(matches!(
        table.insert("another", "json", &json!(0)),
        Err(SlotError::TableFull { .. })
    ));
}

// =============================================================================
// Delete / Tombstone Tests
// =============================================================================

#[test]
fn test_delete_then_select() {
    let (_temp, table) = setup_temp_table(100);
    table.insert("client:1", "json", &json!(1)).unwrap();

    assert!(table.delete("client:1").unwrap());

    assert_eq!(table.select::<Value>("client:1").unwrap(), None);
    let stats = table.stats().unwrap();
    assert_eq!(stats.deleted, 1);
    assert_eq!(stats.occupied, 0);
}

#[test]
fn test_delete_nonexistent_key_leaves_table_unchanged() {
    let (_temp, table) = setup_temp_table(100);
    table.insert("a", "json", &json!(1)).unwrap();
    let before = table.states().unwrap();

    assert!(!table.delete("b").unwrap());

    assert_eq!(table.states().unwrap(), before);
}

#[test]
fn test_reinsert_after_delete() {
    let (_temp, table) = setup_temp_table(100);
    table.insert("k", "json", &json!("v1")).unwrap();
    table.delete("k").unwrap();

    table.insert("k", "json", &json!("v2")).unwrap();

    assert_eq!(table.select::<String>("k").unwrap(), Some("v2".to_string()));
    let stats = table.stats().unwrap();
    assert_eq!(stats.occupied, 1);
    assert_eq!(stats.deleted, 0, "the tombstone should have been reused");
}

#[test]
fn test_tombstone_keeps_probe_chain_intact() {
    // A full table has no Empty slot, so every probe walks the tombstones
    let (_temp, table) = setup_temp_table(3);
    table.insert("a", "json", &json!("a")).unwrap();
    table.insert("b", "json", &json!("b")).unwrap();
    table.insert("c", "json", &json!("c")).unwrap();

    for key in ["a", "b", "c"] {
        table.delete(key).unwrap();
        for other in ["a", "b", "c"].iter().filter(|&&k| k != key) {
            assert!(table.select::<String>(other).unwrap().is_some());
        }
        table.insert(key, "json", &json!(key)).unwrap();
    }
}

#[test]
fn test_insert_prefers_first_tombstone_on_probe_path() {
    let (temp, table) = setup_temp_table(16);
    let path = temp.path().join("db.bin");
    let home = home_slot("target", 16);

    // Tombstone at the home slot, Empty right after it
    write_raw_slot(&path, home, &encode(SlotState::Deleted, 0, &[]).unwrap());

    table.insert("target", "json", &json!(1)).unwrap();

    let detail = table.slot_detail(home).unwrap();
    assert_eq!(detail.key, "target");
}

#[test]
fn test_insert_existing_key_behind_tombstone_is_key_exists() {
    let (_temp, table) = setup_temp_table(16);
    let (first, second) = keys_sharing_home(16);
    table.insert(&first, "json", &json!("one")).unwrap();
    table.insert(&second, "json", &json!("two")).unwrap();
    table.delete(&first).unwrap();

    // The tombstone at the home slot comes before the live copy of `second`
    let result = table.insert(&second, "json", &json!("again"));

    assert!(matches!(result, Err(SlotError::KeyExists(ref k)) if *k == second));
    assert_eq!(table.select::<String>(&second).unwrap(), Some("two".to_string()));
    let stats = table.stats().unwrap();
    assert_eq!(stats.occupied, 1);
    assert_eq!(stats.deleted, 1);
}

// =============================================================================
// Collision Tests
// =============================================================================

#[test]
fn test_fingerprint_collision_is_not_a_match() {
    let (temp, table) = setup_temp_table(16);
    let path = temp.path().join("db.bin");
    let home = home_slot("alpha", 16);

    // Another key stored with alpha's fingerprint at alpha's home slot
    let impostor = Envelope::marshal("beta", "json", &json!("beta")).unwrap();
    write_raw_slot(
        &path,
        home,
        &encode(SlotState::Occupied, fingerprint("alpha"), &impostor).unwrap(),
    );

    assert_eq!(table.select::<Value>("alpha").unwrap(), None);
    assert!(!table.delete("alpha").unwrap());

    table.insert("alpha", "json", &json!("alpha")).unwrap();

    assert_eq!(table.select::<String>("alpha").unwrap(), Some("alpha".to_string()));
    assert_eq!(table.slot_detail(home).unwrap().key, "beta");
    assert_eq!(table.stats().unwrap().occupied, 2);
}

#[test]
fn test_undecodable_envelope_is_skipped() {
    let (temp, table) = setup_temp_table(16);
    let path = temp.path().join("db.bin");
    let home = home_slot("gamma", 16);

    write_raw_slot(
        &path,
        home,
        &encode(SlotState::Occupied, fingerprint("gamma"), b"\x01\x02garbage").unwrap(),
    );

    assert_eq!(table.select::<Value>("gamma").unwrap(), None);
    table.insert("gamma", "json", &json!(3)).unwrap();
    assert_eq!(table.select::<i32>("gamma").unwrap(), Some(3));
}

#[test]
fn test_corrupt_slot_header_is_reported() {
    let (temp, table) = setup_temp_table(8);
    let path = temp.path().join("db.bin");
    let mut bad = [0u8; SLOT_SIZE];
    bad[0] = 1;
    bad[5..7].copy_from_slice(&600u16.to_le_bytes());
    write_raw_slot(&path, 3, &bad);

    assert!(matches!(table.stats(), Err(SlotError::Corruption(_))));
}

#[test]
fn test_unknown_state_byte_is_passed_over() {
    let (temp, table) = setup_temp_table(16);
    let path = temp.path().join("db.bin");
    let (first, second) = keys_sharing_home(16);
    table.insert(&first, "json", &json!("one")).unwrap();
    table.insert(&second, "json", &json!("two")).unwrap();

    let home = home_slot(&first, 16);
    write_raw_slot(&path, home, &encode(SlotState::Unknown(7), 0, &[]).unwrap());

    assert_eq!(
        table.stats().unwrap(),
        TableStats {
            empty: 14,
            occupied: 1,
            deleted: 0,
            total: 16
        }
    );
    assert_eq!(table.states().unwrap()[home], SlotState::Unknown(7));
    assert!(DenseZoneAnalyzer::new(&table).analyze().is_ok());

    // Lookups continue past the unknown slot
    assert_eq!(table.select::<String>(&second).unwrap(), Some("two".to_string()));
    assert_eq!(table.select::<Value>(&first).unwrap(), None);

    // Inserts do not treat it as free space
    table.insert(&first, "json", &json!("one again")).unwrap();
    assert_eq!(table.select::<String>(&first).unwrap(), Some("one again".to_string()));
    assert_eq!(table.states().unwrap()[home], SlotState::Unknown(7));
    assert!(matches!(
        table.slot_detail(home),
        Err(SlotError::SlotNotOccupied {
            state: SlotState::Unknown(7),
            ..
        })
    ));
}

// =============================================================================
// Stats / States / Detail / Clear Tests
// =============================================================================

#[test]
fn test_stats_and_states() {
    let (_temp, table) = setup_temp_table(20);
    for i in 0..5 {
        table.insert(&format!("k{}", i), "json", &json!(i)).unwrap();
    }
    table.delete("k0").unwrap();

    let stats = table.stats().unwrap();
    assert_eq!(
        stats,
        TableStats {
            empty: 15,
            occupied: 4,
            deleted: 1,
            total: 20
        }
    );
    assert!((stats.load_factor() - 0.2).abs() < f64::EPSILON);

    let states = table.states().unwrap();
    assert_eq!(states.len(), 20);
    assert_eq!(states.iter().filter(|s| **s == SlotState::Occupied).count(), 4);
    assert_eq!(states.iter().filter(|s| **s == SlotState::Deleted).count(), 1);
}

#[test]
fn test_slot_detail() {
    let (_temp, table) = setup_temp_table(32);
    table.insert("client:1", "client", &json!({"id": 1})).unwrap();

    let index = table
        .states()
        .unwrap()
        .iter()
        .position(|s| *s == SlotState::Occupied)
        .unwrap();
    let detail = table.slot_detail(index).unwrap();

    assert_eq!(detail.index, index);
    assert_eq!(detail.key, "client:1");
    assert_eq!(detail.kind, "client");
    assert_eq!(detail.fingerprint, fingerprint("client:1"));
    assert_eq!(detail.data, json!({"id": 1}));
    assert_eq!(detail.pretty_data().unwrap(), "{\n  \"id\": 1\n}");
}

#[test]
fn test_slot_detail_errors() {
    let (_temp, table) = setup_temp_table(8);

    assert!(matches!(
        table.slot_detail(8),
        Err(SlotError::SlotOutOfRange { index: 8, slots: 8 })
    ));
    assert!(matches!(
        table.slot_detail(0),
        Err(SlotError::SlotNotOccupied {
            index: 0,
            state: SlotState::Empty
        })
    ));
}

#[test]
fn test_clear() {
    let (temp, table) = setup_temp_table(30);
    for i in 0..10 {
        table.insert(&format!("k{}", i), "json", &json!(i)).unwrap();
    }
    table.delete("k3").unwrap();

    table.clear().unwrap();

    assert_eq!(
        table.stats().unwrap(),
        TableStats {
            empty: 30,
            occupied: 0,
            deleted: 0,
            total: 30
        }
    );
    assert_eq!(table.select::<i32>("k1").unwrap(), None);
    let path: PathBuf = temp.path().join("db.bin");
    assert_eq!(fs::metadata(path).unwrap().len(), 30 * SLOT_SIZE as u64);

    // Clearing twice is harmless
    table.clear().unwrap();
    assert_eq!(table.stats().unwrap().empty, 30);
}

// =============================================================================
// Close Tests
// =============================================================================

#[test]
fn test_close_is_idempotent() {
    let (_temp, table) = setup_temp_table(8);

    table.close().unwrap();
    table.close().unwrap();

    assert!(table.is_closed());
}

#[test]
fn test_operations_after_close_fail() {
    let (_temp, table) = setup_temp_table(8);
    table.close().unwrap();

    assert!(matches!(table.insert("k", "json", &1), Err(SlotError::Closed)));
    assert!(matches!(table.select::<i32>("k"), Err(SlotError::Closed)));
    assert!(matches!(table.delete("k"), Err(SlotError::Closed)));
    assert!(matches!(table.stats(), Err(SlotError::Closed)));
    assert!(matches!(table.clear(), Err(SlotError::Closed)));
}
