//! Error types for SlotKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::slot::SlotState;

/// Result type alias using SlotError
pub type Result<T> = std::result::Result<T, SlotError>;

/// Unified error type for SlotKV operations
#[derive(Debug, Error)]
pub enum SlotError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error at slot {index}: {source}")]
    SlotIo {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Table Errors
    // -------------------------------------------------------------------------
    #[error("Key already exists: {0}")]
    KeyExists(String),

    #[error("Table full: no empty or deleted slot among {slots} slots")]
    TableFull { slots: usize },

    #[error("Payload exceeds slot capacity: {size} > {capacity}")]
    PayloadTooBig { size: usize, capacity: usize },

    #[error("Slot index {index} out of range (table has {slots} slots)")]
    SlotOutOfRange { index: usize, slots: usize },

    #[error("Slot {index} is not occupied (state: {state:?})")]
    SlotNotOccupied { index: usize, state: SlotState },

    #[error("Table is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("Slot corruption detected: {0}")]
    Corruption(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Shell Errors
    // -------------------------------------------------------------------------
    #[error("Invalid command: {0}")]
    Command(String),
}

impl From<serde_json::Error> for SlotError {
    fn from(err: serde_json::Error) -> Self {
        SlotError::Serialization(err.to_string())
    }
}
