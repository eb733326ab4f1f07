//! Configuration for SlotKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a SlotKV table
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the backing file. Its parent directory is created on open.
    pub path: PathBuf,

    /// Number of fixed-size slots. Fixed for the lifetime of the file;
    /// reopening with a different count resizes the file.
    pub slot_count: usize,

    // -------------------------------------------------------------------------
    // Diagnostics Configuration
    // -------------------------------------------------------------------------
    /// Minimum run length reported by the dense-zone analyzer
    pub dense_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/db.bin"),
            slot_count: 5000,
            dense_threshold: 1,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the number of slots
    pub fn slot_count(mut self, count: usize) -> Self {
        self.config.slot_count = count;
        self
    }

    /// Set the default dense-zone threshold
    pub fn dense_threshold(mut self, threshold: usize) -> Self {
        self.config.dense_threshold = threshold;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
