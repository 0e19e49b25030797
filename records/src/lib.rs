//! End-of-run statistics store
//!
//! Uses postcard for compact binary files

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use game_core::{RunSummary, StatError, StatSink};
use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("stat file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stat table encoding failed: {0}")]
    Codec(#[from] postcard::Error),
}

impl From<RecordError> for StatError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Io(io) => StatError::Io(io),
            RecordError::Codec(codec) => StatError::Backend(codec.to_string()),
        }
    }
}

/// Keys of the persisted statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatKey {
    SurvivalTime,
    ModeSwitches,
    ObstaclesAvoided,
    TotalScore,
}

impl StatKey {
    pub const ALL: [StatKey; 4] = [
        StatKey::SurvivalTime,
        StatKey::ModeSwitches,
        StatKey::ObstaclesAvoided,
        StatKey::TotalScore,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StatValue {
    Float(f32),
    Int(u32),
}

impl std::fmt::Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatValue::Float(value) => write!(f, "{value:.2}"),
            StatValue::Int(value) => write!(f, "{value}"),
        }
    }
}

/// Typed key-value table. Missing keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatTable {
    values: BTreeMap<StatKey, StatValue>,
}

impl StatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_summary(summary: &RunSummary) -> Self {
        let mut table = Self::new();
        table.set_float(StatKey::SurvivalTime, summary.survival_time);
        table.set_int(StatKey::ModeSwitches, summary.mode_switches);
        table.set_int(StatKey::ObstaclesAvoided, summary.obstacles_avoided);
        table.set_int(StatKey::TotalScore, summary.total_score);
        table
    }

    pub fn set_float(&mut self, key: StatKey, value: f32) {
        self.values.insert(key, StatValue::Float(value));
    }

    pub fn set_int(&mut self, key: StatKey, value: u32) {
        self.values.insert(key, StatValue::Int(value));
    }

    pub fn get(&self, key: StatKey) -> Option<StatValue> {
        self.values.get(&key).copied()
    }

    pub fn get_float(&self, key: StatKey) -> f32 {
        match self.get(key) {
            Some(StatValue::Float(value)) => value,
            Some(StatValue::Int(value)) => value as f32,
            None => 0.0,
        }
    }

    pub fn get_int(&self, key: StatKey) -> u32 {
        match self.get(key) {
            Some(StatValue::Int(value)) => value,
            Some(StatValue::Float(value)) => value.max(0.0) as u32,
            None => 0,
        }
    }

    /// Rebuild the summary the table was saved from
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            survival_time: self.get_float(StatKey::SurvivalTime),
            mode_switches: self.get_int(StatKey::ModeSwitches),
            obstacles_avoided: self.get_int(StatKey::ObstaclesAvoided),
            total_score: self.get_int(StatKey::TotalScore),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        Ok(to_allocvec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        Ok(from_bytes(bytes)?)
    }
}

/// Stat sink backed by a single binary file holding the last run
#[derive(Debug, Clone)]
pub struct FileStatStore {
    path: PathBuf,
}

impl FileStatStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored table. A missing file is an empty table.
    pub fn load(&self) -> Result<StatTable, RecordError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => StatTable::from_bytes(&bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("no stat file at {}, using defaults", self.path.display());
                Ok(StatTable::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn write(&self, table: &StatTable) -> Result<(), RecordError> {
        let bytes = table.to_bytes()?;
        std::fs::write(&self.path, bytes)?;
        log::info!("saved run statistics to {}", self.path.display());
        Ok(())
    }
}

impl StatSink for FileStatStore {
    fn save(&mut self, summary: &RunSummary) -> Result<(), StatError> {
        self.write(&StatTable::from_summary(summary))?;
        Ok(())
    }
}
