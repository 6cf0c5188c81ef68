//! Ledger persistence layer
//!
//! Saves and loads ledger snapshots as JSON. The whole ledger (metadata,
//! balances, allowances, event history) serializes as one document, written
//! to a temporary file and renamed into place so a crash mid-write never
//! leaves a truncated snapshot behind.

use crate::ledger::TokenLedger;
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub ledger_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".ledger_data"),
            ledger_file: "ledger.json".to_string(),
        }
    }
}

/// Ledger snapshot storage
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager, creating the data directory if needed
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Get the ledger snapshot path
    fn ledger_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.ledger_file)
    }

    /// Save the ledger to disk
    pub fn save(&self, ledger: &TokenLedger) -> Result<(), StorageError> {
        // Write to a temporary file first, then rename atomically
        let temp_path = self.config.data_dir.join("ledger.tmp");
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, ledger)?;
        fs::rename(&temp_path, self.ledger_path())?;

        log::debug!("Ledger saved to {:?}", self.ledger_path());
        Ok(())
    }

    /// Load the ledger from disk
    pub fn load(&self) -> Result<TokenLedger, StorageError> {
        let path = self.ledger_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Ledger file not found".to_string(),
            ));
        }

        let file = fs::File::open(&path)?;
        let reader = BufReader::new(file);
        let ledger = serde_json::from_reader(reader)?;

        Ok(ledger)
    }

    /// Check if a saved ledger exists
    pub fn exists(&self) -> bool {
        self.ledger_path().exists()
    }

    /// Delete the saved ledger
    pub fn delete(&self) -> Result<(), StorageError> {
        let path = self.ledger_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Save a ledger snapshot to a specific file path
pub fn save_to_file(ledger: &TokenLedger, path: &Path) -> Result<(), StorageError> {
    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, ledger)?;
    Ok(())
}

/// Load a ledger snapshot from a specific file path
pub fn load_from_file(path: &Path) -> Result<TokenLedger, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let ledger = serde_json::from_reader(reader)?;
    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Address;

    #[test]
    fn test_save_load_ledger() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };

        let storage = Storage::new(config).unwrap();
        let creator = Address::derive("creator");
        let recipient = Address::derive("recipient");

        let mut ledger = TokenLedger::new(creator).unwrap();
        ledger.transfer(creator, recipient, 1000).unwrap();
        ledger.approve(creator, recipient, 500).unwrap();

        storage.save(&ledger).unwrap();
        assert!(storage.exists());

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.metadata, ledger.metadata);
        assert_eq!(loaded.balance_of(creator), ledger.balance_of(creator));
        assert_eq!(loaded.balance_of(recipient), 1000);
        assert_eq!(loaded.allowance(creator, recipient), 500);
        assert_eq!(loaded.events().len(), 2);
    }

    #[test]
    fn test_load_missing_ledger() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };

        let storage = Storage::new(config).unwrap();
        assert!(!storage.exists());
        assert!(matches!(storage.load(), Err(StorageError::InvalidData(_))));
    }

    #[test]
    fn test_export_import_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("export.json");

        let creator = Address::derive("creator");
        let ledger = TokenLedger::new(creator).unwrap();

        save_to_file(&ledger, &path).unwrap();
        let loaded = load_from_file(&path).unwrap();

        assert_eq!(loaded.total_supply(), ledger.total_supply());
        assert_eq!(loaded.balance_of(creator), ledger.total_supply());
    }

    #[test]
    fn test_delete() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };

        let storage = Storage::new(config).unwrap();
        storage
            .save(&TokenLedger::new(Address::derive("creator")).unwrap())
            .unwrap();
        assert!(storage.exists());

        storage.delete().unwrap();
        assert!(!storage.exists());
    }
}
