use super::errors::StateError;
use super::fs_atomic::atomic_write_file;
use super::paths::StatePaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Record of a federation created by a finished wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederationReceipt {
    pub alias: String,
    pub wizard: String,
    pub provider: String,
    pub realm: String,
    pub admin_link: String,
    pub created_at: i64,
}

pub fn write_receipt(
    paths: &StatePaths,
    receipt: &FederationReceipt,
) -> Result<PathBuf, StateError> {
    let path = paths.receipt_path(&receipt.alias);
    let body = serde_json::to_vec_pretty(receipt).map_err(|source| StateError::EncodeReceipt {
        path: path.display().to_string(),
        source,
    })?;
    atomic_write_file(&path, &body).map_err(|source| StateError::WriteReceipt {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path)
}

pub fn read_receipt(paths: &StatePaths, alias: &str) -> Option<FederationReceipt> {
    let raw = fs::read(paths.receipt_path(alias)).ok()?;
    serde_json::from_slice(&raw).ok()
}
