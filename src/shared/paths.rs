use super::errors::StateError;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_STATE_ROOT_DIR: &str = ".idp-wizard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub root: PathBuf,
}

impl StatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn required_directories(&self) -> Vec<PathBuf> {
        vec![self.logs_dir(), self.receipts_dir()]
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn wizard_log_path(&self) -> PathBuf {
        self.logs_dir().join("wizard.log")
    }

    pub fn access_log_path(&self) -> PathBuf {
        self.logs_dir().join("access.log")
    }

    pub fn receipts_dir(&self) -> PathBuf {
        self.root.join("receipts")
    }

    pub fn receipt_path(&self, alias: &str) -> PathBuf {
        self.receipts_dir().join(format!("{alias}.json"))
    }
}

pub fn default_state_root_path() -> Result<PathBuf, StateError> {
    let home = std::env::var_os("HOME").ok_or(StateError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home).join(DEFAULT_STATE_ROOT_DIR))
}

pub fn bootstrap_state_root(paths: &StatePaths) -> Result<(), StateError> {
    for path in paths.required_directories() {
        fs::create_dir_all(&path).map_err(|source| StateError::CreateDir {
            path: path.display().to_string(),
            source,
        })?;
    }
    Ok(())
}
