use super::{default_global_config_path, ConfigError, Settings};
use crate::shared::fs_atomic::atomic_write_file;
use std::path::{Path, PathBuf};

pub fn save_settings(settings: &Settings) -> Result<PathBuf, ConfigError> {
    let path = default_global_config_path()?;
    save_settings_to(&path, settings)?;
    Ok(path)
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    settings.validate()?;
    let body = serde_yaml::to_string(settings).map_err(|source| ConfigError::Encode {
        path: path.display().to_string(),
        source,
    })?;
    atomic_write_file(path, body.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ids::RealmName;
    use tempfile::tempdir;

    #[test]
    fn saved_settings_load_back() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested/config.yaml");
        let settings = Settings::new(
            "https://auth.example.com",
            RealmName::parse("corp").expect("realm"),
        );

        save_settings_to(&path, &settings).expect("save");
        let loaded = Settings::from_path(&path).expect("load");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn invalid_settings_are_not_written() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        let mut settings = Settings::new(
            "https://auth.example.com",
            RealmName::parse("corp").expect("realm"),
        );
        settings.request_timeout_seconds = 0;

        assert!(matches!(
            save_settings_to(&path, &settings),
            Err(ConfigError::Settings(_))
        ));
        assert!(!path.exists());
    }
}
