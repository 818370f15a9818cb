use crate::access::{DenialSignal, RoleClaims};
use crate::config::{default_global_config_path, load_global_settings, ConfigError, Settings};
use crate::gateway::SessionCredentials;
use crate::shared::ids::RealmName;
use crate::shared::paths::{bootstrap_state_root, default_state_root_path, StatePaths};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const ACCESS_TOKEN_ENV: &str = "IDP_WIZARD_ACCESS_TOKEN";
pub const TOKEN_CLAIMS_ENV: &str = "IDP_WIZARD_TOKEN_CLAIMS";
pub const SESSION_USERNAME_ENV: &str = "IDP_WIZARD_SESSION_USERNAME";
pub const SESSION_PASSWORD_ENV: &str = "IDP_WIZARD_SESSION_PASSWORD";
pub const SCRIPT_KEYS_ENV: &str = "IDP_WIZARD_SCRIPT_KEYS";

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

pub fn ensure_state_root() -> Result<StatePaths, String> {
    let root = default_state_root_path().map_err(|e| e.to_string())?;
    let paths = StatePaths::new(root);
    bootstrap_state_root(&paths).map_err(|e| e.to_string())?;
    Ok(paths)
}

pub fn load_settings() -> Result<Settings, String> {
    let path = default_global_config_path().map_err(map_config_err)?;
    if !path.exists() {
        return Err(format!(
            "no settings file at {}; run `config init <server_url> <realm>`",
            path.display()
        ));
    }
    load_global_settings().map_err(map_config_err)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

pub fn access_token() -> Result<String, String> {
    non_empty_env(ACCESS_TOKEN_ENV).ok_or_else(|| format!("{ACCESS_TOKEN_ENV} is not set"))
}

pub fn session_credentials() -> Result<SessionCredentials, String> {
    let username = non_empty_env(SESSION_USERNAME_ENV)
        .ok_or_else(|| format!("{SESSION_USERNAME_ENV} is not set"))?;
    let password = non_empty_env(SESSION_PASSWORD_ENV)
        .ok_or_else(|| format!("{SESSION_PASSWORD_ENV} is not set"))?;
    Ok(SessionCredentials { username, password })
}

/// Loads the role snapshot from `--claims` or the claims env var. A file
/// that parses but carries no role sections yields `None`.
pub fn load_claims(flag: Option<&str>) -> Result<Option<RoleClaims>, String> {
    let path = match flag {
        Some(path) => path.to_string(),
        None => match non_empty_env(TOKEN_CLAIMS_ENV) {
            Some(path) => path,
            None => return Ok(None),
        },
    };
    read_claims_file(Path::new(&path))
}

pub fn read_claims_file(path: &Path) -> Result<Option<RoleClaims>, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
    Ok(RoleClaims::from_json(&value))
}

/// Splits `--flag value` pairs from positional arguments. Only `allowed`
/// flags are accepted.
pub fn split_flags(
    args: &[String],
    allowed: &[&str],
) -> Result<(Vec<String>, BTreeMap<String, String>), String> {
    let mut positional = Vec::new();
    let mut flags = BTreeMap::new();
    let mut index = 0;
    while index < args.len() {
        let arg = &args[index];
        if let Some(name) = arg.strip_prefix("--") {
            if !allowed.contains(&arg.as_str()) {
                return Err(format!("unknown option `{arg}`"));
            }
            let value = args
                .get(index + 1)
                .ok_or_else(|| format!("{arg} requires a value"))?;
            flags.insert(name.to_string(), value.clone());
            index += 2;
        } else {
            positional.push(arg.clone());
            index += 1;
        }
    }
    Ok((positional, flags))
}

/// Records the realm the CLI was asked to redirect to on denial.
#[derive(Debug, Default)]
pub struct RecordedDenial {
    redirects: RefCell<Vec<RealmName>>,
}

impl RecordedDenial {
    pub fn redirects(&self) -> Vec<RealmName> {
        self.redirects.borrow().clone()
    }
}

impl DenialSignal for RecordedDenial {
    fn redirect_to_access_denied(&self, realm: &RealmName) {
        self.redirects.borrow_mut().push(realm.clone());
    }
}
