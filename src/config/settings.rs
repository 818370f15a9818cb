use super::ConfigError;
use crate::access::{AccessContext, OrgSelection, RoleClaims, TenancyMode};
use crate::shared::ids::RealmName;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

fn default_auth_realm() -> RealmName {
    RealmName::master()
}

fn default_api_mode() -> TenancyMode {
    TenancyMode::OnPrem
}

fn default_request_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct OktaSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_identifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    pub server_url: String,
    /// Realm whose identity providers are configured.
    pub realm: RealmName,
    /// Realm that issued the operator's token.
    #[serde(default = "default_auth_realm")]
    pub auth_realm: RealmName,
    #[serde(default = "default_api_mode")]
    pub api_mode: TenancyMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_org: Option<String>,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub okta: OktaSettings,
}

impl Settings {
    pub fn new(server_url: impl Into<String>, realm: RealmName) -> Self {
        Self {
            server_url: server_url.into(),
            realm,
            auth_realm: default_auth_realm(),
            api_mode: default_api_mode(),
            current_org: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            okta: OktaSettings::default(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let server_url = self.server_url.trim();
        if server_url.is_empty() {
            return Err(ConfigError::Settings(
                "`server_url` must be non-empty".to_string(),
            ));
        }
        if !server_url.starts_with("https://") && !server_url.starts_with("http://") {
            return Err(ConfigError::Settings(format!(
                "`server_url` must start with http:// or https://, got `{server_url}`"
            )));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Settings(
                "`request_timeout_seconds` must be greater than zero".to_string(),
            ));
        }
        if let Some(org) = &self.current_org {
            OrgSelection::parse(org)
                .map_err(|err| ConfigError::Settings(format!("`current_org`: {err}")))?;
        }
        if let Some(customer) = &self.okta.customer_identifier {
            if customer.trim().is_empty() {
                return Err(ConfigError::Settings(
                    "`okta.customer_identifier` must be non-empty when set".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn current_org_selection(&self) -> Result<Option<OrgSelection>, ConfigError> {
        self.current_org
            .as_deref()
            .map(|org| {
                OrgSelection::parse(org)
                    .map_err(|err| ConfigError::Settings(format!("`current_org`: {err}")))
            })
            .transpose()
    }

    pub fn access_context(
        &self,
        claims: Option<RoleClaims>,
    ) -> Result<AccessContext, ConfigError> {
        Ok(AccessContext {
            mode: self.api_mode,
            current_org: self.current_org_selection()?,
            home_realm: self.auth_realm.clone(),
            target_realm: self.realm.clone(),
            claims,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_takes_defaults() {
        let settings: Settings =
            serde_yaml::from_str("server_url: https://auth.example.com\nrealm: corp\n")
                .expect("parse");
        assert!(settings.auth_realm.is_master());
        assert_eq!(settings.api_mode, TenancyMode::OnPrem);
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn unknown_api_mode_is_a_parse_error() {
        let err = serde_yaml::from_str::<Settings>(
            "server_url: https://auth.example.com\nrealm: corp\napi_mode: hybrid\n",
        )
        .expect_err("invalid mode");
        assert!(err.to_string().contains("invalid api mode `hybrid`"));
    }

    #[test]
    fn validate_rejects_non_http_urls_and_bad_orgs() {
        let mut settings = Settings::new("ftp://auth", RealmName::parse("corp").expect("realm"));
        assert!(matches!(settings.validate(), Err(ConfigError::Settings(_))));

        settings.server_url = "https://auth.example.com".to_string();
        settings.current_org = Some("org 1".to_string());
        assert!(matches!(settings.validate(), Err(ConfigError::Settings(_))));

        settings.current_org = Some("global".to_string());
        assert_eq!(
            settings.current_org_selection().expect("org"),
            Some(OrgSelection::Global)
        );
    }
}
