use crate::shared::ids::ProviderAlias;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Saml,
    Oidc,
    Ldap,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Saml => "saml",
            Self::Oidc => "oidc",
            Self::Ldap => "ldap",
        }
    }

    /// Identity-provider protocols are brokered; LDAP is a user-storage
    /// component instead.
    pub fn is_brokered(self) -> bool {
        matches!(self, Self::Saml | Self::Oidc)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provider-specific configuration record. Opaque to the wizard and passed
/// through to the gateway unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FederationConfig(Map<String, Value>);

impl FederationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Layers `self` over `base`: keys present in both keep `self`'s value.
    pub fn over(self, base: &FederationConfig) -> Self {
        let mut merged = base.0.clone();
        merged.extend(self.0);
        Self(merged)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FederationRequest {
    pub alias: ProviderAlias,
    pub display_name: String,
    pub kind: ProviderKind,
    pub config: FederationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FederationAck {
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imported_values_override_defaults() {
        let defaults = FederationConfig::new()
            .with("syncMode", "IMPORT")
            .with("postBindingResponse", "true");
        let imported = FederationConfig::new()
            .with("postBindingResponse", "false")
            .with("singleSignOnServiceUrl", "https://idp.example.com/sso");

        let merged = imported.over(&defaults);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("syncMode"), Some(&Value::from("IMPORT")));
        assert_eq!(
            merged.get("postBindingResponse"),
            Some(&Value::from("false"))
        );
    }
}
