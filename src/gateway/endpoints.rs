use super::types::ProviderKind;
use crate::shared::ids::{ProviderAlias, RealmName};

/// Service-provider values the operator copies into the external IdP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerEndpoints {
    pub sso_url: String,
    pub audience_uri: String,
    pub admin_link: String,
}

impl BrokerEndpoints {
    pub fn new(
        server_url: &str,
        realm: &RealmName,
        auth_realm: &RealmName,
        alias: &ProviderAlias,
        kind: ProviderKind,
    ) -> Self {
        let server = server_url.trim_end_matches('/');
        Self {
            sso_url: format!("{server}/realms/{realm}/broker/{alias}/endpoint"),
            audience_uri: format!("{server}/realms/{realm}"),
            admin_link: format!(
                "{server}/admin/{auth_realm}/console/#/realms/{realm}/identity-provider-settings/provider/{kind}/{alias}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_trim_trailing_slash() {
        let endpoints = BrokerEndpoints::new(
            "https://auth.example.com/",
            &RealmName::parse("corp").expect("realm"),
            &RealmName::master(),
            &ProviderAlias::parse("okta-saml-0aff10").expect("alias"),
            ProviderKind::Saml,
        );
        assert_eq!(
            endpoints.sso_url,
            "https://auth.example.com/realms/corp/broker/okta-saml-0aff10/endpoint"
        );
        assert_eq!(endpoints.audience_uri, "https://auth.example.com/realms/corp");
        assert_eq!(
            endpoints.admin_link,
            "https://auth.example.com/admin/master/console/#/realms/corp/identity-provider-settings/provider/saml/okta-saml-0aff10"
        );
    }
}
