use super::types::FederationConfig;

const SAML_DEFAULTS: &[(&str, &str)] = &[
    ("syncMode", "IMPORT"),
    ("allowCreate", "true"),
    ("principalType", "SUBJECT"),
    (
        "nameIDPolicyFormat",
        "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress",
    ),
    ("postBindingResponse", "true"),
    ("postBindingAuthnRequest", "true"),
    ("postBindingLogout", "true"),
    ("wantAuthnRequestsSigned", "true"),
];

pub fn saml_defaults() -> FederationConfig {
    SAML_DEFAULTS
        .iter()
        .fold(FederationConfig::new(), |config, (key, value)| {
            config.with(key, *value)
        })
}

/// Username/password captured earlier in the session and handed to the
/// gateway untouched.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn okta_ldap_config(customer_identifier: &str, credentials: &SessionCredentials) -> FederationConfig {
    let base_dn = format!("dc={customer_identifier},dc=okta,dc=com");
    FederationConfig::new()
        .with("enabled", "true")
        .with("vendor", "other")
        .with("editMode", "READ_ONLY")
        .with(
            "connectionUrl",
            format!("ldaps://{customer_identifier}.ldap.okta.com"),
        )
        .with("usersDn", format!("ou=users,{base_dn}"))
        .with("authType", "simple")
        .with(
            "bindDn",
            format!("uid={},{base_dn}", credentials.username),
        )
        .with("bindCredential", credentials.password.clone())
        .with("usernameLDAPAttribute", "uid")
        .with("rdnLDAPAttribute", "uid")
        .with("uuidLDAPAttribute", "uid")
        .with("userObjectClasses", "inetOrgPerson")
        .with("importEnabled", "true")
        .with("syncRegistrations", "false")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn okta_ldap_config_uses_customer_directory() {
        let credentials = SessionCredentials {
            username: "svc-broker".to_string(),
            password: "hunter2".to_string(),
        };
        let config = okta_ldap_config("acme", &credentials);
        assert_eq!(
            config.get("connectionUrl"),
            Some(&Value::from("ldaps://acme.ldap.okta.com"))
        );
        assert_eq!(
            config.get("bindDn"),
            Some(&Value::from("uid=svc-broker,dc=acme,dc=okta,dc=com"))
        );
        assert_eq!(config.get("bindCredential"), Some(&Value::from("hunter2")));
    }

    #[test]
    fn debug_output_hides_password() {
        let credentials = SessionCredentials {
            username: "svc".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("svc"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn saml_defaults_sync_by_import() {
        assert_eq!(saml_defaults().get("syncMode"), Some(&Value::from("IMPORT")));
    }
}
