use super::error::WizardError;
use super::steps::{StepDefinitionSet, StepDescriptor};
use crate::gateway::{saml_defaults, FederationConfig, ProviderKind};
use crate::shared::ids::ProviderAlias;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardKind {
    OktaLdap,
    OktaSaml,
    OneLoginSaml,
}

pub const ALL_WIZARD_KINDS: [WizardKind; 3] = [
    WizardKind::OktaLdap,
    WizardKind::OktaSaml,
    WizardKind::OneLoginSaml,
];

impl WizardKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OktaLdap => "okta-ldap",
            Self::OktaSaml => "okta-saml",
            Self::OneLoginSaml => "onelogin-saml",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let normalized = raw.trim().to_ascii_lowercase();
        ALL_WIZARD_KINDS
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown wizard `{raw}`; valid wizards: {}",
                    ALL_WIZARD_KINDS
                        .iter()
                        .map(|kind| kind.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }

    pub fn common_name(self) -> &'static str {
        match self {
            Self::OktaLdap => "Okta LDAP",
            Self::OktaSaml => "Okta SAML IdP",
            Self::OneLoginSaml => "OneLogin SAML IdP",
        }
    }

    pub fn protocol(self) -> ProviderKind {
        match self {
            Self::OktaLdap => ProviderKind::Ldap,
            Self::OktaSaml | Self::OneLoginSaml => ProviderKind::Saml,
        }
    }

    pub fn alias_preface(self) -> &'static str {
        self.as_str()
    }

    pub fn display_name(self, alias: &ProviderAlias) -> String {
        match self {
            Self::OktaLdap => format!("Okta LDAP Federation {alias}"),
            Self::OktaSaml => format!("Okta SAML Single Sign-on {alias}"),
            Self::OneLoginSaml => format!("OneLogin SAML Single Sign-on {alias}"),
        }
    }

    pub fn completion_message(self) -> &'static str {
        match self {
            Self::OktaLdap => "Your users can now sign-in with Okta.",
            Self::OktaSaml => "Your users can now sign-in with Okta SAML.",
            Self::OneLoginSaml => "Your users can now sign-in with OneLogin SAML.",
        }
    }

    /// Defaults layered under configuration imported from IdP metadata.
    pub fn import_defaults(self) -> Option<FederationConfig> {
        match self.protocol() {
            ProviderKind::Saml => Some(saml_defaults()),
            ProviderKind::Oidc | ProviderKind::Ldap => None,
        }
    }

    pub fn steps(self) -> Result<StepDefinitionSet, WizardError> {
        let steps = match self {
            Self::OktaLdap => vec![
                StepDescriptor::instruction(1, "Enable LDAP Interface"),
                StepDescriptor::instruction(2, "LDAP Authentication"),
                StepDescriptor::instruction(3, "Group Mapping"),
                StepDescriptor::confirmation(4, "Confirmation"),
            ],
            Self::OktaSaml => vec![
                StepDescriptor::instruction(1, "Add a SAML Application"),
                StepDescriptor::instruction(2, "Enter Service Provider Details"),
                StepDescriptor::instruction(3, "Configure Attribute Mapping"),
                StepDescriptor::instruction(4, "Complete Feedback Section"),
                StepDescriptor::instruction(5, "Assign People and Groups"),
                StepDescriptor::validation(6, "Upload Okta IdP Information"),
                StepDescriptor::confirmation(7, "Confirmation"),
            ],
            Self::OneLoginSaml => vec![
                StepDescriptor::instruction(1, "Add the SAML Connector"),
                StepDescriptor::instruction(2, "Enter Service Provider Details"),
                StepDescriptor::instruction(3, "Configure Attribute Mapping"),
                StepDescriptor::validation(4, "Upload OneLogin IdP Information"),
                StepDescriptor::confirmation(5, "Confirmation"),
            ],
        };
        StepDefinitionSet::new(steps)
    }
}

impl std::fmt::Display for WizardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
