use super::claims::{ClaimSection, RoleClaims};
use super::error::RoleConfigError;
use super::roles::{PrivilegeTier, RoleRegistry, RoleScope};
use crate::shared::ids::{OrganizationId, RealmName};
use crate::shared::serde_ext::parse_via_string;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const GLOBAL_ORG: &str = "global";
pub const REALM_MANAGEMENT_SCOPE: &str = "realm-management";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenancyMode {
    Cloud,
    OnPrem,
}

impl TenancyMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cloud => "cloud",
            Self::OnPrem => "onprem",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cloud" => Ok(Self::Cloud),
            "onprem" | "on-prem" => Ok(Self::OnPrem),
            _ => Err("api mode must be one of: cloud, onprem".to_string()),
        }
    }

    /// Registry table consulted for this mode.
    pub fn requirement(self) -> (RoleScope, PrivilegeTier) {
        match self {
            Self::Cloud => (RoleScope::Organization, PrivilegeTier::Admin),
            Self::OnPrem => (RoleScope::Realm, PrivilegeTier::Resource),
        }
    }

    /// Token section the resolved scope name is looked up in.
    pub fn claim_section(self) -> ClaimSection {
        match self {
            Self::Cloud => ClaimSection::Organization,
            Self::OnPrem => ClaimSection::Client,
        }
    }
}

impl std::fmt::Display for TenancyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TenancyMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TenancyMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        parse_via_string(deserializer, "api mode", TenancyMode::parse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrgSelection {
    Global,
    Organization(OrganizationId),
}

impl OrgSelection {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw == GLOBAL_ORG {
            return Ok(Self::Global);
        }
        OrganizationId::parse(raw).map(Self::Organization)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Global => GLOBAL_ORG,
            Self::Organization(id) => id.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    pub mode: TenancyMode,
    pub current_org: Option<OrgSelection>,
    /// Realm the operator's token was issued by.
    pub home_realm: RealmName,
    /// Realm whose identity providers are being managed.
    pub target_realm: RealmName,
    pub claims: Option<RoleClaims>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessDecision {
    Unknown,
    Granted,
    Denied,
}

impl AccessDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

impl std::fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessReport {
    pub decision: AccessDecision,
    pub scope: Option<String>,
    pub missing_roles: Vec<String>,
    pub reason: String,
}

impl AccessReport {
    fn granted(scope: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            decision: AccessDecision::Granted,
            scope,
            missing_roles: Vec::new(),
            reason: reason.into(),
        }
    }

    fn denied(scope: Option<String>, missing_roles: Vec<String>, reason: impl Into<String>) -> Self {
        Self {
            decision: AccessDecision::Denied,
            scope,
            missing_roles,
            reason: reason.into(),
        }
    }
}

/// Scope name whose roles gate access, or `None` when no organization is
/// selected in cloud mode.
pub fn resolve_role_scope(context: &AccessContext) -> Option<String> {
    match context.mode {
        TenancyMode::Cloud => match context.current_org.as_ref()? {
            OrgSelection::Global => None,
            OrgSelection::Organization(id) => Some(id.as_str().to_string()),
        },
        TenancyMode::OnPrem => {
            if context.home_realm.is_master() {
                Some(format!("{}-realm", context.target_realm))
            } else {
                Some(REALM_MANAGEMENT_SCOPE.to_string())
            }
        }
    }
}

/// Stateless decision procedure over the role registry. Safe to share
/// across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGate {
    registry: RoleRegistry,
}

impl AccessGate {
    pub fn new(registry: RoleRegistry) -> Self {
        Self { registry }
    }

    pub fn standard() -> Result<Self, RoleConfigError> {
        Ok(Self::new(RoleRegistry::standard()?))
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    pub fn evaluate(&self, context: &AccessContext) -> AccessDecision {
        self.explain(context).decision
    }

    pub fn explain(&self, context: &AccessContext) -> AccessReport {
        if context.current_org == Some(OrgSelection::Global) {
            return AccessReport::granted(None, "global organization scope");
        }

        let (scope_kind, tier) = context.mode.requirement();
        let required = self.registry.required_roles(scope_kind, tier);
        let all_roles = || required.roles().to_vec();

        let Some(claims) = context.claims.as_ref() else {
            return AccessReport::denied(None, all_roles(), "no role claims present");
        };
        let Some(scope) = resolve_role_scope(context) else {
            return AccessReport::denied(None, all_roles(), "no organization selected");
        };

        let missing: Vec<String> = required
            .missing_from(claims.roles_in(context.mode.claim_section(), &scope))
            .into_iter()
            .map(str::to_string)
            .collect();
        if missing.is_empty() {
            AccessReport::granted(
                Some(scope),
                format!("{scope_kind}/{tier} roles present ({})", context.mode),
            )
        } else {
            let reason = format!(
                "{} of {} {scope_kind}/{tier} roles missing",
                missing.len(),
                required.len()
            );
            AccessReport::denied(Some(scope), missing, reason)
        }
    }

    pub fn has_roles(
        &self,
        claims: &RoleClaims,
        scope: RoleScope,
        tier: PrivilegeTier,
        section: ClaimSection,
        scope_name: &str,
    ) -> bool {
        self.registry
            .required_roles(scope, tier)
            .is_satisfied_by(claims.roles_in(section, scope_name))
    }
}
