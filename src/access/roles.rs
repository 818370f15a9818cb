use super::error::RoleConfigError;
use std::collections::BTreeSet;

const ORGANIZATION_ADMIN_ROLES: &[&str] = &[
    "view-organization",
    "manage-organization",
    "view-identity-providers",
    "manage-identity-providers",
];

const ORGANIZATION_RESOURCE_ROLES: &[&str] = &[
    "view-identity-providers",
    "manage-identity-providers",
    "query-users",
    "view-users",
    "view-events",
    "view-realm",
    "manage-realm",
];

const REALM_ADMIN_ROLES: &[&str] = &[
    "view-organizations",
    "manage-organizations",
    "view-identity-providers",
    "manage-identity-providers",
];

const REALM_RESOURCE_ROLES: &[&str] = &[
    "view-identity-providers",
    "manage-identity-providers",
    "query-users",
    "view-users",
    "view-events",
    "view-realm",
    "manage-realm",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleScope {
    Organization,
    Realm,
}

impl RoleScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Realm => "realm",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, RoleConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "organization" | "org" => Ok(Self::Organization),
            "realm" => Ok(Self::Realm),
            _ => Err(RoleConfigError::UnknownScope(raw.to_string())),
        }
    }
}

impl std::fmt::Display for RoleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrivilegeTier {
    Admin,
    Resource,
}

impl PrivilegeTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Resource => "resource",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, RoleConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "resource" => Ok(Self::Resource),
            _ => Err(RoleConfigError::UnknownTier(raw.to_string())),
        }
    }
}

impl std::fmt::Display for PrivilegeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered, non-empty, duplicate-free list of role names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequirementSet {
    roles: Vec<String>,
}

impl RoleRequirementSet {
    pub fn new<I, S>(table: &str, roles: I) -> Result<Self, RoleConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        for role in roles {
            let role = role.into();
            if role.trim().is_empty() {
                return Err(RoleConfigError::BlankRole {
                    table: table.to_string(),
                });
            }
            if !seen.insert(role.clone()) {
                return Err(RoleConfigError::DuplicateRole {
                    table: table.to_string(),
                    role,
                });
            }
            ordered.push(role);
        }
        if ordered.is_empty() {
            return Err(RoleConfigError::EmptyRoleSet {
                table: table.to_string(),
            });
        }
        Ok(Self { roles: ordered })
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn is_satisfied_by(&self, granted: Option<&BTreeSet<String>>) -> bool {
        self.missing_from(granted).is_empty()
    }

    pub fn missing_from(&self, granted: Option<&BTreeSet<String>>) -> Vec<&str> {
        self.roles
            .iter()
            .filter(|role| !granted.is_some_and(|set| set.contains(role.as_str())))
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
    organization_admin: RoleRequirementSet,
    organization_resource: RoleRequirementSet,
    realm_admin: RoleRequirementSet,
    realm_resource: RoleRequirementSet,
}

impl RoleRegistry {
    pub fn standard() -> Result<Self, RoleConfigError> {
        Ok(Self {
            organization_admin: RoleRequirementSet::new(
                "organization/admin",
                ORGANIZATION_ADMIN_ROLES.iter().copied(),
            )?,
            organization_resource: RoleRequirementSet::new(
                "organization/resource",
                ORGANIZATION_RESOURCE_ROLES.iter().copied(),
            )?,
            realm_admin: RoleRequirementSet::new("realm/admin", REALM_ADMIN_ROLES.iter().copied())?,
            realm_resource: RoleRequirementSet::new(
                "realm/resource",
                REALM_RESOURCE_ROLES.iter().copied(),
            )?,
        })
    }

    pub fn required_roles(&self, scope: RoleScope, tier: PrivilegeTier) -> &RoleRequirementSet {
        match (scope, tier) {
            (RoleScope::Organization, PrivilegeTier::Admin) => &self.organization_admin,
            (RoleScope::Organization, PrivilegeTier::Resource) => &self.organization_resource,
            (RoleScope::Realm, PrivilegeTier::Admin) => &self.realm_admin,
            (RoleScope::Realm, PrivilegeTier::Resource) => &self.realm_resource,
        }
    }

    pub fn required_roles_by_name(
        &self,
        scope: &str,
        tier: &str,
    ) -> Result<&RoleRequirementSet, RoleConfigError> {
        let scope = RoleScope::parse(scope)?;
        let tier = PrivilegeTier::parse(tier)?;
        Ok(self.required_roles(scope, tier))
    }
}
