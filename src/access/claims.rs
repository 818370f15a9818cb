use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Which part of the token a scope name belongs to. Client ids and
/// organization ids live in separate namespaces and never share roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimSection {
    Client,
    Organization,
}

impl ClaimSection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Organization => "organization",
        }
    }
}

impl std::fmt::Display for ClaimSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

type ScopeRoles = BTreeMap<String, BTreeSet<String>>;

/// Read-only snapshot of granted roles. Client resources (such as
/// `realm-management`) and organizations are keyed separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleClaims {
    clients: ScopeRoles,
    organizations: ScopeRoles,
}

impl RoleClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds roles for a client resource scope.
    pub fn with_scope<I, S>(mut self, scope: &str, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_roles(ClaimSection::Client, scope, roles);
        self
    }

    pub fn with_organization<I, S>(mut self, org: &str, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_roles(ClaimSection::Organization, org, roles);
        self
    }

    pub fn insert_roles<I, S>(&mut self, section: ClaimSection, scope: &str, roles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.section_mut(section)
            .entry(scope.to_string())
            .or_default()
            .extend(roles.into_iter().map(Into::into));
    }

    pub fn roles_in(&self, section: ClaimSection, scope: &str) -> Option<&BTreeSet<String>> {
        self.section(section).get(scope)
    }

    pub fn has_role(&self, section: ClaimSection, scope: &str, role: &str) -> bool {
        self.roles_in(section, scope)
            .is_some_and(|roles| roles.contains(role))
    }

    pub fn scope_names(&self, section: ClaimSection) -> impl Iterator<Item = &str> {
        self.section(section).keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.organizations.is_empty()
    }

    fn section(&self, section: ClaimSection) -> &ScopeRoles {
        match section {
            ClaimSection::Client => &self.clients,
            ClaimSection::Organization => &self.organizations,
        }
    }

    fn section_mut(&mut self, section: ClaimSection) -> &mut ScopeRoles {
        match section {
            ClaimSection::Client => &mut self.clients,
            ClaimSection::Organization => &mut self.organizations,
        }
    }

    /// Builds a snapshot from a parsed access-token payload:
    /// `resource_access.<client>.roles` feeds client scopes and
    /// `organizations.<org>.roles` feeds organization scopes. Returns `None`
    /// when the payload carries neither section.
    pub fn from_token_claims(payload: &Value) -> Option<Self> {
        let resource_access = payload.get("resource_access").and_then(Value::as_object);
        let organizations = payload.get("organizations").and_then(Value::as_object);
        if resource_access.is_none() && organizations.is_none() {
            return None;
        }

        let mut claims = Self::new();
        let sections = [
            (ClaimSection::Client, resource_access),
            (ClaimSection::Organization, organizations),
        ];
        for (section, entries) in sections {
            for (scope, entry) in entries.into_iter().flatten() {
                let Some(roles) = entry.get("roles").and_then(Value::as_array) else {
                    continue;
                };
                claims.insert_roles(section, scope, roles.iter().filter_map(Value::as_str));
            }
        }
        Some(claims)
    }

    /// Accepts either a token payload or a plain `{ client: [role, ...] }`
    /// snapshot. The plain shape only carries client scopes.
    pub fn from_json(value: &Value) -> Option<Self> {
        if let Some(claims) = Self::from_token_claims(value) {
            return Some(claims);
        }
        let clients: ScopeRoles = serde_json::from_value(value.clone()).ok()?;
        Some(Self {
            clients,
            organizations: ScopeRoles::new(),
        })
    }
}
