pub mod claims;
pub mod error;
pub mod gate;
pub mod guard;
pub mod roles;

pub use claims::{ClaimSection, RoleClaims};
pub use error::RoleConfigError;
pub use gate::{
    resolve_role_scope, AccessContext, AccessDecision, AccessGate, AccessReport, OrgSelection,
    TenancyMode, GLOBAL_ORG, REALM_MANAGEMENT_SCOPE,
};
pub use guard::{AccessGuard, DenialSignal};
pub use roles::{PrivilegeTier, RoleRegistry, RoleRequirementSet, RoleScope};
