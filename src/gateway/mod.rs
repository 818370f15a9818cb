pub mod alias;
pub mod defaults;
pub mod endpoints;
pub mod error;
pub mod keycloak;
pub mod types;

pub use alias::generate_alias;
pub use defaults::{okta_ldap_config, saml_defaults, SessionCredentials};
pub use endpoints::BrokerEndpoints;
pub use error::GatewayFault;
pub use keycloak::KeycloakAdminClient;
pub use types::{FederationAck, FederationConfig, FederationRequest, ProviderKind};

use crate::shared::ids::RealmName;
use std::sync::Arc;

/// Administrative calls the wizard depends on. Both are network-bound and
/// fallible; `create` is not assumed to be idempotent.
pub trait FederationGateway {
    fn import_from_url(
        &self,
        url: &str,
        kind: ProviderKind,
        realm: &RealmName,
    ) -> Result<FederationConfig, GatewayFault>;

    fn create(
        &self,
        request: &FederationRequest,
        realm: &RealmName,
    ) -> Result<FederationAck, GatewayFault>;
}

impl<G: FederationGateway + ?Sized> FederationGateway for Arc<G> {
    fn import_from_url(
        &self,
        url: &str,
        kind: ProviderKind,
        realm: &RealmName,
    ) -> Result<FederationConfig, GatewayFault> {
        (**self).import_from_url(url, kind, realm)
    }

    fn create(
        &self,
        request: &FederationRequest,
        realm: &RealmName,
    ) -> Result<FederationAck, GatewayFault> {
        (**self).create(request, realm)
    }
}
