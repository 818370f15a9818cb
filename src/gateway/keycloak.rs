use super::error::GatewayFault;
use super::types::{FederationAck, FederationConfig, FederationRequest, ProviderKind};
use super::FederationGateway;
use crate::shared::ids::RealmName;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

const USER_STORAGE_PROVIDER_TYPE: &str = "org.keycloak.storage.UserStorageProvider";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportConfigBody<'a> {
    from_url: &'a str,
    provider_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdentityProviderRepresentation<'a> {
    alias: &'a str,
    display_name: &'a str,
    provider_id: &'a str,
    enabled: bool,
    config: &'a FederationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComponentRepresentation<'a> {
    name: &'a str,
    provider_id: &'a str,
    provider_type: &'a str,
    config: BTreeMap<&'a str, Vec<String>>,
}

/// `FederationGateway` over the Keycloak admin REST API. Every call is bound
/// by the configured timeout.
#[derive(Debug, Clone)]
pub struct KeycloakAdminClient {
    server_url: String,
    access_token: String,
    timeout: Duration,
    agent: ureq::Agent,
}

impl KeycloakAdminClient {
    pub fn new(server_url: &str, access_token: String, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            access_token,
            timeout,
            agent,
        }
    }

    pub fn admin_endpoint(&self, realm: &RealmName, path: &str) -> String {
        format!(
            "{}/admin/realms/{}/{}",
            self.server_url,
            urlencoding::encode(realm.as_str()),
            path.trim_start_matches('/')
        )
    }

    fn post_json<B: Serialize>(&self, url: &str, body: &B) -> Result<ureq::Response, GatewayFault> {
        let body = serde_json::to_value(body).map_err(|e| GatewayFault::Encode(e.to_string()))?;
        self.agent
            .post(url)
            .set("Authorization", &format!("Bearer {}", self.access_token))
            .send_json(body)
            .map_err(|err| self.map_error(err))
    }

    fn map_error(&self, err: ureq::Error) -> GatewayFault {
        match err {
            ureq::Error::Status(status, response) => GatewayFault::Rejected {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => {
                if is_timeout(&transport) {
                    GatewayFault::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    GatewayFault::Transport(transport.to_string())
                }
            }
        }
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<std::io::Error>())
        .is_some_and(|io| {
            matches!(
                io.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            )
        })
}

fn component_config(config: &FederationConfig) -> BTreeMap<&str, Vec<String>> {
    config
        .as_map()
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (key.as_str(), vec![rendered])
        })
        .collect()
}

impl FederationGateway for KeycloakAdminClient {
    fn import_from_url(
        &self,
        url: &str,
        kind: ProviderKind,
        realm: &RealmName,
    ) -> Result<FederationConfig, GatewayFault> {
        let endpoint = self.admin_endpoint(realm, "identity-provider/import-config");
        let response = self.post_json(
            &endpoint,
            &ImportConfigBody {
                from_url: url,
                provider_id: kind.as_str(),
            },
        )?;
        response
            .into_json::<Map<String, Value>>()
            .map(FederationConfig::from_map)
            .map_err(|e| GatewayFault::Decode(e.to_string()))
    }

    fn create(
        &self,
        request: &FederationRequest,
        realm: &RealmName,
    ) -> Result<FederationAck, GatewayFault> {
        let response = if request.kind.is_brokered() {
            self.post_json(
                &self.admin_endpoint(realm, "identity-provider/instances"),
                &IdentityProviderRepresentation {
                    alias: request.alias.as_str(),
                    display_name: &request.display_name,
                    provider_id: request.kind.as_str(),
                    enabled: true,
                    config: &request.config,
                },
            )?
        } else {
            self.post_json(
                &self.admin_endpoint(realm, "components"),
                &ComponentRepresentation {
                    name: &request.display_name,
                    provider_id: request.kind.as_str(),
                    provider_type: USER_STORAGE_PROVIDER_TYPE,
                    config: component_config(&request.config),
                },
            )?
        };
        Ok(FederationAck {
            location: response.header("Location").map(str::to_string),
        })
    }
}
