//! Credential resolution for the agent sample.
//!
//! Mirrors the fallback order used by the Azure SDK getting-started samples:
//! an explicit service principal always wins over ambient login state, an
//! Azure CLI session comes next, and the developer-tools provider chain is
//! the last resort. Resolution never validates that the chosen credential can
//! actually authenticate; that failure surfaces on the first network call.

use std::sync::Arc;

use azure_core::credentials::{Secret, TokenCredential};
use azure_identity::{AzureCliCredential, ClientSecretCredential, DeveloperToolsCredential};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{AgentError, AgentResult};

/// Environment variable holding the service principal client id.
pub const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
/// Environment variable holding the service principal client secret.
pub const CLIENT_SECRET_VAR: &str = "AZURE_CLIENT_SECRET";
/// Environment variable holding the service principal tenant id.
pub const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which provider produced the resolved credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// `ClientSecretCredential` built from the three environment variables.
    ServicePrincipal,
    /// `AzureCliCredential` reusing an out-of-band `az login` session.
    AzureCli,
    /// `DeveloperToolsCredential`, which probes locally available
    /// authentication sources in an order owned by `azure_identity`.
    DeveloperTools,
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ServicePrincipal => "service principal",
            Self::AzureCli => "Azure CLI",
            Self::DeveloperTools => "developer tools",
        };
        f.write_str(name)
    }
}

/// Service principal configuration read from the environment.
pub struct ServicePrincipalConfig {
    pub client_id: String,
    client_secret: SecretString,
    pub tenant_id: String,
}

impl ServicePrincipalConfig {
    /// Read `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`, and `AZURE_TENANT_ID`
    /// from the process environment. Returns `None` unless all three are set
    /// and non-empty.
    pub fn from_env() -> Option<Self> {
        Self::from_values(
            std::env::var(CLIENT_ID_VAR).ok(),
            std::env::var(CLIENT_SECRET_VAR).ok(),
            std::env::var(TENANT_ID_VAR).ok(),
        )
    }

    pub(crate) fn from_values(
        client_id: Option<String>,
        client_secret: Option<String>,
        tenant_id: Option<String>,
    ) -> Option<Self> {
        match (client_id, client_secret, tenant_id) {
            (Some(client_id), Some(secret), Some(tenant_id))
                if !client_id.is_empty() && !secret.is_empty() && !tenant_id.is_empty() =>
            {
                Some(Self {
                    client_id,
                    client_secret: SecretString::from(secret),
                    tenant_id,
                })
            }
            _ => None,
        }
    }

    fn into_credential(self) -> AgentResult<Arc<dyn TokenCredential>> {
        let credential = ClientSecretCredential::new(
            &self.tenant_id,
            self.client_id,
            Secret::new(self.client_secret.expose_secret().to_string()),
            None,
        )
        .map_err(|e| AgentError::Auth(format!("service principal credential: {e}")))?;
        Ok(credential as Arc<dyn TokenCredential>)
    }
}

impl std::fmt::Debug for ServicePrincipalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServicePrincipalConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"****")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// A named fallible credential factory.
pub(crate) struct Provider<T> {
    kind: CredentialKind,
    factory: Box<dyn FnOnce() -> Result<T, BoxError>>,
}

impl<T> Provider<T> {
    pub(crate) fn new(
        kind: CredentialKind,
        factory: impl FnOnce() -> Result<T, BoxError> + 'static,
    ) -> Self {
        Self {
            kind,
            factory: Box::new(factory),
        }
    }
}

/// Evaluate providers in order, returning the first that constructs
/// successfully. Construction errors are logged and swallowed; only
/// exhausting the whole chain is an error.
pub(crate) fn first_available<T>(providers: Vec<Provider<T>>) -> AgentResult<(CredentialKind, T)> {
    for provider in providers {
        let kind = provider.kind;
        match (provider.factory)() {
            Ok(value) => return Ok((kind, value)),
            Err(err) => {
                tracing::debug!(%kind, error = %err, "credential provider unavailable");
            }
        }
    }
    Err(AgentError::Auth("no credential provider available".into()))
}

/// Resolve a token credential from the process environment.
///
/// Order: service principal (all three environment variables set and
/// non-empty), then the Azure CLI session, then the developer-tools provider
/// chain. Returns the credential together with the path that was taken.
pub fn resolve_credential() -> AgentResult<(Arc<dyn TokenCredential>, CredentialKind)> {
    if let Some(config) = ServicePrincipalConfig::from_env() {
        tracing::info!(
            client_id = %config.client_id,
            tenant_id = %config.tenant_id,
            "using service principal authentication (ClientSecretCredential)"
        );
        return Ok((config.into_credential()?, CredentialKind::ServicePrincipal));
    }

    let providers = vec![
        Provider::new(CredentialKind::AzureCli, || {
            AzureCliCredential::new(None)
                .map(|c| c as Arc<dyn TokenCredential>)
                .map_err(BoxError::from)
        }),
        Provider::new(CredentialKind::DeveloperTools, || {
            DeveloperToolsCredential::new(None)
                .map(|c| c as Arc<dyn TokenCredential>)
                .map_err(BoxError::from)
        }),
    ];

    let (kind, credential) = first_available(providers)?;
    tracing::info!(%kind, "using {kind} authentication");
    Ok((credential, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::cell::Cell;
    use std::rc::Rc;

    fn set_service_principal_env() {
        std::env::set_var(CLIENT_ID_VAR, "11111111-2222-3333-4444-555555555555");
        std::env::set_var(CLIENT_SECRET_VAR, "test-secret");
        std::env::set_var(TENANT_ID_VAR, "66666666-7777-8888-9999-aaaaaaaaaaaa");
    }

    fn clear_service_principal_env() {
        std::env::remove_var(CLIENT_ID_VAR);
        std::env::remove_var(CLIENT_SECRET_VAR);
        std::env::remove_var(TENANT_ID_VAR);
    }

    // --- ServicePrincipalConfig selection ---

    #[test]
    fn all_three_values_select_service_principal() {
        let config = ServicePrincipalConfig::from_values(
            Some("client".into()),
            Some("secret".into()),
            Some("tenant".into()),
        )
        .expect("should select service principal");

        assert_eq!(config.client_id, "client");
        assert_eq!(config.tenant_id, "tenant");
    }

    #[test]
    fn missing_value_rejects_service_principal() {
        assert!(ServicePrincipalConfig::from_values(
            Some("client".into()),
            None,
            Some("tenant".into()),
        )
        .is_none());

        assert!(ServicePrincipalConfig::from_values(None, None, None).is_none());
    }

    #[test]
    fn empty_value_rejects_service_principal() {
        assert!(ServicePrincipalConfig::from_values(
            Some("client".into()),
            Some(String::new()),
            Some("tenant".into()),
        )
        .is_none());
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = ServicePrincipalConfig::from_values(
            Some("client".into()),
            Some("hunter2".into()),
            Some("tenant".into()),
        )
        .expect("should select service principal");

        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("****"));
    }

    // --- Fallback chain ---

    #[test]
    fn chain_returns_first_success() {
        let second_called = Rc::new(Cell::new(false));
        let flag = second_called.clone();

        let providers = vec![
            Provider::new(CredentialKind::AzureCli, || Ok(1u32)),
            Provider::new(CredentialKind::DeveloperTools, move || {
                flag.set(true);
                Ok(2u32)
            }),
        ];

        let (kind, value) = first_available(providers).expect("should resolve");
        assert_eq!(kind, CredentialKind::AzureCli);
        assert_eq!(value, 1);
        assert!(!second_called.get(), "later providers must not run");
    }

    #[test]
    fn chain_falls_back_on_construction_error() {
        let providers = vec![
            Provider::new(CredentialKind::AzureCli, || {
                Err(BoxError::from("az not installed"))
            }),
            Provider::new(CredentialKind::DeveloperTools, || Ok(2u32)),
        ];

        let (kind, value) = first_available(providers).expect("should fall back");
        assert_eq!(kind, CredentialKind::DeveloperTools);
        assert_eq!(value, 2);
    }

    #[test]
    fn exhausted_chain_is_an_auth_error() {
        let providers: Vec<Provider<u32>> = vec![
            Provider::new(CredentialKind::AzureCli, || {
                Err(BoxError::from("unavailable"))
            }),
            Provider::new(CredentialKind::DeveloperTools, || {
                Err(BoxError::from("also unavailable"))
            }),
        ];

        let err = first_available(providers).unwrap_err();
        assert!(matches!(err, AgentError::Auth(_)));
    }

    // --- Environment-driven resolution ---

    #[test]
    #[serial]
    fn env_with_service_principal_selects_it() {
        set_service_principal_env();

        let (_, kind) = resolve_credential().expect("should resolve");
        assert_eq!(kind, CredentialKind::ServicePrincipal);

        clear_service_principal_env();
    }

    #[test]
    #[serial]
    fn env_without_service_principal_falls_through() {
        clear_service_principal_env();

        let (_, kind) = resolve_credential().expect("should resolve");
        assert_ne!(kind, CredentialKind::ServicePrincipal);
    }

    #[test]
    #[serial]
    fn partial_service_principal_env_is_ignored() {
        clear_service_principal_env();
        std::env::set_var(CLIENT_ID_VAR, "client-only");

        let (_, kind) = resolve_credential().expect("should resolve");
        assert_ne!(kind, CredentialKind::ServicePrincipal);

        std::env::remove_var(CLIENT_ID_VAR);
    }

    #[test]
    fn credential_kind_display() {
        assert_eq!(CredentialKind::ServicePrincipal.to_string(), "service principal");
        assert_eq!(CredentialKind::AzureCli.to_string(), "Azure CLI");
        assert_eq!(CredentialKind::DeveloperTools.to_string(), "developer tools");
    }
}
