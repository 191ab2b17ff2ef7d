use serde::{Deserialize, Serialize};

/// Where the relying party's ceremony endpoints live.
///
/// Every endpoint path is `path_prefix` followed by the endpoint segment. The
/// serialized form uses the option names of the browser-side WebAuthn client
/// (`pathPrefix`, `credentialEndpoint`, ...) and any option left out keeps its
/// default.
///
/// ```rust
/// use passage_client::CeremonyConfig;
///
/// let config: CeremonyConfig = serde_json::from_str(r#"{ "pathPrefix": "/auth" }"#).unwrap();
/// assert_eq!(config.credential_path(), "/auth/register");
/// assert_eq!(config.logout_path(), "/auth/logout");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CeremonyConfig {
    /// Root path segment every endpoint is mounted under (default: `/webauthn`)
    pub path_prefix: String,

    /// Issues registration challenges (default: `/register`)
    pub credential_endpoint: String,

    /// Issues authentication challenges (default: `/login`)
    pub assertion_endpoint: String,

    /// Accepts the credential produced by either ceremony (default: `/response`)
    pub challenge_endpoint: String,

    /// Ends the session (default: `/logout`)
    pub logout_endpoint: String,
}

impl Default for CeremonyConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/webauthn".to_string(),
            credential_endpoint: "/register".to_string(),
            assertion_endpoint: "/login".to_string(),
            challenge_endpoint: "/response".to_string(),
            logout_endpoint: "/logout".to_string(),
        }
    }
}

impl CeremonyConfig {
    /// Create a configuration with every endpoint at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root path segment
    pub fn with_path_prefix(mut self, path_prefix: impl Into<String>) -> Self {
        self.path_prefix = path_prefix.into();
        self
    }

    /// Set the registration challenge endpoint
    pub fn with_credential_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.credential_endpoint = endpoint.into();
        self
    }

    /// Set the authentication challenge endpoint
    pub fn with_assertion_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.assertion_endpoint = endpoint.into();
        self
    }

    /// Set the credential submission endpoint
    pub fn with_challenge_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.challenge_endpoint = endpoint.into();
        self
    }

    /// Set the logout endpoint
    pub fn with_logout_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.logout_endpoint = endpoint.into();
        self
    }

    /// Full path of the registration challenge endpoint
    pub fn credential_path(&self) -> String {
        format!("{}{}", self.path_prefix, self.credential_endpoint)
    }

    /// Full path of the authentication challenge endpoint
    pub fn assertion_path(&self) -> String {
        format!("{}{}", self.path_prefix, self.assertion_endpoint)
    }

    /// Full path of the credential submission endpoint
    pub fn challenge_path(&self) -> String {
        format!("{}{}", self.path_prefix, self.challenge_endpoint)
    }

    /// Full path of the logout endpoint
    pub fn logout_path(&self) -> String {
        format!("{}{}", self.path_prefix, self.logout_endpoint)
    }
}
