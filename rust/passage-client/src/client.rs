//! The registration and login ceremonies.
//!
//! Both ceremonies make exactly two requests to the relying party and one
//! call into the credential capability, strictly in this order:
//!
//! ```text
//!  client                     relying party           capability
//!    |  POST form ----------------> |                        |
//!    |  <------- challenge (JSON)   |                        |
//!    |  decode tokens               |                        |
//!    |  create / get --------------------------------------> |
//!    |  <-------------------------------------- credential   |
//!    |  encode bytes                |                        |
//!    |  POST credential ----------> |                        |
//!    |  <---------- { status }      |                        |
//! ```
//!
//! The first failing step ends the ceremony; nothing is retried.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    CeremonyConfig, CeremonyError, CeremonyKind, CredentialCapability, Transport,
    TransportResponse,
};

/// HTTP 403, answered when the relying party will not issue a challenge.
const FORBIDDEN: u16 = 403;

/// Statuses accepted from a challenge endpoint.
const CHALLENGE_SUCCESS: std::ops::RangeInclusive<u16> = 200..=205;

/// The only status accepted from the submission and logout endpoints.
const OK: u16 = 200;

/// How far a ceremony has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CeremonyStage {
    /// Fetching the challenge from the relying party
    Requesting,
    /// Decoding the challenge into a capability request
    Decoding,
    /// Waiting on the credential capability
    Invoking,
    /// Encoding the credential for transport
    Encoding,
    /// Submitting the credential to the relying party
    Submitting,
    /// The relying party accepted the credential
    Done,
    /// A step failed and the ceremony was abandoned
    Failed,
}

impl Display for CeremonyStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CeremonyStage::Requesting => "requesting",
            CeremonyStage::Decoding => "decoding",
            CeremonyStage::Invoking => "invoking",
            CeremonyStage::Encoding => "encoding",
            CeremonyStage::Submitting => "submitting",
            CeremonyStage::Done => "done",
            CeremonyStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The relying party's verdict on a submitted credential.
#[derive(Debug, Clone, PartialEq)]
pub struct CeremonyResponse(Value);

impl CeremonyResponse {
    /// The `status` field of the verdict, if it has one.
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    /// True when the relying party answered `{ "status": "ok" }`.
    pub fn is_ok(&self) -> bool {
        self.status() == Some("ok")
    }

    /// The full response body.
    pub fn body(&self) -> &Value {
        &self.0
    }

    /// Take the full response body.
    pub fn into_body(self) -> Value {
        self.0
    }
}

/// Runs WebAuthn ceremonies against a relying party.
///
/// The client holds no per-ceremony state: any number of ceremonies may run
/// concurrently through a shared reference, each with its own challenge and
/// credential.
///
/// ```no_run
/// # #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
/// # async fn example() -> Result<(), passage_client::CeremonyError> {
/// use passage_client::{
///     CeremonyClient, CeremonyConfig, HttpTransport, HttpTransportConfig, NavigatorCredentials,
/// };
/// use serde_json::json;
///
/// let client = CeremonyClient::new(
///     CeremonyConfig::default(),
///     HttpTransport::new(HttpTransportConfig::new("https://example.com"))?,
///     NavigatorCredentials::new(),
/// );
///
/// let verdict = client
///     .register(&json!({ "username": "alice", "displayName": "Alice" }))
///     .await?;
/// assert!(verdict.is_ok());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CeremonyClient<T, C> {
    config: CeremonyConfig,
    transport: T,
    capability: C,
}

impl<T, C> CeremonyClient<T, C>
where
    T: Transport,
    C: CredentialCapability,
{
    /// Create a client from its endpoints and collaborators.
    pub fn new(config: CeremonyConfig, transport: T, capability: C) -> Self {
        Self {
            config,
            transport,
            capability,
        }
    }

    /// The endpoint configuration.
    pub fn config(&self) -> &CeremonyConfig {
        &self.config
    }

    /// The transport requests go through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The credential capability ceremonies invoke.
    pub fn capability(&self) -> &C {
        &self.capability
    }

    /// Register a new credential for the user described by `form`.
    ///
    /// Returns the relying party's verdict. Any failure is also logged at
    /// warn level together with the stage it happened in.
    #[instrument(skip_all, fields(ceremony = %CeremonyKind::Registration))]
    pub async fn register<F>(&self, form: &F) -> Result<CeremonyResponse, CeremonyError>
    where
        F: Serialize + ?Sized,
    {
        self.perform(CeremonyKind::Registration, form).await
    }

    /// Authenticate the user described by `form` with an existing credential.
    ///
    /// Returns the relying party's verdict. Any failure is also logged at
    /// warn level together with the stage it happened in.
    #[instrument(skip_all, fields(ceremony = %CeremonyKind::Authentication))]
    pub async fn login<F>(&self, form: &F) -> Result<CeremonyResponse, CeremonyError>
    where
        F: Serialize + ?Sized,
    {
        self.perform(CeremonyKind::Authentication, form).await
    }

    /// End the session. Any status other than 200 is an error.
    pub async fn logout(&self) -> Result<Value, CeremonyError> {
        let response = self.transport.get(&self.config.logout_path()).await?;
        expect_ok(&response)?;
        parse_body(&response)
    }

    /// Fetch registration options for `form`.
    pub async fn fetch_creation_challenge<F>(&self, form: &F) -> Result<Value, CeremonyError>
    where
        F: Serialize + ?Sized,
    {
        self.fetch_challenge(CeremonyKind::Registration, &to_body(form)?)
            .await
    }

    /// Fetch authentication options for `form`.
    pub async fn fetch_assertion_challenge<F>(&self, form: &F) -> Result<Value, CeremonyError>
    where
        F: Serialize + ?Sized,
    {
        self.fetch_challenge(CeremonyKind::Authentication, &to_body(form)?)
            .await
    }

    /// Submit an encoded credential and return the relying party's verdict.
    pub async fn submit_credential(
        &self,
        credential: &Value,
    ) -> Result<CeremonyResponse, CeremonyError> {
        let response = self
            .transport
            .post_json(&self.config.challenge_path(), credential)
            .await?;
        expect_ok(&response)?;
        parse_body(&response).map(CeremonyResponse)
    }

    async fn perform<F>(
        &self,
        kind: CeremonyKind,
        form: &F,
    ) -> Result<CeremonyResponse, CeremonyError>
    where
        F: Serialize + ?Sized,
    {
        let mut progress = Progress::new(kind);
        let result = self.advance(&mut progress, form).await;

        match &result {
            Ok(verdict) => debug!(
                ceremony = %kind,
                status = verdict.status().unwrap_or_default(),
                "Ceremony completed"
            ),
            Err(error) => {
                warn!(
                    ceremony = %kind,
                    stage = %progress.stage,
                    %error,
                    "Ceremony failed"
                );
                progress.enter(CeremonyStage::Failed);
            }
        }

        result
    }

    async fn advance<F>(
        &self,
        progress: &mut Progress,
        form: &F,
    ) -> Result<CeremonyResponse, CeremonyError>
    where
        F: Serialize + ?Sized,
    {
        let kind = progress.kind;

        progress.enter(CeremonyStage::Requesting);
        let descriptor = self.fetch_challenge(kind, &to_body(form)?).await?;

        progress.enter(CeremonyStage::Decoding);
        let request = kind.request_from_descriptor(descriptor)?;

        progress.enter(CeremonyStage::Invoking);
        let credential = match kind {
            CeremonyKind::Registration => self.capability.create(request).await?,
            CeremonyKind::Authentication => self.capability.get(request).await?,
        };

        progress.enter(CeremonyStage::Encoding);
        let credential = credential.into_json();

        progress.enter(CeremonyStage::Submitting);
        let verdict = self.submit_credential(&credential).await?;

        progress.enter(CeremonyStage::Done);
        Ok(verdict)
    }

    async fn fetch_challenge(
        &self,
        kind: CeremonyKind,
        form: &Value,
    ) -> Result<Value, CeremonyError> {
        let path = match kind {
            CeremonyKind::Registration => self.config.credential_path(),
            CeremonyKind::Authentication => self.config.assertion_path(),
        };
        let response = self.transport.post_json(&path, form).await?;
        let status = response.status();

        if status == FORBIDDEN {
            let message = response
                .parse::<Value>()
                .ok()
                .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_owned))
                .filter(|message| !message.is_empty());
            return Err(CeremonyError::PermissionDenied {
                ceremony: kind,
                message,
            });
        }

        if !CHALLENGE_SUCCESS.contains(&status) {
            return Err(CeremonyError::UnexpectedStatus { status });
        }

        parse_body(&response)
    }
}

struct Progress {
    kind: CeremonyKind,
    stage: CeremonyStage,
}

impl Progress {
    fn new(kind: CeremonyKind) -> Self {
        Self {
            kind,
            stage: CeremonyStage::Requesting,
        }
    }

    fn enter(&mut self, stage: CeremonyStage) {
        self.stage = stage;
        debug!(ceremony = %self.kind, %stage, "Ceremony advanced");
    }
}

fn to_body<F>(form: &F) -> Result<Value, CeremonyError>
where
    F: Serialize + ?Sized,
{
    serde_json::to_value(form)
        .map_err(|error| CeremonyError::InvalidRequestBody(error.to_string()))
}

fn expect_ok(response: &TransportResponse) -> Result<(), CeremonyError> {
    match response.status() {
        OK => Ok(()),
        status => Err(CeremonyError::UnexpectedStatus { status }),
    }
}

fn parse_body(response: &TransportResponse) -> Result<Value, CeremonyError> {
    response
        .parse()
        .map_err(|error| CeremonyError::InvalidResponse(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_reads_the_verdict_status() {
        let verdict = CeremonyResponse(json!({ "status": "ok" }));
        assert_eq!(verdict.status(), Some("ok"));
        assert!(verdict.is_ok());

        let verdict = CeremonyResponse(json!({ "status": "failed", "message": "bad signature" }));
        assert_eq!(verdict.status(), Some("failed"));
        assert!(!verdict.is_ok());
        assert_eq!(verdict.body()["message"], "bad signature");
    }

    #[test]
    fn it_tolerates_a_verdict_without_status() {
        let verdict = CeremonyResponse(json!([]));
        assert_eq!(verdict.status(), None);
        assert!(!verdict.is_ok());
        assert_eq!(verdict.into_body(), json!([]));
    }

    #[test]
    fn it_only_accepts_200_for_submission() {
        assert!(expect_ok(&TransportResponse::new(200, "{}")).is_ok());
        for status in [201, 204, 302, 400, 500] {
            assert_eq!(
                expect_ok(&TransportResponse::new(status, "{}")),
                Err(CeremonyError::UnexpectedStatus { status })
            );
        }
    }

    #[test]
    fn it_names_the_stages() {
        assert_eq!(CeremonyStage::Requesting.to_string(), "requesting");
        assert_eq!(CeremonyStage::Decoding.to_string(), "decoding");
        assert_eq!(CeremonyStage::Submitting.to_string(), "submitting");
        assert_eq!(CeremonyStage::Failed.to_string(), "failed");
    }

    #[test]
    fn it_rejects_a_body_that_is_not_json() {
        assert!(matches!(
            parse_body(&TransportResponse::new(200, "ok")),
            Err(CeremonyError::InvalidResponse(_))
        ));
    }

    #[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
    mod stages {
        use async_trait::async_trait;
        use serde_json::{Value, json};

        use crate::client::{CeremonyClient, CeremonyStage, Progress};
        use crate::{
            CapabilityError, CeremonyConfig, CeremonyError, CeremonyKind, CeremonyRequest,
            CredentialCapability, CredentialValue, Transport, TransportError, TransportResponse,
        };

        struct Answering(TransportResponse);

        #[async_trait]
        impl Transport for Answering {
            async fn post_json(
                &self,
                _path: &str,
                _body: &Value,
            ) -> Result<TransportResponse, TransportError> {
                Ok(self.0.clone())
            }

            async fn get(&self, _path: &str) -> Result<TransportResponse, TransportError> {
                Ok(self.0.clone())
            }
        }

        struct Refusing;

        #[async_trait]
        impl CredentialCapability for Refusing {
            async fn create(
                &self,
                _request: CeremonyRequest,
            ) -> Result<CredentialValue, CapabilityError> {
                Err(CapabilityError::new("NotAllowedError", "cancelled"))
            }

            async fn get(
                &self,
                _request: CeremonyRequest,
            ) -> Result<CredentialValue, CapabilityError> {
                Err(CapabilityError::new("NotAllowedError", "cancelled"))
            }
        }

        fn answering(body: Value) -> CeremonyClient<Answering, Refusing> {
            CeremonyClient::new(
                CeremonyConfig::default(),
                Answering(TransportResponse::json(200, &body)),
                Refusing,
            )
        }

        #[tokio::test]
        async fn it_stops_in_the_stage_that_failed_to_decode() {
            let client = answering(json!({ "challenge": 7 }));
            let mut progress = Progress::new(CeremonyKind::Authentication);

            let result = client.advance(&mut progress, &json!({})).await;

            assert!(matches!(result, Err(CeremonyError::MalformedChallenge(_))));
            assert_eq!(progress.stage, CeremonyStage::Decoding);
        }

        #[tokio::test]
        async fn it_stops_in_the_stage_that_invoked_the_capability() {
            let client = answering(json!({ "challenge": "QQ" }));
            let mut progress = Progress::new(CeremonyKind::Authentication);

            let result = client.advance(&mut progress, &json!({})).await;

            assert!(matches!(result, Err(CeremonyError::Capability(_))));
            assert_eq!(progress.stage, CeremonyStage::Invoking);
        }

        #[tokio::test]
        async fn it_stops_while_requesting_when_refused() {
            let client = CeremonyClient::new(
                CeremonyConfig::default(),
                Answering(TransportResponse::new(403, "{}")),
                Refusing,
            );
            let mut progress = Progress::new(CeremonyKind::Registration);

            let result = client.advance(&mut progress, &json!({})).await;

            assert!(matches!(
                result,
                Err(CeremonyError::PermissionDenied { message: None, .. })
            ));
            assert_eq!(progress.stage, CeremonyStage::Requesting);
        }
    }
}
