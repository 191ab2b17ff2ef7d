#![allow(dead_code)]

use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use passage_client::{
    CapabilityError, CeremonyRequest, CredentialCapability, CredentialValue, Transport,
    TransportError, TransportResponse,
};
use serde_json::Value;

/// One request the ceremony client made.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Post { path: String, body: Value },
    Get { path: String },
}

/// A transport that answers from a queue and records every request.
///
/// Running out of answers is a transport failure.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    answers: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, status: u16, body: Value) -> Self {
        self.push(Ok(TransportResponse::json(status, &body)))
    }

    pub fn answer_raw(self, status: u16, body: &str) -> Self {
        self.push(Ok(TransportResponse::new(status, body)))
    }

    pub fn fail(self, reason: &str) -> Self {
        self.push(Err(TransportError::RequestFailed {
            path: String::new(),
            reason: reason.to_string(),
        }))
    }

    fn push(self, answer: Result<TransportResponse, TransportError>) -> Self {
        self.answers
            .lock()
            .expect("answers lock poisoned")
            .push_back(answer);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }

    fn next(&self, recorded: Recorded) -> Result<TransportResponse, TransportError> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(recorded);
        self.answers
            .lock()
            .expect("answers lock poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::RequestFailed {
                    path: String::new(),
                    reason: "no scripted answer left".into(),
                })
            })
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Transport for ScriptedTransport {
    async fn post_json(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<TransportResponse, TransportError> {
        self.next(Recorded::Post {
            path: path.to_string(),
            body: body.clone(),
        })
    }

    async fn get(&self, path: &str) -> Result<TransportResponse, TransportError> {
        self.next(Recorded::Get {
            path: path.to_string(),
        })
    }
}

/// Which capability operation was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
}

/// A capability that always produces the same outcome and records what it
/// was asked for.
#[derive(Debug)]
pub struct MockCapability {
    outcome: Result<CredentialValue, CapabilityError>,
    calls: Mutex<Vec<(Operation, CeremonyRequest)>>,
}

impl MockCapability {
    pub fn producing(credential: CredentialValue) -> Self {
        Self {
            outcome: Ok(credential),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CapabilityError) -> Self {
        Self {
            outcome: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Operation, CeremonyRequest)> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    fn invoke(
        &self,
        operation: Operation,
        request: CeremonyRequest,
    ) -> Result<CredentialValue, CapabilityError> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push((operation, request));
        self.outcome.clone()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl CredentialCapability for MockCapability {
    async fn create(&self, request: CeremonyRequest) -> Result<CredentialValue, CapabilityError> {
        self.invoke(Operation::Create, request)
    }

    async fn get(&self, request: CeremonyRequest) -> Result<CredentialValue, CapabilityError> {
        self.invoke(Operation::Get, request)
    }
}

/// A `PublicKeyCredential`-shaped tree with binary fields at two depths.
///
/// Encoded, `rawId` is `AQID`, `clientDataJSON` is `e30` and
/// `attestationObject` is `-_8`.
pub fn attestation_credential() -> CredentialValue {
    [
        ("id", CredentialValue::from("AQID")),
        ("rawId", CredentialValue::from(vec![1u8, 2, 3])),
        ("type", CredentialValue::from("public-key")),
        (
            "response",
            [
                ("clientDataJSON", CredentialValue::from(b"{}".to_vec())),
                ("attestationObject", CredentialValue::from(vec![0xfbu8, 0xff])),
            ]
            .into_iter()
            .collect(),
        ),
    ]
    .into_iter()
    .collect()
}
