#![cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use passage_client::{
    CapabilityError, CeremonyClient, CeremonyConfig, CeremonyKind, CeremonyRequest,
    CredentialCapability, CredentialValue, Transport, TransportError, TransportResponse,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::sync::Barrier;

/// A relying party that derives each challenge from the username in the
/// form and reads the username back out of the submitted `rawId`.
///
/// Responses depend only on the request, never on arrival order.
struct UsernameRelyingParty;

#[async_trait]
impl Transport for UsernameRelyingParty {
    async fn post_json(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<TransportResponse, TransportError> {
        tokio::task::yield_now().await;

        let response = match path {
            "/webauthn/register" | "/webauthn/login" => {
                let username = body["username"].as_str().unwrap_or_default();
                let token = passage_codec::encode(username);
                json!({
                    "challenge": token,
                    "user": { "id": token, "name": username },
                    "allowCredentials": []
                })
            }
            "/webauthn/response" => {
                let username = body["rawId"]
                    .as_str()
                    .and_then(|token| passage_codec::decode(token).ok())
                    .and_then(|bytes| String::from_utf8(bytes).ok())
                    .unwrap_or_default();
                json!({ "status": "ok", "username": username })
            }
            _ => return Ok(TransportResponse::new(404, "")),
        };

        Ok(TransportResponse::json(200, &response))
    }

    async fn get(&self, _path: &str) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse::new(404, ""))
    }
}

/// Answers every request with a credential whose `rawId` is the challenge,
/// but only once two ceremonies are waiting on it at the same time.
struct RendezvousCapability {
    barrier: Barrier,
    challenges: Mutex<Vec<(CeremonyKind, Vec<u8>)>>,
}

impl RendezvousCapability {
    fn new() -> Self {
        Self {
            barrier: Barrier::new(2),
            challenges: Mutex::new(Vec::new()),
        }
    }

    async fn answer(&self, request: CeremonyRequest) -> Result<CredentialValue, CapabilityError> {
        let challenge = request.challenge().unwrap_or_default().to_vec();
        self.challenges
            .lock()
            .expect("challenges lock poisoned")
            .push((request.kind(), challenge.clone()));

        self.barrier.wait().await;

        Ok([
            ("rawId", CredentialValue::Bytes(challenge)),
            ("type", CredentialValue::from("public-key")),
        ]
        .into_iter()
        .collect())
    }
}

#[async_trait]
impl CredentialCapability for RendezvousCapability {
    async fn create(&self, request: CeremonyRequest) -> Result<CredentialValue, CapabilityError> {
        self.answer(request).await
    }

    async fn get(&self, request: CeremonyRequest) -> Result<CredentialValue, CapabilityError> {
        self.answer(request).await
    }
}

#[test_log::test(tokio::test)]
async fn it_keeps_concurrent_ceremonies_apart() -> Result<()> {
    let client = CeremonyClient::new(
        CeremonyConfig::default(),
        UsernameRelyingParty,
        RendezvousCapability::new(),
    );

    let alice = json!({ "username": "alice" });
    let bob = json!({ "username": "bob" });
    let (alice, bob) = tokio::join!(client.register(&alice), client.login(&bob));

    assert_eq!(alice?.into_body(), json!({ "status": "ok", "username": "alice" }));
    assert_eq!(bob?.into_body(), json!({ "status": "ok", "username": "bob" }));

    let mut challenges = client
        .capability()
        .challenges
        .lock()
        .expect("challenges lock poisoned")
        .clone();
    challenges.sort_by(|a, b| a.1.cmp(&b.1));
    assert_eq!(
        challenges,
        vec![
            (CeremonyKind::Registration, b"alice".to_vec()),
            (CeremonyKind::Authentication, b"bob".to_vec()),
        ]
    );
    Ok(())
}
