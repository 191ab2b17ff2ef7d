//! Web bindings for the `passage-client` crate.
//!
//! Example usage in JavaScript:
//!
//! ```ignore
//! // This is JavaScript code that uses the WASM bindings, not a Rust doctest
//! import { WebAuthnClient, base64urlEncode } from "passage-client";
//!
//! let client = new WebAuthnClient({ pathPrefix: "/webauthn" });
//!
//! try {
//!   let verdict = await client.register({ username: "alice", displayName: "Alice" });
//!   console.log("Registered:", verdict.status);
//! } catch (error) {
//!   console.error(error);
//! }
//!
//! await client.login({ username: "alice" });
//! await client.logout();
//! ```

use std::rc::Rc;

use js_sys::{JSON, Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::{
    CeremonyClient, CeremonyConfig, CeremonyError, HttpTransport, HttpTransportConfig,
    NavigatorCredentials,
};

#[wasm_bindgen(typescript_custom_section)]
const CLIENT_INTERFACE: &'static str = r#"
/**
 * Endpoint options accepted by the `WebAuthnClient` constructor. Every
 * option is optional and falls back to its default.
 */
interface WebAuthnClientOptions {
  pathPrefix?: string,
  credentialEndpoint?: string,
  assertionEndpoint?: string,
  challengeEndpoint?: string,
  logoutEndpoint?: string
}

/**
 * The relying party's answer to a submitted credential.
 */
interface CeremonyVerdict {
  status: string,
  [key: string]: unknown
}
"#;

#[wasm_bindgen]
extern "C" {
    #[allow(missing_docs)]
    #[wasm_bindgen(typescript_type = "WebAuthnClientOptions")]
    pub type WebAuthnClientOptionsDuckType;
}

impl From<CeremonyError> for JsValue {
    fn from(value: CeremonyError) -> Self {
        js_sys::Error::new(&value.to_string()).into()
    }
}

/// Encode bytes as an unpadded base64url token.
#[wasm_bindgen(js_name = "base64urlEncode")]
pub fn base64url_encode(bytes: Vec<u8>) -> String {
    passage_codec::encode(bytes)
}

/// Decode an unpadded base64url token.
#[wasm_bindgen(js_name = "base64urlDecode")]
pub fn base64url_decode(token: String) -> Result<Vec<u8>, JsValue> {
    passage_codec::decode(token).map_err(|error| js_sys::Error::new(&error.to_string()).into())
}

/// Fill a buffer of `length` (default 32) random bytes.
#[wasm_bindgen(js_name = "generateRandomBuffer")]
pub fn generate_random_buffer(length: Option<usize>) -> Result<Vec<u8>, JsValue> {
    crate::generate_random_buffer(length)
        .map_err(|error| js_sys::Error::new(&error.to_string()).into())
}

/// Runs WebAuthn ceremonies against the relying party at `location.origin`
/// with `navigator.credentials`.
#[wasm_bindgen(js_name = "WebAuthnClient")]
pub struct WebAuthnClient {
    client: Rc<CeremonyClient<HttpTransport, NavigatorCredentials>>,
}

#[wasm_bindgen(js_class = "WebAuthnClient")]
impl WebAuthnClient {
    /// Create a client. Any endpoint option left out keeps its default.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<WebAuthnClientOptionsDuckType>) -> Result<WebAuthnClient, JsValue> {
        let config = match options {
            Some(options) => serde_json::from_value::<CeremonyConfig>(from_js(&options)?)
                .map_err(|error| js_sys::Error::new(&error.to_string()))?,
            None => CeremonyConfig::default(),
        };
        let transport = HttpTransport::new(HttpTransportConfig::new(location_origin()?))
            .map_err(CeremonyError::from)?;

        Ok(Self {
            client: Rc::new(CeremonyClient::new(
                config,
                transport,
                NavigatorCredentials::new(),
            )),
        })
    }

    /// Register a new credential for the user described by `form`.
    ///
    /// Resolves to the relying party's verdict and rejects with the reason
    /// the ceremony failed.
    pub fn register(&self, form: JsValue) -> Promise {
        let client = self.client.clone();

        future_to_promise(async move {
            let verdict = client.register(&from_js(&form)?).await?;
            to_js(verdict.body())
        })
    }

    /// Authenticate the user described by `form`.
    ///
    /// Resolves to the relying party's verdict and rejects with the reason
    /// the ceremony failed.
    pub fn login(&self, form: JsValue) -> Promise {
        let client = self.client.clone();

        future_to_promise(async move {
            let verdict = client.login(&from_js(&form)?).await?;
            to_js(verdict.body())
        })
    }

    /// End the session.
    pub fn logout(&self) -> Promise {
        let client = self.client.clone();

        future_to_promise(async move {
            let body = client.logout().await?;
            to_js(&body)
        })
    }
}

fn location_origin() -> Result<String, JsValue> {
    let location = Reflect::get(&js_sys::global(), &JsValue::from_str("location"))?;
    Reflect::get(&location, &JsValue::from_str("origin"))?
        .as_string()
        .ok_or_else(|| js_sys::Error::new("location.origin is not available").into())
}

fn from_js(value: &JsValue) -> Result<Value, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Object(Default::default()));
    }

    let json = JSON::stringify(value)?
        .as_string()
        .ok_or_else(|| js_sys::Error::new("Form is not representable as JSON"))?;
    serde_json::from_str(&json).map_err(|error| js_sys::Error::new(&error.to_string()).into())
}

fn to_js(value: &Value) -> Result<JsValue, JsValue> {
    JSON::parse(&value.to_string())
}
