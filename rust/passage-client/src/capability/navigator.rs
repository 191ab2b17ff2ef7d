//! `navigator.credentials` as a [`CredentialCapability`].
//!
//! Requests are converted to JS values with every byte buffer as a
//! `Uint8Array`. Credentials coming back are walked generically: any
//! `ArrayBuffer` or `ArrayBuffer` view becomes bytes, arrays become
//! sequences, and objects become records over their enumerable keys,
//! including the ones a `PublicKeyCredential` inherits from its prototype
//! chain. Methods such as `getClientExtensionResults` are skipped.

use async_trait::async_trait;
use indexmap::IndexMap;
use js_sys::{Array, ArrayBuffer, Function, Object, Promise, Reflect, Uint8Array};
use serde_json::Number;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::{CapabilityError, CeremonyRequest, CredentialCapability, CredentialValue};

/// `Number.MAX_SAFE_INTEGER`
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// The browser's Web Authentication API.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigatorCredentials;

impl NavigatorCredentials {
    /// Use the `navigator.credentials` of the current global scope.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl CredentialCapability for NavigatorCredentials {
    async fn create(&self, request: CeremonyRequest) -> Result<CredentialValue, CapabilityError> {
        invoke("create", request).await
    }

    async fn get(&self, request: CeremonyRequest) -> Result<CredentialValue, CapabilityError> {
        invoke("get", request).await
    }
}

/// Call `navigator.credentials[operation]({ publicKey })`.
async fn invoke(
    operation: &str,
    request: CeremonyRequest,
) -> Result<CredentialValue, CapabilityError> {
    let options = Object::new();
    let public_key = to_js(request.options())?;
    Reflect::set(&options, &JsValue::from_str("publicKey"), &public_key).map_err(js_error)?;

    let credentials = credentials_container()?;
    let function: Function = Reflect::get(&credentials, &JsValue::from_str(operation))
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| {
            CapabilityError::not_supported(format!("navigator.credentials.{operation} is missing"))
        })?;
    let promise: Promise = function
        .call1(&credentials, &options)
        .map_err(js_error)?
        .unchecked_into();
    let credential = JsFuture::from(promise).await.map_err(js_error)?;

    Ok(from_js(&credential))
}

/// Get `navigator.credentials`.
fn credentials_container() -> Result<JsValue, CapabilityError> {
    let global = js_sys::global();
    let navigator = Reflect::get(&global, &JsValue::from_str("navigator"))
        .map_err(|_| CapabilityError::not_supported("navigator not found"))?;
    if navigator.is_undefined() {
        return Err(CapabilityError::not_supported("navigator is undefined"));
    }
    let credentials = Reflect::get(&navigator, &JsValue::from_str("credentials"))
        .map_err(|_| CapabilityError::not_supported("credentials not found"))?;
    if credentials.is_undefined() {
        return Err(CapabilityError::not_supported(
            "navigator.credentials is undefined",
        ));
    }
    Ok(credentials)
}

/// Carry a rejected promise (usually a `DOMException`) over as-is.
fn js_error(error: JsValue) -> CapabilityError {
    let name = Reflect::get(&error, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
        .unwrap_or_else(|| "Error".to_owned());
    let message = Reflect::get(&error, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{error:?}"));
    CapabilityError::new(name, message)
}

fn to_js(value: &CredentialValue) -> Result<JsValue, CapabilityError> {
    Ok(match value {
        CredentialValue::Null => JsValue::NULL,
        CredentialValue::Bool(value) => JsValue::from_bool(*value),
        CredentialValue::Number(value) => JsValue::from_f64(value.as_f64().unwrap_or(f64::NAN)),
        CredentialValue::String(value) => JsValue::from_str(value),
        CredentialValue::Bytes(bytes) => Uint8Array::from(bytes.as_slice()).into(),
        CredentialValue::Sequence(items) => {
            let array = Array::new();
            for item in items {
                array.push(&to_js(item)?);
            }
            array.into()
        }
        CredentialValue::Record(entries) => {
            let object = Object::new();
            for (key, value) in entries {
                Reflect::set(&object, &JsValue::from_str(key), &to_js(value)?)
                    .map_err(js_error)?;
            }
            object.into()
        }
    })
}

fn from_js(value: &JsValue) -> CredentialValue {
    if value.is_null() || value.is_undefined() {
        CredentialValue::Null
    } else if let Some(value) = value.as_bool() {
        CredentialValue::Bool(value)
    } else if let Some(value) = value.as_f64() {
        if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
            CredentialValue::Number(Number::from(value as i64))
        } else {
            Number::from_f64(value)
                .map(CredentialValue::Number)
                .unwrap_or(CredentialValue::Null)
        }
    } else if let Some(value) = value.as_string() {
        CredentialValue::String(value)
    } else if value.is_instance_of::<ArrayBuffer>() {
        CredentialValue::Bytes(Uint8Array::new(value).to_vec())
    } else if ArrayBuffer::is_view(value) {
        CredentialValue::Bytes(view_bytes(value))
    } else if Array::is_array(value) {
        CredentialValue::Sequence(
            Array::from(value)
                .iter()
                .map(|item| from_js(&item))
                .collect(),
        )
    } else if value.is_object() && !value.is_function() {
        CredentialValue::Record(enumerable_entries(value))
    } else {
        CredentialValue::Null
    }
}

/// Copy exactly the window a typed array or `DataView` exposes.
fn view_bytes(view: &JsValue) -> Vec<u8> {
    let number = |key: &str| {
        Reflect::get(view, &JsValue::from_str(key))
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0) as u32
    };
    let Ok(buffer) = Reflect::get(view, &JsValue::from_str("buffer")) else {
        return Vec::new();
    };
    Uint8Array::new_with_byte_offset_and_length(&buffer, number("byteOffset"), number("byteLength"))
        .to_vec()
}

fn enumerable_entries(object: &JsValue) -> IndexMap<String, CredentialValue> {
    let mut entries = IndexMap::new();
    let object_prototype: JsValue = Object::get_prototype_of(&Object::new()).into();
    let mut layer = object.clone();

    while layer.is_object() && layer != object_prototype {
        for key in Object::keys(layer.unchecked_ref::<Object>()).iter() {
            let Some(name) = key.as_string() else {
                continue;
            };
            if entries.contains_key(&name) {
                continue;
            }
            // Read through the original object so prototype getters see the
            // right receiver
            let Ok(field) = Reflect::get(object, &key) else {
                continue;
            };
            if field.is_function() {
                continue;
            }
            entries.insert(name, from_js(&field));
        }
        layer = Object::get_prototype_of(&layer).into();
    }

    entries
}
