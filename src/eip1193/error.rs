use ethers::providers::{JsonRpcError, ProviderError, RpcError};
use gloo_utils::format::JsValueSerdeExt;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Error, Debug)]
/// Error thrown by the injected wallet transport
pub enum Eip1193Error {
    /// A JS exception that is not a JSON-RPC error object
    #[error("JsValue error: {0}")]
    JsValueError(String),

    /// Thrown if no window.ethereum is found in DOM
    #[error("No ethereum found")]
    JsNoEthereum,

    #[error(transparent)]
    /// The wallet answered with a JSON-RPC error, e.g. code 4001 when the user rejects
    JsonRpcError(#[from] JsonRpcError),

    #[error(transparent)]
    /// Serde JSON Error
    SerdeJson(#[from] serde_json::Error),

    #[error("Communication error")]
    CommunicationError,
}

impl Eip1193Error {
    /// What the wallet said, without the JSON-RPC framing around it.
    pub fn user_message(&self) -> String {
        match self {
            Eip1193Error::JsonRpcError(e) => e.message.clone(),
            Eip1193Error::JsValueError(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Rebuilds a JSON-RPC error from a thrown JS `Error`.
    ///
    /// `message` is not an enumerable property, so serializing the object
    /// loses it. Objects without a numeric `code` stay plain JS errors.
    fn from_js_error(error: &js_sys::Error) -> Self {
        let message = String::from(error.message());
        let code = js_sys::Reflect::get(error, &JsValue::from_str("code"))
            .ok()
            .and_then(|code| code.as_f64());

        match code {
            Some(code) => JsonRpcError { code: code as i64, message, data: None }.into(),
            None => Eip1193Error::JsValueError(message),
        }
    }
}

impl RpcError for Eip1193Error {
    fn as_error_response(&self) -> Option<&JsonRpcError> {
        if let Eip1193Error::JsonRpcError(e) = self {
            Some(e)
        } else {
            None
        }
    }

    fn is_error_response(&self) -> bool {
        matches!(self, Eip1193Error::JsonRpcError(_))
    }

    fn as_serde_error(&self) -> Option<&serde_json::Error> {
        if let Eip1193Error::SerdeJson(e) = self {
            Some(e)
        } else {
            None
        }
    }

    fn is_serde_error(&self) -> bool {
        matches!(self, Eip1193Error::SerdeJson(_))
    }
}

impl From<JsValue> for Eip1193Error {
    fn from(thrown: JsValue) -> Self {
        if let Some(error) = thrown.dyn_ref::<js_sys::Error>() {
            return Self::from_js_error(error);
        }
        match thrown.into_serde::<JsonRpcError>() {
            Ok(response) => response.into(),
            Err(_) => Eip1193Error::JsValueError(format!("{thrown:?}")),
        }
    }
}

impl From<Eip1193Error> for ProviderError {
    fn from(src: Eip1193Error) -> Self {
        ProviderError::JsonRpcClientError(Box::new(src))
    }
}
