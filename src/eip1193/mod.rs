pub mod error;
pub mod ethereum;
pub mod request;

use crate::eip1193::{error::Eip1193Error, ethereum::InjectedProvider, request::Eip1193Request};
use async_trait::async_trait;
use ethers::providers::JsonRpcClient;
use futures::channel::oneshot;
use gloo_utils::format::JsValueSerdeExt;
use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;

#[derive(Debug, Clone)]
// The JS provider object is neither Send nor Sync, so it is never stored here.
// Every request looks `window.ethereum` up again.
pub struct Eip1193 {}

#[cfg_attr(target_arch = "wasm32", async_trait(? Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl JsonRpcClient for Eip1193 {
    type Error = Eip1193Error;

    /// Sends the request via `window.ethereum` in Js
    async fn request<T: Serialize + Send + Sync, R: DeserializeOwned + Send>(
        &self,
        method: &str,
        params: T,
    ) -> Result<R, Self::Error> {
        let (sender, receiver) = oneshot::channel();

        let m = method.to_string();
        debug!("eip1193 request {m}");

        let parsed_params = parse_params(params)?;
        spawn_local(async move {
            let res = match InjectedProvider::from_window() {
                Ok(provider) => {
                    match provider.request(Eip1193Request::new(m, parsed_params)).await {
                        Ok(r) => stringify(&r),
                        Err(e) => Err(e.into()),
                    }
                }
                Err(e) => Err(e),
            };
            _ = sender.send(res);
        });

        let res = receiver.await.map_err(|_| Eip1193Error::CommunicationError)?;
        Ok(serde_json::from_str(&res?)?)
    }
}

impl Default for Eip1193 {
    fn default() -> Self {
        Self::new()
    }
}

impl Eip1193 {
    pub fn new() -> Self {
        Eip1193 {}
    }

    /// True when the page carries an injected provider.
    pub fn is_available() -> bool {
        match InjectedProvider::from_window() {
            Ok(provider) => {
                debug!("Injected provider found, MetaMask: {:?}", provider.is_metamask());
                true
            }
            Err(_) => false,
        }
    }
}

fn stringify(value: &JsValue) -> Result<String, Eip1193Error> {
    // `undefined` results (e.g. wallet_addEthereumChain) are not valid JSON
    if value.is_undefined() {
        return Ok("null".to_string());
    }
    js_sys::JSON::stringify(value)?.as_string().ok_or(Eip1193Error::CommunicationError)
}

/// Converts request params into the JS array the provider expects.
///
/// MetaMask refuses zero-padded transaction types, so a `type` of `0x01`..`0x03`
/// on any param object is rewritten to `0x1`..`0x3`.
fn parse_params<T: Serialize + Send + Sync>(params: T) -> Result<JsValue, Eip1193Error> {
    let t_params = JsValue::from_serde(&params)?;
    if t_params.is_null() || t_params.is_undefined() {
        return Ok(js_sys::Array::new().into());
    }

    let typename = JsValue::from_str("type");
    let mut error = None;
    let params = js_sys::Array::from(&t_params).map(&mut |val, _, _| {
        let Some(object) = js_sys::Object::try_from(&val) else {
            return val;
        };
        let Some(tx_type) = js_sys::Reflect::get(object, &typename).ok().and_then(|t| t.as_string())
        else {
            return val;
        };
        let Some(normalized) = normalize_tx_type(&tx_type) else {
            return val;
        };
        if let Err(e) = js_sys::Reflect::set(object, &typename, &JsValue::from_str(normalized)) {
            error = Some(Eip1193Error::JsValueError(format!("{:?}", e)));
        }
        val
    });

    match error {
        Some(e) => Err(e),
        None => Ok(params.into()),
    }
}

fn normalize_tx_type(tx_type: &str) -> Option<&'static str> {
    match tx_type {
        "0x01" => Some("0x1"),
        "0x02" => Some("0x2"),
        "0x03" => Some("0x3"),
        _ => None,
    }
}


#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use serde_json::json;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    fn parse(params: serde_json::Value) -> js_sys::Array {
        parse_params(params).unwrap().dyn_into::<js_sys::Array>().unwrap()
    }

    #[wasm_bindgen_test]
    fn unit_params_become_an_empty_array() {
        let js_value = parse_params(()).unwrap();
        let js_array = js_value.dyn_into::<js_sys::Array>().unwrap();
        assert_eq!(js_array.length(), 0);
    }

    #[wasm_bindgen_test]
    fn switch_chain_params_pass_through() {
        let js_array = parse(json!([{ "chainId": "0x14a34" }]));
        assert_eq!(js_array.length(), 1);

        let chain_id = js_sys::Reflect::get(&js_array.get(0), &JsValue::from_str("chainId")).unwrap();
        assert_eq!(chain_id.as_string().unwrap(), "0x14a34");
    }

    #[wasm_bindgen_test]
    fn padded_transaction_type_is_rewritten() {
        for i in 1..4 {
            let js_array = parse(json!([{ "type": format!("0x0{i}"), "to": "0x0000000000000000000000000000000000000001" }]));
            assert_eq!(js_array.length(), 1);

            let tx_type = js_sys::Reflect::get(&js_array.get(0), &JsValue::from_str("type")).unwrap();
            assert_eq!(tx_type.as_string().unwrap(), format!("0x{i}"));
        }
    }
}
