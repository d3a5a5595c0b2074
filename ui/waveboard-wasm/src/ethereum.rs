//! The injected `window.ethereum` provider as an [`Eip1193`] transport.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wb_chain_client::{ChainError, ChainResult};
use wb_chain_evm::Eip1193;

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type Ethereum;

    #[wasm_bindgen(catch, method)]
    async fn request(this: &Ethereum, args: JsValue) -> Result<JsValue, JsValue>;
}

#[derive(Serialize)]
struct RequestArguments<'a> {
    method: &'a str,
    params: Value,
}

/// `ProviderRpcError` shape thrown by wallets.
#[derive(Deserialize)]
struct ProviderRpcError {
    code: Option<i64>,
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InjectedProvider {
    ethereum: Ethereum,
}

impl InjectedProvider {
    /// `None` when the page has no wallet extension.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let value = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        Some(Self {
            ethereum: value.unchecked_into(),
        })
    }
}

#[async_trait(?Send)]
impl Eip1193 for InjectedProvider {
    async fn request(&self, method: &str, params: Value) -> ChainResult<Value> {
        debug!(method, "provider request");
        let args = RequestArguments { method, params }
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        let result = self.ethereum.request(args).await.map_err(provider_error)?;
        serde_wasm_bindgen::from_value(result).map_err(|e| ChainError::Decode(e.to_string()))
    }
}

fn provider_error(err: JsValue) -> ChainError {
    match serde_wasm_bindgen::from_value::<ProviderRpcError>(err.clone()) {
        Ok(ProviderRpcError {
            code: Some(code),
            message,
        }) => ChainError::Rpc {
            code,
            message: message.unwrap_or_default(),
        },
        Ok(ProviderRpcError {
            code: None,
            message: Some(message),
        }) => ChainError::Transport(message),
        _ => ChainError::Transport(format!("{err:?}")),
    }
}
