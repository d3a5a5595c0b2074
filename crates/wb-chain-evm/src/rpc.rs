//! EIP-1193 transport seam and the JSON-RPC shapes the binding exchanges over it.

use alloy_primitives::{Address, B256, Bytes};
use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use wb_chain_client::{ChainError, ChainResult};

/// `provider.request({ method, params })` of an injected wallet.
#[async_trait(?Send)]
pub trait Eip1193 {
    async fn request(&self, method: &str, params: Value) -> ChainResult<Value>;
}

/// Task spawning and timers of the host event loop.
pub trait Runtime {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogFilter {
    pub address: Address,
    pub topics: Vec<B256>,
    pub from_block: String,
    pub to_block: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcLog {
    pub topics: Vec<B256>,
    pub data: Bytes,
    #[serde(default)]
    pub removed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Issues `method` and deserializes its result.
pub(crate) async fn call<T, R>(transport: &T, method: &str, params: Value) -> ChainResult<R>
where
    T: Eip1193 + ?Sized,
    R: DeserializeOwned,
{
    let value = transport.request(method, params).await?;
    serde_json::from_value(value).map_err(|err| ChainError::Decode(format!("{method}: {err}")))
}

pub(crate) fn to_params<S: Serialize>(value: S) -> ChainResult<Value> {
    serde_json::to_value(value).map_err(|err| ChainError::Decode(format!("params: {err}")))
}

pub(crate) fn quantity(value: u64) -> String {
    format!("{value:#x}")
}

pub(crate) fn parse_quantity(raw: &str) -> ChainResult<u64> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::Decode(format!("quantity '{raw}' lacks 0x prefix")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|err| ChainError::Decode(format!("quantity '{raw}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_are_prefixed_hex() {
        assert_eq!(quantity(300_000), "0x493e0");
        assert_eq!(quantity(0), "0x0");
        assert_eq!(parse_quantity("0x493e0").unwrap(), 300_000);
        assert!(parse_quantity("493e0").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn call_request_omits_unset_fields() {
        let request = CallRequest {
            from: None,
            to: Address::ZERO,
            data: Bytes::from(vec![0xde, 0xad]),
            gas: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["data"], "0xdead");
        assert!(json.get("from").is_none());
        assert!(json.get("gas").is_none());
    }

    #[test]
    fn receipt_tolerates_missing_status() {
        let receipt: RpcReceipt = serde_json::from_value(serde_json::json!({
            "transactionHash": "0x01",
            "blockNumber": "0x10",
        }))
        .unwrap();
        assert_eq!(receipt.block_number.as_deref(), Some("0x10"));
        assert!(receipt.status.is_none());
    }
}
