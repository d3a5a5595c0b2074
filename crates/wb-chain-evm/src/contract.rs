use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use futures::FutureExt;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;
use wb_api_types::{ContractAddress, NewWaveEvent, RawWave, TxHash, TxReceipt};
use wb_chain_client::{
    ChainError, ChainResult, EventRegistry, Listener, Subscription, TxOverrides, WaveContract,
};

use crate::EvmOptions;
use crate::abi;
use crate::rpc::{self, CallRequest, Eip1193, RpcReceipt, Runtime};
use crate::watcher::{self, NewWaveWatcher};

/// WavePortal binding that signs through the wallet behind `T`.
pub struct EvmWaveContract<T, R> {
    transport: Rc<T>,
    runtime: Rc<R>,
    options: EvmOptions,
    address: ContractAddress,
    target: Address,
    events: EventRegistry<NewWaveEvent>,
    watching: Rc<Cell<bool>>,
}

impl<T, R> EvmWaveContract<T, R>
where
    T: Eip1193 + 'static,
    R: Runtime + 'static,
{
    pub fn new(
        transport: Rc<T>,
        runtime: Rc<R>,
        options: EvmOptions,
        address: &ContractAddress,
    ) -> ChainResult<Self> {
        let target = address
            .0
            .parse::<Address>()
            .map_err(|_| ChainError::InvalidAddress(address.0.clone()))?;

        Ok(Self {
            transport,
            runtime,
            options,
            address: address.clone(),
            target,
            events: EventRegistry::new(),
            watching: Rc::new(Cell::new(false)),
        })
    }

    /// Whether a `NewWave` poll task is running for this binding.
    pub fn is_watching(&self) -> bool {
        self.watching.get()
    }

    async fn eth_call(&self, data: Vec<u8>) -> ChainResult<Bytes> {
        let request = CallRequest {
            from: None,
            to: self.target,
            data: Bytes::from(data),
            gas: None,
        };
        rpc::call(
            &*self.transport,
            "eth_call",
            json!([rpc::to_params(request)?, "latest"]),
        )
        .await
    }

    /// The wallet's first authorized account.
    async fn signer(&self) -> ChainResult<Address> {
        let accounts: Vec<String> = rpc::call(&*self.transport, "eth_accounts", json!([])).await?;
        let first = accounts.into_iter().next().ok_or(ChainError::NoAccounts)?;
        first
            .parse::<Address>()
            .map_err(|_| ChainError::Decode(format!("wallet account '{first}' is not an address")))
    }
}

#[async_trait(?Send)]
impl<T, R> WaveContract for EvmWaveContract<T, R>
where
    T: Eip1193 + 'static,
    R: Runtime + 'static,
{
    fn address(&self) -> &ContractAddress {
        &self.address
    }

    async fn get_all_waves(&self) -> ChainResult<Vec<RawWave>> {
        let data = self.eth_call(abi::encode_get_all_waves()).await?;
        abi::decode_all_waves(&data)
    }

    async fn get_total_waves(&self) -> ChainResult<u64> {
        let data = self.eth_call(abi::encode_get_total_waves()).await?;
        abi::decode_total_waves(&data)
    }

    async fn wave(&self, message: &str, overrides: TxOverrides) -> ChainResult<TxHash> {
        let request = CallRequest {
            from: Some(self.signer().await?),
            to: self.target,
            data: Bytes::from(abi::encode_wave(message)),
            gas: overrides.gas_limit.map(rpc::quantity),
        };
        let hash: String = rpc::call(
            &*self.transport,
            "eth_sendTransaction",
            json!([rpc::to_params(request)?]),
        )
        .await?;
        Ok(TxHash(hash))
    }

    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> ChainResult<TxReceipt> {
        loop {
            let receipt: Option<RpcReceipt> = rpc::call(
                &*self.transport,
                "eth_getTransactionReceipt",
                json!([tx_hash.0]),
            )
            .await?;

            if let Some(receipt) = receipt {
                // pre-Byzantium receipts carry no status
                let success = match receipt.status.as_deref() {
                    Some(status) => rpc::parse_quantity(status)? == 1,
                    None => true,
                };
                if !success {
                    return Err(ChainError::Reverted(tx_hash.clone()));
                }
                let block_number = receipt
                    .block_number
                    .as_deref()
                    .map(rpc::parse_quantity)
                    .transpose()?;
                return Ok(TxReceipt {
                    tx_hash: TxHash(receipt.transaction_hash),
                    block_number,
                    success,
                });
            }

            debug!(tx = %tx_hash, "receipt pending");
            self.runtime.sleep(self.options.receipt_poll_interval).await;
        }
    }

    fn on_new_wave(&self, listener: Listener<NewWaveEvent>) -> Subscription {
        let subscription = self.events.on(listener);
        if !self.watching.replace(true) {
            let watcher = NewWaveWatcher::new(Rc::clone(&self.transport), self.target);
            let task = watcher::run(
                watcher,
                self.events.clone(),
                Rc::clone(&self.runtime),
                self.options.event_poll_interval,
                Rc::clone(&self.watching),
            );
            self.runtime.spawn(task.boxed_local());
        }
        subscription
    }
}
