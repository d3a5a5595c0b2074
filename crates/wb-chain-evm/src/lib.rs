//! EVM implementation of the wallet and contract seams, spoken over an
//! EIP-1193 provider (the object wallets inject as `window.ethereum`).

use async_trait::async_trait;
use serde_json::json;
use std::rc::Rc;
use std::time::Duration;
use wb_api_types::{ContractAddress, WalletAddress};
use wb_chain_client::{ChainResult, WalletProvider};

pub mod abi;
mod contract;
mod rpc;
mod watcher;

pub use contract::EvmWaveContract;
pub use rpc::{Eip1193, Runtime};
pub use watcher::{MAX_BLOCK_RANGE, NewWaveWatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvmOptions {
    pub receipt_poll_interval: Duration,
    pub event_poll_interval: Duration,
}

impl Default for EvmOptions {
    fn default() -> Self {
        Self {
            receipt_poll_interval: Duration::from_secs(1),
            event_poll_interval: Duration::from_secs(4),
        }
    }
}

pub struct EvmWallet<T, R> {
    transport: Rc<T>,
    runtime: Rc<R>,
    options: EvmOptions,
}

impl<T, R> Clone for EvmWallet<T, R> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            runtime: Rc::clone(&self.runtime),
            options: self.options,
        }
    }
}

impl<T, R> EvmWallet<T, R>
where
    T: Eip1193 + 'static,
    R: Runtime + 'static,
{
    pub fn new(transport: T, runtime: R, options: EvmOptions) -> Self {
        Self {
            transport: Rc::new(transport),
            runtime: Rc::new(runtime),
            options,
        }
    }

    async fn account_list(&self, method: &str) -> ChainResult<Vec<WalletAddress>> {
        let accounts: Vec<String> = rpc::call(&*self.transport, method, json!([])).await?;
        Ok(accounts.into_iter().map(WalletAddress).collect())
    }
}

#[async_trait(?Send)]
impl<T, R> WalletProvider for EvmWallet<T, R>
where
    T: Eip1193 + 'static,
    R: Runtime + 'static,
{
    type Contract = EvmWaveContract<T, R>;

    async fn accounts(&self) -> ChainResult<Vec<WalletAddress>> {
        self.account_list("eth_accounts").await
    }

    async fn request_accounts(&self) -> ChainResult<Vec<WalletAddress>> {
        self.account_list("eth_requestAccounts").await
    }

    fn contract(&self, address: &ContractAddress) -> ChainResult<Self::Contract> {
        EvmWaveContract::new(
            Rc::clone(&self.transport),
            Rc::clone(&self.runtime),
            self.options,
            address,
        )
    }
}
