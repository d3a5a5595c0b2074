use async_trait::async_trait;
use thiserror::Error;
use wb_api_types::{
    ContractAddress, NewWaveEvent, RawWave, TxHash, TxReceipt, WalletAddress, WaveDecodeError,
};

mod events;

pub use events::{EventRegistry, Listener, Subscription};

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("wallet returned no authorized accounts")]
    NoAccounts,

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid contract address: {0}")]
    InvalidAddress(String),

    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error(transparent)]
    Wave(#[from] WaveDecodeError),
}

pub type ChainResult<T> = Result<T, ChainError>;

/// Per-transaction settings that bypass the wallet's own estimation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOverrides {
    pub gas_limit: Option<u64>,
}

/// Account access brokered by an injected wallet.
#[async_trait(?Send)]
pub trait WalletProvider {
    type Contract: WaveContract;

    /// Accounts the wallet has already authorized for this page, without prompting.
    async fn accounts(&self) -> ChainResult<Vec<WalletAddress>>;

    /// Prompts the user to authorize account access.
    async fn request_accounts(&self) -> ChainResult<Vec<WalletAddress>>;

    /// Builds a binding to the wave contract deployed at `address`, signing with this wallet.
    fn contract(&self, address: &ContractAddress) -> ChainResult<Self::Contract>;
}

#[async_trait(?Send)]
pub trait WaveContract {
    fn address(&self) -> &ContractAddress;
    async fn get_all_waves(&self) -> ChainResult<Vec<RawWave>>;
    async fn get_total_waves(&self) -> ChainResult<u64>;
    async fn wave(&self, message: &str, overrides: TxOverrides) -> ChainResult<TxHash>;

    /// Resolves once the transaction is mined. Never times out.
    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> ChainResult<TxReceipt>;

    /// Registers `listener` for `NewWave` notifications until the returned guard is dropped.
    fn on_new_wave(&self, listener: Listener<NewWaveEvent>) -> Subscription;
}
