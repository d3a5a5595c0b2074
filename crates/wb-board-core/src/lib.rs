//! The WaveBoard component: view state plus the operations the page
//! buttons trigger, proxied to a wallet-backed contract binding.
//!
//! Every operation logs and swallows its own failures. The only
//! user-visible error is the missing-wallet alert on `connect()`.

use serde::Serialize;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use thiserror::Error;
use tracing::{debug, info, warn};
use wb_api_types::{NewWaveEvent, WalletAddress, Wave};
use wb_chain_client::{
    ChainError, EventRegistry, Listener, Subscription, TxOverrides, WalletProvider, WaveContract,
};

mod config;

pub use config::{BoardConfig, DEFAULT_CONTRACT_ADDRESS, DEFAULT_GAS_LIMIT, DEFAULT_WAVE_MESSAGE};

pub const NO_WALLET_ALERT: &str = "Get MetaMask!";

/// User-facing alert sink (`window.alert` in the browser).
pub trait Notifier {
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardState {
    pub current_account: Option<WalletAddress>,
    pub waves: Vec<Wave>,
}

#[derive(Debug, Error)]
enum BoardError {
    #[error("no injected wallet provider")]
    NoProvider,

    #[error(transparent)]
    Chain(#[from] ChainError),
}

struct Mount<C> {
    subscription: Subscription,
    _contract: C,
}

pub struct WaveBoard<P: WalletProvider, N> {
    provider: Option<P>,
    notifier: N,
    config: BoardConfig,
    state: Rc<RefCell<BoardState>>,
    changes: EventRegistry<BoardState>,
    mounted: RefCell<Option<Mount<P::Contract>>>,
}

impl<P, N> WaveBoard<P, N>
where
    P: WalletProvider,
    N: Notifier,
{
    /// `provider` is `None` when the page has no injected wallet.
    pub fn new(provider: Option<P>, notifier: N, config: BoardConfig) -> Self {
        Self {
            provider,
            notifier,
            config,
            state: Rc::new(RefCell::new(BoardState::default())),
            changes: EventRegistry::new(),
            mounted: RefCell::new(None),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn state(&self) -> BoardState {
        self.state.borrow().clone()
    }

    pub fn current_account(&self) -> Option<WalletAddress> {
        self.state.borrow().current_account.clone()
    }

    pub fn waves(&self) -> Vec<Wave> {
        self.state.borrow().waves.clone()
    }

    /// Observes every state change until the guard is dropped.
    pub fn on_change(&self, listener: Listener<BoardState>) -> Subscription {
        self.changes.on(listener)
    }

    /// Adopts an account the wallet already authorized, then loads the list.
    pub async fn check_existing_session(&self) {
        let Some(provider) = &self.provider else {
            info!("no injected wallet provider; make sure a wallet such as MetaMask is installed");
            return;
        };
        debug!("found an injected wallet provider");

        let accounts = match provider.accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!("checking authorized accounts failed: {err}");
                return;
            }
        };
        let Some(account) = accounts.into_iter().next() else {
            info!("no authorized account found");
            return;
        };

        info!(%account, "found an authorized account");
        update(&self.state, &self.changes, |state| {
            state.current_account = Some(account);
        });
        self.fetch_all_waves().await;
    }

    pub async fn connect(&self) {
        let Some(provider) = &self.provider else {
            self.notifier.alert(NO_WALLET_ALERT);
            return;
        };

        match provider.request_accounts().await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) => {
                    info!(%account, "connected");
                    update(&self.state, &self.changes, |state| {
                        state.current_account = Some(account);
                    });
                }
                None => warn!("wallet granted no accounts"),
            },
            Err(err) => warn!("connecting wallet failed: {err}"),
        }
    }

    /// Replaces the list with the contract's full history.
    pub async fn fetch_all_waves(&self) {
        report("fetching waves", self.try_fetch_all_waves().await);
    }

    /// Logs the contract's wave count. Leaves the view untouched.
    pub async fn fetch_total_count(&self) {
        report("fetching total wave count", self.try_fetch_total_count().await);
    }

    /// Sends a wave and waits, without timeout, for it to be mined.
    pub async fn submit_wave(&self) {
        report("waving", self.try_submit_wave().await);
    }

    /// Starts appending `NewWave` notifications to the list. No-op when already mounted.
    pub fn mount(&self) {
        if self.mounted.borrow().is_some() {
            return;
        }

        let contract = match self.binding() {
            Ok(contract) => contract,
            Err(BoardError::NoProvider) => {
                debug!("no injected wallet provider; live updates disabled");
                return;
            }
            Err(err) => {
                warn!("subscribing to NewWave failed: {err}");
                return;
            }
        };

        let subscription = contract.on_new_wave(self.new_wave_listener());
        info!(contract = %contract.address(), "subscribed to NewWave");
        *self.mounted.borrow_mut() = Some(Mount {
            subscription,
            _contract: contract,
        });
    }

    /// Deregisters the `NewWave` listener. Later notifications change nothing.
    pub fn unmount(&self) {
        let mount = self.mounted.borrow_mut().take();
        if let Some(mount) = mount {
            mount.subscription.off();
            info!("unsubscribed from NewWave");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.borrow().is_some()
    }

    fn binding(&self) -> Result<P::Contract, BoardError> {
        let provider = self.provider.as_ref().ok_or(BoardError::NoProvider)?;
        Ok(provider.contract(&self.config.contract_address)?)
    }

    async fn try_fetch_all_waves(&self) -> Result<(), BoardError> {
        let contract = self.binding()?;
        let waves = contract
            .get_all_waves()
            .await?
            .into_iter()
            .map(Wave::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ChainError::from)?;

        info!(count = waves.len(), "fetched waves");
        debug!(?waves);
        update(&self.state, &self.changes, |state| state.waves = waves);
        Ok(())
    }

    async fn try_fetch_total_count(&self) -> Result<(), BoardError> {
        let count = self.binding()?.get_total_waves().await?;
        info!(count, "retrieved total wave count");
        Ok(())
    }

    async fn try_submit_wave(&self) -> Result<(), BoardError> {
        let contract = self.binding()?;
        let overrides = TxOverrides {
            gas_limit: Some(self.config.gas_limit),
        };

        let tx_hash = contract.wave(&self.config.wave_message, overrides).await?;
        info!(tx = %tx_hash, "mining");

        let receipt = contract.wait_for_receipt(&tx_hash).await?;
        info!(tx = %receipt.tx_hash, block = ?receipt.block_number, "mined");

        let count = contract.get_total_waves().await?;
        info!(count, "retrieved new total wave count");
        Ok(())
    }

    fn new_wave_listener(&self) -> Listener<NewWaveEvent> {
        let state: Weak<RefCell<BoardState>> = Rc::downgrade(&self.state);
        let changes = self.changes.clone();
        Box::new(move |event: &NewWaveEvent| {
            info!(from = %event.from, timestamp = event.timestamp, message = %event.message, "NewWave");
            let Some(state) = state.upgrade() else {
                return;
            };
            match Wave::try_from(event.clone()) {
                Ok(wave) => update(&state, &changes, |state| state.waves.push(wave)),
                Err(err) => warn!("dropping NewWave notification: {err}"),
            }
        })
    }
}

fn update(
    state: &RefCell<BoardState>,
    changes: &EventRegistry<BoardState>,
    mutate: impl FnOnce(&mut BoardState),
) {
    let snapshot = {
        let mut state = state.borrow_mut();
        mutate(&mut state);
        state.clone()
    };
    changes.emit(&snapshot);
}

fn report(operation: &str, result: Result<(), BoardError>) {
    match result {
        Ok(()) => {}
        Err(BoardError::NoProvider) => info!("{operation} skipped: no injected wallet provider"),
        Err(err) => warn!("{operation} failed: {err}"),
    }
}
