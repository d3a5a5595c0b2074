//! WaveBoard WASM Frontend
//!
//! Wires the board component to the page: the injected wallet becomes an
//! EIP-1193 transport, state changes re-render the wave list, and the page
//! buttons trigger board operations.

pub mod config;
pub mod dom;
pub mod ethereum;
pub mod events;
pub mod platform;
pub mod render;

use std::rc::Rc;
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, prelude::__tracing_subscriber_SubscriberExt as _,
    util::SubscriberInitExt as _,
};
use wasm_bindgen::prelude::*;
use wb_board_core::{BoardState, WaveBoard};
use wb_chain_evm::EvmWallet;

use crate::ethereum::InjectedProvider;
use crate::platform::{BrowserAlert, BrowserRuntime};

pub type Board = WaveBoard<EvmWallet<InjectedProvider, BrowserRuntime>, BrowserAlert>;

/// WASM entry point, run when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();
    init_tracing();

    init().await
}

/// Sends `tracing` output to the developer console.
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .without_time()
                .with_writer(tracing_web::MakeWebConsoleWriter::new()),
        )
        .try_init();
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let config = config::load();

    let provider = InjectedProvider::detect()
        .map(|ethereum| EvmWallet::new(ethereum, BrowserRuntime, config.evm_options()));
    let board: Rc<Board> = Rc::new(WaveBoard::new(provider, BrowserAlert, config.board));
    info!(
        contract = %board.config().contract_address,
        wallet = board.has_provider(),
        "waveboard starting"
    );

    render::render(&els, &board.state());
    {
        let els = els.clone();
        board
            .on_change(Box::new(move |state: &BoardState| render::render(&els, state)))
            .forget();
    }

    board.mount();
    events::bind_events(&els, &board)?;
    board.check_existing_session().await;

    Ok(())
}
