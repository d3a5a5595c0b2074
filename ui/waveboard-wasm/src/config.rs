//! Page configuration.
//!
//! Read from an optional `<script id="waveboardConfig" type="application/json">`
//! block. Absent or malformed config falls back to the defaults.

use serde::Deserialize;
use std::time::Duration;
use tracing::warn;
use wb_board_core::BoardConfig;
use wb_chain_evm::EvmOptions;

use crate::dom;

pub const CONFIG_ELEMENT_ID: &str = "waveboardConfig";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 4_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(flatten)]
    pub board: BoardConfig,
    /// How often the `NewWave` watcher asks for new blocks.
    pub poll_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text)
    }

    pub fn evm_options(&self) -> EvmOptions {
        EvmOptions {
            event_poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            ..EvmOptions::default()
        }
    }
}

pub fn load() -> AppConfig {
    let Some(el) = dom::by_id(CONFIG_ELEMENT_ID) else {
        return AppConfig::default();
    };
    let text = el.text_content().unwrap_or_default();
    AppConfig::from_json(&text).unwrap_or_else(|err| {
        warn!("ignoring malformed #{CONFIG_ELEMENT_ID}: {err}");
        AppConfig::default()
    })
}
