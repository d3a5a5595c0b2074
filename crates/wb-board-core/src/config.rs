use serde::{Deserialize, Serialize};
use wb_api_types::ContractAddress;

pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x3DAC4433843E2e344594d681cBdfF9A5989aF349";
pub const DEFAULT_WAVE_MESSAGE: &str = "Default message";

/// The wave entry point's cost depends on contract state, so wallet
/// estimates can come in low. Unused gas is refunded.
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    pub contract_address: ContractAddress,
    pub wave_message: String,
    pub gas_limit: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            contract_address: ContractAddress(DEFAULT_CONTRACT_ADDRESS.to_owned()),
            wave_message: DEFAULT_WAVE_MESSAGE.to_owned(),
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}
