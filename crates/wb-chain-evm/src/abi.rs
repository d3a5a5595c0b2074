//! WavePortal contract interface.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{SolCall, SolEvent, sol};
use wb_api_types::{NewWaveEvent, RawWave, WalletAddress};
use wb_chain_client::{ChainError, ChainResult};

sol! {
    struct Wave {
        address waver;
        string message;
        uint256 timestamp;
    }

    function wave(string _message) external;
    function getAllWaves() external view returns (Wave[] memory);
    function getTotalWaves() external view returns (uint256);

    event NewWave(address indexed from, uint256 timestamp, string message);
}

pub fn new_wave_topic() -> B256 {
    NewWave::SIGNATURE_HASH
}

pub(crate) fn encode_wave(message: &str) -> Vec<u8> {
    waveCall {
        _message: message.to_owned(),
    }
    .abi_encode()
}

pub(crate) fn encode_get_all_waves() -> Vec<u8> {
    getAllWavesCall {}.abi_encode()
}

pub(crate) fn encode_get_total_waves() -> Vec<u8> {
    getTotalWavesCall {}.abi_encode()
}

pub(crate) fn decode_all_waves(data: &[u8]) -> ChainResult<Vec<RawWave>> {
    let waves = getAllWavesCall::abi_decode_returns(data).map_err(abi_error)?;
    waves
        .into_iter()
        .map(|wave| {
            Ok(RawWave {
                waver: wallet_address(wave.waver),
                message: wave.message,
                timestamp: to_u64(wave.timestamp)?,
            })
        })
        .collect()
}

pub(crate) fn decode_total_waves(data: &[u8]) -> ChainResult<u64> {
    let total = getTotalWavesCall::abi_decode_returns(data).map_err(abi_error)?;
    to_u64(total)
}

pub(crate) fn decode_new_wave(topics: &[B256], data: &[u8]) -> ChainResult<NewWaveEvent> {
    let event = NewWave::decode_raw_log(topics.iter().copied(), data).map_err(abi_error)?;
    Ok(NewWaveEvent {
        from: wallet_address(event.from),
        timestamp: to_u64(event.timestamp)?,
        message: event.message,
    })
}

/// EIP-55 checksummed form, matching what wallets display.
pub(crate) fn wallet_address(address: Address) -> WalletAddress {
    WalletAddress(address.to_checksum(None))
}

fn to_u64(value: U256) -> ChainResult<u64> {
    u64::try_from(value).map_err(|_| ChainError::Decode(format!("{value} does not fit in u64")))
}

fn abi_error(err: alloy_sol_types::Error) -> ChainError {
    ChainError::Decode(format!("abi: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use alloy_sol_types::{SolType, sol_data};

    #[test]
    fn selectors_match_contract_signatures() {
        assert_eq!(encode_get_all_waves(), getAllWavesCall::SELECTOR.to_vec());
        assert_eq!(encode_get_total_waves(), getTotalWavesCall::SELECTOR.to_vec());
        assert_eq!(waveCall::SIGNATURE, "wave(string)");
        assert_eq!(NewWave::SIGNATURE, "NewWave(address,uint256,string)");
    }

    #[test]
    fn wave_call_carries_message() {
        let encoded = encode_wave("Default message");
        assert_eq!(&encoded[..4], waveCall::SELECTOR.as_slice());

        let decoded = waveCall::abi_decode(&encoded).expect("wave call decodes");
        assert_eq!(decoded._message, "Default message");
    }

    #[test]
    fn all_waves_decode_in_order() {
        let waver = address!("0x3DAC4433843E2e344594d681cBdfF9A5989aF349");
        let returned = vec![
            Wave {
                waver,
                message: "first".to_owned(),
                timestamp: U256::from(1_000u64),
            },
            Wave {
                waver: Address::ZERO,
                message: "second".to_owned(),
                timestamp: U256::from(2_000u64),
            },
        ];
        let data = <sol_data::Array<Wave> as SolType>::abi_encode(&returned);

        let waves = decode_all_waves(&data).expect("waves decode");
        assert_eq!(waves.len(), 2);
        assert_eq!(waves[0].waver, wallet_address(waver));
        assert_eq!(waves[0].message, "first");
        assert_eq!(waves[0].timestamp, 1_000);
        assert_eq!(waves[1].message, "second");
        assert_eq!(waves[1].timestamp, 2_000);
    }

    #[test]
    fn oversized_total_is_a_decode_error() {
        let data = U256::MAX.to_be_bytes::<32>();
        assert!(matches!(decode_total_waves(&data), Err(ChainError::Decode(_))));

        let data = U256::from(42u64).to_be_bytes::<32>();
        assert_eq!(decode_total_waves(&data).expect("total decodes"), 42);
    }

    #[test]
    fn new_wave_log_decodes() {
        let from = address!("0x00000000000000000000000000000000000000ab");
        let event = NewWave {
            from,
            timestamp: U256::from(1_000u64),
            message: "hi".to_owned(),
        };
        let topics = [new_wave_topic(), from.into_word()];

        let decoded = decode_new_wave(&topics, &event.encode_data()).expect("log decodes");
        assert_eq!(decoded.from, wallet_address(from));
        assert_eq!(decoded.timestamp, 1_000);
        assert_eq!(decoded.message, "hi");
    }

    #[test]
    fn log_with_wrong_topic_is_rejected() {
        let event = NewWave {
            from: Address::ZERO,
            timestamp: U256::ZERO,
            message: String::new(),
        };
        let topics = [B256::ZERO, Address::ZERO.into_word()];
        assert!(decode_new_wave(&topics, &event.encode_data()).is_err());
    }
}
