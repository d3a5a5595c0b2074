use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ContractAddress(pub String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TxHash(pub String);

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaveDecodeError {
    #[error("timestamp {0} is outside the representable range")]
    TimestampOutOfRange(u64),
}

/// A wave as the contract stores it, timestamp in epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawWave {
    pub waver: WalletAddress,
    pub message: String,
    pub timestamp: u64,
}

/// Payload of the contract's `NewWave` notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewWaveEvent {
    pub from: WalletAddress,
    pub timestamp: u64,
    pub message: String,
}

/// A wave as the board shows it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wave {
    pub address: WalletAddress,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl TryFrom<RawWave> for Wave {
    type Error = WaveDecodeError;

    fn try_from(raw: RawWave) -> Result<Self, Self::Error> {
        Ok(Wave {
            address: raw.waver,
            timestamp: timestamp_from_epoch_seconds(raw.timestamp)?,
            message: raw.message,
        })
    }
}

impl TryFrom<NewWaveEvent> for Wave {
    type Error = WaveDecodeError;

    fn try_from(event: NewWaveEvent) -> Result<Self, Self::Error> {
        Ok(Wave {
            address: event.from,
            timestamp: timestamp_from_epoch_seconds(event.timestamp)?,
            message: event.message,
        })
    }
}

pub fn timestamp_from_epoch_seconds(seconds: u64) -> Result<DateTime<Utc>, WaveDecodeError> {
    i64::try_from(seconds)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or(WaveDecodeError::TimestampOutOfRange(seconds))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_wave_maps_epoch_seconds() {
        let wave = Wave::try_from(RawWave {
            waver: WalletAddress("0xabc".to_owned()),
            message: "hi".to_owned(),
            timestamp: 1000,
        })
        .expect("timestamp should be in range");

        assert_eq!(wave.address.0, "0xabc");
        assert_eq!(wave.message, "hi");
        assert_eq!(wave.timestamp.timestamp(), 1000);
        assert_eq!(wave.timestamp.to_rfc3339(), "1970-01-01T00:16:40+00:00");
    }

    #[test]
    fn new_wave_event_maps_like_raw_wave() {
        let event = NewWaveEvent {
            from: WalletAddress("0xdef".to_owned()),
            timestamp: 1_650_000_000,
            message: "gm".to_owned(),
        };
        let raw = RawWave {
            waver: event.from.clone(),
            message: event.message.clone(),
            timestamp: event.timestamp,
        };

        assert_eq!(Wave::try_from(event), Wave::try_from(raw));
    }

    #[test]
    fn out_of_range_timestamp_is_rejected() {
        assert_eq!(
            timestamp_from_epoch_seconds(u64::MAX),
            Err(WaveDecodeError::TimestampOutOfRange(u64::MAX))
        );
    }

    #[test]
    fn wave_serializes_timestamp_as_rfc3339() {
        let wave = Wave::try_from(RawWave {
            waver: WalletAddress("0xabc".to_owned()),
            message: "hi".to_owned(),
            timestamp: 0,
        })
        .expect("epoch zero is valid");

        let json = serde_json::to_value(&wave).expect("wave serializes");
        assert_eq!(json["address"], "0xabc");
        assert_eq!(json["timestamp"], "1970-01-01T00:00:00Z");
    }
}
