//! Polling watcher for `NewWave` logs.
//!
//! Only reports events mined after the first poll, the way a fresh
//! contract listener does. After a gap (a sleeping tab) it catches up one
//! bounded window per poll, since providers reject oversized log ranges.

use alloy_primitives::Address;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};
use wb_api_types::NewWaveEvent;
use wb_chain_client::{ChainResult, EventRegistry};

use crate::abi;
use crate::rpc::{self, Eip1193, LogFilter, Runtime, RpcLog};

/// Most blocks a single `eth_getLogs` request spans.
pub const MAX_BLOCK_RANGE: u64 = 1_000;

pub struct NewWaveWatcher<T: ?Sized> {
    transport: Rc<T>,
    contract: Address,
    next_block: Option<u64>,
}

impl<T: Eip1193 + ?Sized> NewWaveWatcher<T> {
    pub fn new(transport: Rc<T>, contract: Address) -> Self {
        Self {
            transport,
            contract,
            next_block: None,
        }
    }

    /// First block the next poll will scan, once a baseline exists.
    pub fn next_block(&self) -> Option<u64> {
        self.next_block
    }

    pub async fn poll(&mut self) -> ChainResult<Vec<NewWaveEvent>> {
        let latest: String = rpc::call(&*self.transport, "eth_blockNumber", json!([])).await?;
        let latest = rpc::parse_quantity(&latest)?;

        let Some(from_block) = self.next_block else {
            debug!(block = latest, "NewWave watcher baseline");
            self.next_block = Some(latest + 1);
            return Ok(Vec::new());
        };
        if latest < from_block {
            return Ok(Vec::new());
        }

        let to_block = latest.min(from_block + MAX_BLOCK_RANGE - 1);
        let filter = LogFilter {
            address: self.contract,
            topics: vec![abi::new_wave_topic()],
            from_block: rpc::quantity(from_block),
            to_block: rpc::quantity(to_block),
        };
        let logs: Vec<RpcLog> =
            rpc::call(&*self.transport, "eth_getLogs", json!([rpc::to_params(filter)?])).await?;
        self.next_block = Some(to_block + 1);

        let mut events = Vec::with_capacity(logs.len());
        for log in logs {
            if log.removed {
                continue;
            }
            match abi::decode_new_wave(&log.topics, &log.data) {
                Ok(event) => events.push(event),
                Err(err) => warn!("skipping undecodable NewWave log: {err}"),
            }
        }
        Ok(events)
    }
}

/// Drives `watcher` until `events` has no listeners left.
pub(crate) async fn run<T, R>(
    mut watcher: NewWaveWatcher<T>,
    events: EventRegistry<NewWaveEvent>,
    runtime: Rc<R>,
    interval: Duration,
    watching: Rc<Cell<bool>>,
) where
    T: Eip1193 + ?Sized,
    R: Runtime + ?Sized,
{
    info!(contract = %watcher.contract, "watching for NewWave events");
    loop {
        if events.is_empty() {
            break;
        }
        match watcher.poll().await {
            Ok(found) => {
                for event in &found {
                    events.emit(event);
                }
            }
            Err(err) => warn!("NewWave poll failed: {err}"),
        }
        runtime.sleep(interval).await;
    }
    watching.set(false);
    info!(contract = %watcher.contract, "stopped watching for NewWave events");
}
