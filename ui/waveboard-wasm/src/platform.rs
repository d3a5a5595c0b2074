//! Browser event loop and alert sink.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::time::Duration;
use wb_board_core::Notifier;
use wb_chain_evm::Runtime;

/// Tasks run on the page's microtask queue; sleeps are `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserRuntime;

impl Runtime for BrowserRuntime {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        gloo_timers::future::sleep(duration).boxed_local()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserAlert;

impl Notifier for BrowserAlert {
    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
