//! Event binding.
//!
//! Buttons drive the board's async operations on `spawn_local`. Leaving the
//! page tears down the `NewWave` subscription and a back/forward cache
//! restore brings it back.

use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::Board;
use crate::dom::{self, Elements};

/// Helper: attach an async click handler that runs a board operation.
macro_rules! on_click_async {
    ($el:expr, $board:expr, $handler:expr) => {{
        let board = Rc::clone($board);
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let board = Rc::clone(&board);
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&*board).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements, board: &Rc<Board>) -> Result<(), JsValue> {
    on_click_async!(els.connect_btn, board, Board::connect);
    on_click_async!(els.wave_btn, board, Board::submit_wave);
    on_click_async!(els.count_btn, board, Board::fetch_total_count);

    let window = dom::window()?;
    {
        let board = Rc::clone(board);
        let cb = Closure::wrap(Box::new(move |_: web_sys::PageTransitionEvent| {
            board.unmount();
        }) as Box<dyn FnMut(_)>);
        window.add_event_listener_with_callback("pagehide", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    {
        // restored from the back/forward cache: resubscribe
        let board = Rc::clone(board);
        let cb = Closure::wrap(Box::new(move |event: web_sys::PageTransitionEvent| {
            if event.persisted() {
                board.mount();
            }
        }) as Box<dyn FnMut(_)>);
        window.add_event_listener_with_callback("pageshow", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    Ok(())
}
