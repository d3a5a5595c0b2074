//! DOM element bindings.
//!
//! All fields are resolved once at startup. Missing nodes fail `start()`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

fn doc() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().ok()?.get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    doc()?.create_element(tag)
}

/// Clears `el` and leaves it empty.
pub fn clear(el: &Element) {
    el.set_text_content(None);
}

pub fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// Page nodes the board renders into or listens on.
#[derive(Clone)]
pub struct Elements {
    pub wave_btn: HtmlElement,
    pub count_btn: HtmlElement,
    pub connect_btn: HtmlElement,
    pub account_label: Element,
    pub wave_list: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            wave_btn: get_html!("waveBtn"),
            count_btn: get_html!("countBtn"),
            connect_btn: get_html!("connectWalletBtn"),
            account_label: get_el!("accountLabel"),
            wave_list: get_el!("waveList"),
        })
    }
}
