//! Renders `BoardState` into the page.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wb_api_types::Wave;
use wb_board_core::BoardState;
use web_sys::Element;

use crate::dom::{self, Elements};

pub fn render(els: &Elements, state: &BoardState) {
    dom::toggle_class(&els.connect_btn, "hidden", state.current_account.is_some());
    match &state.current_account {
        Some(account) => dom::set_text(&els.account_label, &format!("Connected: {account}")),
        None => dom::set_text(&els.account_label, ""),
    }

    dom::clear(&els.wave_list);
    for wave in &state.waves {
        if let Err(err) = append_card(&els.wave_list, wave) {
            warn!("rendering wave failed: {err:?}");
        }
    }
}

fn append_card(list: &Element, wave: &Wave) -> Result<(), JsValue> {
    let card = dom::create_element("div")?;
    card.set_class_name("wave-card");
    for line in card_lines(wave, &Local) {
        let row = dom::create_element("div")?;
        // text content only; messages come from arbitrary senders
        dom::set_text(&row, &line);
        card.append_child(&row)?;
    }
    list.append_child(&card)?;
    Ok(())
}

/// Card text with the timestamp shown in `tz` (the viewer's zone on the page).
pub fn card_lines<Tz>(wave: &Wave, tz: &Tz) -> [String; 3]
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    [
        format!("Address: {}", wave.address),
        format!("Time: {}", display_time(&wave.timestamp, tz)),
        format!("Message: {}", wave.message),
    ]
}

/// Same layout as JS `Date.prototype.toString`, minus the zone name.
fn display_time<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp
        .with_timezone(tz)
        .format("%a %b %d %Y %H:%M:%S GMT%z")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use wb_api_types::{RawWave, WalletAddress};

    #[test]
    fn card_shows_address_time_and_message() {
        let wave = Wave::try_from(RawWave {
            waver: WalletAddress("0xabc".to_owned()),
            message: "<b>hi</b>".to_owned(),
            timestamp: 1_000,
        })
        .unwrap();

        let [address, time, message] = card_lines(&wave, &Utc);
        assert_eq!(address, "Address: 0xabc");
        assert_eq!(time, "Time: Thu Jan 01 1970 00:16:40 GMT+0000");
        assert_eq!(message, "Message: <b>hi</b>");
    }

    #[test]
    fn card_time_follows_viewer_offset() {
        let wave = Wave::try_from(RawWave {
            waver: WalletAddress("0xabc".to_owned()),
            message: "hi".to_owned(),
            timestamp: 1_000,
        })
        .unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

        let [_, time, _] = card_lines(&wave, &tokyo);
        assert_eq!(time, "Time: Thu Jan 01 1970 09:16:40 GMT+0900");
    }
}
