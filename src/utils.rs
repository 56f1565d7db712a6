use log::warn;
use wasm_bindgen::prelude::*;

use crate::state::Notice;

/// `0x53f4…558f` style abbreviation; short inputs are returned unchanged.
#[wasm_bindgen]
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Blocking browser alert.
pub fn alert(notice: &Notice) {
    let message = notice.to_string();
    match web_sys::window() {
        Some(window) => {
            if let Err(err) = window.alert_with_message(&message) {
                warn!("alert failed: {err:?}");
            }
        }
        None => warn!("no window to show: {message}"),
    }
}
