use wasm_bindgen::prelude::*;

mod app;
mod components;
pub mod config;
pub mod contract;
pub mod error;
mod injected;
pub mod network;
pub mod provider;
pub mod session;
pub mod state;
#[cfg(test)]
mod testing;
mod utils;

pub use error::{Error, Result};

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<app::App>::new().render();
    Ok(())
}
