//! WebAssembly FFI bindings for the Crux Core
//!
//! The browser shell calls these to push events in, resolve HTTP effects and
//! read the view model.

use lazy_static::lazy_static;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsError;

use crux_core::{bridge::Bridge, Core};

use crate::App;

lazy_static! {
    static ref CORE: Bridge<App> = Bridge::new(Core::new());
}

/// Set up console logging when the module is loaded
#[wasm_bindgen(start)]
pub fn init_wasm() {
    // fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// Process a serialized Event and return the serialized Effects it produced
#[wasm_bindgen]
pub fn process_event(event_bytes: &[u8]) -> Result<Vec<u8>, JsError> {
    let mut effects = Vec::new();
    CORE.update(event_bytes, &mut effects)
        .map_err(|e| JsError::new(&format!("failed to process event: {e:?}")))?;
    Ok(effects)
}

/// Serialized view model
#[wasm_bindgen]
pub fn view() -> Result<Vec<u8>, JsError> {
    let mut view = Vec::new();
    CORE.view(&mut view)
        .map_err(|e| JsError::new(&format!("failed to build view model: {e:?}")))?;
    Ok(view)
}

/// Resolve effect `id` with a serialized response and return follow-up Effects
#[wasm_bindgen]
pub fn handle_response(id: u32, response_bytes: &[u8]) -> Result<Vec<u8>, JsError> {
    let mut effects = Vec::new();
    CORE.resolve(
        crux_core::bridge::EffectId(id),
        response_bytes,
        &mut effects,
    )
    .map_err(|e| JsError::new(&format!("failed to handle response: {e:?}")))?;
    Ok(effects)
}
