// ==================== Imports ====================
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

pub mod browser;
pub mod engine;
pub mod game;
pub mod resources;
pub mod round;
pub mod settings;
pub mod sprite;

use engine::GameLoop;
use game::Crossing;
use settings::Settings;

// ==================== Main Functions ====================
/// Main entry for Webassembly module, default settings
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    run(Settings::default())
}

/// Entry point taking a settings object from JavaScript
/// - missing fields fall back to their defaults
/// - `undefined` or `null` means all defaults
#[wasm_bindgen]
pub fn start_with_settings(settings: JsValue) -> Result<(), JsValue> {
    let settings = Settings::from_js(settings).map_err(to_js_error)?;
    run(settings)
}

/// - installs panic hook and console logger
/// - creates the canvas
/// - starts loading images; the loop begins once they are all in
fn run(settings: Settings) -> Result<(), JsValue> {
    // better panic messages for debugging
    console_error_panic_hook::set_once();
    // a second start keeps the first logger
    let _ = console_log::init_with_level(settings.log_level());

    browser::create_canvas(game::CANVAS_WIDTH, game::CANVAS_HEIGHT).map_err(to_js_error)?;

    // spawns a new asynchronous task on the local thread, for the web
    // assembly environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(Crossing::new(settings)).await {
            log::error!("Could not start game : {:#}", err);
        }
    });

    Ok(())
}

fn to_js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", err))
}
