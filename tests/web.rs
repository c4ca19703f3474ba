//! Browser-only tests, run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use bug_crossing::{browser, engine};
use bug_crossing::engine::input::Command;
use bug_crossing::settings::Settings;
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn settings_default_when_undefined() {
    let settings = Settings::from_js(JsValue::UNDEFINED).unwrap();
    assert_eq!(settings, Settings::default());
}

#[wasm_bindgen_test]
fn settings_read_camel_case_fields() {
    let object = Object::new();
    Reflect::set(&object, &"enemyCount".into(), &JsValue::from_f64(6.0)).unwrap();
    Reflect::set(&object, &"allowReset".into(), &JsValue::FALSE).unwrap();

    let settings = Settings::from_js(object.into()).unwrap();

    assert_eq!(settings.enemy_count, 6);
    assert!(!settings.allow_reset);
    assert_eq!(settings.player_time_scale, 3.0);
}

#[wasm_bindgen_test]
fn settings_reject_wrong_types() {
    let object = Object::new();
    Reflect::set(&object, &"enemyCount".into(), &"many".into()).unwrap();

    assert!(Settings::from_js(object.into()).is_err());
}

#[wasm_bindgen_test]
fn canvas_is_created_once_with_board_size() {
    let canvas = browser::create_canvas(505, 606).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (505, 606));

    let again = browser::create_canvas(505, 606).unwrap();
    assert_eq!(canvas, again);
    assert!(browser::context().is_ok());
}

#[wasm_bindgen_test]
fn arrow_key_codes_decode() {
    assert_eq!(Command::from_key_code(38), Some(Command::Up));
    assert_eq!(Command::from_key_code(9), None);
}

#[wasm_bindgen_test]
fn clock_moves_forward() {
    let first = browser::now().unwrap();
    let second = browser::now().unwrap();
    assert!(second >= first);
}

#[wasm_bindgen_test]
async fn missing_image_fails_naming_its_source() {
    let err = engine::load_image("no-such-sprite.png").await.unwrap_err();
    assert!(format!("{:#}", err).contains("no-such-sprite.png"));
}
