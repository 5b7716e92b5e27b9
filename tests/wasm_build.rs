//! WASM build test
//!
//! Exercises the `MarkdownEditor` JavaScript class in a browser.
#![cfg(target_arch = "wasm32")]

use js_sys::{Function, Object, Reflect};
use markdown_editor_wasm::api::MarkdownEditor;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn editor() -> MarkdownEditor {
    MarkdownEditor::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap()
}

#[wasm_bindgen_test]
fn test_editor_creation() {
    let editor = editor();
    assert_eq!(editor.get_contents().unwrap(), "");
}

#[wasm_bindgen_test]
fn test_unknown_option_rejected() {
    let options = Object::new();
    Reflect::set(&options, &"fontSize".into(), &JsValue::from_f64(12.0)).unwrap();
    assert!(MarkdownEditor::new(options.into(), JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn test_insert_around_caret() {
    let editor = editor();
    editor.set_contents("ab").unwrap();
    editor.set_selection(1, 1).unwrap();
    editor.insert_around("**", None).unwrap();
    assert_eq!(editor.get_contents().unwrap(), "a****b");
}

#[wasm_bindgen_test]
fn test_unknown_action_returns_false() {
    let editor = editor();
    assert!(!editor.action("nope").unwrap());
}

#[wasm_bindgen_test]
fn test_js_action_runs_outside_borrow() {
    let editor = editor();
    // The handler receives the editor and edits through it
    let handler = Function::new_with_args("editor", "editor.insertAt('!')");
    editor.register_action("shout", handler).unwrap();

    assert!(editor.action("shout").unwrap());
    assert_eq!(editor.get_contents().unwrap(), "!");

    assert!(editor.deregister_action("shout").unwrap());
    assert!(!editor.action("shout").unwrap());
}

#[wasm_bindgen_test]
fn test_subscriber_receives_contents() {
    let editor = editor();
    let log = js_sys::Array::new();
    let callback = Function::new_with_args("log", "return (n) => log.push(n.event.value)")
        .call1(&JsValue::NULL, &log)
        .unwrap();
    let handle = editor
        .on("contents", "update", callback.unchecked_into())
        .unwrap();

    editor.set_contents("hi").unwrap();
    assert_eq!(log.length(), 1);
    assert_eq!(log.get(0).as_string().unwrap(), "hi");

    assert!(editor.off(handle).unwrap());
    assert!(editor.on("contents", "append", Function::new_no_args("")).is_err());
}

#[wasm_bindgen_test]
async fn test_initialize_with_async_restore() {
    let hooks = Object::new();
    let retrieve = Function::new_no_args("return Promise.resolve('# Saved')");
    Reflect::set(&hooks, &"retrieveSaved".into(), &retrieve).unwrap();
    let editor = MarkdownEditor::new(JsValue::UNDEFINED, hooks.into()).unwrap();

    let loaded = JsFuture::from(editor.initialize()).await.unwrap();
    assert_eq!(loaded.as_bool(), Some(true));
    assert_eq!(editor.get_contents().unwrap(), "# Saved");
}

#[wasm_bindgen_test]
async fn test_async_preview_render() {
    let hooks = Object::new();
    let render = Function::new_with_args("text", "return Promise.resolve('<p>' + text + '</p>')");
    Reflect::set(&hooks, &"render".into(), &render).unwrap();
    let editor = MarkdownEditor::new(JsValue::UNDEFINED, hooks.into()).unwrap();
    editor.set_contents("hello").unwrap();

    JsFuture::from(editor.set_preview_visibility(true)).await.unwrap();

    assert!(editor.is_preview_visible().unwrap());
    assert_eq!(editor.preview_contents().unwrap(), "<p>hello</p>");
}

#[wasm_bindgen_test]
async fn test_autosave_fires_after_quiet_period() {
    let options = js_sys::JSON::parse(r#"{"autosaveDelayMs":20}"#).unwrap();
    let hooks = Object::new();
    let on_autosave = Function::new_with_args("text", "globalThis.lastAutosave = text");
    Reflect::set(&hooks, &"onAutosave".into(), &on_autosave).unwrap();
    let editor = MarkdownEditor::new(options, hooks.into()).unwrap();

    editor.set_contents("first").unwrap();
    editor.set_contents("second").unwrap();
    gloo_timers::future::sleep(std::time::Duration::from_millis(80)).await;

    let saved = Reflect::get(&js_sys::global(), &"lastAutosave".into()).unwrap();
    assert_eq!(saved.as_string().as_deref(), Some("second"));
}
