//! Collaborators supplied from JavaScript
//!
//! The host passes a plain object whose optional function properties are
//! `render`, `retrieveSaved`, `onAutosave`, `onDone` and `onExit`. Any of
//! them may return a Promise; the async variants below await it.

use super::helpers::{describe_js_error, validation_error};
use crate::editor::{EditorHooks, Rendered};
use crate::error::HookError;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

#[derive(Debug, Clone, Default)]
pub struct JsHooks {
    render: Option<Function>,
    retrieve_saved: Option<Function>,
    autosave: Option<Function>,
    on_done: Option<Function>,
    on_exit: Option<Function>,
}

impl JsHooks {
    /// Read the hook functions from `hooks`; `undefined`/`null` means none
    pub fn from_js(hooks: &JsValue) -> Result<Self, JsValue> {
        if hooks.is_undefined() || hooks.is_null() {
            return Ok(Self::default());
        }
        if !hooks.is_object() {
            return Err(validation_error("hooks must be an object"));
        }

        Ok(Self {
            render: function_property(hooks, "render")?,
            retrieve_saved: function_property(hooks, "retrieveSaved")?,
            autosave: function_property(hooks, "onAutosave")?,
            on_done: function_property(hooks, "onDone")?,
            on_exit: function_property(hooks, "onExit")?,
        })
    }

    pub fn has_renderer(&self) -> bool {
        self.render.is_some()
    }

    /// Run the host renderer, awaiting a returned Promise
    pub async fn render_async(&self, source: &str) -> Result<String, HookError> {
        let Some(render) = &self.render else {
            return Ok(source.to_string());
        };
        let value = call_and_await(render, &JsValue::from_str(source), "render").await?;
        value
            .as_string()
            .ok_or_else(|| HookError::Failed("render must produce a string".to_string()))
    }

    /// Fetch previously saved content, awaiting a returned Promise
    pub async fn retrieve_saved_async(&self) -> Result<Option<String>, HookError> {
        let Some(retrieve) = &self.retrieve_saved else {
            return Ok(None);
        };
        let value = call_and_await(retrieve, &JsValue::UNDEFINED, "retrieveSaved").await?;
        saved_content(value)
    }
}

impl EditorHooks for JsHooks {
    /// A JS renderer may be asynchronous, so the request is always handed
    /// back to `MarkdownEditor`, which awaits it
    fn render(&self, text: &str) -> Result<Rendered, HookError> {
        if self.render.is_some() {
            Ok(Rendered::Deferred)
        } else {
            Ok(Rendered::Ready(text.to_string()))
        }
    }

    fn retrieve_saved(&self) -> Result<Option<String>, HookError> {
        let Some(retrieve) = &self.retrieve_saved else {
            return Ok(None);
        };
        let value = call(retrieve, &JsValue::UNDEFINED, "retrieveSaved")?;
        if value.is_instance_of::<Promise>() {
            return Err(HookError::Failed(
                "retrieveSaved returned a Promise; use the async initialize()".to_string(),
            ));
        }
        saved_content(value)
    }

    fn autosave(&self, text: &str) -> Result<(), HookError> {
        let Some(autosave) = &self.autosave else {
            return Ok(());
        };
        let value = call(autosave, &JsValue::from_str(text), "onAutosave")?;
        if value.is_instance_of::<Promise>() {
            // Nobody awaits a timer-driven save; surface rejections in the log
            spawn_local(async move {
                if let Err(e) = JsFuture::from(Promise::from(value)).await {
                    log::error!("onAutosave rejected: {}", describe_js_error(&e));
                }
            });
        }
        Ok(())
    }

    fn on_done(&self, text: &str) {
        if let Some(on_done) = &self.on_done {
            if let Err(e) = call(on_done, &JsValue::from_str(text), "onDone") {
                log::error!("{}", e);
            }
        }
    }

    fn on_exit(&self, text: &str) {
        if let Some(on_exit) = &self.on_exit {
            if let Err(e) = call(on_exit, &JsValue::from_str(text), "onExit") {
                log::error!("{}", e);
            }
        }
    }
}

fn function_property(target: &JsValue, name: &str) -> Result<Option<Function>, JsValue> {
    let value = Reflect::get(target, &JsValue::from_str(name))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    value
        .dyn_into::<Function>()
        .map(Some)
        .map_err(|_| validation_error(format!("hooks.{} must be a function", name)))
}

fn call(function: &Function, arg: &JsValue, name: &str) -> Result<JsValue, HookError> {
    function
        .call1(&JsValue::NULL, arg)
        .map_err(|e| HookError::Failed(format!("{} threw: {}", name, describe_js_error(&e))))
}

async fn call_and_await(function: &Function, arg: &JsValue, name: &str) -> Result<JsValue, HookError> {
    let value = call(function, arg, name)?;
    JsFuture::from(Promise::resolve(&value))
        .await
        .map_err(|e| HookError::Failed(format!("{} rejected: {}", name, describe_js_error(&e))))
}

fn saved_content(value: JsValue) -> Result<Option<String>, HookError> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    value
        .as_string()
        .map(Some)
        .ok_or_else(|| HookError::Failed("retrieveSaved must produce a string".to_string()))
}
