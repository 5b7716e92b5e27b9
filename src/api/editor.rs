//! `MarkdownEditor` JavaScript class
//!
//! Wraps an [`Editor`] in `Rc<RefCell<..>>` so async tasks, timers and
//! store callbacks can reach it. Every method takes the borrow with
//! `try_borrow_mut`: a subscriber or action that calls back into the editor
//! while it is mid-operation gets an "editor is busy" error instead of a
//! panic or an update loop.
//!
//! After each call the wrapper flushes side effects the core leaves to the
//! host: deferred preview renders are awaited on the microtask queue and the
//! pending autosave ticket is armed on a `gloo_timers` timeout (replacing,
//! and thereby cancelling, the previous one).

use super::helpers::{
    describe_js_error, deserialize, deserialize_or_default, editor_error, serialize,
    validation_error,
};
use super::hooks::JsHooks;
use crate::editor::{AutosaveTicket, Editor, PreviewRequest, StoreName};
use crate::error::EditorError;
use crate::models::{ButtonDescriptor, EditorOptions};
use crate::store::{EventKind, Notification, SubscriptionId};
use crate::text::Selection;
use gloo_timers::callback::Timeout;
use js_sys::{Function, Promise};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

#[wasm_bindgen]
#[derive(Clone)]
pub struct MarkdownEditor {
    inner: Rc<RefCell<Editor>>,
    hooks: JsHooks,
    /// Actions implemented in JavaScript; run outside the editor borrow
    js_actions: Rc<RefCell<HashMap<String, Function>>>,
    subscriptions: Rc<RefCell<HashMap<u32, (StoreName, SubscriptionId)>>>,
    next_subscription: Rc<Cell<u32>>,
    /// Armed autosave timer with the generation it fires
    autosave_timer: Rc<RefCell<Option<(u64, Timeout)>>>,
    scheduled_generation: Rc<Cell<u64>>,
}

#[wasm_bindgen]
impl MarkdownEditor {
    /// Create an editor from an options object and an optional hooks object
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue, hooks: JsValue) -> Result<MarkdownEditor, JsValue> {
        let options: EditorOptions = deserialize_or_default(options, "Invalid editor options")?;
        let hooks = JsHooks::from_js(&hooks)?;
        let editor = Editor::new(options, hooks.clone());

        Ok(Self {
            inner: Rc::new(RefCell::new(editor)),
            hooks,
            js_actions: Rc::new(RefCell::new(HashMap::new())),
            subscriptions: Rc::new(RefCell::new(HashMap::new())),
            next_subscription: Rc::new(Cell::new(0)),
            autosave_timer: Rc::new(RefCell::new(None)),
            scheduled_generation: Rc::new(Cell::new(0)),
        })
    }

    /// Load saved content (or the configured default)
    ///
    /// Resolves to `true` if the content was loaded, `false` if the user
    /// edited the buffer while `retrieveSaved` was pending.
    pub fn initialize(&self) -> Promise {
        let this = self.clone();
        future_to_promise(async move {
            let ticket = this.with_editor("initialize", |editor| Ok(editor.begin_restore()))?;
            let saved = this
                .hooks
                .retrieve_saved_async()
                .await
                .map_err(|e| editor_error("initialize", e.into()))?;
            let loaded = this.with_editor("initialize", |editor| editor.finish_restore(ticket, saved))?;
            Ok(JsValue::from_bool(loaded))
        })
    }

    // ========================================================================
    // Contents and selection
    // ========================================================================

    #[wasm_bindgen(js_name = getContents)]
    pub fn get_contents(&self) -> Result<String, JsValue> {
        self.with_editor("getContents", |editor| Ok(editor.get_contents()))
    }

    #[wasm_bindgen(js_name = setContents)]
    pub fn set_contents(&self, text: &str) -> Result<(), JsValue> {
        self.with_editor("setContents", |editor| editor.set_contents(text))
    }

    pub fn selection(&self) -> Result<JsValue, JsValue> {
        let selection = self.with_editor("selection", |editor| Ok(editor.selection().clone()))?;
        serialize(&selection, "Failed to serialize selection")
    }

    /// Select a single range
    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&self, anchor: usize, head: usize) -> Result<(), JsValue> {
        self.with_editor("setSelection", |editor| {
            editor.set_selection(Selection::single(anchor, head))
        })
    }

    /// Install a multi-range selection: `{ ranges: [{ anchor, head }], main }`
    #[wasm_bindgen(js_name = setSelections)]
    pub fn set_selections(&self, selection: JsValue) -> Result<(), JsValue> {
        let selection: Selection = deserialize(selection, "Invalid selection")?;
        self.with_editor("setSelections", |editor| editor.set_selection(selection))
    }

    pub fn undo(&self) -> Result<bool, JsValue> {
        self.with_editor("undo", |editor| editor.undo())
    }

    pub fn redo(&self) -> Result<bool, JsValue> {
        self.with_editor("redo", |editor| editor.redo())
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    #[wasm_bindgen(js_name = insertBefore)]
    pub fn insert_before(&self, text: &str, caret_offset: Option<usize>) -> Result<(), JsValue> {
        self.with_editor("insertBefore", |editor| editor.insert_before(text, caret_offset))
    }

    #[wasm_bindgen(js_name = insertAround)]
    pub fn insert_around(&self, prefix: &str, suffix: Option<String>) -> Result<(), JsValue> {
        self.with_editor("insertAround", |editor| {
            editor.insert_around(prefix, suffix.as_deref())
        })
    }

    #[wasm_bindgen(js_name = insertAt)]
    pub fn insert_at(&self, text: &str, offset: Option<usize>) -> Result<(), JsValue> {
        self.with_editor("insertAt", |editor| editor.insert_at(text, offset))
    }

    #[wasm_bindgen(js_name = insertWithNewline)]
    pub fn insert_with_newline(&self, text: &str, offset: Option<usize>) -> Result<(), JsValue> {
        self.with_editor("insertWithNewline", |editor| {
            editor.insert_with_newline(text, offset)
        })
    }

    #[wasm_bindgen(js_name = insertSnippet)]
    pub fn insert_snippet(&self, index: usize) -> Result<(), JsValue> {
        self.with_editor("insertSnippet", |editor| editor.insert_snippet(index))
    }

    // ========================================================================
    // Actions and toolbar
    // ========================================================================

    /// Run a named action; resolves `false` (with a warning) if unknown
    pub fn action(&self, name: &str) -> Result<bool, JsValue> {
        let handler = self.js_actions.borrow().get(name).cloned();
        match handler {
            Some(handler) => {
                self.call_js_action(name, &handler)?;
                Ok(true)
            }
            None => self.with_editor("action", |editor| editor.action(name)),
        }
    }

    /// Click the toolbar button at `index`; returns its toggled state
    #[wasm_bindgen(js_name = clickButton)]
    pub fn click_button(&self, index: usize) -> Result<bool, JsValue> {
        let action = self.with_editor("clickButton", |editor| editor.button_action(index))?;
        self.action(&action)?;
        self.with_editor("clickButton", |editor| editor.finish_click(index))
    }

    /// Append a button described by `{ action, iconName, label, ... }`
    #[wasm_bindgen(js_name = registerButton)]
    pub fn register_button(&self, descriptor: JsValue) -> Result<usize, JsValue> {
        let button: ButtonDescriptor = deserialize(descriptor, "Invalid button descriptor")?;
        self.with_editor("registerButton", |editor| Ok(editor.register_button(button)))
    }

    #[wasm_bindgen(js_name = removeButton)]
    pub fn remove_button(&self, index: usize) -> Result<JsValue, JsValue> {
        let removed = self.with_editor("removeButton", |editor| editor.remove_button(index))?;
        serialize(&removed, "Failed to serialize button")
    }

    /// Register `handler` under `name`, replacing any existing action
    ///
    /// The handler is called with this editor as its only argument.
    #[wasm_bindgen(js_name = registerAction)]
    pub fn register_action(&self, name: &str, handler: Function) -> Result<(), JsValue> {
        self.with_editor("registerAction", |editor| Ok(editor.deregister_action(name)))?;
        self.js_actions.borrow_mut().insert(name.to_string(), handler);
        log::debug!("registered action '{}'", name);
        Ok(())
    }

    #[wasm_bindgen(js_name = deregisterAction)]
    pub fn deregister_action(&self, name: &str) -> Result<bool, JsValue> {
        let removed_js = self.js_actions.borrow_mut().remove(name).is_some();
        let removed = self.with_editor("deregisterAction", |editor| Ok(editor.deregister_action(name)))?;
        Ok(removed_js || removed)
    }

    #[wasm_bindgen(js_name = disableButtonsExcept)]
    pub fn disable_buttons_except(&self, index: usize) -> Result<(), JsValue> {
        self.with_editor("disableButtonsExcept", |editor| editor.disable_buttons_except(index))
    }

    #[wasm_bindgen(js_name = enableButtons)]
    pub fn enable_buttons(&self) -> Result<(), JsValue> {
        self.with_editor("enableButtons", |editor| editor.enable_buttons())
    }

    pub fn buttons(&self) -> Result<JsValue, JsValue> {
        let buttons = self.with_editor("buttons", |editor| Ok(editor.buttons().to_vec()))?;
        serialize(&buttons, "Failed to serialize buttons")
    }

    #[wasm_bindgen(js_name = isButtonToggled)]
    pub fn is_button_toggled(&self, index: usize) -> Result<bool, JsValue> {
        self.with_editor("isButtonToggled", |editor| Ok(editor.toolbar().is_toggled(index)))
    }

    // ========================================================================
    // Visibility and preview
    // ========================================================================

    #[wasm_bindgen(js_name = setEditorVisibility)]
    pub fn set_editor_visibility(&self, visible: bool) -> Result<(), JsValue> {
        self.with_editor("setEditorVisibility", |editor| {
            editor.set_editor_visibility(visible);
            Ok(())
        })
    }

    #[wasm_bindgen(js_name = isEditorVisible)]
    pub fn is_editor_visible(&self) -> Result<bool, JsValue> {
        self.with_editor("isEditorVisible", |editor| Ok(editor.is_editor_visible()))
    }

    /// Show (after rendering) or hide the preview pane
    ///
    /// Resolves once the pane state is applied; rejects if the renderer
    /// fails. A render superseded by a later call resolves without effect.
    #[wasm_bindgen(js_name = setPreviewVisibility)]
    pub fn set_preview_visibility(&self, visible: bool) -> Promise {
        let this = self.clone();
        future_to_promise(async move {
            let request = this.with_editor("setPreviewVisibility", |editor| {
                editor.set_preview_visibility(visible)?;
                Ok(editor.take_deferred_render())
            })?;
            if let Some(request) = request {
                this.complete_render(request).await?;
            }
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = isPreviewVisible)]
    pub fn is_preview_visible(&self) -> Result<bool, JsValue> {
        self.with_editor("isPreviewVisible", |editor| Ok(editor.is_preview_visible()))
    }

    #[wasm_bindgen(js_name = previewContents)]
    pub fn preview_contents(&self) -> Result<String, JsValue> {
        self.with_editor("previewContents", |editor| Ok(editor.preview_contents().to_string()))
    }

    #[wasm_bindgen(js_name = toggleSnippets)]
    pub fn toggle_snippets(&self) -> Result<(), JsValue> {
        self.with_editor("toggleSnippets", |editor| {
            editor.toggle_snippets();
            Ok(())
        })
    }

    #[wasm_bindgen(js_name = isSnippetsOpen)]
    pub fn is_snippets_open(&self) -> Result<bool, JsValue> {
        self.with_editor("isSnippetsOpen", |editor| Ok(editor.is_snippets_open()))
    }

    pub fn snippets(&self) -> Result<JsValue, JsValue> {
        let snippets = self.with_editor("snippets", |editor| Ok(editor.snippets().to_vec()))?;
        serialize(&snippets, "Failed to serialize snippets")
    }

    pub fn done(&self) -> Result<(), JsValue> {
        self.with_editor("done", |editor| {
            editor.done();
            Ok(())
        })
    }

    pub fn exit(&self) -> Result<(), JsValue> {
        self.with_editor("exit", |editor| {
            editor.exit();
            Ok(())
        })
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Subscribe `callback` to `kind` events of the named store
    ///
    /// Value stores (`contents`, `previewVisible`, ...) only emit `update`;
    /// `buttons` and `snippets` emit `append`, `change` and `deletion`.
    /// Returns a handle for [`MarkdownEditor::off`].
    pub fn on(&self, store: &str, kind: &str, callback: Function) -> Result<u32, JsValue> {
        let name = StoreName::parse(store)
            .ok_or_else(|| validation_error(format!("unknown store '{}'", store)))?;
        let kind = EventKind::parse(kind)
            .ok_or_else(|| validation_error(format!("unknown event kind '{}'", kind)))?;

        let is_list = matches!(name, StoreName::Buttons | StoreName::Snippets);
        if is_list == (kind == EventKind::Update) {
            return Err(validation_error(format!(
                "store '{}' does not emit '{}' events",
                store, kind
            )));
        }

        let id = self.with_editor("on", |editor| {
            Ok(match name {
                StoreName::Buttons => editor.on_buttons(kind, js_subscriber(callback)),
                StoreName::Snippets => editor.on_snippets(kind, js_subscriber(callback)),
                StoreName::SnippetsOpen => editor.on_snippets_open(js_subscriber(callback)),
                StoreName::EditorVisible => editor.on_editor_visible(js_subscriber(callback)),
                StoreName::PreviewVisible => editor.on_preview_visible(js_subscriber(callback)),
                StoreName::PreviewContents => editor.on_preview_contents(js_subscriber(callback)),
                StoreName::Contents => editor.on_contents(js_subscriber(callback)),
            })
        })?;

        let handle = self.next_subscription.get();
        self.next_subscription.set(handle + 1);
        self.subscriptions.borrow_mut().insert(handle, (name, id));
        Ok(handle)
    }

    /// Remove a subscription; returns false for an unknown handle
    pub fn off(&self, handle: u32) -> Result<bool, JsValue> {
        let Some((name, id)) = self.subscriptions.borrow_mut().remove(&handle) else {
            return Ok(false);
        };
        self.with_editor("off", |editor| Ok(editor.off(name, id)))
    }
}

impl MarkdownEditor {
    /// Run `f` with exclusive access to the editor, then flush host effects
    fn with_editor<R>(
        &self,
        context: &str,
        f: impl FnOnce(&mut Editor) -> Result<R, EditorError>,
    ) -> Result<R, JsValue> {
        let result = {
            let mut editor = self.inner.try_borrow_mut().map_err(|_| {
                validation_error(format!(
                    "{}: editor is busy (called from inside an editor callback)",
                    context
                ))
            })?;
            f(&mut editor).map_err(|e| editor_error(context, e))
        };
        self.flush_effects();
        result
    }

    fn call_js_action(&self, name: &str, handler: &Function) -> Result<(), JsValue> {
        handler
            .call1(&JsValue::NULL, &JsValue::from(self.clone()))
            .map(|_| ())
            .map_err(|e| validation_error(format!("action '{}' threw: {}", name, describe_js_error(&e))))
    }

    fn flush_effects(&self) {
        let Ok(mut editor) = self.inner.try_borrow_mut() else {
            return;
        };
        let request = editor.take_deferred_render();
        let ticket = editor.pending_autosave();
        drop(editor);

        if let Some(request) = request {
            let this = self.clone();
            spawn_local(async move {
                if let Err(e) = this.complete_render(request).await {
                    log::error!("preview render failed: {}", describe_js_error(&e));
                }
            });
        }
        if let Some(ticket) = ticket {
            self.schedule_autosave(ticket);
        }
    }

    async fn complete_render(&self, request: PreviewRequest) -> Result<bool, JsValue> {
        let result = self.hooks.render_async(&request.source).await;
        self.with_editor("render", |editor| {
            editor.finish_preview_render(request.generation, result)
        })
    }

    fn schedule_autosave(&self, ticket: AutosaveTicket) {
        if self.scheduled_generation.get() == ticket.generation {
            return;
        }
        self.scheduled_generation.set(ticket.generation);
        arm_autosave(Rc::clone(&self.inner), Rc::downgrade(&self.autosave_timer), ticket);
    }
}

/// Start the quiet-period timer for `ticket`, replacing (and so cancelling)
/// the previous one
///
/// A timer that fires while the editor is borrowed re-arms itself once the
/// borrow is released, unless a newer ticket has been armed meanwhile.
fn arm_autosave(
    inner: Rc<RefCell<Editor>>,
    slot: Weak<RefCell<Option<(u64, Timeout)>>>,
    ticket: AutosaveTicket,
) {
    let Some(timer) = slot.upgrade() else {
        return;
    };

    let timeout = Timeout::new(ticket.delay_ms, move || {
        let busy = match inner.try_borrow_mut() {
            Ok(mut editor) => {
                if let Err(e) = editor.run_autosave(ticket) {
                    log::error!("autosave failed: {}", e);
                }
                false
            }
            Err(_) => true,
        };
        if !busy {
            return;
        }

        log::debug!("autosave generation {} deferred: editor busy", ticket.generation);
        // The replacement timer must not be installed from inside this callback
        spawn_local(async move {
            let superseded = slot
                .upgrade()
                .map(|timer| {
                    timer
                        .try_borrow()
                        .map(|armed| armed.as_ref().map(|(generation, _)| *generation) != Some(ticket.generation))
                        .unwrap_or(true)
                })
                .unwrap_or(true);
            if !superseded {
                arm_autosave(inner, slot, ticket);
            }
        });
    });

    *timer.borrow_mut() = Some((ticket.generation, timeout));
}

/// Store callback forwarding serialized notifications to a JS function
fn js_subscriber<T: Serialize + 'static>(
    callback: Function,
) -> impl FnMut(&Notification<T>) -> Result<(), String> + 'static {
    move |notification| {
        let value = serde_wasm_bindgen::to_value(notification).map_err(|e| e.to_string())?;
        callback
            .call1(&JsValue::NULL, &value)
            .map(|_| ())
            .map_err(|e| describe_js_error(&e))
    }
}
