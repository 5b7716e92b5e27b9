//! Editor facade
//!
//! Composition root owning the editing surface, the state stores, the toolbar
//! and the action registry. Every edit goes through [`Editor::commit`], which
//! dispatches one transaction to the surface and then runs change handling:
//! revision bump, `contents` store update, autosave re-arm and, while the
//! preview is visible, a re-render.
//!
//! Asynchronous collaborators are split into begin/finish pairs
//! ([`Editor::begin_restore`], [`Editor::begin_preview_render`]) so a host can
//! await them between the two calls; results that arrive after a newer
//! request are discarded.

pub mod autosave;
pub mod hooks;
pub mod preview;

use crate::actions::{defaults::register_defaults, ActionRegistry};
use crate::error::{EditorError, HookError, StoreError};
use crate::insert;
use crate::models::{ButtonDescriptor, EditorOptions, Snippet};
use crate::store::{EventKind, ListStore, Notification, Store, SubscriptionId};
use crate::text::{BufferSurface, Change, EditingSurface, Selection, Transaction};
use crate::toolbar::{Toolbar, DEFAULT_BUTTONS};

pub use autosave::{AutosaveTicket, Debouncer};
pub use hooks::{EditorHooks, NoopHooks, Rendered};
pub use preview::{PreviewRequest, PreviewState};

/// Names of the facade's stores, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreName {
    Buttons,
    Snippets,
    SnippetsOpen,
    EditorVisible,
    PreviewVisible,
    PreviewContents,
    Contents,
}

impl StoreName {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "buttons" => Some(StoreName::Buttons),
            "snippets" => Some(StoreName::Snippets),
            "snippetsOpen" => Some(StoreName::SnippetsOpen),
            "editorVisible" => Some(StoreName::EditorVisible),
            "previewVisible" => Some(StoreName::PreviewVisible),
            "previewContents" => Some(StoreName::PreviewContents),
            "contents" => Some(StoreName::Contents),
            _ => None,
        }
    }
}

/// Snapshot of the revision a restore started at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreTicket {
    revision: u64,
}

pub struct Editor {
    options: EditorOptions,
    surface: Box<dyn EditingSurface>,
    hooks: Box<dyn EditorHooks>,
    actions: ActionRegistry,
    toolbar: Toolbar,
    snippets: ListStore<Snippet>,
    snippets_open: Store<bool>,
    editor_visible: Store<bool>,
    preview_visible: Store<bool>,
    preview_contents: Store<String>,
    contents: Store<String>,
    autosave: Debouncer,
    preview: PreviewState,
    /// Render request handed back to the host by a deferring hook
    deferred_render: Option<PreviewRequest>,
    /// Incremented on every committed content change
    revision: u64,
    initialized: bool,
}

impl Editor {
    /// Create an editor over the built-in [`BufferSurface`]
    pub fn new(options: EditorOptions, hooks: impl EditorHooks + 'static) -> Self {
        let surface = BufferSurface::with_history_limit("", options.history_limit);
        Self::with_surface(options, Box::new(surface), Box::new(hooks))
    }

    pub fn with_surface(
        options: EditorOptions,
        surface: Box<dyn EditingSurface>,
        hooks: Box<dyn EditorHooks>,
    ) -> Self {
        let mut actions = ActionRegistry::new();
        if options.default_actions {
            register_defaults(&mut actions);
        }

        let snippets = if options.snippets.enabled {
            options.snippets.list.clone()
        } else {
            Vec::new()
        };

        let text = surface.document().text();

        log::debug!(
            "editor created: {} buttons, {} actions, {} snippets",
            initial_buttons(&options).len(),
            actions.len(),
            snippets.len()
        );

        Self {
            toolbar: Toolbar::new(initial_buttons(&options)),
            autosave: Debouncer::new(options.autosave_delay_ms),
            snippets: ListStore::new("snippets", snippets),
            snippets_open: Store::new("snippetsOpen", false),
            editor_visible: Store::new("editorVisible", true),
            preview_visible: Store::new("previewVisible", false),
            preview_contents: Store::new("previewContents", String::new()),
            contents: Store::new("contents", text),
            preview: PreviewState::default(),
            deferred_render: None,
            revision: 0,
            initialized: false,
            options,
            surface,
            hooks,
            actions,
        }
    }

    // ------------------------------------------------------------------
    // Initialization
    // ------------------------------------------------------------------

    /// Load saved content (or the configured default) using the sync hook
    pub fn initialize(&mut self) -> Result<(), EditorError> {
        let ticket = self.begin_restore();
        let saved = self.hooks.retrieve_saved()?;
        self.finish_restore(ticket, saved)?;
        Ok(())
    }

    pub fn begin_restore(&self) -> RestoreTicket {
        RestoreTicket {
            revision: self.revision,
        }
    }

    /// Apply restored content; discarded if the buffer changed meanwhile
    pub fn finish_restore(
        &mut self,
        ticket: RestoreTicket,
        saved: Option<String>,
    ) -> Result<bool, EditorError> {
        if ticket.revision != self.revision {
            log::debug!(
                "discarding restored content: buffer edited since restore began (rev {} -> {})",
                ticket.revision,
                self.revision
            );
            return Ok(false);
        }

        let content = match saved {
            Some(saved) if !saved.is_empty() => saved,
            _ => self.options.default_content.clone(),
        };

        self.surface.load(&content)?;
        self.revision += 1;
        self.contents.update(content);
        self.initialized = true;
        log::info!("editor initialized (rev {})", self.revision);
        Ok(true)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ------------------------------------------------------------------
    // Contents and selection
    // ------------------------------------------------------------------

    pub fn get_contents(&self) -> String {
        self.surface.document().text()
    }

    /// Replace the whole buffer; the caret ends at the end of `text`
    pub fn set_contents(&mut self, text: &str) -> Result<(), EditorError> {
        let len = self.surface.document().len_chars();
        let caret = text.chars().count();
        self.commit(Transaction::new(
            vec![Change::new(0, len, text)],
            Selection::caret(caret),
        ))
    }

    pub fn selection(&self) -> &Selection {
        self.surface.selection()
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), EditorError> {
        self.commit(Transaction::select(selection))
    }

    /// Dispatch a transaction and run change handling if it edited text
    pub fn commit(&mut self, tx: Transaction) -> Result<(), EditorError> {
        let changed = !tx.changes.is_empty();
        self.surface.dispatch(tx)?;
        if changed {
            self.handle_change();
        }
        Ok(())
    }

    /// Change hook; hosts driving their own surface call this after edits
    pub fn handle_change(&mut self) {
        self.revision += 1;
        self.contents.update(self.surface.document().text());
        let ticket = self.autosave.touch();
        log::debug!(
            "buffer changed (rev {}), autosave generation {}",
            self.revision,
            ticket.generation
        );

        if *self.preview_visible.get() {
            self.preview.mark_stale();
            // The edit itself already succeeded; a failing renderer leaves
            // the preview stale rather than failing the edit
            if let Err(e) = self.refresh_preview() {
                log::error!("preview refresh failed: {}", e);
            }
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn surface(&self) -> &dyn EditingSurface {
        self.surface.as_ref()
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Prefix the selected line(s), see [`insert::line_prefix`]
    pub fn insert_before(&mut self, text: &str, caret_offset: Option<usize>) -> Result<(), EditorError> {
        let tx = insert::line_prefix(self.surface.document(), self.surface.selection(), text, caret_offset)?;
        self.commit(tx)?;
        self.surface.focus();
        Ok(())
    }

    /// Wrap the selection; `suffix` defaults to `prefix`
    pub fn insert_around(&mut self, prefix: &str, suffix: Option<&str>) -> Result<(), EditorError> {
        let suffix = suffix.unwrap_or(prefix);
        let tx = insert::wrap(self.surface.document(), self.surface.selection(), prefix, suffix)?;
        self.commit(tx)?;
        self.surface.focus();
        Ok(())
    }

    /// Insert at `offset`, or at the main caret
    pub fn insert_at(&mut self, text: &str, offset: Option<usize>) -> Result<(), EditorError> {
        let offset = offset.unwrap_or_else(|| self.surface.selection().main().head);
        let tx = insert::insert_at(self.surface.document(), offset, text)?;
        self.commit(tx)?;
        self.surface.focus();
        Ok(())
    }

    /// Insert on a new line after the line holding `offset` (or the main caret)
    pub fn insert_with_newline(&mut self, text: &str, offset: Option<usize>) -> Result<(), EditorError> {
        let offset = offset.unwrap_or_else(|| self.surface.selection().main().head);
        let tx = insert::insert_on_new_line(self.surface.document(), offset, text)?;
        self.commit(tx)?;
        self.surface.focus();
        Ok(())
    }

    pub fn insert_snippet(&mut self, index: usize) -> Result<(), EditorError> {
        let content = self
            .snippets
            .get(index)
            .map(|s| s.content.clone())
            .ok_or(EditorError::UnknownSnippet {
                index,
                len: self.snippets.len(),
            })?;
        self.insert_with_newline(&content, None)
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let undone = self.surface.undo()?;
        if undone {
            self.handle_change();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let redone = self.surface.redo()?;
        if redone {
            self.handle_change();
        }
        Ok(redone)
    }

    // ------------------------------------------------------------------
    // Actions and toolbar
    // ------------------------------------------------------------------

    /// Run a named action; an unknown name logs a warning and returns false
    pub fn action(&mut self, name: &str) -> Result<bool, EditorError> {
        let Some(handler) = self.actions.get(name) else {
            log::warn!("unknown action '{}'", name);
            return Ok(false);
        };
        handler(self)?;
        Ok(true)
    }

    /// Register or replace an action; returns true if one was replaced
    pub fn register_action(
        &mut self,
        name: &str,
        handler: impl Fn(&mut Editor) -> Result<(), EditorError> + 'static,
    ) -> bool {
        self.actions.register(name, handler).is_some()
    }

    pub fn deregister_action(&mut self, name: &str) -> bool {
        self.actions.deregister(name)
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn register_button(&mut self, button: ButtonDescriptor) -> usize {
        let index = self.toolbar.register(button);
        self.sync_bound_buttons();
        index
    }

    pub fn remove_button(&mut self, index: usize) -> Result<ButtonDescriptor, EditorError> {
        Ok(self.toolbar.remove(index)?)
    }

    /// Click a toolbar button: run its action, then apply toggle semantics
    ///
    /// Returns the button's toggled state afterwards.
    pub fn click_button(&mut self, index: usize) -> Result<bool, EditorError> {
        let action = self.button_action(index)?;
        self.action(&action)?;
        self.finish_click(index)
    }

    /// Action name bound to the button at `index`
    pub fn button_action(&self, index: usize) -> Result<String, EditorError> {
        self.toolbar
            .get(index)
            .map(|b| b.action.clone())
            .ok_or_else(|| {
                StoreError::IndexOutOfBounds {
                    index,
                    len: self.toolbar.len(),
                }
                .into()
            })
    }

    /// Toggle/modal bookkeeping once a button's action has run
    ///
    /// Buttons bound to editor state (`preview`, `snippets`) take their flag
    /// from that state; other toggle buttons flip. Returns the button's
    /// toggled state afterwards. Split from [`Editor::click_button`] for
    /// hosts that run the action themselves, outside the editor borrow.
    pub fn finish_click(&mut self, index: usize) -> Result<bool, EditorError> {
        let action = self.button_action(index)?;
        if self.bound_state(&action).is_some() {
            self.sync_bound_buttons();
        } else {
            let active = !self.toolbar.is_toggled(index);
            let displaced = self.toolbar.set_toggled(index, active)?;
            self.release(displaced);
        }
        Ok(self.toolbar.is_toggled(index))
    }

    /// State a toggle button bound to `action` mirrors, if any
    fn bound_state(&self, action: &str) -> Option<bool> {
        match action {
            "preview" => Some(self.is_preview_requested()),
            "snippets" => Some(self.is_snippets_open()),
            _ => None,
        }
    }

    /// Bring bound toggle buttons in line with the state they mirror
    fn sync_bound_buttons(&mut self) {
        for index in 0..self.toolbar.len() {
            let state = match self.toolbar.get(index) {
                Some(button) if button.toggle => self.bound_state(&button.action),
                _ => None,
            };
            let Some(state) = state else {
                continue;
            };
            if self.toolbar.is_toggled(index) == state {
                continue;
            }
            match self.toolbar.set_toggled(index, state) {
                Ok(displaced) => self.release(displaced),
                Err(e) => log::error!("toolbar sync failed: {}", e),
            }
        }
    }

    /// Switch off what displaced modal buttons had switched on
    fn release(&mut self, displaced: Vec<usize>) {
        for index in displaced {
            let action = self.toolbar.get(index).map(|b| b.action.clone());
            match action.as_deref() {
                Some("preview") => self.hide_preview(),
                Some("snippets") => self.set_snippets_open(false),
                _ => {}
            }
        }
    }

    pub fn disable_buttons_except(&mut self, index: usize) -> Result<(), EditorError> {
        Ok(self.toolbar.disable_buttons_except(index)?)
    }

    pub fn enable_buttons(&mut self) -> Result<(), EditorError> {
        Ok(self.toolbar.enable_buttons()?)
    }

    pub fn buttons(&self) -> &[ButtonDescriptor] {
        self.toolbar.buttons()
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    // ------------------------------------------------------------------
    // Visibility
    // ------------------------------------------------------------------

    pub fn set_editor_visibility(&mut self, visible: bool) {
        self.editor_visible.update(visible);
    }

    pub fn is_editor_visible(&self) -> bool {
        *self.editor_visible.get()
    }

    pub fn set_snippets_open(&mut self, open: bool) {
        self.snippets_open.update(open);
        self.sync_bound_buttons();
    }

    pub fn toggle_snippets(&mut self) {
        self.snippets_open.modify(|open| !open);
        self.sync_bound_buttons();
    }

    pub fn is_snippets_open(&self) -> bool {
        *self.snippets_open.get()
    }

    pub fn snippets(&self) -> &[Snippet] {
        self.snippets.items()
    }

    // ------------------------------------------------------------------
    // Preview
    // ------------------------------------------------------------------

    /// Start rendering the current contents; `show` reveals the pane once
    /// this request completes
    pub fn begin_preview_render(&mut self, show: bool) -> PreviewRequest {
        let source = self.get_contents();
        let request = self.preview.begin(source, show);
        if show {
            self.sync_bound_buttons();
        }
        request
    }

    /// Apply a render result; returns false if the request was superseded
    pub fn finish_preview_render(
        &mut self,
        generation: u64,
        result: Result<String, HookError>,
    ) -> Result<bool, EditorError> {
        if !self.preview.is_current(generation) {
            log::debug!("discarding stale preview render (generation {})", generation);
            return Ok(false);
        }

        let html = match result {
            Ok(html) => html,
            Err(e) => {
                self.preview.abandon();
                self.sync_bound_buttons();
                return Err(e.into());
            }
        };
        self.preview_contents.update(html);
        if self.preview.complete() {
            self.preview_visible.update(true);
        }
        self.sync_bound_buttons();
        Ok(true)
    }

    /// Render the current contents, then show the pane
    ///
    /// With a deferring renderer the pane appears once the host completes
    /// the request handed out by [`Editor::take_deferred_render`].
    pub fn show_preview(&mut self) -> Result<(), EditorError> {
        let request = self.begin_preview_render(true);
        self.render(request)?;
        self.sync_bound_buttons();
        Ok(())
    }

    pub fn hide_preview(&mut self) {
        self.preview.invalidate();
        self.deferred_render = None;
        self.preview_visible.update(false);
        self.sync_bound_buttons();
    }

    fn render(&mut self, request: PreviewRequest) -> Result<bool, EditorError> {
        match self.hooks.render(&request.source) {
            Ok(Rendered::Ready(html)) => self.finish_preview_render(request.generation, Ok(html)),
            Ok(Rendered::Deferred) => {
                self.deferred_render = Some(request);
                Ok(false)
            }
            Err(e) => self.finish_preview_render(request.generation, Err(e)),
        }
    }

    /// Render request awaiting an asynchronous host renderer
    pub fn take_deferred_render(&mut self) -> Option<PreviewRequest> {
        self.deferred_render.take()
    }

    pub fn set_preview_visibility(&mut self, visible: bool) -> Result<(), EditorError> {
        if visible {
            self.show_preview()
        } else {
            self.hide_preview();
            Ok(())
        }
    }

    /// Hide a shown or pending preview, otherwise show it
    pub fn toggle_preview(&mut self) -> Result<(), EditorError> {
        let requested = self.is_preview_requested();
        self.set_preview_visibility(!requested)
    }

    /// Re-render a visible preview whose source changed; returns whether
    /// new markup was applied
    pub fn refresh_preview(&mut self) -> Result<bool, EditorError> {
        if !self.is_preview_visible() || !self.preview.is_stale() {
            return Ok(false);
        }
        let request = self.begin_preview_render(false);
        self.render(request)
    }

    pub fn is_preview_visible(&self) -> bool {
        *self.preview_visible.get()
    }

    /// Visible, or about to be once an in-flight render completes
    pub fn is_preview_requested(&self) -> bool {
        self.is_preview_visible() || self.preview.is_show_pending()
    }

    pub fn is_preview_stale(&self) -> bool {
        self.preview.is_stale()
    }

    pub fn preview_contents(&self) -> &str {
        self.preview_contents.get()
    }

    // ------------------------------------------------------------------
    // Autosave and lifecycle
    // ------------------------------------------------------------------

    /// Ticket the host should fire after its delay, if a save is pending
    pub fn pending_autosave(&self) -> Option<AutosaveTicket> {
        self.autosave.pending()
    }

    /// Fire an autosave ticket; only the latest one calls the hook
    pub fn run_autosave(&mut self, ticket: AutosaveTicket) -> Result<bool, EditorError> {
        if !self.autosave.fire(ticket) {
            return Ok(false);
        }
        self.hooks.autosave(&self.get_contents())?;
        Ok(true)
    }

    pub fn done(&mut self) {
        self.hooks.on_done(&self.get_contents());
    }

    pub fn exit(&mut self) {
        self.hooks.on_exit(&self.get_contents());
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    pub fn on_buttons(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&Notification<ButtonDescriptor>) -> Result<(), String> + 'static,
    ) -> SubscriptionId {
        self.toolbar.on(kind, callback)
    }

    pub fn on_snippets(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&Notification<Snippet>) -> Result<(), String> + 'static,
    ) -> SubscriptionId {
        self.snippets.on(kind, callback)
    }

    pub fn on_snippets_open(
        &mut self,
        callback: impl FnMut(&Notification<bool>) -> Result<(), String> + 'static,
    ) -> SubscriptionId {
        self.snippets_open.on(EventKind::Update, callback)
    }

    pub fn on_editor_visible(
        &mut self,
        callback: impl FnMut(&Notification<bool>) -> Result<(), String> + 'static,
    ) -> SubscriptionId {
        self.editor_visible.on(EventKind::Update, callback)
    }

    pub fn on_preview_visible(
        &mut self,
        callback: impl FnMut(&Notification<bool>) -> Result<(), String> + 'static,
    ) -> SubscriptionId {
        self.preview_visible.on(EventKind::Update, callback)
    }

    pub fn on_preview_contents(
        &mut self,
        callback: impl FnMut(&Notification<String>) -> Result<(), String> + 'static,
    ) -> SubscriptionId {
        self.preview_contents.on(EventKind::Update, callback)
    }

    pub fn on_contents(
        &mut self,
        callback: impl FnMut(&Notification<String>) -> Result<(), String> + 'static,
    ) -> SubscriptionId {
        self.contents.on(EventKind::Update, callback)
    }

    pub fn off(&mut self, store: StoreName, id: SubscriptionId) -> bool {
        match store {
            StoreName::Buttons => self.toolbar.off(id),
            StoreName::Snippets => self.snippets.off(id),
            StoreName::SnippetsOpen => self.snippets_open.off(id),
            StoreName::EditorVisible => self.editor_visible.off(id),
            StoreName::PreviewVisible => self.preview_visible.off(id),
            StoreName::PreviewContents => self.preview_contents.off(id),
            StoreName::Contents => self.contents.off(id),
        }
    }
}

/// Toolbar contents implied by the options
fn initial_buttons(options: &EditorOptions) -> Vec<ButtonDescriptor> {
    if !options.toolbar.enabled {
        return Vec::new();
    }

    let mut buttons: Vec<ButtonDescriptor> = if options.toolbar.use_defaults {
        DEFAULT_BUTTONS
            .iter()
            .filter(|b| options.snippets.enabled || b.action != "snippets")
            .cloned()
            .collect()
    } else {
        Vec::new()
    };
    buttons.extend(options.toolbar.buttons.iter().cloned());
    buttons
}
