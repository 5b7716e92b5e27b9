// Toolbar toggle and modal semantics driven through Editor::click_button

use markdown_editor_wasm::editor::{Editor, EditorHooks, NoopHooks, Rendered};
use markdown_editor_wasm::error::HookError;
use markdown_editor_wasm::models::{ButtonDescriptor, EditorOptions};
use markdown_editor_wasm::store::{EventKind, StoreEvent};
use std::cell::RefCell;
use std::rc::Rc;

fn editor() -> Editor {
    Editor::new(EditorOptions::default(), NoopHooks)
}

/// Renderer that always completes later, through the host
struct DeferredRenderer;

impl EditorHooks for DeferredRenderer {
    fn render(&self, _text: &str) -> Result<Rendered, HookError> {
        Ok(Rendered::Deferred)
    }
}

struct BrokenRenderer;

impl EditorHooks for BrokenRenderer {
    fn render(&self, _text: &str) -> Result<Rendered, HookError> {
        Err(HookError::Failed("renderer offline".to_string()))
    }
}

fn index_of(editor: &Editor, action: &str) -> usize {
    editor.toolbar().position(action).unwrap()
}

fn disabled(editor: &Editor) -> Vec<usize> {
    editor
        .buttons()
        .iter()
        .enumerate()
        .filter(|(_, b)| b.disabled)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn test_preview_is_modal() {
    let mut editor = editor();
    editor.set_contents("# Title").unwrap();
    let preview = index_of(&editor, "preview");

    assert!(editor.click_button(preview).unwrap());
    assert!(editor.is_preview_visible());
    assert_eq!(editor.preview_contents(), "# Title");
    assert_eq!(disabled(&editor).len(), editor.buttons().len() - 1);
    assert!(!editor.buttons()[preview].disabled);

    assert!(!editor.click_button(preview).unwrap());
    assert!(!editor.is_preview_visible());
    assert!(disabled(&editor).is_empty());
}

#[test]
fn test_second_modal_turns_first_off() {
    let mut editor = editor();
    let preview = index_of(&editor, "preview");
    let fullscreen = editor.register_button(
        ButtonDescriptor::new("fullscreen", "fullscreen", "Fullscreen", "Fill the window").modal(),
    );
    editor.register_action("fullscreen", |_| Ok(()));

    editor.click_button(preview).unwrap();
    assert!(editor.toolbar().is_toggled(preview));

    assert!(editor.click_button(fullscreen).unwrap());
    assert!(!editor.toolbar().is_toggled(preview));
    assert!(editor.toolbar().is_toggled(fullscreen));
    assert!(editor.buttons()[preview].disabled);
    assert!(!editor.buttons()[fullscreen].disabled);
    // The displaced modal takes its pane down with it
    assert!(!editor.is_preview_visible());
}

#[test]
fn test_preview_shown_without_toolbar_then_clicked() {
    let mut editor = editor();
    let preview = index_of(&editor, "preview");

    editor.set_preview_visibility(true).unwrap();
    assert!(editor.toolbar().is_toggled(preview));
    assert_eq!(disabled(&editor).len(), editor.buttons().len() - 1);

    assert!(!editor.click_button(preview).unwrap());
    assert!(!editor.is_preview_visible());
    assert!(!editor.toolbar().is_toggled(preview));
    assert!(disabled(&editor).is_empty());
}

#[test]
fn test_preview_hidden_without_toolbar_unlocks_buttons() {
    let mut editor = editor();
    let preview = index_of(&editor, "preview");
    editor.click_button(preview).unwrap();

    editor.hide_preview();

    assert!(!editor.toolbar().is_toggled(preview));
    assert!(disabled(&editor).is_empty());
}

#[test]
fn test_second_click_cancels_pending_preview() {
    let mut editor = Editor::new(EditorOptions::default(), DeferredRenderer);
    editor.set_contents("text").unwrap();
    let preview = index_of(&editor, "preview");

    assert!(editor.click_button(preview).unwrap());
    assert!(!editor.is_preview_visible());
    assert!(editor.is_preview_requested());
    let request = editor.take_deferred_render().unwrap();

    assert!(!editor.click_button(preview).unwrap());
    assert!(!editor.is_preview_requested());
    assert!(!editor.toolbar().is_toggled(preview));
    assert!(disabled(&editor).is_empty());

    // The render that was in flight arrives too late to reopen the pane
    assert!(!editor
        .finish_preview_render(request.generation, Ok("<p>text</p>".to_string()))
        .unwrap());
    assert!(!editor.is_preview_visible());
}

#[test]
fn test_failed_render_leaves_toolbar_unlocked() {
    let mut editor = Editor::new(EditorOptions::default(), BrokenRenderer);
    let preview = index_of(&editor, "preview");

    assert!(editor.click_button(preview).is_err());

    assert!(!editor.is_preview_visible());
    assert!(!editor.toolbar().is_toggled(preview));
    assert!(disabled(&editor).is_empty());
}

#[test]
fn test_snippets_button_follows_drawer_state() {
    let mut editor = editor();
    let snippets = index_of(&editor, "snippets");

    editor.set_snippets_open(true);
    assert!(editor.toolbar().is_toggled(snippets));

    assert!(!editor.click_button(snippets).unwrap());
    assert!(!editor.is_snippets_open());
    assert!(!editor.toolbar().is_toggled(snippets));
}

#[test]
fn test_snippets_toggle_is_not_modal() {
    let mut editor = editor();
    let snippets = index_of(&editor, "snippets");

    assert!(editor.click_button(snippets).unwrap());
    assert!(editor.is_snippets_open());
    assert!(disabled(&editor).is_empty());

    assert!(!editor.click_button(snippets).unwrap());
    assert!(!editor.is_snippets_open());
}

#[test]
fn test_plain_button_never_toggles() {
    let mut editor = editor();
    let bold = index_of(&editor, "bold");

    assert!(!editor.click_button(bold).unwrap());
    assert!(!editor.click_button(bold).unwrap());
    assert!(!editor.toolbar().is_toggled(bold));
}

#[test]
fn test_click_out_of_range() {
    let mut editor = editor();
    let len = editor.buttons().len();
    assert!(editor.click_button(len).is_err());
}

#[test]
fn test_disable_emits_change_events() {
    let mut editor = editor();
    let changed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changed);
    editor.on_buttons(EventKind::Change, move |n| {
        if let StoreEvent::Change { index, item } = &n.event {
            sink.borrow_mut().push((*index, item.disabled));
        }
        Ok(())
    });

    editor.disable_buttons_except(0).unwrap();

    let changed = changed.borrow();
    assert_eq!(changed.len(), editor.buttons().len() - 1);
    assert!(changed.iter().all(|(i, d)| *i != 0 && *d));
}

#[test]
fn test_failing_subscriber_does_not_block_others() {
    let mut editor = editor();
    let delivered = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&delivered);

    editor.on_snippets_open(|_| Err("subscriber failed".to_string()));
    editor.on_snippets_open(move |_| {
        *counter.borrow_mut() += 1;
        Ok(())
    });

    editor.toggle_snippets();
    editor.toggle_snippets();

    assert_eq!(*delivered.borrow(), 2);
}

#[test]
fn test_toolbar_options() {
    let mut options = EditorOptions::default();
    options.toolbar.use_defaults = false;
    options.toolbar.buttons = vec![ButtonDescriptor::new("bold", "format_bold", "Bold", "")];
    let mut editor = Editor::new(options, NoopHooks);

    assert_eq!(editor.buttons().len(), 1);
    editor.set_contents("x").unwrap();
    editor.click_button(0).unwrap();
    assert_eq!(editor.get_contents(), "x****");
}
