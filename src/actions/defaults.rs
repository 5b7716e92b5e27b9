//! Built-in markdown actions

use super::ActionRegistry;

/// Register the default markdown actions
pub fn register_defaults(registry: &mut ActionRegistry) {
    registry.register("heading", |editor| editor.insert_before("# ", None));
    registry.register("bold", |editor| editor.insert_around("**", None));
    registry.register("italic", |editor| editor.insert_around("_", None));
    registry.register("strikethrough", |editor| editor.insert_around("~~", None));
    registry.register("code", |editor| editor.insert_around("`", None));
    registry.register("quote", |editor| editor.insert_before("> ", None));
    registry.register("unorderedList", |editor| editor.insert_before("- ", None));
    registry.register("orderedList", |editor| editor.insert_before("1. ", None));
    registry.register("link", |editor| editor.insert_around("[", Some("](url)")));
    registry.register("image", |editor| editor.insert_around("![", Some("](url)")));

    registry.register("undo", |editor| editor.undo().map(|_| ()));
    registry.register("redo", |editor| editor.redo().map(|_| ()));

    registry.register("snippets", |editor| {
        editor.toggle_snippets();
        Ok(())
    });
    registry.register("preview", |editor| editor.toggle_preview());

    registry.register("done", |editor| {
        editor.done();
        Ok(())
    });
    registry.register("exit", |editor| {
        editor.exit();
        Ok(())
    });
}

/// Names registered by [`register_defaults`]
pub const DEFAULT_ACTIONS: &[&str] = &[
    "heading",
    "bold",
    "italic",
    "strikethrough",
    "code",
    "quote",
    "unorderedList",
    "orderedList",
    "link",
    "image",
    "undo",
    "redo",
    "snippets",
    "preview",
    "done",
    "exit",
];
