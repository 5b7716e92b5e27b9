//! Default toolbar button table

use crate::models::ButtonDescriptor;
use once_cell::sync::Lazy;

/// Buttons shown when `toolbar.useDefaults` is on, in display order
pub static DEFAULT_BUTTONS: Lazy<Vec<ButtonDescriptor>> = Lazy::new(|| {
    vec![
        ButtonDescriptor::new("heading", "title", "Heading", "Insert a heading"),
        ButtonDescriptor::new("bold", "format_bold", "Bold", "Bold text"),
        ButtonDescriptor::new("italic", "format_italic", "Italic", "Italic text"),
        ButtonDescriptor::new("strikethrough", "strikethrough_s", "Strikethrough", "Strike through text"),
        ButtonDescriptor::new("quote", "format_quote", "Quote", "Block quote"),
        ButtonDescriptor::new("code", "code", "Code", "Inline code"),
        ButtonDescriptor::new("link", "link", "Link", "Insert a link"),
        ButtonDescriptor::new("image", "image", "Image", "Insert an image"),
        ButtonDescriptor::new("unorderedList", "format_list_bulleted", "Bulleted list", "Bulleted list item"),
        ButtonDescriptor::new("orderedList", "format_list_numbered", "Numbered list", "Numbered list item"),
        ButtonDescriptor::new("undo", "undo", "Undo", "Undo the last edit"),
        ButtonDescriptor::new("redo", "redo", "Redo", "Redo the last undone edit"),
        ButtonDescriptor::new("snippets", "library_add", "Snippets", "Show snippets").toggle(),
        ButtonDescriptor::new("preview", "visibility", "Preview", "Toggle preview").modal(),
        ButtonDescriptor::new("done", "done", "Done", "Finish editing"),
        ButtonDescriptor::new("exit", "close", "Exit", "Close the editor"),
    ]
});
