//! Text editing core
//!
//! Pure text editing with no knowledge of markdown, toolbars or the DOM.
//!
//! ## Modules
//!
//! - `buffer`: Line-based document storage
//! - `cursor`: Ranges and multi-range selections (offset based)
//! - `position`: Offset <-> (line, column) mapping
//! - `surface`: Transactions and the editing surface the facade drives

pub mod buffer;
pub mod cursor;
pub mod position;
pub mod surface;

// Re-exports for convenience
pub use buffer::Document;
pub use cursor::{Range, Selection, TextPos};
pub use position::{line_end_offset, line_start_offset, offset_to_position, position_to_offset};
pub use surface::{BufferSurface, Change, EditingSurface, Transaction};
