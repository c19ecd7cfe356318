//! Columnfall engine internals and public API.

mod arena;
mod chain;
mod column;
mod detect;
mod engine;
mod error;
mod gravity;
mod tracker;

pub use column::Piece;
pub use detect::MIN_LINE_LEN;
pub use engine::{ColumnView, Columns, Playground, PlaygroundConfig};
pub use error::{Error, Result};
