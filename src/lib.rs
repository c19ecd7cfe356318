//! Sparse unbounded column playground with line clearing and gravity.
//!
//! Colored pieces are dropped into columns indexed by arbitrary signed
//! x-positions. Whenever four or more identically-colored pieces form a
//! contiguous run along a horizontal, vertical, or diagonal axis, the run is
//! cleared and the pieces above fall to close the gaps; clearing and gravity
//! repeat until the board is stable. The column store is sparse: untouched
//! gaps between columns are run-length encoded, so memory scales with the
//! positions ever touched, not with the coordinate range.

pub mod playground;

pub use playground::{
    ColumnView, Columns, Error, MIN_LINE_LEN, Piece, Playground, PlaygroundConfig, Result,
};
