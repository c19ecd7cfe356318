//! Column data structures for the playground.
//!
//! A column is either a piece-stack (an owned, growable stack of colored
//! pieces at one x-position) or a padding run (a run-length-encoded gap of
//! never-touched positions). Nodes live in an arena and reference each other
//! through `ColIdx` handles, so growing a stack's backing storage never
//! invalidates anything.

use super::error::{Error, Result};

/// A colored piece, or the transient empty marker.
///
/// Valid colors are `0..=253`. 254 is reserved and 255 is the empty marker;
/// neither can be constructed through [`Piece::new`]. Empty pieces exist only
/// between removal application and gravity compaction and are never visible
/// through the read accessors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    /// Sentinel written into slots queued for removal.
    pub(crate) const EMPTY: Piece = Piece(255);

    /// Highest valid color code.
    pub const MAX_COLOR: u8 = 253;

    /// A piece of the given color, or `None` for the reserved codes 254/255.
    pub fn new(color: u8) -> Option<Piece> {
        if color <= Self::MAX_COLOR {
            Some(Piece(color))
        } else {
            None
        }
    }

    #[inline]
    pub fn color(self) -> u8 {
        self.0
    }

    #[inline]
    pub(crate) fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }
}

/// Handle to a column node in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColIdx(pub(crate) u32);

impl ColIdx {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A piece-stack column: bottom-to-top piece slots plus the change mark.
///
/// `change_mark` is the lowest height modified since the last stabilization
/// reset; `None` is the clean state (the dirty range `mark..count` is empty).
pub(crate) struct PieceStack {
    pub pieces: Vec<Piece>,
    pub change_mark: Option<usize>,
}

impl PieceStack {
    /// Exact reservation: the configured capacity is what the `capacity`
    /// accessor reports, even for small values the amortized path would
    /// round up.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut pieces = Vec::new();
        pieces
            .try_reserve_exact(capacity)
            .map_err(|_| Error::OutOfMemory {
                context: "creating a column",
            })?;
        Ok(Self {
            pieces,
            change_mark: None,
        })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.pieces.capacity()
    }

    #[inline]
    pub fn piece(&self, y: usize) -> Piece {
        self.pieces[y]
    }

    /// Scan floor: the change mark, or `count` when clean.
    #[inline]
    pub fn mark_or_count(&self) -> usize {
        self.change_mark.unwrap_or(self.pieces.len())
    }

    /// Append a piece at the current top, doubling capacity when full.
    /// Returns the height the piece landed at.
    pub fn push(&mut self, piece: Piece) -> Result<usize> {
        if self.pieces.len() == self.pieces.capacity() {
            let additional = self.pieces.capacity().max(1);
            self.pieces
                .try_reserve(additional)
                .map_err(|_| Error::OutOfMemory {
                    context: "expanding a column",
                })?;
        }
        let y = self.pieces.len();
        self.pieces.push(piece);
        Ok(y)
    }
}

/// Payload of a column node.
pub(crate) enum ColumnData {
    /// A materialized piece-stack occupying exactly one x-position.
    Pieces(PieceStack),
    /// `size` consecutive x-positions that have never been touched.
    Padding { size: u64 },
}

impl ColumnData {
    /// Number of x-positions this node covers.
    #[inline]
    pub fn span(&self) -> i64 {
        match self {
            ColumnData::Pieces(_) => 1,
            ColumnData::Padding { size } => *size as i64,
        }
    }

    #[inline]
    pub fn is_padding(&self) -> bool {
        matches!(self, ColumnData::Padding { .. })
    }
}

/// A node in the doubly linked, strictly x-ordered column chain.
pub(crate) struct ColumnNode {
    pub prev: Option<ColIdx>,
    pub next: Option<ColIdx>,
    pub data: ColumnData,
}
