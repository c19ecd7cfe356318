//! Removal queue and gravity compaction.

use super::arena::{ColumnArena, reserve_for_push};
use super::column::{ColIdx, Piece};
use super::error::Result;
use super::tracker::ChangeLog;

/// Pending `(column, height)` removals for the current detect pass. Growable;
/// duplicate entries are allowed and harmless (applying one writes the same
/// empty marker).
pub(crate) struct RemovalQueue {
    entries: Vec<(ColIdx, usize)>,
}

impl RemovalQueue {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut entries = Vec::new();
        entries
            .try_reserve(capacity)
            .map_err(|_| super::error::Error::OutOfMemory {
                context: "creating the removal queue",
            })?;
        Ok(Self { entries })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, col: ColIdx, y: usize) -> Result<()> {
        reserve_for_push(&mut self.entries, "growing the removal queue")?;
        self.entries.push((col, y));
        Ok(())
    }
}

/// Apply every queued removal, then compact each changed column in one pass.
///
/// Compaction starts at the change mark — slots below it are untouched by
/// definition — and copies non-empty pieces down over empty slots, shrinking
/// the column by the number of slots removed. In-place only, no reallocation.
pub(crate) fn apply_gravity(
    arena: &mut ColumnArena,
    changes: &ChangeLog,
    removals: &mut RemovalQueue,
) {
    for (col, y) in removals.entries.drain(..) {
        arena.stack_mut(col).pieces[y] = Piece::EMPTY;
    }

    for i in 0..changes.len() {
        let stack = arena.stack_mut(changes.get(i));
        let mark = stack.mark_or_count();
        let mut kept = mark;
        for y in mark..stack.pieces.len() {
            let piece = stack.pieces[y];
            if !piece.is_empty() {
                stack.pieces[kept] = piece;
                kept += 1;
            }
        }
        stack.pieces.truncate(kept);
    }
}
