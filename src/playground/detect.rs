//! Incremental line detection over changed columns.
//!
//! A detect pass scans only columns in the changed list, and within each
//! column only heights from its change mark upward — O(changed area), never
//! O(board). The board was line-free before the cycle's first write, so any
//! new run must pass through a changed slot, and scanning outward from
//! changed slots finds every run in full.
//!
//! Queuing a removal records a change, so columns that receive removals are
//! guaranteed to be compacted by the following gravity phase. Columns first
//! dirtied mid-pass are appended to the list and scanned before the pass
//! ends.

use super::arena::ColumnArena;
use super::column::{ColIdx, ColumnData, Piece};
use super::error::{Error, Result};
use super::gravity::RemovalQueue;
use super::tracker::ChangeLog;

/// Minimum run length that forms a clearable line.
pub const MIN_LINE_LEN: usize = 4;

/// One detection pass: queue every piece of every run of at least
/// [`MIN_LINE_LEN`] identical colors along the four axes.
pub(crate) fn detect_lines(
    arena: &mut ColumnArena,
    changes: &mut ChangeLog,
    removals: &mut RemovalQueue,
) -> Result<()> {
    // Index loop: the list grows while we iterate.
    let mut i = 0;
    while i < changes.len() {
        let col = changes.get(i);
        scan_crossing_runs(arena, changes, removals, col)?;
        scan_vertical_runs(arena, changes, removals, col)?;
        i += 1;
    }
    Ok(())
}

/// Does the run of `piece` continue into `col` at height `y`?
///
/// Padding runs, missing columns, and out-of-range heights all end a run.
#[inline]
fn run_continues(arena: &ColumnArena, col: ColIdx, y: i64, piece: Piece) -> bool {
    let ColumnData::Pieces(stack) = &arena.node(col).data else {
        return false;
    };
    y >= 0 && (y as usize) < stack.count() && stack.piece(y as usize) == piece
}

/// Queue `(col, y)` for removal and record the write. Duplicates are
/// harmless: applying a removal twice writes the same empty marker.
fn queue_removal(
    arena: &mut ColumnArena,
    changes: &mut ChangeLog,
    removals: &mut RemovalQueue,
    col: ColIdx,
    y: usize,
) -> Result<()> {
    removals.push(col, y)?;
    changes.record(arena, col, y)
}

/// Horizontal and diagonal runs crossing this column's dirty heights.
///
/// For each dirty height and each direction (falling diagonal, horizontal,
/// climbing diagonal), extend forward through `next` links and backward
/// through `prev` links while the neighbor holds the same color at the
/// stepped height, then queue the whole run if it is long enough.
fn scan_crossing_runs(
    arena: &mut ColumnArena,
    changes: &mut ChangeLog,
    removals: &mut RemovalQueue,
    col: ColIdx,
) -> Result<()> {
    let (mark, count) = {
        let stack = arena.stack(col);
        (stack.mark_or_count(), stack.count())
    };

    for y in mark..count {
        let piece = arena.stack(col).piece(y);
        debug_assert!(!piece.is_empty());

        for dy in [-1i64, 0, 1] {
            let mut len = 1usize;

            let mut end = col;
            let mut next = arena.node(col).next;
            let mut ny = y as i64 + dy;
            while let Some(n) = next {
                if !run_continues(arena, n, ny, piece) {
                    break;
                }
                end = n;
                next = arena.node(n).next;
                ny += dy;
                len += 1;
            }

            let mut begin = col;
            let mut prev = arena.node(col).prev;
            let mut by = y as i64 - dy;
            while let Some(p) = prev {
                if !run_continues(arena, p, by, piece) {
                    break;
                }
                begin = p;
                prev = arena.node(p).prev;
                by -= dy;
                len += 1;
            }

            if len < MIN_LINE_LEN {
                continue;
            }

            // Queue the run from its lowest-x column to its highest.
            let mut c = begin;
            let mut qy = by + dy;
            loop {
                queue_removal(arena, changes, removals, c, qy as usize)?;
                if c == end {
                    break;
                }
                c = arena
                    .node(c)
                    .next
                    .ok_or(Error::CorruptChain("line run truncated mid-walk"))?;
                qy += dy;
            }
        }
    }
    Ok(())
}

/// Vertical runs in this column, in one top-down pass.
///
/// Tracks a running color and length; on reaching exactly [`MIN_LINE_LEN`]
/// all members are queued, and every further matching piece is queued as the
/// scan continues. A color change resets the run only at or above the change
/// mark (re-read live — queuing lowers it mid-scan); once a non-matching
/// piece sits strictly below the mark, older runs were resolved in a prior
/// cycle and the scan stops.
fn scan_vertical_runs(
    arena: &mut ColumnArena,
    changes: &mut ChangeLog,
    removals: &mut RemovalQueue,
    col: ColIdx,
) -> Result<()> {
    let count = arena.stack(col).count();
    let mut run_color = Piece::EMPTY;
    let mut run_len = 0usize;

    for y in (0..count).rev() {
        let piece = arena.stack(col).piece(y);
        if piece == run_color {
            run_len += 1;
            if run_len == MIN_LINE_LEN {
                for j in 0..MIN_LINE_LEN {
                    queue_removal(arena, changes, removals, col, y + j)?;
                }
            } else if run_len > MIN_LINE_LEN {
                queue_removal(arena, changes, removals, col, y)?;
            }
        } else if y >= arena.stack(col).mark_or_count() {
            run_color = piece;
            run_len = 1;
        } else {
            break;
        }
    }
    Ok(())
}
