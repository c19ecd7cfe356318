//! The sparse column store: an x-ordered chain with amortized lookup.
//!
//! Columns are located through three O(1) fast paths (origin, start, end), a
//! padding-bridged extension past either extreme, or a cursor walk that
//! advances one unit per piece-stack and `size` units per padding run —
//! amortized O(distance since the last lookup), never O(range). Lookups
//! inside a padding run split it, preserving the no-adjacent-padding
//! invariant.

use log::trace;

use super::arena::ColumnArena;
use super::column::{ColIdx, ColumnData};
use super::error::{Error, Result};

pub(crate) struct ColumnChain {
    pub arena: ColumnArena,
    start: ColIdx,
    start_x: i64,
    origin: ColIdx,
    end: ColIdx,
    end_x: i64,
    cursor: ColIdx,
    cursor_x: i64,
    min_capacity: usize,
}

impl ColumnChain {
    /// A chain holding a single empty piece-stack at the origin. Origin,
    /// start and end are never padding runs.
    pub fn new(min_capacity: usize, budget: Option<usize>) -> Result<Self> {
        let mut arena = ColumnArena::new(budget);
        let origin = arena.alloc_stack(min_capacity)?;
        Ok(Self {
            arena,
            start: origin,
            start_x: 0,
            origin,
            end: origin,
            end_x: 0,
            cursor: origin,
            cursor_x: 0,
            min_capacity,
        })
    }

    /// Lowest and highest known x-positions.
    #[inline]
    pub fn bounds(&self) -> (i64, i64) {
        (self.start_x, self.end_x)
    }

    /// Iterate all nodes in ascending x order.
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            arena: &self.arena,
            next: Some(self.start),
            x: self.start_x,
        }
    }

    /// Find the piece-stack column at `x`, lazily creating columns and
    /// padding runs as needed. Padding runs are created, split, and converted,
    /// but never returned.
    pub fn locate_or_create(&mut self, x: i64) -> Result<ColIdx> {
        if x == 0 {
            return Ok(self.origin);
        }
        if x == self.end_x {
            return Ok(self.end);
        }
        if x > self.end_x {
            // Bridge any gap with a single padding run, then append.
            if self.end_x + 1 < x {
                let pad = self.arena.alloc_padding((x - self.end_x - 1) as u64)?;
                self.arena.link(self.end, pad);
                self.end = pad;
            }
            let col = self.arena.alloc_stack(self.min_capacity)?;
            self.arena.link(self.end, col);
            self.end = col;
            self.end_x = x;
            trace!("extended chain end to x={x}");
            return Ok(col);
        }
        if x == self.start_x {
            return Ok(self.start);
        }
        if x < self.start_x {
            if self.start_x - 1 > x {
                let pad = self.arena.alloc_padding((self.start_x - x - 1) as u64)?;
                self.arena.link(pad, self.start);
                self.start = pad;
            }
            let col = self.arena.alloc_stack(self.min_capacity)?;
            self.arena.link(col, self.start);
            self.start = col;
            self.start_x = x;
            trace!("extended chain start to x={x}");
            return Ok(col);
        }

        // Interior lookup: walk from the cursor. `i` is always the position
        // of `col`.
        let mut col = self.cursor;
        let mut i = self.cursor_x;
        if i <= x {
            while i < x {
                i += self.arena.node(col).data.span();
                col = self
                    .arena
                    .node(col)
                    .next
                    .ok_or(Error::CorruptChain("walked past the end of the chain"))?;
            }
        } else {
            while i > x {
                col = self
                    .arena
                    .node(col)
                    .prev
                    .ok_or(Error::CorruptChain("walked past the start of the chain"))?;
                i -= self.arena.node(col).data.span();
            }
            if i < x {
                // Overshot backward: the landing node must be a padding run
                // covering x. Step past it to reduce to the forward case.
                let ColumnData::Padding { size } = self.arena.node(col).data else {
                    return Err(Error::CorruptChain(
                        "backward walk overshot onto a piece-stack",
                    ));
                };
                i += size as i64;
                col = self
                    .arena
                    .node(col)
                    .next
                    .ok_or(Error::CorruptChain("padding run at the end of the chain"))?;
            }
        }

        if i > x {
            // `col` sits just past the padding run that covers x. Shrink the
            // run to end at x-1, splice in the new stack at x, and re-emit the
            // remainder as a fresh run when non-empty.
            let lower = self
                .arena
                .node(col)
                .prev
                .ok_or(Error::CorruptChain("overshot column has no predecessor"))?;
            let overshoot = i - x;
            {
                let node = self.arena.node_mut(lower);
                let ColumnData::Padding { size } = &mut node.data else {
                    return Err(Error::CorruptChain("forward walk overshot a piece-stack"));
                };
                debug_assert!(*size > overshoot as u64);
                *size -= overshoot as u64;
            }
            let new_col = self.arena.alloc_stack(self.min_capacity)?;
            self.arena.link(lower, new_col);
            let mut last = new_col;
            if overshoot > 1 {
                let upper = self.arena.alloc_padding((overshoot - 1) as u64)?;
                self.arena.link(new_col, upper);
                last = upper;
            }
            self.arena.link(last, col);
            trace!("split padding run around x={x}");
            col = new_col;
        } else if self.arena.node(col).data.is_padding() {
            // Landed exactly on the first position of a padding run.
            let ColumnData::Padding { size } = self.arena.node(col).data else {
                unreachable!()
            };
            if size == 1 {
                // The whole run collapses: convert in place, links unchanged.
                self.arena.convert_padding_to_stack(col, self.min_capacity)?;
            } else {
                let prev = self
                    .arena
                    .node(col)
                    .prev
                    .ok_or(Error::CorruptChain("padding run at the start of the chain"))?;
                {
                    let node = self.arena.node_mut(col);
                    let ColumnData::Padding { size } = &mut node.data else {
                        unreachable!()
                    };
                    *size -= 1;
                }
                let new_col = self.arena.alloc_stack(self.min_capacity)?;
                self.arena.link(prev, new_col);
                self.arena.link(new_col, col);
                col = new_col;
            }
            trace!("materialized column inside padding at x={x}");
        }

        self.cursor = col;
        self.cursor_x = x;
        Ok(col)
    }
}

/// Ascending-x traversal of chain nodes as `(x, ColIdx)`.
pub(crate) struct ChainIter<'a> {
    arena: &'a ColumnArena,
    next: Option<ColIdx>,
    x: i64,
}

impl Iterator for ChainIter<'_> {
    type Item = (i64, ColIdx);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let x = self.x;
        let node = self.arena.node(idx);
        self.x = x + node.data.span();
        self.next = node.next;
        Some((x, idx))
    }
}
