//! Per-cycle change tracking.
//!
//! Every column write records the affected height. A column's change mark
//! only descends within a cycle, and the column enters the changed list
//! exactly once — on the clean-to-dirty transition — so the list is
//! deduplicated by construction. Detection and gravity iterate this list
//! instead of the whole chain, which bounds their work to the changed area.

use super::arena::{ColumnArena, reserve_for_push};
use super::column::ColIdx;
use super::error::Result;

pub(crate) struct ChangeLog {
    cols: Vec<ColIdx>,
}

impl ChangeLog {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut cols = Vec::new();
        cols.try_reserve(capacity)
            .map_err(|_| super::error::Error::OutOfMemory {
                context: "creating the changed-column list",
            })?;
        Ok(Self { cols })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    #[inline]
    pub fn get(&self, i: usize) -> ColIdx {
        self.cols[i]
    }

    /// Record a write at height `y`: lower the column's change mark to
    /// `min(mark, y)` and list the column on its first dirtying.
    pub fn record(&mut self, arena: &mut ColumnArena, col: ColIdx, y: usize) -> Result<()> {
        let stack = arena.stack_mut(col);
        match stack.change_mark {
            Some(mark) if mark <= y => {}
            Some(_) => stack.change_mark = Some(y),
            None => {
                stack.change_mark = Some(y);
                reserve_for_push(&mut self.cols, "growing the changed-column list")?;
                self.cols.push(col);
            }
        }
        Ok(())
    }

    /// End-of-cycle reset: re-clean every listed column, clear the list.
    pub fn reset(&mut self, arena: &mut ColumnArena) {
        for &col in &self.cols {
            arena.stack_mut(col).change_mark = None;
        }
        self.cols.clear();
    }
}
