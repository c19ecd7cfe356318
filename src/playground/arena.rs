//! Handle-addressed storage for column nodes.
//!
//! Every column lives in a single `Vec` and is reached through its [`ColIdx`]
//! handle. Adjacency and all cached references (start/origin/end/cursor) are
//! handles too, so neither arena growth nor piece-storage growth can
//! invalidate an outstanding reference. Nodes are never freed: a column, once
//! materialized, stays for the lifetime of the playground.

use super::column::{ColIdx, ColumnData, ColumnNode, PieceStack};
use super::error::{Error, Result};

pub(crate) struct ColumnArena {
    nodes: Vec<ColumnNode>,
    budget: Option<usize>,
}

impl ColumnArena {
    pub fn new(budget: Option<usize>) -> Self {
        Self {
            nodes: Vec::new(),
            budget,
        }
    }

    fn push_node(&mut self, node: ColumnNode) -> Result<ColIdx> {
        if let Some(budget) = self.budget {
            if self.nodes.len() >= budget {
                return Err(Error::OutOfMemory {
                    context: "creating a column (budget exhausted)",
                });
            }
        }
        reserve_for_push(&mut self.nodes, "creating a column")?;
        let idx = ColIdx(self.nodes.len() as u32);
        self.nodes.push(node);
        Ok(idx)
    }

    /// Allocate an unlinked, empty piece-stack column.
    pub fn alloc_stack(&mut self, capacity: usize) -> Result<ColIdx> {
        let stack = PieceStack::with_capacity(capacity)?;
        self.push_node(ColumnNode {
            prev: None,
            next: None,
            data: ColumnData::Pieces(stack),
        })
    }

    /// Allocate an unlinked padding run covering `size` positions.
    pub fn alloc_padding(&mut self, size: u64) -> Result<ColIdx> {
        debug_assert!(size >= 1);
        self.push_node(ColumnNode {
            prev: None,
            next: None,
            data: ColumnData::Padding { size },
        })
    }

    #[inline]
    pub fn node(&self, idx: ColIdx) -> &ColumnNode {
        &self.nodes[idx.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, idx: ColIdx) -> &mut ColumnNode {
        &mut self.nodes[idx.index()]
    }

    /// The piece-stack at `idx`. Calling this on a padding run is a defect.
    #[inline]
    pub fn stack(&self, idx: ColIdx) -> &PieceStack {
        match &self.nodes[idx.index()].data {
            ColumnData::Pieces(stack) => stack,
            ColumnData::Padding { .. } => unreachable!("piece access on a padding run"),
        }
    }

    #[inline]
    pub fn stack_mut(&mut self, idx: ColIdx) -> &mut PieceStack {
        match &mut self.nodes[idx.index()].data {
            ColumnData::Pieces(stack) => stack,
            ColumnData::Padding { .. } => unreachable!("piece access on a padding run"),
        }
    }

    /// Link `b` directly after `a`.
    #[inline]
    pub fn link(&mut self, a: ColIdx, b: ColIdx) {
        self.nodes[a.index()].next = Some(b);
        self.nodes[b.index()].prev = Some(a);
    }

    /// Turn a size-1 padding run into an empty piece-stack without touching
    /// its links. Replaces free-and-splice: every outstanding handle to the
    /// node stays valid.
    pub fn convert_padding_to_stack(&mut self, idx: ColIdx, capacity: usize) -> Result<()> {
        let stack = PieceStack::with_capacity(capacity)?;
        let node = &mut self.nodes[idx.index()];
        debug_assert!(matches!(node.data, ColumnData::Padding { size: 1 }));
        node.data = ColumnData::Pieces(stack);
        Ok(())
    }
}

/// Fallible growth for auxiliary lists: reserve before a push that would
/// reallocate, doubling the capacity.
pub(crate) fn reserve_for_push<T>(buf: &mut Vec<T>, context: &'static str) -> Result<()> {
    if buf.len() == buf.capacity() {
        let additional = buf.capacity().max(1);
        buf.try_reserve(additional)
            .map_err(|_| Error::OutOfMemory { context })?;
    }
    Ok(())
}
