//! Playground facade: placement, stabilization, and board accessors.

use log::debug;

use super::chain::{ChainIter, ColumnChain};
use super::column::{ColumnData, Piece};
use super::detect::detect_lines;
use super::error::Result;
use super::gravity::{RemovalQueue, apply_gravity};
use super::tracker::ChangeLog;

/// Initial piece capacity of a freshly created column.
const DEFAULT_MIN_COLUMN_CAPACITY: usize = 8;
/// Initial capacity of the changed-column list.
const DEFAULT_CHANGE_LIST_CAPACITY: usize = 80;
/// Initial capacity of the removal queue.
const DEFAULT_REMOVAL_QUEUE_CAPACITY: usize = 80;

/// Playground tuning knobs. All values have working defaults.
#[derive(Clone, Copy, Debug)]
pub struct PlaygroundConfig {
    min_column_capacity: usize,
    change_list_capacity: usize,
    removal_queue_capacity: usize,
    column_budget: Option<usize>,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            min_column_capacity: DEFAULT_MIN_COLUMN_CAPACITY,
            change_list_capacity: DEFAULT_CHANGE_LIST_CAPACITY,
            removal_queue_capacity: DEFAULT_REMOVAL_QUEUE_CAPACITY,
            column_budget: None,
        }
    }
}

impl PlaygroundConfig {
    /// Initial piece capacity of new columns, reserved exactly. Growth
    /// doubles from whatever capacity the column holds when it fills.
    pub fn min_column_capacity(mut self, n: usize) -> Self {
        self.min_column_capacity = n.max(1);
        self
    }

    pub fn change_list_capacity(mut self, n: usize) -> Self {
        self.change_list_capacity = n;
        self
    }

    pub fn removal_queue_capacity(mut self, n: usize) -> Self {
        self.removal_queue_capacity = n;
        self
    }

    /// Hard cap on the number of column nodes (stacks and padding runs).
    /// Exceeding it surfaces [`Error::OutOfMemory`](super::Error::OutOfMemory)
    /// from the operation that needed the node.
    pub fn column_budget(mut self, n: usize) -> Self {
        self.column_budget = Some(n);
        self
    }
}

/// One column as seen through the read accessors.
pub enum ColumnView<'a> {
    /// A piece-stack: bottom-to-top slots plus its allocated capacity.
    Pieces {
        pieces: &'a [Piece],
        capacity: usize,
    },
    /// A run of `size` consecutive positions that have never been touched.
    Padding { size: u64 },
}

/// The playground: an unbounded, sparse row of piece columns.
///
/// Dropping a piece with [`place`](Playground::place) runs a full
/// stabilization cycle — lines of four or more identical colors along any of
/// the four axes are cleared and gravity closes the gaps, repeatedly, until
/// the board is stable. All mutation is serialized through `&mut self`; the
/// playground exclusively owns every column and both auxiliary lists.
pub struct Playground {
    chain: ColumnChain,
    changes: ChangeLog,
    removals: RemovalQueue,
    placements: u64,
}

impl Playground {
    pub fn new() -> Result<Self> {
        Self::with_config(PlaygroundConfig::default())
    }

    pub fn with_config(config: PlaygroundConfig) -> Result<Self> {
        Ok(Self {
            chain: ColumnChain::new(config.min_column_capacity, config.column_budget)?,
            changes: ChangeLog::with_capacity(config.change_list_capacity)?,
            removals: RemovalQueue::with_capacity(config.removal_queue_capacity)?,
            placements: 0,
        })
    }

    /// Drop `piece` onto the top of the column at `x` and stabilize.
    ///
    /// Runs place → detect → (gravity → detect)* until a detect pass queues
    /// nothing, then resets all change tracking. Line geometry is always
    /// evaluated against a fully settled board. Errors are fatal: the
    /// playground may be mid-edit and must only be dropped.
    pub fn place(&mut self, x: i64, piece: Piece) -> Result<()> {
        let col = self.chain.locate_or_create(x)?;
        let y = self.chain.arena.stack_mut(col).push(piece)?;
        self.changes.record(&mut self.chain.arena, col, y)?;

        let mut passes = 0u32;
        let mut cleared = 0usize;
        detect_lines(&mut self.chain.arena, &mut self.changes, &mut self.removals)?;
        while !self.removals.is_empty() {
            passes += 1;
            cleared += self.removals.len();
            apply_gravity(&mut self.chain.arena, &self.changes, &mut self.removals);
            detect_lines(&mut self.chain.arena, &mut self.changes, &mut self.removals)?;
        }
        if cleared > 0 {
            debug!("placement at x={x}: {cleared} removals over {passes} gravity passes");
        }

        self.changes.reset(&mut self.chain.arena);
        self.placements += 1;
        Ok(())
    }

    /// Lowest and highest known x-positions. The origin always exists, so the
    /// range always contains 0.
    #[inline]
    pub fn bounds(&self) -> (i64, i64) {
        self.chain.bounds()
    }

    /// Completed placement cycles.
    #[inline]
    pub fn placements(&self) -> u64 {
        self.placements
    }

    /// Ordered traversal of all columns as `(x, ColumnView)`, ascending x.
    /// Padding runs are yielded once, at their first covered position.
    pub fn columns(&self) -> Columns<'_> {
        Columns {
            chain: &self.chain,
            iter: self.chain.iter(),
        }
    }

    /// Every occupied slot as `(color, x, height)`, ascending x then height.
    pub fn for_each_piece<F: FnMut(u8, i64, usize)>(&self, mut f: F) {
        for (x, view) in self.columns() {
            if let ColumnView::Pieces { pieces, .. } = view {
                for (y, piece) in pieces.iter().enumerate() {
                    f(piece.color(), x, y);
                }
            }
        }
    }

    /// The piece at `(x, y)`, if that slot is occupied. Never creates
    /// columns.
    pub fn piece_at(&self, x: i64, y: usize) -> Option<Piece> {
        for (cx, view) in self.columns() {
            if cx > x {
                return None;
            }
            if cx == x {
                return match view {
                    ColumnView::Pieces { pieces, .. } => pieces.get(y).copied(),
                    ColumnView::Padding { .. } => None,
                };
            }
        }
        None
    }

    /// Current height of the column at `x` (0 for untouched positions).
    pub fn height_at(&self, x: i64) -> usize {
        for (cx, view) in self.columns() {
            if cx > x {
                return 0;
            }
            if cx == x {
                return match view {
                    ColumnView::Pieces { pieces, .. } => pieces.len(),
                    ColumnView::Padding { .. } => 0,
                };
            }
        }
        0
    }
}

/// Iterator over `(x, ColumnView)` in ascending x order.
pub struct Columns<'a> {
    chain: &'a ColumnChain,
    iter: ChainIter<'a>,
}

impl<'a> Iterator for Columns<'a> {
    type Item = (i64, ColumnView<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (x, idx) = self.iter.next()?;
        let view = match &self.chain.arena.node(idx).data {
            ColumnData::Pieces(stack) => ColumnView::Pieces {
                pieces: &stack.pieces,
                capacity: stack.capacity(),
            },
            ColumnData::Padding { size } => ColumnView::Padding { size: *size },
        };
        Some((x, view))
    }
}
