use std::collections::HashMap;

use columnfall::{ColumnView, Error, Piece, Playground, PlaygroundConfig};

const A: u8 = 1;
const B: u8 = 2;
const C: u8 = 3;
const D: u8 = 4;
const E: u8 = 5;
const X: u8 = 6;

fn piece(color: u8) -> Piece {
    Piece::new(color).expect("valid color")
}

fn drop_piece(playground: &mut Playground, x: i64, color: u8) {
    playground.place(x, piece(color)).expect("placement");
}

fn drop_many(playground: &mut Playground, placements: &[(i64, u8)]) {
    for &(x, color) in placements {
        drop_piece(playground, x, color);
    }
}

/// Bottom-to-top colors of the column at `x`.
fn column(playground: &Playground, x: i64) -> Vec<u8> {
    let mut out = Vec::new();
    playground.for_each_piece(|color, px, _| {
        if px == x {
            out.push(color);
        }
    });
    out
}

fn collect_board(playground: &Playground) -> Vec<(u8, i64, usize)> {
    let mut out = Vec::new();
    playground.for_each_piece(|color, x, y| out.push((color, x, y)));
    out
}

/// All padding runs as (first covered x, size).
fn padding_runs(playground: &Playground) -> Vec<(i64, u64)> {
    playground
        .columns()
        .filter_map(|(x, view)| match view {
            ColumnView::Padding { size } => Some((x, size)),
            ColumnView::Pieces { .. } => None,
        })
        .collect()
}

/// Sum of covered positions over all chain nodes.
fn span_total(playground: &Playground) -> i64 {
    playground
        .columns()
        .map(|(_, view)| match view {
            ColumnView::Pieces { .. } => 1,
            ColumnView::Padding { size } => size as i64,
        })
        .sum()
}

/// Post-cycle invariant: no run of four identical colors on any axis.
fn assert_no_lines(playground: &Playground) {
    let mut cells: HashMap<(i64, i64), u8> = HashMap::new();
    playground.for_each_piece(|color, x, y| {
        cells.insert((x, y as i64), color);
    });
    for (&(x, y), &color) in &cells {
        for (dx, dy) in [(1i64, 0i64), (0, 1), (1, 1), (1, -1)] {
            let mut len = 1;
            while cells.get(&(x + dx * len, y + dy * len)) == Some(&color) {
                len += 1;
            }
            assert!(
                len < 4,
                "run of {len} color {color} from ({x},{y}) along ({dx},{dy})"
            );
        }
    }
}

#[test]
fn empty_playground_has_a_single_origin_column() {
    let playground = Playground::new().unwrap();
    assert_eq!(playground.bounds(), (0, 0));
    assert!(collect_board(&playground).is_empty());

    let mut cols = playground.columns();
    let first = cols.next().unwrap();
    assert!(cols.next().is_none());
    match first {
        (0, ColumnView::Pieces { pieces, capacity }) => {
            assert!(pieces.is_empty());
            assert_eq!(capacity, 8);
        }
        _ => panic!("expected an empty piece-stack at the origin"),
    }
}

#[test]
fn single_placement_lands_at_the_bottom() {
    let mut playground = Playground::new().unwrap();
    drop_piece(&mut playground, 5, A);
    assert_eq!(column(&playground, 5), vec![A]);
    assert_eq!(playground.bounds(), (0, 5));
    assert_eq!(playground.piece_at(5, 0), Some(piece(A)));
    assert_eq!(playground.piece_at(5, 1), None);
    assert_eq!(playground.height_at(5), 1);
    assert_eq!(playground.placements(), 1);
}

#[test]
fn three_stacked_pieces_survive() {
    let mut playground = Playground::new().unwrap();
    drop_many(&mut playground, &[(0, A), (0, A), (0, A)]);
    assert_eq!(column(&playground, 0), vec![A, A, A]);
}

#[test]
fn four_stacked_pieces_clear() {
    let mut playground = Playground::new().unwrap();
    drop_many(&mut playground, &[(0, A), (0, A), (0, A), (0, A)]);
    assert!(collect_board(&playground).is_empty());
    assert_eq!(playground.height_at(0), 0);
    assert_eq!(playground.placements(), 4);
}

#[test]
fn horizontal_line_clears_on_the_fourth_placement() {
    let mut playground = Playground::new().unwrap();
    drop_many(&mut playground, &[(0, A), (1, A), (2, A)]);
    assert_eq!(collect_board(&playground).len(), 3);

    drop_piece(&mut playground, 3, A);
    assert!(collect_board(&playground).is_empty());
}

#[test]
fn rising_diagonal_clears() {
    let mut playground = Playground::new().unwrap();
    drop_many(
        &mut playground,
        &[
            (0, A),
            (1, B),
            (1, A),
            (2, C),
            (2, B),
            (2, A),
            (3, C),
            (3, B),
            (3, C),
            (3, A),
        ],
    );
    assert_eq!(column(&playground, 0), vec![]);
    assert_eq!(column(&playground, 1), vec![B]);
    assert_eq!(column(&playground, 2), vec![C, B]);
    assert_eq!(column(&playground, 3), vec![C, B, C]);
    assert_no_lines(&playground);
}

#[test]
fn falling_diagonal_clears() {
    let mut playground = Playground::new().unwrap();
    drop_many(
        &mut playground,
        &[
            (0, B),
            (0, C),
            (0, B),
            (0, A),
            (1, C),
            (1, B),
            (1, A),
            (2, B),
            (2, A),
            (3, A),
        ],
    );
    assert_eq!(column(&playground, 0), vec![B, C, B]);
    assert_eq!(column(&playground, 1), vec![C, B]);
    assert_eq!(column(&playground, 2), vec![B]);
    assert_eq!(column(&playground, 3), vec![]);
    assert_no_lines(&playground);
}

#[test]
fn overlapping_vertical_and_horizontal_lines_clear_together() {
    let mut playground = Playground::new().unwrap();
    // Vertical A run at x=0 and horizontal A run at y=3 share the corner
    // (0,3); the final placement completes both at once.
    drop_many(
        &mut playground,
        &[
            (0, A),
            (0, A),
            (0, A),
            (1, B),
            (1, C),
            (1, B),
            (1, A),
            (2, C),
            (2, B),
            (2, C),
            (2, A),
            (3, B),
            (3, C),
            (3, D),
            (3, A),
        ],
    );
    drop_piece(&mut playground, 0, A);

    assert_eq!(column(&playground, 0), vec![]);
    assert_eq!(column(&playground, 1), vec![B, C, B]);
    assert_eq!(column(&playground, 2), vec![C, B, C]);
    assert_eq!(column(&playground, 3), vec![B, C, D]);
    assert_no_lines(&playground);
}

#[test]
fn cascade_merges_and_clears_a_run_of_five() {
    let mut playground = Playground::new().unwrap();
    // Column 0 holds A,A,A,B,A,A. Clearing the horizontal B line at y=3
    // drops the two top A's onto the three below: a vertical run of five,
    // which must clear in full, not just four of it.
    drop_many(
        &mut playground,
        &[
            (0, A),
            (0, A),
            (0, A),
            (0, B),
            (0, A),
            (0, A),
            (1, C),
            (1, C),
            (1, D),
            (1, B),
            (2, D),
            (2, D),
            (2, C),
            (2, B),
            (3, C),
            (3, D),
            (3, C),
        ],
    );
    assert_eq!(column(&playground, 0), vec![A, A, A, B, A, A]);

    drop_piece(&mut playground, 3, B);

    assert_eq!(column(&playground, 0), vec![]);
    assert_eq!(column(&playground, 1), vec![C, C, D]);
    assert_eq!(column(&playground, 2), vec![D, D, C]);
    assert_eq!(column(&playground, 3), vec![C, D, C]);
    assert_no_lines(&playground);
}

#[test]
fn pieces_above_a_cleared_line_fall() {
    let mut playground = Playground::new().unwrap();
    // Horizontal X line at y=1; column 0 carries a B above it that must
    // fall onto the A below once the line clears.
    drop_many(
        &mut playground,
        &[
            (0, A),
            (0, X),
            (0, B),
            (1, C),
            (1, X),
            (2, D),
            (2, X),
            (3, E),
        ],
    );
    drop_piece(&mut playground, 3, X);

    assert_eq!(column(&playground, 0), vec![A, B]);
    assert_eq!(column(&playground, 1), vec![C]);
    assert_eq!(column(&playground, 2), vec![D]);
    assert_eq!(column(&playground, 3), vec![E]);
    assert_no_lines(&playground);
}

#[test]
fn lineless_placement_touches_only_its_column() {
    let mut playground = Playground::new().unwrap();
    drop_many(
        &mut playground,
        &[(0, A), (0, B), (1, C), (2, D), (-3, E), (-3, A)],
    );
    let before = collect_board(&playground);

    drop_piece(&mut playground, 1, E);

    let mut expected = before.clone();
    expected.push((E, 1, 1));
    expected.sort_unstable_by_key(|&(_, x, y)| (x, y));
    let mut after = collect_board(&playground);
    after.sort_unstable_by_key(|&(_, x, y)| (x, y));
    assert_eq!(after, expected);
}

#[test]
fn sparse_placements_share_one_padding_run() {
    let mut playground = Playground::new().unwrap();
    drop_piece(&mut playground, 1, A);
    drop_piece(&mut playground, 1_000_000, B);

    assert_eq!(playground.bounds(), (0, 1_000_000));
    assert_eq!(padding_runs(&playground), vec![(2, 999_998)]);
    assert_eq!(span_total(&playground), 1_000_001);
}

#[test]
fn splitting_a_padding_run_preserves_coverage() {
    let mut playground = Playground::new().unwrap();
    drop_piece(&mut playground, 1, A);
    drop_piece(&mut playground, 1_000_000, B);
    drop_piece(&mut playground, 500_000, C);

    assert_eq!(
        padding_runs(&playground),
        vec![(2, 499_998), (500_001, 499_999)]
    );
    assert_eq!(span_total(&playground), 1_000_001);
    assert_eq!(column(&playground, 500_000), vec![C]);
}

#[test]
fn negative_positions_extend_the_start() {
    let mut playground = Playground::new().unwrap();
    drop_piece(&mut playground, -10, A);

    assert_eq!(playground.bounds(), (-10, 0));
    assert_eq!(padding_runs(&playground), vec![(-9, 9)]);
    assert_eq!(column(&playground, -10), vec![A]);
    assert_eq!(playground.piece_at(-10, 0), Some(piece(A)));
    assert_eq!(playground.piece_at(-5, 0), None);
    assert_eq!(playground.height_at(-5), 0);
}

#[test]
fn a_cleared_column_is_not_downgraded_to_padding() {
    let mut playground = Playground::new().unwrap();
    drop_many(&mut playground, &[(7, A), (7, A), (7, A), (7, A)]);
    assert_eq!(playground.height_at(7), 0);

    // The column stays materialized: no padding run covers x=7.
    let at_seven = playground.columns().find(|&(x, _)| x == 7);
    assert!(matches!(
        at_seven,
        Some((7, ColumnView::Pieces { pieces: &[], .. }))
    ));
}

#[test]
fn column_storage_doubles_past_the_initial_capacity() {
    let mut playground = Playground::new().unwrap();
    // Cycling three colors in one column never forms a run of four.
    for i in 0..9u8 {
        drop_piece(&mut playground, 0, 1 + i % 3);
    }
    assert_eq!(playground.height_at(0), 9);
    let (_, view) = playground.columns().next().unwrap();
    match view {
        ColumnView::Pieces { pieces, capacity } => {
            assert_eq!(pieces.len(), 9);
            assert!(capacity >= 16);
        }
        ColumnView::Padding { .. } => panic!("expected a piece-stack"),
    }
}

#[test]
fn board_dump_is_ordered_by_x_then_height() {
    let mut playground = Playground::new().unwrap();
    drop_many(
        &mut playground,
        &[(4, A), (-2, B), (0, C), (4, D), (-2, E), (0, A)],
    );
    let board = collect_board(&playground);
    let mut sorted = board.clone();
    sorted.sort_unstable_by_key(|&(_, x, y)| (x, y));
    assert_eq!(board, sorted);
    assert_eq!(board.len(), 6);
}

#[test]
fn every_cycle_leaves_a_line_free_board() {
    let mut playground = Playground::new().unwrap();
    // A deterministic mixed stream with plenty of clears.
    for round in 0..40i64 {
        for x in -3..=3i64 {
            let color = 1 + ((round + x).rem_euclid(3)) as u8;
            drop_piece(&mut playground, x, color);
            assert_no_lines(&playground);
        }
    }
}

#[test]
fn exhausted_column_budget_surfaces_out_of_memory() {
    // Origin + bridging padding + new stack needs three nodes.
    let mut playground = Playground::with_config(PlaygroundConfig::default().column_budget(2))
        .unwrap();
    drop_piece(&mut playground, 0, A);

    let err = playground.place(5, piece(B)).unwrap_err();
    assert!(matches!(err, Error::OutOfMemory { .. }));

    // Teardown after a fatal error is a plain drop.
    drop(playground);
}

#[test]
fn generous_column_budget_is_invisible() {
    let mut playground = Playground::with_config(PlaygroundConfig::default().column_budget(64))
        .unwrap();
    drop_many(&mut playground, &[(0, A), (3, B), (-3, C)]);
    assert_eq!(collect_board(&playground).len(), 3);
}

#[test]
fn configured_column_capacity_is_honored() {
    let mut playground = Playground::with_config(
        PlaygroundConfig::default().min_column_capacity(2),
    )
    .unwrap();
    drop_piece(&mut playground, 0, A);
    let (_, view) = playground.columns().next().unwrap();
    match view {
        ColumnView::Pieces { capacity, .. } => assert_eq!(capacity, 2),
        ColumnView::Padding { .. } => panic!("expected a piece-stack"),
    }
}
