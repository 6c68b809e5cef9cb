//! Placement search for the demo player.
//!
//! Every orientation and column of the active piece is hard-dropped from the
//! spawn row onto a scratch copy of the grid, locked, cleared and scored. The
//! same enumeration then runs for the piece a hold swap would bring in. Only a
//! strictly better score replaces the current best, so ties keep the earliest
//! candidate: orientation ascending, then x ascending, direct before hold.

use tetris_ultimate_core::config::AiWeights;
use tetris_ultimate_core::grid::CellTag;
use tetris_ultimate_core::pieces::{distinct_rotations, get_shape, shape_bounds, spawn_position};
use tetris_ultimate_core::types::{PieceKind, Rotation};
use tetris_ultimate_core::Grid;

use crate::features::{count_holes, BoardFeatures};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    /// Landing row of the piece origin
    pub y: i8,
    pub use_hold: bool,
    pub lines_cleared: u32,
    pub score: f64,
}

/// Best placement for `active`, optionally considering a hold swap to
/// `held_or_next` (the held piece, or the next piece when the slot is empty).
///
/// Returns `None` when no orientation of either piece fits at the spawn row.
pub fn find_best_placement(
    grid: &Grid,
    active: PieceKind,
    held_or_next: Option<PieceKind>,
    can_hold: bool,
    weights: &AiWeights,
) -> Option<Placement> {
    let holes_before = count_holes(grid);
    let mut best: Option<Placement> = None;

    let mut candidates = vec![(active, false)];
    if let (true, Some(swap)) = (can_hold, held_or_next) {
        candidates.push((swap, true));
    }

    for (kind, use_hold) in candidates {
        for_each_placement(grid, kind, holes_before, weights, |mut p| {
            p.use_hold = use_hold;
            if best.map_or(true, |b| p.score > b.score) {
                best = Some(p);
            }
        });
    }
    best
}

/// All resting placements of `kind`, in enumeration order
pub fn enumerate_placements(grid: &Grid, kind: PieceKind, weights: &AiWeights) -> Vec<Placement> {
    let holes_before = count_holes(grid);
    let mut out = Vec::new();
    for_each_placement(grid, kind, holes_before, weights, |p| out.push(p));
    out
}

fn for_each_placement(
    grid: &Grid,
    kind: PieceKind,
    holes_before: u32,
    weights: &AiWeights,
    mut visit: impl FnMut(Placement),
) {
    let (_, spawn_y) = spawn_position(grid.width());
    let width = grid.width() as i8;

    for rotation in Rotation::ALL.into_iter().take(distinct_rotations(kind)) {
        let shape = get_shape(kind, rotation);
        let (min_dx, max_dx, _, _) = shape_bounds(&shape);

        for x in -min_dx..width - max_dx {
            if !grid.can_place(&shape, x, spawn_y) {
                continue;
            }
            let mut y = spawn_y;
            while grid.can_place(&shape, x, y + 1) {
                y += 1;
            }

            let mut scratch = grid.clone();
            if scratch
                .lock(&shape, x, y, CellTag::Piece(kind), None)
                .is_err()
            {
                continue;
            }
            let rows = scratch.find_full_rows();
            scratch.clear_and_compact(&rows);

            let lines_cleared = rows.len() as u32;
            let features = BoardFeatures::from_grid(&scratch);
            let holes_created = features.holes.saturating_sub(holes_before);

            visit(Placement {
                kind,
                rotation,
                x,
                y,
                use_hold: false,
                lines_cleared,
                score: evaluate(weights, lines_cleared, holes_created, &features),
            });
        }
    }
}

pub fn evaluate(
    weights: &AiWeights,
    lines_cleared: u32,
    holes_created: u32,
    features: &BoardFeatures,
) -> f64 {
    weights.lines * lines_cleared as f64
        - weights.max_height * features.max_height as f64
        - weights.holes * holes_created as f64
        - weights.bumpiness * features.bumpiness as f64
        + weights.well * features.deepest_well as f64
}
