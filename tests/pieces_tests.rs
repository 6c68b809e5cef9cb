//! Pieces tests - shapes, rotation and wall kicks

use tetris_ultimate::core::grid::{Block, CellTag, Grid};
use tetris_ultimate::core::pieces::{
    distinct_rotations, get_shape, shape_bounds, spawn_position, try_rotate,
};
use tetris_ultimate::types::{PieceKind, Rotation};

// ============== Shape Tests ==============

#[test]
fn test_i_piece_shapes() {
    assert_eq!(
        get_shape(PieceKind::I, Rotation::North),
        [(0, 1), (1, 1), (2, 1), (3, 1)]
    );
    assert_eq!(
        get_shape(PieceKind::I, Rotation::East),
        [(2, 0), (2, 1), (2, 2), (2, 3)]
    );
}

#[test]
fn test_o_piece_never_changes() {
    let north = get_shape(PieceKind::O, Rotation::North);
    for rot in Rotation::ALL {
        assert_eq!(get_shape(PieceKind::O, rot), north);
    }
    assert_eq!(distinct_rotations(PieceKind::O), 1);
    assert!(try_rotate(PieceKind::O, Rotation::North, 3, 0, true, |_, _| true).is_none());
}

#[test]
fn test_shape_bounds() {
    assert_eq!(
        shape_bounds(&get_shape(PieceKind::I, Rotation::North)),
        (0, 3, 1, 1)
    );
    assert_eq!(
        shape_bounds(&get_shape(PieceKind::T, Rotation::East)),
        (1, 2, 0, 2)
    );
}

#[test]
fn test_spawn_position_centres_the_box() {
    assert_eq!(spawn_position(10), (3, 0));
    assert_eq!(spawn_position(12), (4, 0));
}

// ============== Rotation Tests ==============

#[test]
fn test_rotation_wraps() {
    assert_eq!(Rotation::West.rotate(1), Rotation::North);
    assert_eq!(Rotation::North.rotate(-1), Rotation::West);
    assert_eq!(Rotation::East.rotate(2), Rotation::West);
}

#[test]
fn test_rotation_in_open_space_uses_no_kick() {
    let grid = Grid::new(10, 20);
    for kind in PieceKind::ALL.into_iter().filter(|&k| k != PieceKind::O) {
        let (_, rot, kick) = try_rotate(kind, Rotation::North, 3, 5, true, |x, y| {
            grid.is_valid(x, y)
        })
        .unwrap();
        assert_eq!(rot, Rotation::East);
        assert_eq!(kick, (0, 0), "{kind:?}");
    }
}

#[test]
fn test_wall_kick_off_left_wall_never_collides() {
    let grid = Grid::new(10, 20);
    for kind in PieceKind::ALL.into_iter().filter(|&k| k != PieceKind::O) {
        for from in Rotation::ALL {
            let (min_dx, _, _, _) = shape_bounds(&get_shape(kind, from));
            // Flush against the left wall.
            let x = -min_dx;
            let y = 8;
            if let Some((shape, _, (dx, dy))) =
                try_rotate(kind, from, x, y, true, |cx, cy| grid.is_valid(cx, cy))
            {
                assert!(
                    grid.can_place(&shape, x + dx, y + dy),
                    "{kind:?} from {from:?} kicked into a wall"
                );
            }
        }
    }
}

#[test]
fn test_i_kicks_right_from_left_wall() {
    let grid = Grid::new(10, 20);
    // West I hugging the wall: column x + 1 == 0.
    let r = try_rotate(PieceKind::I, Rotation::West, -1, 5, true, |x, y| {
        grid.is_valid(x, y)
    });
    let (shape, rot, (dx, _)) = r.unwrap();
    assert_eq!(rot, Rotation::North);
    assert!(dx > 0);
    assert!(grid.can_place(&shape, -1 + dx, 5));
}

#[test]
fn test_fully_blocked_rotation_is_none() {
    let mut grid = Grid::new(10, 20);
    for y in 0..20 {
        for x in 0..10 {
            grid.set(x, y, Some(Block::new(CellTag::Garbage)));
        }
    }
    // Free exactly the T's current cells.
    let t = get_shape(PieceKind::T, Rotation::North);
    for (dx, dy) in t {
        grid.set(4 + dx, 8 + dy, None);
    }
    assert!(try_rotate(PieceKind::T, Rotation::North, 4, 8, true, |x, y| {
        grid.is_valid(x, y)
    })
    .is_none());
}
