//! Board tests - grid, detection and gravity properties

use match3::core::{
    apply_gravity, apply_gravity_and_fill, find_match_groups, find_matches, Grid, RandSource,
    SimpleRng,
};
use match3::types::{Orientation, Position, TileType};

fn column(grid: &Grid, col: usize) -> Vec<Option<TileType>> {
    (0..grid.rows()).map(|row| grid.kind_at(row, col)).collect()
}

#[test]
fn test_initialize_fills_every_slot_for_many_shapes() {
    let mut rng = SimpleRng::new(2024);
    for rows in 1..8 {
        for cols in 1..8 {
            for type_count in 1..7u8 {
                let grid = Grid::new(rows, cols, type_count, &mut rng).unwrap();
                assert_eq!(grid.count_empty(), 0);
                assert!(
                    grid.tiles().all(|t| t.kind < type_count),
                    "type out of range on {}x{} with {} types",
                    rows,
                    cols,
                    type_count
                );
                assert!(grid.check_settled().is_ok());
            }
        }
    }
}

#[test]
fn test_initialize_with_rand_source() {
    let mut source = RandSource::seeded(99);
    let grid = Grid::new(10, 8, 6, &mut source).unwrap();
    assert_eq!(grid.count_empty(), 0);
    assert!(grid.tiles().all(|t| t.kind < 6));
}

#[test]
fn test_get_out_of_bounds() {
    let grid = Grid::new(10, 8, 6, &mut SimpleRng::new(1)).unwrap();
    assert!(grid.get(0, 0).is_some());
    assert!(grid.get(9, 7).is_some());
    assert_eq!(grid.get(10, 0), None);
    assert_eq!(grid.get(0, 8), None);
    assert_eq!(grid.get(usize::MAX, usize::MAX), None);
    assert!(!grid.is_empty(10, 8));
}

#[test]
fn test_swap_moves_types_not_tiles() {
    let mut grid = Grid::from_types(&[[0, 1, 2]], 3).unwrap();
    let ids: Vec<_> = grid.tiles().map(|t| t.id).collect();

    grid.swap_types(Position::new(0, 0), Position::new(0, 2)).unwrap();

    assert_eq!(grid.to_cells(), vec![vec![Some(2), Some(1), Some(0)]]);
    let ids_after: Vec<_> = grid.tiles().map(|t| t.id).collect();
    assert_eq!(ids, ids_after);
}

#[test]
fn test_row_of_five_is_one_group() {
    let grid = Grid::from_types(&[[1, 1, 1, 1, 1], [0, 2, 0, 2, 0]], 3).unwrap();
    let groups = find_match_groups(&grid);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].count(), 5);
    assert_eq!(groups[0].orientation, Orientation::Horizontal);
}

#[test]
fn test_plus_shape_groups_versus_matches() {
    let grid = Grid::from_types(
        &[
            [0, 1, 0],
            [1, 1, 1],
            [0, 1, 0],
        ],
        2,
    )
    .unwrap();
    assert_eq!(find_match_groups(&grid).len(), 2);
    assert_eq!(find_matches(&grid).len(), 5);
}

#[test]
fn test_l_shape_shares_corner() {
    let grid = Grid::from_types(
        &[
            [2, 0, 1],
            [2, 1, 0],
            [2, 2, 2],
        ],
        3,
    )
    .unwrap();
    let groups = find_match_groups(&grid);
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.contains(Position::new(2, 0))));
    assert_eq!(find_matches(&grid).len(), 5);
}

#[test]
fn test_gravity_is_stable_and_leaves_no_gaps() {
    let mut rng = SimpleRng::new(31337);
    for _ in 0..50 {
        let mut grid = Grid::new(9, 7, 5, &mut rng).unwrap();
        let holes: Vec<Position> = (0..9)
            .flat_map(|r| (0..7).map(move |c| Position::new(r, c)))
            .filter(|_| rng.next_range(3) == 0)
            .collect();
        grid.remove_tiles(&holes);

        // Survivors' ids per column, top to bottom
        let before: Vec<Vec<_>> = (0..7)
            .map(|c| (0..9).filter_map(|r| grid.tile(r, c).map(|t| t.id)).collect())
            .collect();

        apply_gravity(&mut grid);

        for (col, ids) in before.iter().enumerate() {
            let after: Vec<_> = (0..9).filter_map(|r| grid.tile(r, col).map(|t| t.id)).collect();
            assert_eq!(&after, ids, "column {} reordered", col);

            // Every empty slot sits above every occupied one
            let cells = column(&grid, col);
            let first_occupied = cells.iter().position(Option::is_some).unwrap_or(cells.len());
            assert!(cells[first_occupied..].iter().all(Option::is_some));
        }
        assert!(grid.check_invariants().is_ok());
    }
}

#[test]
fn test_gravity_and_fill_always_fills() {
    let mut rng = SimpleRng::new(8);
    for _ in 0..50 {
        let mut grid = Grid::new(10, 8, 6, &mut rng).unwrap();
        let matched: Vec<Position> = (0..10)
            .flat_map(|r| (0..8).map(move |c| Position::new(r, c)))
            .filter(|_| rng.next_range(2) == 0)
            .collect();
        grid.remove_tiles(&matched);
        apply_gravity_and_fill(&mut grid, &mut rng);
        assert_eq!(grid.count_empty(), 0);
    }
}

#[test]
fn test_display_marks_empty_slots() {
    let mut grid = Grid::from_types(&[[0, 1], [2, 3]], 4).unwrap();
    grid.remove_tiles(&[Position::new(0, 1)]);
    assert_eq!(format!("{}", grid), "0 X\n2 3");
}
