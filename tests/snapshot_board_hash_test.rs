use match3::core::{BoardSnapshot, FixedSequence, Grid};
use match3::engine::{EngineConfig, Match3Game};
use match3::types::{BoardEvent, Position};

fn fnv1a64_bytes(bytes: impl Iterator<Item = u8>) -> u64 {
    // FNV-1a 64-bit.
    let mut h: u64 = 0xcbf29ce484222325;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x00000100000001B3);
    }
    h
}

fn fnv1a64_cells(cells: &[Option<u8>]) -> u64 {
    fnv1a64_bytes(cells.iter().map(|c| c.unwrap_or(0xFF)))
}

#[test]
fn snapshot_into_sets_board_hash() {
    let mut game = Match3Game::new(EngineConfig::default().with_seed(1)).unwrap();

    let mut snap = BoardSnapshot::default();
    game.snapshot_into(&mut snap);
    assert_eq!(snap.cells.len(), 80);
    assert_eq!(snap.board_hash, fnv1a64_cells(&snap.cells));

    assert!(game
        .request_swap(Position::new(4, 4), Position::new(4, 5))
        .is_ok());

    game.snapshot_into(&mut snap);
    assert_eq!(snap.cells.len(), 80);
    assert_eq!(snap.board_hash, fnv1a64_cells(&snap.cells));
}

#[test]
fn snapshot_hash_follows_the_board() {
    let grid = Grid::from_types(&[[0, 0, 1], [1, 2, 0], [2, 1, 2]], 3).unwrap();
    let mut game = Match3Game::from_grid(grid, FixedSequence::new(vec![2, 1, 0]), 10);
    let before = game.snapshot();

    // Reverted swap: same board, same hash
    game.request_swap(Position::new(2, 0), Position::new(2, 1)).unwrap();
    assert_eq!(game.snapshot().board_hash, before.board_hash);

    game.request_swap(Position::new(0, 2), Position::new(1, 2)).unwrap();
    let after = game.snapshot();
    assert_ne!(after.board_hash, before.board_hash);
    assert_eq!(after.score, 5);
    assert_eq!(after.row(0), &[Some(2), Some(1), Some(0)]);
}

#[test]
fn snapshot_and_events_serialize_to_json() {
    let grid = Grid::from_types(&[[0, 0, 1], [1, 2, 0], [2, 1, 2]], 3).unwrap();
    let mut game = Match3Game::from_grid(grid, FixedSequence::new(vec![2, 1, 0]), 10);
    let outcome = game
        .request_swap(Position::new(0, 2), Position::new(1, 2))
        .unwrap();

    let snap = game.snapshot();
    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["rows"], 3);
    assert_eq!(json["score"], 5);
    assert_eq!(json["cells"].as_array().map(Vec::len), Some(9));

    let summary = serde_json::to_value(outcome.summary().unwrap()).unwrap();
    assert_eq!(summary["round_count"], 1);
    assert_eq!(summary["rounds"][0]["groups"][0]["orientation"], "horizontal");

    let events = game.take_events();
    let encoded = serde_json::to_string(&events).unwrap();
    let decoded: Vec<BoardEvent> = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, events);
}
