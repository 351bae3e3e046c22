use arena_core::test_helpers::{assert_log_ticks_contiguous, assert_monotonic_elimination};
use arena_kurve::arena::SpawnPoint;
use arena_kurve::bot::Constant;
use arena_kurve::{Contestant, GameResult, KurveConfig, Move};

/// Board with explicit spawns, no gaps and no timeout enforcement.
pub fn board(width: f64, height: f64, spawns: &[(f64, f64, f64)]) -> KurveConfig {
    KurveConfig {
        width,
        height,
        gaps: None,
        enforce_timeout: false,
        spawn_points: Some(
            spawns
                .iter()
                .map(|&(x, y, heading)| SpawnPoint::new(x, y, heading))
                .collect(),
        ),
        ..KurveConfig::default()
    }
}

/// One contestant per move, named `p1`, `p2`, ...
pub fn constant_players(moves: &[Move]) -> Vec<Contestant> {
    moves
        .iter()
        .enumerate()
        .map(|(i, &mv)| Contestant::new(format!("p{}", i + 1), Constant(mv)))
        .collect()
}

/// Invariants every finished game must satisfy.
pub fn check_contracts(result: &GameResult) {
    let ticks: Vec<u32> = result.turn_log.iter().map(|e| e.tick).collect();
    assert_log_ticks_contiguous(&ticks);
    assert_eq!(result.turn_log.len() as u32, result.ticks);

    let alive: Vec<_> = result.turn_log.iter().map(|e| e.alive.clone()).collect();
    assert_monotonic_elimination(&alive);

    for (id, elimination) in &result.eliminations {
        let entry = &result.turn_log[elimination.tick as usize];
        assert_eq!(entry.eliminations.get(id), Some(elimination));
        assert!(!entry.alive.contains(id));
    }
    if let Some(winner) = &result.winner {
        assert!(result.survivors.contains(winner));
    }
}
