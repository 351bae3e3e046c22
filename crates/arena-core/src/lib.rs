pub mod guard;
pub mod player;
pub mod tally;

pub use guard::{CallFailure, StrategyError, guarded_call};
pub use player::PlayerId;
pub use tally::{GameOutcome, MatchResult, WinCount};

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::BTreeSet;

    use crate::player::PlayerId;

    /// Create `n` player ids named `p1`, `p2`, ...
    pub fn player_ids(n: usize) -> Vec<PlayerId> {
        (1..=n).map(|i| PlayerId::new(format!("p{i}"))).collect()
    }

    // ================================================================
    // Engine Contract Checks
    // ================================================================
    // Every engine's turn log must satisfy these. Engine crates call them
    // from their own tests with data pulled out of a finished game.

    /// Log ticks must start at zero and increase by exactly one.
    pub fn assert_log_ticks_contiguous(ticks: &[u32]) {
        for (i, &tick) in ticks.iter().enumerate() {
            assert_eq!(
                tick, i as u32,
                "turn log entry {i} has tick {tick}, expected {i}"
            );
        }
    }

    /// Once a player leaves the alive set it must never come back.
    pub fn assert_monotonic_elimination(alive_per_tick: &[Vec<PlayerId>]) {
        let mut eliminated: BTreeSet<&PlayerId> = BTreeSet::new();
        let mut previous: Option<&Vec<PlayerId>> = None;
        for (tick, alive) in alive_per_tick.iter().enumerate() {
            for id in alive {
                assert!(
                    !eliminated.contains(id),
                    "player {id} is alive at tick {tick} after being eliminated"
                );
            }
            if let Some(prev) = previous {
                for id in prev {
                    if !alive.contains(id) {
                        eliminated.insert(id);
                    }
                }
            }
            previous = Some(alive);
        }
    }
}
