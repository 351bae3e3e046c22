use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GapConfig;

/// Whether a player's trail is currently being laid down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapPhase {
    Recording,
    Gapping,
}

/// Per-player two-state timer that opens temporary holes in a trail.
///
/// Purely time driven: transitions depend only on the tick and the random
/// draws, never on collisions or other players.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapTimer {
    config: Option<GapConfig>,
    phase: GapPhase,
    next_gap_tick: u32,
    gap_end_tick: u32,
}

impl GapTimer {
    /// A timer in the recording phase with its first gap drawn from the
    /// interval range. `None` never gaps.
    pub fn new(config: Option<GapConfig>, rng: &mut impl Rng) -> Self {
        let next_gap_tick = config
            .map(|c| rng.random_range(c.interval_min..=c.interval_max))
            .unwrap_or(u32::MAX);
        Self {
            config,
            phase: GapPhase::Recording,
            next_gap_tick,
            gap_end_tick: 0,
        }
    }

    /// A timer that records every tick.
    pub fn disabled() -> Self {
        Self {
            config: None,
            phase: GapPhase::Recording,
            next_gap_tick: u32::MAX,
            gap_end_tick: 0,
        }
    }

    /// Run this tick's transitions and return the resulting phase.
    ///
    /// Entering a gap and leaving it are checked in that order, so a gap
    /// always covers at least one tick.
    pub fn advance(&mut self, tick: u32, rng: &mut impl Rng) -> GapPhase {
        let Some(config) = self.config else {
            return self.phase;
        };

        if self.phase == GapPhase::Recording && tick >= self.next_gap_tick {
            let duration = rng.random_range(config.duration_min..=config.duration_max);
            self.phase = GapPhase::Gapping;
            self.gap_end_tick = tick.saturating_add(duration);
        }
        if self.phase == GapPhase::Gapping && tick >= self.gap_end_tick {
            let interval = rng.random_range(config.interval_min..=config.interval_max);
            self.phase = GapPhase::Recording;
            self.next_gap_tick = tick.saturating_add(interval);
        }
        self.phase
    }

    pub fn phase(&self) -> GapPhase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.phase == GapPhase::Recording
    }

    pub fn next_gap_tick(&self) -> u32 {
        self.next_gap_tick
    }

    pub fn gap_end_tick(&self) -> u32 {
        self.gap_end_tick
    }
}
