pub mod arena;
pub mod bot;
pub mod collision;
pub mod config;
pub mod error;
pub mod gap;
pub mod grid;
pub mod match_runner;
pub mod orchestrator;
pub mod physics;
pub mod result;
pub mod snapshot;
pub mod state;
pub mod strategy;
pub mod trail;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use arena_core::StrategyError;

pub use arena_core::PlayerId;
pub use config::{DrawResolution, GapConfig, KurveConfig};
pub use error::ConfigError;
pub use match_runner::MatchRunner;
pub use orchestrator::{Phase, TurnOrchestrator};
pub use result::{Elimination, EliminationReason, GameResult, TurnLogEntry};
pub use snapshot::{BoardView, GameInfo, GameSnapshot, PlayerView};
pub use state::SimulationState;
pub use strategy::{Contestant, Strategy, TokenStrategy};

/// Match result type produced by [`MatchRunner`].
pub type KurveMatchResult = arena_core::MatchResult<GameResult>;

/// A position in board coordinates. (0, 0) is the bottom-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One tick's steering choice.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    /// Turn counter-clockwise by the turn rate.
    Left,
    /// Turn clockwise by the turn rate.
    Right,
    #[default]
    Straight,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Left, Move::Right, Move::Straight];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Straight => "straight",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "straight" => Ok(Self::Straight),
            other => Err(StrategyError::new(format!("invalid move token: {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_tokens_roundtrip_through_json() {
        for mv in Move::ALL {
            let json = serde_json::to_string(&mv).unwrap();
            assert_eq!(json, format!("\"{}\"", mv.as_str()));
            assert_eq!(json.trim_matches('"').parse::<Move>().unwrap(), mv);
        }
    }

    #[test]
    fn unknown_token_is_rejected() {
        let err = "up".parse::<Move>().unwrap_err();
        assert!(err.message().contains("up"));
        assert!("Left".parse::<Move>().is_err());
    }

    #[test]
    fn default_move_is_straight() {
        assert_eq!(Move::default(), Move::Straight);
    }

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
    }
}
