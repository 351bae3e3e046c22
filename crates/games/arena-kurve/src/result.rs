use std::collections::BTreeMap;
use std::fmt;

use arena_core::GameOutcome;
use serde::{Deserialize, Serialize};

use crate::{Move, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationReason {
    Wall,
    Trail,
}

impl EliminationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wall => "wall collision",
            Self::Trail => "trail collision",
        }
    }
}

/// How and when a player left the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elimination {
    pub tick: u32,
    pub reason: EliminationReason,
    /// Owner of the trail that was hit. May be the eliminated player itself.
    pub killer: Option<PlayerId>,
}

impl Elimination {
    pub fn new(tick: u32, reason: EliminationReason, killer: Option<PlayerId>) -> Self {
        Self {
            tick,
            reason,
            killer,
        }
    }
}

impl fmt::Display for Elimination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (tick {})", self.reason.as_str(), self.tick)
    }
}

/// Immutable record of one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnLogEntry {
    pub tick: u32,
    /// Move applied for every player alive at the start of the tick.
    pub moves: BTreeMap<PlayerId, Move>,
    /// Players still alive at the end of the tick, in input order.
    pub alive: Vec<PlayerId>,
    pub eliminations: BTreeMap<PlayerId, Elimination>,
}

/// Outcome of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Seed the game's random source was built from.
    pub seed: u64,
    pub winner: Option<PlayerId>,
    /// Number of ticks played.
    pub ticks: u32,
    pub eliminations: BTreeMap<PlayerId, Elimination>,
    /// Players alive when the game finished, in input order.
    pub survivors: Vec<PlayerId>,
    pub turn_log: Vec<TurnLogEntry>,
}

impl GameResult {
    /// Eliminated player id to a readable reason such as
    /// `"trail collision (tick 42)"`.
    pub fn death_reasons(&self) -> BTreeMap<PlayerId, String> {
        self.eliminations
            .iter()
            .map(|(id, e)| (id.clone(), e.to_string()))
            .collect()
    }

    /// MessagePack encoding. Two runs with the same seed and strategies
    /// produce identical bytes.
    pub fn encode(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, rmp_serde::decode::Error> {
        rmp_serde::from_slice(bytes)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl GameOutcome for GameResult {
    fn winner(&self) -> Option<&PlayerId> {
        self.winner.as_ref()
    }
}
