//! Read-only views handed to strategies.
//!
//! A [`BoardView`] is captured once per tick before any strategy runs, so no
//! strategy can observe another's move for the same tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::{PlayerState, SimulationState};
use crate::{PlayerId, Point};

/// Game metadata advertised to strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub id: String,
    /// Per-decision budget in milliseconds.
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub position: Point,
    pub heading: f64,
    pub speed: f64,
    pub alive: bool,
}

impl From<&PlayerState> for PlayerView {
    fn from(p: &PlayerState) -> Self {
        Self {
            id: p.id.clone(),
            position: p.position,
            heading: p.heading,
            speed: p.speed,
            alive: p.alive,
        }
    }
}

/// The whole board as of the start of a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub width: f64,
    pub height: f64,
    pub turn_rate: f64,
    /// Every player in input order, eliminated ones included.
    pub players: Vec<PlayerView>,
    /// Trails as ordered points. Long trails are downsampled; collision
    /// checks never use this copy.
    pub trails: BTreeMap<PlayerId, Vec<Point>>,
}

impl BoardView {
    pub fn capture(state: &SimulationState) -> Self {
        let players: Vec<PlayerView> = state.players().iter().map(PlayerView::from).collect();
        let trails = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), state.trail(i).snapshot_points()))
            .collect();
        Self {
            width: state.width(),
            height: state.height(),
            turn_rate: state.turn_rate(),
            players,
            trails,
        }
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn trail(&self, id: &PlayerId) -> &[Point] {
        self.trails.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// What one strategy sees for one decision.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot<'a> {
    pub game: &'a GameInfo,
    pub tick: u32,
    pub you: PlayerView,
    pub board: &'a BoardView,
}

impl GameSnapshot<'_> {
    /// Serialize to JSON for strategies that live outside the process.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
