use serde::{Deserialize, Serialize};

/// A spawn position with its starting heading in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl SpawnPoint {
    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }
}

/// Standard slots as (x fraction, y fraction, heading). Diagonal pairs face
/// each other first, then the edge midpoints.
const STANDARD_SLOTS: [(f64, f64, f64); 8] = [
    (0.25, 0.25, 45.0),
    (0.75, 0.75, 225.0),
    (0.75, 0.25, 135.0),
    (0.25, 0.75, 315.0),
    (0.5, 0.25, 90.0),
    (0.5, 0.75, 270.0),
    (0.25, 0.5, 0.0),
    (0.75, 0.5, 180.0),
];

/// Number of players the standard layout can seat.
pub const STANDARD_SLOT_COUNT: usize = STANDARD_SLOTS.len();

/// The standard spawn layout scaled to a board.
pub fn standard_spawns(width: f64, height: f64) -> Vec<SpawnPoint> {
    STANDARD_SLOTS
        .iter()
        .map(|&(fx, fy, heading)| SpawnPoint::new(width * fx, height * fy, heading))
        .collect()
}
