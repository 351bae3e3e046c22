//! Reference strategies for local play and tests.
//!
//! All of them are pure lookahead heuristics over the snapshot: simulate each
//! move for a number of ticks and score the resulting path.

use arena_core::StrategyError;

use crate::grid::{Segment, SpatialHashGrid};
use crate::physics;
use crate::snapshot::GameSnapshot;
use crate::strategy::Strategy;
use crate::{Move, Point};

/// Cell size of the grid a strategy builds from snapshot trails.
const LOOKAHEAD_CELL: f64 = 15.0;

/// Ticks of travel behind the head within which our own trail is ignored
/// when building the lookahead grid.
const OWN_TAIL_SKIP: f64 = 10.0;

/// Consecutive points further apart than this many ticks of travel straddle a
/// gap (or a downsampling jump) and are not joined.
const GAP_JUMP_TICKS: f64 = 4.0;

/// Plays the same move every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Constant(pub Move);

impl Strategy for Constant {
    fn decide(&mut self, _: &GameSnapshot<'_>) -> Result<Move, StrategyError> {
        Ok(self.0)
    }
}

/// Plays a fixed sequence of moves, then straight forever.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    moves: Vec<Move>,
    next: usize,
}

impl Scripted {
    pub fn new(moves: impl IntoIterator<Item = Move>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
            next: 0,
        }
    }
}

impl Strategy for Scripted {
    fn decide(&mut self, _: &GameSnapshot<'_>) -> Result<Move, StrategyError> {
        let mv = self.moves.get(self.next).copied().unwrap_or_default();
        self.next += 1;
        Ok(mv)
    }

    fn reset(&mut self, _seed: u64) {
        self.next = 0;
    }
}

/// Looks fifteen ticks ahead and keeps the endpoint furthest from any wall.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallAvoider;

impl Strategy for WallAvoider {
    fn decide(&mut self, snap: &GameSnapshot<'_>) -> Result<Move, StrategyError> {
        let (w, h) = (snap.board.width, snap.board.height);
        let mut best = Move::Straight;
        let mut best_score = -999.0;
        for mv in Move::ALL {
            let Some(&(end, _)) = simulate_path(snap, mv, 15).last() else {
                continue;
            };
            let score = if end.x < 0.0 || end.x >= w || end.y < 0.0 || end.y >= h {
                -1000.0
            } else {
                wall_distance(end, w, h)
            };
            if score > best_score {
                best_score = score;
                best = mv;
            }
        }
        Ok(best)
    }
}

/// Weighted multi-horizon lookahead against every trail, plus a count of how
/// many follow-up moves stay open after twelve ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailDodger;

impl Strategy for TrailDodger {
    fn decide(&mut self, snap: &GameSnapshot<'_>) -> Result<Move, StrategyError> {
        let (w, h) = (snap.board.width, snap.board.height);
        let grid = lookahead_grid(snap);
        let mut best = Move::Straight;
        let mut best_score = -9999.0;

        for mv in Move::ALL {
            let mut score = 0.0;
            for (steps, weight) in [(10, 3.0), (20, 1.5), (40, 0.5)] {
                let path = simulate_path(snap, mv, steps);
                let mut survived = 0;
                for &(p, _) in &path {
                    if !inside(p, w, h, 3.0) {
                        score -= 500.0 * weight;
                        break;
                    }
                    if grid.query_point(p, 4.5) {
                        score -= 300.0 * weight;
                        break;
                    }
                    survived += 1;
                }
                score += survived as f64 * 2.0 * weight;
                if survived == steps
                    && let Some(&(end, _)) = path.last()
                {
                    score += wall_distance(end, w, h).min(100.0) * 0.3 * weight;
                }
            }

            if let Some(&(mid, heading)) = simulate_path(snap, mv, 12).last()
                && inside(mid, w, h, 5.0)
            {
                let open = Move::ALL
                    .into_iter()
                    .filter(|&next| {
                        simulate_from(mid, heading, next, snap, 12)
                            .iter()
                            .all(|&(p, _)| inside(p, w, h, 5.0) && !grid.query_point(p, 4.5))
                    })
                    .count();
                score += open as f64 * 15.0;
            }

            if score > best_score {
                best_score = score;
                best = mv;
            }
        }
        Ok(best)
    }
}

/// Drifts toward the middle of the board while avoiding walls and trails.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterSpiral;

impl Strategy for CenterSpiral {
    fn decide(&mut self, snap: &GameSnapshot<'_>) -> Result<Move, StrategyError> {
        let (w, h) = (snap.board.width, snap.board.height);
        let center = Point::new(w / 2.0, h / 2.0);
        let max_dist = center.distance(Point::default());
        let grid = lookahead_grid(snap);
        let mut best = Move::Straight;
        let mut best_score = -9999.0;

        for mv in Move::ALL {
            let mut score = 0.0;
            let mut survives = true;
            for (i, &(p, _)) in simulate_path(snap, mv, 25).iter().enumerate() {
                let wt = 1.0 - i as f64 * 0.02;
                if !inside(p, w, h, 2.0) {
                    score -= 600.0 * wt;
                    survives = false;
                    break;
                }
                if grid.query_point(p, 5.0) {
                    score -= 400.0 * wt;
                    survives = false;
                    break;
                }
                score += (1.0 - p.distance(center) / max_dist) * 30.0 * wt;
                let wd = wall_distance(p, w, h);
                if wd < 20.0 {
                    score -= (20.0 - wd) * 3.0 * wt;
                }
            }

            if survives {
                score += 40.0;
                match mv {
                    Move::Straight => score += 5.0,
                    Move::Left | Move::Right => {
                        let here = snap.you.position;
                        let to_center = (center.y - here.y)
                            .atan2(center.x - here.x)
                            .to_degrees();
                        let mut diff = physics::normalize_heading(to_center - snap.you.heading);
                        if diff > 180.0 {
                            diff -= 360.0;
                        }
                        if (mv == Move::Left && diff > 0.0) || (mv == Move::Right && diff < 0.0) {
                            score += 8.0;
                        }
                    },
                }
            }

            if score > best_score {
                best_score = score;
                best = mv;
            }
        }
        Ok(best)
    }
}

/// Cruises at a fixed distance from the nearest wall.
#[derive(Debug, Clone, Copy)]
pub struct WallHugger {
    pub target_distance: f64,
}

impl Default for WallHugger {
    fn default() -> Self {
        Self {
            target_distance: 50.0,
        }
    }
}

impl Strategy for WallHugger {
    fn decide(&mut self, snap: &GameSnapshot<'_>) -> Result<Move, StrategyError> {
        let (w, h) = (snap.board.width, snap.board.height);
        let grid = lookahead_grid(snap);
        let mut best = Move::Straight;
        let mut best_score = -9999.0;

        for mv in Move::ALL {
            let mut score = 0.0;
            let mut crashed = false;
            for (i, &(p, _)) in simulate_path(snap, mv, 20).iter().enumerate() {
                let wt = 1.0 - i as f64 * 0.03;
                if !inside(p, w, h, 0.0) {
                    score -= 600.0 * wt;
                    crashed = true;
                    break;
                }
                let wd = wall_distance(p, w, h);
                score -= (wd - self.target_distance).abs() * 0.5 * wt;
                if wd < 15.0 {
                    score -= (15.0 - wd) * 8.0 * wt;
                }
                if grid.query_point(p, 5.0) {
                    score -= 400.0 * wt;
                    crashed = true;
                    break;
                }
            }
            if !crashed {
                score += 30.0;
            }

            if score > best_score {
                best_score = score;
                best = mv;
            }
        }
        Ok(best)
    }
}

/// Names accepted by [`builtin`].
pub const BUILTIN_NAMES: [&str; 5] = [
    "straight",
    "wall-avoider",
    "trail-dodger",
    "center-spiral",
    "wall-hugger",
];

/// Look up a reference strategy by name.
pub fn builtin(name: &str) -> Option<Box<dyn Strategy>> {
    let strategy: Box<dyn Strategy> = match name {
        "straight" => Box::new(Constant(Move::Straight)),
        "wall-avoider" => Box::new(WallAvoider),
        "trail-dodger" => Box::new(TrailDodger),
        "center-spiral" => Box::new(CenterSpiral),
        "wall-hugger" => Box::new(WallHugger::default()),
        _ => return None,
    };
    Some(strategy)
}

fn simulate_path(snap: &GameSnapshot<'_>, mv: Move, steps: usize) -> Vec<(Point, f64)> {
    simulate_from(snap.you.position, snap.you.heading, mv, snap, steps)
}

/// Positions and headings after each of `steps` ticks repeating `mv`.
fn simulate_from(
    mut pos: Point,
    mut heading: f64,
    mv: Move,
    snap: &GameSnapshot<'_>,
    steps: usize,
) -> Vec<(Point, f64)> {
    (0..steps)
        .map(|_| {
            (pos, heading) = physics::step(pos, heading, mv, snap.you.speed, snap.board.turn_rate);
            (pos, heading)
        })
        .collect()
}

fn wall_distance(p: Point, width: f64, height: f64) -> f64 {
    p.x.min(p.y).min(width - p.x).min(height - p.y)
}

fn inside(p: Point, width: f64, height: f64, margin: f64) -> bool {
    margin < p.x && p.x < width - margin && margin < p.y && p.y < height - margin
}

/// Index every visible trail, minus our own newest points and gap jumps.
fn lookahead_grid(snap: &GameSnapshot<'_>) -> SpatialHashGrid {
    let mut grid = SpatialHashGrid::new(LOOKAHEAD_CELL);
    let max_jump_sq = (snap.you.speed * GAP_JUMP_TICKS).powi(2);
    for (id, points) in &snap.board.trails {
        let end = if *id == snap.you.id {
            own_cutoff(points, snap.you.position, OWN_TAIL_SKIP * snap.you.speed)
        } else {
            points.len()
        };
        for pair in points[..end].windows(2) {
            if pair[0].distance_sq(pair[1]) > max_jump_sq {
                continue;
            }
            grid.insert(Segment::unowned(pair[0], pair[1]));
        }
    }
    grid
}

/// Length of the own-trail prefix that stays indexed: the newest points
/// within `radius` of the head are dropped. Snapshot downsampling leaves
/// the spacing of the dropped points irregular, so this cuts by distance.
fn own_cutoff(points: &[Point], head: Point, radius: f64) -> usize {
    let radius_sq = radius * radius;
    points
        .iter()
        .rposition(|p| p.distance_sq(head) > radius_sq)
        .map_or(0, |last_far| last_far + 1)
}
