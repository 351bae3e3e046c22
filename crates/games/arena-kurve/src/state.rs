use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::collision::{self, SELF_EXCLUSION_SEGMENTS};
use crate::config::KurveConfig;
use crate::error::ConfigError;
use crate::gap::{GapPhase, GapTimer};
use crate::grid::{Segment, SpatialHashGrid};
use crate::physics;
use crate::result::{Elimination, EliminationReason};
use crate::trail::Trail;
use crate::{Move, PlayerId, Point};

/// One player's kinematic state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub position: Point,
    /// Degrees in [0, 360).
    pub heading: f64,
    pub speed: f64,
    pub alive: bool,
}

/// Everything one game owns: players, trails, gap timers, the shared
/// collision grid and the game's random source.
///
/// Players are addressed by their index in input order.
#[derive(Debug)]
pub struct SimulationState {
    width: f64,
    height: f64,
    turn_rate: f64,
    collision_radius: f64,
    players: Vec<PlayerState>,
    /// Position at the start of the current tick, the start of this tick's segment.
    prev_positions: Vec<Point>,
    trails: Vec<Trail>,
    gaps: Vec<GapTimer>,
    /// Segments each player has inserted into the grid so far.
    segment_counts: Vec<u32>,
    grid: SpatialHashGrid,
    rng: StdRng,
}

impl SimulationState {
    /// Spawn `ids` in order onto the configured spawn points.
    pub fn new(config: &KurveConfig, ids: &[PlayerId], seed: u64) -> Result<Self, ConfigError> {
        config.validate(ids)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let spawns = config.spawns();
        let mut players = Vec::with_capacity(ids.len());
        let mut trails = Vec::with_capacity(ids.len());
        let mut gaps = Vec::with_capacity(ids.len());

        for (id, spawn) in ids.iter().zip(&spawns) {
            let position = Point::new(spawn.x, spawn.y);
            players.push(PlayerState {
                id: id.clone(),
                position,
                heading: physics::normalize_heading(spawn.heading),
                speed: config.speed,
                alive: true,
            });
            trails.push(Trail::new(position));
            gaps.push(GapTimer::new(config.gaps, &mut rng));
        }

        Ok(Self {
            width: config.width,
            height: config.height,
            turn_rate: config.turn_rate,
            collision_radius: config.collision_radius,
            prev_positions: players.iter().map(|p| p.position).collect(),
            segment_counts: vec![0; players.len()],
            players,
            trails,
            gaps,
            grid: SpatialHashGrid::new(config.cell_size),
            rng,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn turn_rate(&self) -> f64 {
        self.turn_rate
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn player(&self, index: usize) -> &PlayerState {
        &self.players[index]
    }

    pub fn index_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    /// Indices of living players, in input order.
    pub fn alive_players(&self) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.alive)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    pub fn trail(&self, index: usize) -> &Trail {
        &self.trails[index]
    }

    pub fn gap_timer(&self, index: usize) -> &GapTimer {
        &self.gaps[index]
    }

    pub fn grid(&self) -> &SpatialHashGrid {
        &self.grid
    }

    /// One tick of physics for one player: turn, then translate.
    pub fn advance(&mut self, index: usize, mv: Move) {
        let player = &mut self.players[index];
        assert!(player.alive, "advance on eliminated player {}", player.id);

        let (position, heading) = physics::step(
            player.position,
            player.heading,
            mv,
            player.speed,
            self.turn_rate,
        );
        assert!(
            position.is_finite() && heading.is_finite(),
            "non-finite state for player {}: {position:?} heading {heading}",
            player.id
        );

        self.prev_positions[index] = player.position;
        player.position = position;
        player.heading = heading;
    }

    /// Advance the player's gap timer for `tick`. While recording, append the
    /// new position to the trail and insert this tick's segment into the grid.
    ///
    /// Returns whether anything was recorded.
    pub fn record_trail_if_recording(&mut self, index: usize, tick: u32) -> bool {
        if !self.players[index].alive {
            return false;
        }
        if self.gaps[index].advance(tick, &mut self.rng) != GapPhase::Recording {
            return false;
        }

        let end = self.players[index].position;
        self.trails[index].push(tick, end);
        self.grid.insert(Segment {
            start: self.prev_positions[index],
            end,
            owner: index,
            seq: self.segment_counts[index],
        });
        self.segment_counts[index] += 1;
        true
    }

    /// Wall and trail checks for every living player against the grid as it
    /// stands now. Nothing is applied; see [`SimulationState::eliminate`].
    pub fn check_eliminations(&self, tick: u32) -> Vec<(usize, Elimination)> {
        let radius = self.collision_radius;
        let mut out = Vec::new();

        for (index, player) in self.players.iter().enumerate() {
            if !player.alive {
                continue;
            }

            if collision::out_of_bounds(player.position, self.width, self.height) {
                out.push((index, Elimination::new(tick, EliminationReason::Wall, None)));
                continue;
            }

            // The head always sits on its own newest segments.
            let own_recent = self.segment_counts[index].saturating_sub(SELF_EXCLUSION_SEGMENTS);
            let hit = self.grid.first_hit(player.position, radius, |seg| {
                seg.owner != index || seg.seq < own_recent
            });
            if let Some(seg) = hit {
                let killer = self.players.get(seg.owner).map(|p| p.id.clone());
                out.push((
                    index,
                    Elimination::new(tick, EliminationReason::Trail, killer),
                ));
            }
        }
        out
    }

    /// Mark a player dead and freeze its trail. Its segments stay in the grid.
    pub fn eliminate(&mut self, index: usize) {
        let player = &mut self.players[index];
        if !player.alive {
            return;
        }
        player.alive = false;
        self.trails[index].freeze();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::SpawnPoint;

    fn config_with(spawns: Vec<SpawnPoint>) -> KurveConfig {
        KurveConfig {
            gaps: None,
            spawn_points: Some(spawns),
            ..KurveConfig::default()
        }
    }

    fn ids(n: usize) -> Vec<PlayerId> {
        (1..=n).map(|i| PlayerId::new(format!("p{i}"))).collect()
    }

    fn tick_all(state: &mut SimulationState, tick: u32, mv: Move) -> Vec<(usize, Elimination)> {
        for i in state.alive_players() {
            state.advance(i, mv);
        }
        for i in state.alive_players() {
            state.record_trail_if_recording(i, tick);
        }
        let out = state.check_eliminations(tick);
        for (i, _) in &out {
            state.eliminate(*i);
        }
        out
    }

    #[test]
    fn spawns_on_standard_slots_in_order() {
        let state = SimulationState::new(&KurveConfig::default(), &ids(3), 1).unwrap();
        let p = state.players();
        assert_eq!(p[0].position, Point::new(160.0, 120.0));
        assert_eq!(p[1].position, Point::new(480.0, 360.0));
        assert_eq!(p[2].heading, 135.0);
        assert!(p.iter().all(|p| p.alive && p.speed == 3.0));
        assert_eq!(state.trail(0).len(), 1);
        assert!(state.grid().is_empty());
        assert_eq!(state.index_of(&PlayerId::new("p3")), Some(2));
        assert_eq!(state.index_of(&PlayerId::new("p4")), None);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let err = SimulationState::new(&KurveConfig::default(), &ids(9), 1).unwrap_err();
        assert!(matches!(err, ConfigError::TooManyPlayers { .. }));
    }

    #[test]
    fn advance_turns_then_moves() {
        let config = config_with(vec![SpawnPoint::new(100.0, 100.0, 0.0)]);
        let mut state = SimulationState::new(&config, &ids(1), 0).unwrap();
        state.advance(0, Move::Left);
        let p = state.player(0);
        assert_eq!(p.heading, 5.0);
        let expected = Point::new(
            100.0 + 3.0 * 5f64.to_radians().cos(),
            100.0 + 3.0 * 5f64.to_radians().sin(),
        );
        assert!(p.position.distance(expected) < 1e-12);
    }

    #[test]
    fn recording_appends_trail_and_inserts_segment() {
        let config = config_with(vec![SpawnPoint::new(100.0, 100.0, 0.0)]);
        let mut state = SimulationState::new(&config, &ids(1), 0).unwrap();
        state.advance(0, Move::Straight);
        assert!(state.record_trail_if_recording(0, 0));
        assert_eq!(state.trail(0).len(), 2);
        assert_eq!(state.grid().len(), 1);
        let seg = state.grid().segment(0).unwrap();
        assert_eq!(seg.start, Point::new(100.0, 100.0));
        assert_eq!(seg.end, Point::new(103.0, 100.0));
        assert_eq!((seg.owner, seg.seq), (0, 0));
    }

    #[test]
    fn straight_line_walks_into_wall_on_closed_form_tick() {
        let config = config_with(vec![SpawnPoint::new(600.0, 240.0, 0.0)]);
        let mut state = SimulationState::new(&config, &ids(1), 0).unwrap();
        // 600 + 3 * (tick + 1) >= 640 first holds for tick 13.
        for tick in 0..13 {
            assert!(tick_all(&mut state, tick, Move::Straight).is_empty(), "tick {tick}");
        }
        let out = tick_all(&mut state, 13, Move::Straight);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1.reason, EliminationReason::Wall);
        assert_eq!(out[0].1.tick, 13);
        assert!(!state.player(0).alive);
        assert!(state.trail(0).is_frozen());
    }

    #[test]
    fn negative_coordinates_are_out_of_bounds() {
        let config = config_with(vec![SpawnPoint::new(1.0, 240.0, 180.0)]);
        let mut state = SimulationState::new(&config, &ids(1), 0).unwrap();
        let out = tick_all(&mut state, 0, Move::Straight);
        assert_eq!(out[0].1.reason, EliminationReason::Wall);
    }

    #[test]
    fn tight_turning_never_hits_own_head() {
        let config = KurveConfig {
            turn_rate: 60.0,
            ..config_with(vec![SpawnPoint::new(320.0, 240.0, 0.0)])
        };
        let mut state = SimulationState::new(&config, &ids(1), 0).unwrap();
        // A 60 degree turn rate closes a hexagon every six ticks, so the head
        // returns onto its own older trail at tick 5.
        for tick in 0..5 {
            assert!(tick_all(&mut state, tick, Move::Left).is_empty(), "tick {tick}");
        }
        let out = tick_all(&mut state, 5, Move::Left);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1.reason, EliminationReason::Trail);
        assert_eq!(out[0].1.killer, Some(PlayerId::new("p1")));
    }

    #[test]
    fn crossing_another_trail_names_the_killer() {
        let config = config_with(vec![
            SpawnPoint::new(100.0, 100.0, 0.0),
            SpawnPoint::new(115.0, 70.0, 90.0),
        ]);
        let mut state = SimulationState::new(&config, &ids(2), 0).unwrap();
        // p1 lays a horizontal trail along y=100 before p2 arrives there.
        let mut first = None;
        for tick in 0..20 {
            let out = tick_all(&mut state, tick, Move::Straight);
            if !out.is_empty() {
                first = Some(out);
                break;
            }
        }
        let out = first.expect("someone should collide");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, 1);
        assert_eq!(out[0].1.reason, EliminationReason::Trail);
        assert_eq!(out[0].1.killer, Some(PlayerId::new("p1")));
    }

    #[test]
    fn eliminated_trails_stay_in_the_grid() {
        let config = config_with(vec![
            SpawnPoint::new(630.0, 240.0, 0.0),
            SpawnPoint::new(100.0, 100.0, 90.0),
        ]);
        let mut state = SimulationState::new(&config, &ids(2), 0).unwrap();
        let mut tick = 0;
        while state.player(0).alive {
            tick_all(&mut state, tick, Move::Straight);
            tick += 1;
        }
        assert_eq!(tick, 4);
        let segments = state.grid().len();
        assert!(segments > 0);
        assert!(state.grid().query_point(Point::new(631.5, 240.0), 1.5));
        state.eliminate(0);
        assert_eq!(state.grid().len(), segments);
    }

    #[test]
    #[should_panic(expected = "eliminated")]
    fn advancing_dead_player_panics() {
        let config = config_with(vec![SpawnPoint::new(100.0, 100.0, 0.0)]);
        let mut state = SimulationState::new(&config, &ids(1), 0).unwrap();
        state.eliminate(0);
        state.advance(0, Move::Straight);
    }
}
