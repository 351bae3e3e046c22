use std::collections::BTreeMap;
use std::time::Duration;

use arena_core::guarded_call;
use serde::{Deserialize, Serialize};

use crate::config::{DrawResolution, KurveConfig};
use crate::error::ConfigError;
use crate::result::{Elimination, GameResult, TurnLogEntry};
use crate::snapshot::{BoardView, GameInfo, GameSnapshot};
use crate::state::SimulationState;
use crate::strategy::Contestant;
use crate::{Move, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Running,
    Finished,
}

/// Drives one game from spawn to a result, one tick per [`step`](Self::step).
///
/// Contestant `i` plays player `i`. Strategies are called one after another
/// in input order, each with the board as it stood at the start of the tick.
pub struct TurnOrchestrator<'a> {
    config: &'a KurveConfig,
    contestants: &'a mut [Contestant],
    state: SimulationState,
    info: GameInfo,
    seed: u64,
    tick: u32,
    phase: Phase,
    /// Alive count at or below which the game is over. Zero for solo games.
    last_standing: usize,
    eliminations: BTreeMap<PlayerId, Elimination>,
    turn_log: Vec<TurnLogEntry>,
}

impl<'a> TurnOrchestrator<'a> {
    /// Set up a game. `seed` overrides `config.seed`; with neither, a random
    /// seed is drawn and reported in the result.
    pub fn new(
        config: &'a KurveConfig,
        contestants: &'a mut [Contestant],
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let ids: Vec<PlayerId> = contestants.iter().map(|c| c.id.clone()).collect();
        let seed = seed.or(config.seed).unwrap_or_else(rand::random);
        let state = SimulationState::new(config, &ids, seed)?;

        for contestant in contestants.iter_mut() {
            contestant.strategy.reset(seed);
        }

        tracing::debug!(
            game_id = %config.game_id,
            players = ids.len(),
            seed,
            "Game starting"
        );

        Ok(Self {
            config,
            contestants,
            state,
            info: GameInfo {
                id: config.game_id.clone(),
                timeout_ms: config.decision_timeout_ms,
            },
            seed,
            tick: 0,
            phase: Phase::Running,
            last_standing: usize::from(ids.len() > 1),
            eliminations: BTreeMap::new(),
            turn_log: Vec::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Next tick to be played, which is also the number of ticks played so far.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn turn_log(&self) -> &[TurnLogEntry] {
        &self.turn_log
    }

    /// Play one tick. A finished game stays finished.
    pub fn step(&mut self) -> Phase {
        if self.phase == Phase::Finished {
            return self.phase;
        }
        if self.tick >= self.config.tick_limit || self.state.alive_count() <= self.last_standing {
            self.phase = Phase::Finished;
            return self.phase;
        }

        let tick = self.tick;
        let alive = self.state.alive_players();
        let board = BoardView::capture(&self.state);
        let budget = self.config.decision_budget();

        let mut moves = Vec::with_capacity(alive.len());
        for &i in &alive {
            let snapshot = GameSnapshot {
                game: &self.info,
                tick,
                you: board.players[i].clone(),
                board: &board,
            };
            moves.push((i, decide_move(&mut self.contestants[i], &snapshot, budget)));
        }

        for &(i, mv) in &moves {
            self.state.advance(i, mv);
        }
        for &i in &alive {
            self.state.record_trail_if_recording(i, tick);
        }

        let mut eliminated = BTreeMap::new();
        for (i, elimination) in self.state.check_eliminations(tick) {
            let id = self.state.player(i).id.clone();
            tracing::info!(
                player = %id,
                tick,
                reason = elimination.reason.as_str(),
                killer = elimination.killer.as_ref().map(PlayerId::as_str).unwrap_or("none"),
                "Player eliminated"
            );
            self.state.eliminate(i);
            eliminated.insert(id, elimination);
        }

        let alive_after: Vec<PlayerId> = self
            .state
            .players()
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.id.clone())
            .collect();
        tracing::debug!(tick, alive = alive_after.len(), "Tick complete");

        self.eliminations
            .extend(eliminated.iter().map(|(id, e)| (id.clone(), e.clone())));
        self.turn_log.push(TurnLogEntry {
            tick,
            moves: moves
                .into_iter()
                .map(|(i, mv)| (self.state.player(i).id.clone(), mv))
                .collect(),
            alive: alive_after,
            eliminations: eliminated,
        });

        self.tick += 1;
        if self.tick >= self.config.tick_limit || self.state.alive_count() <= self.last_standing {
            self.phase = Phase::Finished;
        }
        self.phase
    }

    /// Play to the end and return the result.
    pub fn run(mut self) -> GameResult {
        while self.step() == Phase::Running {}
        self.finish()
    }

    /// Stop now and build the result from the current state. Multiple
    /// survivors are settled by the configured [`DrawResolution`].
    pub fn finish(self) -> GameResult {
        if self.phase == Phase::Running {
            tracing::debug!(tick = self.tick, "Game stopped before finishing");
        }

        let survivors = self.state.alive_players();
        let winner = match survivors.as_slice() {
            [] => None,
            [only] => Some(*only),
            tied => match self.config.draw_resolution {
                DrawResolution::FirstInOrder => tied.first().copied(),
                DrawResolution::NoWinner => None,
                DrawResolution::LongestTrail => {
                    let mut best: Option<(usize, usize)> = None;
                    for &i in tied {
                        let len = self.state.trail(i).len();
                        if best.is_none_or(|(_, best_len)| len > best_len) {
                            best = Some((i, len));
                        }
                    }
                    best.map(|(i, _)| i)
                },
            },
        };
        let winner = winner.map(|i| self.state.player(i).id.clone());

        tracing::info!(
            game_id = %self.info.id,
            seed = self.seed,
            ticks = self.tick,
            survivors = survivors.len(),
            winner = winner.as_ref().map(PlayerId::as_str).unwrap_or("none"),
            "Game over"
        );

        GameResult {
            seed: self.seed,
            winner,
            ticks: self.tick,
            eliminations: self.eliminations,
            survivors: survivors
                .into_iter()
                .map(|i| self.state.player(i).id.clone())
                .collect(),
            turn_log: self.turn_log,
        }
    }
}

/// Ask one strategy for its move. Any failure plays straight.
fn decide_move(
    contestant: &mut Contestant,
    snapshot: &GameSnapshot<'_>,
    budget: Option<Duration>,
) -> Move {
    let strategy = &mut contestant.strategy;
    match guarded_call(budget, || strategy.decide(snapshot)) {
        Ok(mv) => mv,
        Err(failure) => {
            tracing::warn!(
                player = %contestant.id,
                tick = snapshot.tick,
                kind = failure.kind(),
                error = %failure,
                "Strategy failed, playing straight"
            );
            Move::default()
        },
    }
}
