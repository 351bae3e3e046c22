use arena_core::tally;

use crate::KurveMatchResult;
use crate::config::KurveConfig;
use crate::error::ConfigError;
use crate::orchestrator::TurnOrchestrator;
use crate::strategy::Contestant;
use crate::PlayerId;

pub const DEFAULT_GAMES: u32 = 5;

/// Plays the same contestants against each other for a number of games.
///
/// With a seed base, game `i` is seeded with `seed_base + i`, so a whole match
/// can be replayed. Each game builds fresh state and random source.
#[derive(Debug, Clone)]
pub struct MatchRunner {
    config: KurveConfig,
    games: u32,
    seed_base: Option<u64>,
}

impl MatchRunner {
    pub fn new(config: KurveConfig) -> Self {
        let seed_base = config.seed;
        Self {
            config,
            games: DEFAULT_GAMES,
            seed_base,
        }
    }

    pub fn games(mut self, games: u32) -> Self {
        self.games = games;
        self
    }

    pub fn seed_base(mut self, seed_base: Option<u64>) -> Self {
        self.seed_base = seed_base;
        self
    }

    pub fn config(&self) -> &KurveConfig {
        &self.config
    }

    pub fn run(&self, contestants: &mut [Contestant]) -> Result<KurveMatchResult, ConfigError> {
        if self.games == 0 {
            return Err(ConfigError::NoGames);
        }
        let ids: Vec<PlayerId> = contestants.iter().map(|c| c.id.clone()).collect();
        self.config.validate(&ids)?;

        let result = tally::run_games(&ids, self.games, self.seed_base, |_, seed| {
            TurnOrchestrator::new(&self.config, &mut *contestants, seed).map(TurnOrchestrator::run)
        })?;

        tracing::info!(
            games = result.total_games,
            winner = result
                .match_winner
                .as_ref()
                .map(PlayerId::as_str)
                .unwrap_or("none"),
            "Match finished"
        );
        Ok(result)
    }
}

impl Default for MatchRunner {
    fn default() -> Self {
        Self::new(KurveConfig::default())
    }
}
