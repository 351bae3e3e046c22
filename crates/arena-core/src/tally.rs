use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// A finished game that may have declared a winner.
pub trait GameOutcome {
    fn winner(&self) -> Option<&PlayerId>;
}

/// Number of games a contestant won in a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinCount {
    pub player_id: PlayerId,
    pub wins: u32,
}

/// Aggregate over a series of independent games between the same contestants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult<R> {
    /// Contestant with the most wins. `None` when nobody won a game.
    /// Ties among the top tallies go to the earliest contestant in input order.
    pub match_winner: Option<PlayerId>,
    /// One entry per contestant, in input order.
    pub wins: Vec<WinCount>,
    /// Per-game results in play order.
    pub games: Vec<R>,
    pub total_games: u32,
}

impl<R: GameOutcome> MatchResult<R> {
    /// Tally wins for `contestants` over `games`.
    pub fn from_games(contestants: &[PlayerId], games: Vec<R>) -> Self {
        let mut wins: Vec<WinCount> = contestants
            .iter()
            .map(|id| WinCount {
                player_id: id.clone(),
                wins: 0,
            })
            .collect();

        for game in &games {
            let Some(winner) = game.winner() else {
                continue;
            };
            match wins.iter_mut().find(|w| &w.player_id == winner) {
                Some(entry) => entry.wins += 1,
                None => {
                    tracing::warn!(winner = %winner, "Game winner is not a match contestant");
                },
            }
        }

        let mut match_winner: Option<&WinCount> = None;
        for entry in &wins {
            if entry.wins > match_winner.map_or(0, |w| w.wins) {
                match_winner = Some(entry);
            }
        }

        Self {
            match_winner: match_winner.map(|w| w.player_id.clone()),
            total_games: games.len() as u32,
            wins,
            games,
        }
    }
}

impl<R> MatchResult<R> {
    pub fn wins_for(&self, player_id: &PlayerId) -> u32 {
        self.wins
            .iter()
            .find(|w| &w.player_id == player_id)
            .map_or(0, |w| w.wins)
    }
}

/// Seed for game `index` of a match: `seed_base + index`, or `None` when the
/// match is unseeded.
pub fn game_seed(seed_base: Option<u64>, index: u32) -> Option<u64> {
    seed_base.map(|base| base.wrapping_add(u64::from(index)))
}

/// Play `games` games in sequence and tally the results.
///
/// `play` receives the game index and that game's seed. The first error
/// aborts the match.
pub fn run_games<R, E>(
    contestants: &[PlayerId],
    games: u32,
    seed_base: Option<u64>,
    mut play: impl FnMut(u32, Option<u64>) -> Result<R, E>,
) -> Result<MatchResult<R>, E>
where
    R: GameOutcome,
{
    let mut results = Vec::with_capacity(games as usize);
    for index in 0..games {
        let result = play(index, game_seed(seed_base, index))?;
        tracing::info!(
            game = index,
            winner = result.winner().map(PlayerId::as_str).unwrap_or("none"),
            "Game finished"
        );
        results.push(result);
    }
    Ok(MatchResult::from_games(contestants, results))
}
