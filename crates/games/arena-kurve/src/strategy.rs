use arena_core::StrategyError;

use crate::snapshot::GameSnapshot;
use crate::{Move, PlayerId};

/// A decision maker for one player.
///
/// `decide` is called once per tick while the player is alive. Returning an
/// error, panicking, or overrunning the decision budget all count as
/// choosing [`Move::Straight`].
pub trait Strategy {
    fn decide(&mut self, snapshot: &GameSnapshot<'_>) -> Result<Move, StrategyError>;

    /// Called before every game with that game's seed.
    fn reset(&mut self, _seed: u64) {}
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn decide(&mut self, snapshot: &GameSnapshot<'_>) -> Result<Move, StrategyError> {
        (**self).decide(snapshot)
    }

    fn reset(&mut self, seed: u64) {
        (**self).reset(seed);
    }
}

/// Strategy backed by a closure returning a [`Move`].
pub struct FnStrategy<F>(F);

pub fn from_fn<F>(f: F) -> FnStrategy<F>
where
    F: FnMut(&GameSnapshot<'_>) -> Result<Move, StrategyError>,
{
    FnStrategy(f)
}

impl<F> Strategy for FnStrategy<F>
where
    F: FnMut(&GameSnapshot<'_>) -> Result<Move, StrategyError>,
{
    fn decide(&mut self, snapshot: &GameSnapshot<'_>) -> Result<Move, StrategyError> {
        (self.0)(snapshot)
    }
}

/// Adapts a callback that answers with a move token (`"left"`, `"right"`,
/// `"straight"`). Anything else is an error.
pub struct TokenStrategy<F>(F);

impl<F> TokenStrategy<F>
where
    F: FnMut(&GameSnapshot<'_>) -> String,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Strategy for TokenStrategy<F>
where
    F: FnMut(&GameSnapshot<'_>) -> String,
{
    fn decide(&mut self, snapshot: &GameSnapshot<'_>) -> Result<Move, StrategyError> {
        (self.0)(snapshot).trim().parse()
    }
}

/// A player id paired with the strategy that plays it.
pub struct Contestant {
    pub id: PlayerId,
    pub strategy: Box<dyn Strategy>,
}

impl Contestant {
    pub fn new(id: impl Into<PlayerId>, strategy: impl Strategy + 'static) -> Self {
        Self {
            id: id.into(),
            strategy: Box::new(strategy),
        }
    }

    pub fn boxed(id: impl Into<PlayerId>, strategy: Box<dyn Strategy>) -> Self {
        Self {
            id: id.into(),
            strategy,
        }
    }
}

impl std::fmt::Debug for Contestant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contestant").field("id", &self.id).finish_non_exhaustive()
    }
}
