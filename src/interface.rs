//! The common structures and traits.

/// An assessment of a game state. Higher values favor the maximizing side.
pub type Evaluation = f64;

/// Starting accumulator of a maximizing node; also the lowest possible value.
pub const WORST_EVAL: Evaluation = f64::NEG_INFINITY;
/// Starting accumulator of a minimizing node; also the highest possible value.
pub const BEST_EVAL: Evaluation = f64::INFINITY;

/// Defines the rules of a two-player, perfect-knowledge game as seen by the
/// tree search.
///
/// This is meant to be defined on an empty newtype so that the search code
/// never needs to know about the concrete state layout.
pub trait Game: Sized {
    /// The type of the game state.
    type S: Clone;
    /// The type of game moves.
    type M: Copy;
    /// Identifies a participant.
    type P: Copy;

    /// Generate the moves worth expanding at the given state, in a fixed
    /// order. Moves that would end the game are not generated.
    fn generate_moves(state: &Self::S, moves: &mut Vec<Self::M>);

    /// Build the state reached by playing `m`, crediting the move's side
    /// effects to `scorer`.
    fn apply(state: &Self::S, m: Self::M, scorer: Self::P) -> Self::S;

    /// The participant whose turn it is at `state`.
    fn player_to_move(state: &Self::S) -> Self::P;

    /// Whether the state lies at or beyond the end of the game.
    fn is_terminal(state: &Self::S) -> bool;
}

/// Static evaluation of a cutoff node.
pub trait Evaluator {
    type G: Game;

    fn evaluate(&self, state: &<Self::G as Game>::S) -> Evaluation;
}

/// Source of randomness for move selection. Injected so that callers can
/// force a particular branch.
pub trait RandomSource {
    /// A uniform draw from `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// A uniform index from `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;
}

/// Adapts any `rand` generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: rand::Rng> RandomSource for RngSource<R> {
    fn unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

impl RngSource<rand::rngs::ThreadRng> {
    pub fn thread() -> Self {
        RngSource(rand::thread_rng())
    }
}

impl RngSource<rand::rngs::StdRng> {
    pub fn seeded(seed: u64) -> Self {
        use rand::SeedableRng;
        RngSource(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_seeded_source_is_in_range() {
        let mut source = RngSource::seeded(7);
        for _ in 0..1000 {
            let u = source.unit();
            assert!((0.0..1.0).contains(&u));
            assert!(source.index(3) < 3);
        }
    }

    #[test]
    fn test_seeded_source_repeats() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.unit(), b.unit());
            assert_eq!(a.index(3), b.index(3));
        }
    }
}
