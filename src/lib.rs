mod duel;
pub mod error;
pub mod game;
pub mod interface;
pub mod rules;
pub mod search;

pub use duel::{Duel, Heuristic, Multiplier, Side, State, Winner, MAX_START, MIN_START, THRESHOLD};
pub use error::DuelError;
pub use game::{Match, MatchConfig, Phase, TurnResult};
pub use search::algorithm::{Algorithm, DeadEnd, Perspective, SearchOptions};
pub use search::selector::{Decision, DecisionKind, MoveSelector};
