use thiserror::Error;

use crate::duel::Side;

/// Errors reported to the caller of a match operation. None of them alter the
/// match they were raised for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuelError {
    #[error("start number {0} is outside 25..=40")]
    InvalidRange(u64),
    #[error("multiplier {0} is not one of 2, 3 or 4")]
    InvalidMultiplier(u64),
    #[error("it is the {expected}'s turn, not the {requested}'s")]
    NotYourTurn { expected: Side, requested: Side },
    #[error("cannot resume at number {number} with bank {bank}")]
    InvalidPosition { number: u64, bank: i64 },
    #[error("the match is already over")]
    GameAlreadyOver,
    #[error("invalid search options: {0}")]
    InvalidOptions(String),
}
