use super::interface::{Evaluation, Evaluator, Game};
use super::rules;
use crate::error::DuelError;
use std::fmt::{Debug, Display};

/// Once the running number reaches this value the match is over.
pub const THRESHOLD: u64 = 5000;
pub const MIN_START: u64 = 25;
pub const MAX_START: u64 = 40;

pub struct Duel;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Side {
    Human,
    Computer,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Human => Side::Computer,
            Side::Computer => Side::Human,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Human => write!(f, "human"),
            Side::Computer => write!(f, "computer"),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Winner {
    Human,
    Computer,
    Draw,
}

impl Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Human => write!(f, "You Win!"),
            Winner::Computer => write!(f, "AI Wins!"),
            Winner::Draw => write!(f, "Draw!"),
        }
    }
}

/// One of the three legal factors. Can only be built from 2, 3 or 4, so a
/// move always strictly grows the number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Multiplier(u8);

impl Multiplier {
    /// Every multiplier, in the order the search visits them.
    pub const ALL: [Multiplier; 3] = [Multiplier(2), Multiplier(3), Multiplier(4)];

    pub fn get(self) -> u64 {
        self.0 as u64
    }
}

impl TryFrom<u64> for Multiplier {
    type Error = DuelError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            2..=4 => Ok(Multiplier(value as u8)),
            _ => Err(DuelError::InvalidMultiplier(value)),
        }
    }
}

impl Debug for Multiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl Display for Multiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Snapshot of a match between two turns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct State {
    pub number: u64,
    pub human_score: i64,
    pub computer_score: i64,
    pub bank: i64,
    pub turn: Side,
}

impl State {
    /// Opening position. The bank is seeded with 1 when `start` ends in 0 or 5.
    pub fn new(start: u64, first: Side) -> Self {
        Self {
            number: start,
            human_score: 0,
            computer_score: 0,
            bank: if rules::ends_in_0_or_5(start) { 1 } else { 0 },
            turn: first,
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.number >= THRESHOLD
    }

    pub fn score(&self, side: Side) -> i64 {
        match side {
            Side::Human => self.human_score,
            Side::Computer => self.computer_score,
        }
    }

    pub fn score_mut(&mut self, side: Side) -> &mut i64 {
        match side {
            Side::Human => &mut self.human_score,
            Side::Computer => &mut self.computer_score,
        }
    }

    /// Compares the scores as they stand.
    pub fn leader(&self) -> Winner {
        match self.human_score.cmp(&self.computer_score) {
            std::cmp::Ordering::Greater => Winner::Human,
            std::cmp::Ordering::Less => Winner::Computer,
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Number: {}", self.number)?;
        writeln!(f, "Your Score: {}", self.human_score)?;
        writeln!(f, "AI Score: {}", self.computer_score)?;
        write!(f, "Bank: {}", self.bank)
    }
}

impl Game for Duel {
    type S = State;
    type M = Multiplier;
    type P = Side;

    fn generate_moves(state: &Self::S, moves: &mut Vec<Self::M>) {
        moves.clear();
        moves.extend(
            Multiplier::ALL
                .into_iter()
                .filter(|m| state.number * m.get() < THRESHOLD),
        );
    }

    fn apply(state: &Self::S, m: Self::M, scorer: Self::P) -> Self::S {
        let mut next = *state;
        next.number = state.number * m.get();
        let (score, bank) = rules::apply(next.number, state.score(scorer), state.bank);
        *next.score_mut(scorer) = score;
        next.bank = bank;
        next.turn = state.turn.opponent();
        next
    }

    fn player_to_move(state: &Self::S) -> Self::P {
        state.turn
    }

    fn is_terminal(state: &Self::S) -> bool {
        state.is_terminal()
    }
}

/// Score difference in the human's favor, discounted by half the bank.
#[derive(Clone, Copy, Debug, Default)]
pub struct Heuristic;

impl Evaluator for Heuristic {
    type G = Duel;

    fn evaluate(&self, state: &State) -> Evaluation {
        (state.human_score - state.computer_score) as Evaluation - state.bank as Evaluation * 0.5
    }
}
