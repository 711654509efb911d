use crate::duel::{Duel, Side, State};
use crate::error::DuelError;
use crate::interface::{Evaluation, Evaluator, Game, BEST_EVAL, WORST_EVAL};

use super::node::{NodeId, Tree};

/// Plies searched for each computer decision.
pub const DEFAULT_DEPTH: u32 = 3;
/// Chance that the computer skips the search and plays a random multiplier.
pub const DEFAULT_ROGUE_PROBABILITY: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Minimax,
    AlphaBeta,
}

/// Whose score a lookahead ply mutates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Perspective {
    /// Every ply credits the side that started the search, whatever the depth.
    SearchRoot,
    /// Every ply credits the side whose turn it models.
    SideToMove,
}

/// What a node with depth left but no move below the threshold is worth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeadEnd {
    /// Treat it as a cutoff and evaluate it.
    Cutoff,
    /// Return the untouched accumulator, -inf when maximizing and +inf when
    /// minimizing.
    Extreme,
}

/// Options for the computer's move selection.
#[derive(Clone, Debug)]
pub struct SearchOptions {
    pub(super) verbose: bool,
    pub(super) depth: u32,
    pub(super) rogue_probability: f64,
    pub(super) algorithm: Algorithm,
    pub(super) perspective: Perspective,
    pub(super) dead_end: DeadEnd,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            depth: DEFAULT_DEPTH,
            rogue_probability: DEFAULT_ROGUE_PROBABILITY,
            algorithm: Algorithm::Minimax,
            perspective: Perspective::SearchRoot,
            dead_end: DeadEnd::Cutoff,
        }
    }
}

impl SearchOptions {
    /// Log every candidate value at info level after each search.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Plies to look ahead, counting the candidate move itself.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Probability of a rogue move. Zero disables them.
    pub fn with_rogue_probability(mut self, probability: f64) -> Self {
        self.rogue_probability = probability;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_perspective(mut self, perspective: Perspective) -> Self {
        self.perspective = perspective;
        self
    }

    pub fn with_dead_end(mut self, dead_end: DeadEnd) -> Self {
        self.dead_end = dead_end;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn rogue_probability(&self) -> f64 {
        self.rogue_probability
    }

    pub fn validate(&self) -> Result<(), DuelError> {
        if self.depth == 0 {
            return Err(DuelError::InvalidOptions(
                "depth must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.rogue_probability) {
            return Err(DuelError::InvalidOptions(format!(
                "rogue probability {} is outside 0..=1",
                self.rogue_probability
            )));
        }
        Ok(())
    }
}

/// One search over a [`Tree`]. Children are appended to the tree as they are
/// generated; callers decide whether to keep them.
pub struct Lookahead<'t, E> {
    tree: &'t mut Tree,
    evaluator: &'t E,
    root_mover: Side,
    perspective: Perspective,
    dead_end: DeadEnd,
    expanded: usize,
}

impl<'t, E: Evaluator<G = Duel>> Lookahead<'t, E> {
    pub fn new(
        tree: &'t mut Tree,
        evaluator: &'t E,
        root_mover: Side,
        options: &SearchOptions,
    ) -> Self {
        Self {
            tree,
            evaluator,
            root_mover,
            perspective: options.perspective,
            dead_end: options.dead_end,
            expanded: 0,
        }
    }

    /// Nodes added to the tree so far.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    pub fn run(
        &mut self,
        algorithm: Algorithm,
        node: NodeId,
        depth: u32,
        maximizing: bool,
    ) -> Evaluation {
        match algorithm {
            Algorithm::Minimax => self.minimax(node, depth, maximizing),
            Algorithm::AlphaBeta => {
                self.alpha_beta(node, depth, WORST_EVAL, BEST_EVAL, maximizing)
            }
        }
    }

    pub fn minimax(&mut self, node: NodeId, depth: u32, maximizing: bool) -> Evaluation {
        self.search(node, depth, WORST_EVAL, BEST_EVAL, maximizing, false)
    }

    pub fn alpha_beta(
        &mut self,
        node: NodeId,
        depth: u32,
        alpha: Evaluation,
        beta: Evaluation,
        maximizing: bool,
    ) -> Evaluation {
        self.search(node, depth, alpha, beta, maximizing, true)
    }

    fn scorer(&self, state: &State) -> Side {
        match self.perspective {
            Perspective::SearchRoot => self.root_mover,
            Perspective::SideToMove => Duel::player_to_move(state),
        }
    }

    fn search(
        &mut self,
        node: NodeId,
        depth: u32,
        mut alpha: Evaluation,
        mut beta: Evaluation,
        maximizing: bool,
        prune: bool,
    ) -> Evaluation {
        let state = *self.tree.state(node);
        if depth == 0 || Duel::is_terminal(&state) {
            return self.evaluator.evaluate(&state);
        }

        let mut moves = Vec::with_capacity(3);
        Duel::generate_moves(&state, &mut moves);
        if moves.is_empty() && self.dead_end == DeadEnd::Cutoff {
            return self.evaluator.evaluate(&state);
        }

        let scorer = self.scorer(&state);
        let mut best = if maximizing { WORST_EVAL } else { BEST_EVAL };
        for m in moves {
            let child = self.tree.add_child(node, m, Duel::apply(&state, m, scorer));
            self.expanded += 1;
            let eval = self.search(child, depth - 1, alpha, beta, !maximizing, prune);
            if maximizing {
                best = best.max(eval);
                alpha = alpha.max(eval);
            } else {
                best = best.min(eval);
                beta = beta.min(eval);
            }
            if prune && beta <= alpha {
                break;
            }
        }
        best
    }
}
