use tracing::{debug, info};

use crate::duel::{Duel, Heuristic, Multiplier, THRESHOLD};
use crate::error::DuelError;
use crate::interface::{Evaluation, Evaluator, Game, RandomSource, WORST_EVAL};

use super::algorithm::{Lookahead, SearchOptions};
use super::node::{NodeId, Tree};

/// How a [`Decision`] was reached.
#[derive(Clone, Debug, PartialEq)]
pub enum DecisionKind {
    /// Uniformly random pick; no node was expanded.
    Rogue,
    Searched {
        /// Value of every candidate below the threshold, in visiting order.
        candidates: Vec<(Multiplier, Evaluation)>,
        /// Lookahead nodes created, candidates included.
        expanded: usize,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub multiplier: Multiplier,
    pub kind: DecisionKind,
}

impl Decision {
    pub fn is_rogue(&self) -> bool {
        self.kind == DecisionKind::Rogue
    }
}

/// Picks moves for an automated side: occasionally at random, otherwise by
/// searching every candidate and keeping the best.
pub struct MoveSelector<E = Heuristic> {
    options: SearchOptions,
    evaluator: E,
}

impl MoveSelector<Heuristic> {
    pub fn new(options: SearchOptions) -> Result<Self, DuelError> {
        Self::with_evaluator(options, Heuristic)
    }
}

impl<E: Evaluator<G = Duel>> MoveSelector<E> {
    pub fn with_evaluator(options: SearchOptions, evaluator: E) -> Result<Self, DuelError> {
        options.validate()?;
        Ok(Self { options, evaluator })
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Chooses a move for the side to play at `current`. Lookahead nodes are
    /// hung under `current` while searching and removed before returning.
    pub fn choose_move<R: RandomSource + ?Sized>(
        &self,
        tree: &mut Tree,
        current: NodeId,
        rng: &mut R,
    ) -> Decision {
        let draw = rng.unit();
        if draw < self.options.rogue_probability {
            let multiplier = Multiplier::ALL[rng.index(Multiplier::ALL.len())];
            debug!(draw, %multiplier, "rogue move");
            return Decision {
                multiplier,
                kind: DecisionKind::Rogue,
            };
        }

        let mark = tree.checkpoint();
        let (multiplier, candidates, expanded) = self.search(tree, current);
        tree.rollback(mark);

        if self.options.verbose {
            info!(?candidates, expanded, %multiplier, "search finished");
        }

        Decision {
            multiplier,
            kind: DecisionKind::Searched {
                candidates,
                expanded,
            },
        }
    }

    fn search(
        &self,
        tree: &mut Tree,
        current: NodeId,
    ) -> (Multiplier, Vec<(Multiplier, Evaluation)>, usize) {
        let state = *tree.state(current);
        let mover = Duel::player_to_move(&state);
        let depth = self.options.depth - 1;

        // Falls back to the smallest factor when every candidate crosses the threshold.
        let mut best_move = Multiplier::ALL[0];
        let mut best_value = WORST_EVAL;
        let mut candidates = Vec::with_capacity(Multiplier::ALL.len());
        let mut expanded = 0;

        for m in Multiplier::ALL {
            if state.number * m.get() >= THRESHOLD {
                continue;
            }
            let child = tree.add_child(current, m, Duel::apply(&state, m, mover));
            let mut lookahead = Lookahead::new(tree, &self.evaluator, mover, &self.options);
            let value = lookahead.run(self.options.algorithm, child, depth, false);
            expanded += 1 + lookahead.expanded();
            debug!(%m, value, "candidate");
            candidates.push((m, value));
            // Ties keep the earlier, smaller factor.
            if value > best_value {
                best_value = value;
                best_move = m;
            }
        }
        (best_move, candidates, expanded)
    }
}
