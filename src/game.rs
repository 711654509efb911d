//! A live match between a human and the computer.

use tracing::info;

use crate::duel::{Multiplier, Side, State, Winner, MAX_START, MIN_START};
use crate::error::DuelError;
use crate::interface::RandomSource;
use crate::rules::{self, Twist};
use crate::search::algorithm::{Algorithm, SearchOptions};
use crate::search::node::{NodeId, Tree};
use crate::search::selector::{Decision, MoveSelector};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingHumanMove,
    AwaitingComputerMove,
    GameOver(Winner),
}

impl Phase {
    fn awaiting(side: Side) -> Self {
        match side {
            Side::Human => Phase::AwaitingHumanMove,
            Side::Computer => Phase::AwaitingComputerMove,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MatchConfig {
    pub start: u64,
    pub first: Side,
    pub search: SearchOptions,
}

impl MatchConfig {
    pub fn new(start: u64, first: Side, algorithm: Algorithm) -> Self {
        Self {
            start,
            first,
            search: SearchOptions::default().with_algorithm(algorithm),
        }
    }

    pub fn with_search(mut self, search: SearchOptions) -> Self {
        self.search = search;
        self
    }
}

/// Everything a front end needs to report one applied move.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnResult {
    pub mover: Side,
    pub multiplier: Multiplier,
    pub state: State,
    /// Change to the mover's score from the parity rule alone.
    pub score_delta: i64,
    pub bank_delta: i64,
    pub twists: Vec<Twist>,
    /// Bank credited to the mover when this move ended the match.
    pub bank_award: Option<i64>,
    pub winner: Option<Winner>,
    /// How the computer chose this move. None for submitted moves.
    pub decision: Option<Decision>,
}

pub struct Match {
    // Real moves only. Lookahead nodes are rolled back after each search.
    history: Tree,
    current: NodeId,
    phase: Phase,
    selector: MoveSelector,
}

impl Match {
    pub fn start(start: u64, first: Side, algorithm: Algorithm) -> Result<Self, DuelError> {
        Self::with_config(MatchConfig::new(start, first, algorithm))
    }

    pub fn with_config(config: MatchConfig) -> Result<Self, DuelError> {
        if !(MIN_START..=MAX_START).contains(&config.start) {
            return Err(DuelError::InvalidRange(config.start));
        }
        let state = State::new(config.start, config.first);
        let selector = MoveSelector::new(config.search)?;
        info!(
            start = state.number,
            first = %state.turn,
            bank = state.bank,
            algorithm = ?selector.options().algorithm(),
            "match started"
        );
        Ok(Self::from_parts(state, selector))
    }

    /// Picks up from an arbitrary position, skipping the start range check.
    /// The number must be positive and the bank non-negative.
    pub fn resume(state: State, search: SearchOptions) -> Result<Self, DuelError> {
        if state.number == 0 || state.bank < 0 {
            return Err(DuelError::InvalidPosition {
                number: state.number,
                bank: state.bank,
            });
        }
        Ok(Self::from_parts(state, MoveSelector::new(search)?))
    }

    fn from_parts(state: State, selector: MoveSelector) -> Self {
        let history = Tree::new(state);
        let current = history.root();
        let phase = if state.is_terminal() {
            Phase::GameOver(state.leader())
        } else {
            Phase::awaiting(state.turn)
        };
        Self {
            history,
            current,
            phase,
            selector,
        }
    }

    pub fn state(&self) -> &State {
        self.history.state(self.current)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Winner> {
        match self.phase {
            Phase::GameOver(winner) => Some(winner),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Multipliers played so far, oldest first.
    pub fn history(&self) -> Vec<Multiplier> {
        self.history.path_to(self.current)
    }

    pub fn submit_human_move(&mut self, multiplier: u64) -> Result<TurnResult, DuelError> {
        self.expect_turn(Side::Human)?;
        let multiplier = Multiplier::try_from(multiplier)?;
        Ok(self.apply(Side::Human, multiplier, None))
    }

    pub fn request_computer_move<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<TurnResult, DuelError> {
        self.expect_turn(Side::Computer)?;
        let decision = self
            .selector
            .choose_move(&mut self.history, self.current, rng);
        Ok(self.apply(Side::Computer, decision.multiplier, Some(decision)))
    }

    /// Runs `selector` for whichever side is to move without playing the
    /// result.
    pub fn suggest_move<R: RandomSource + ?Sized>(
        &mut self,
        selector: &MoveSelector,
        rng: &mut R,
    ) -> Result<Decision, DuelError> {
        if self.is_over() {
            return Err(DuelError::GameAlreadyOver);
        }
        Ok(selector.choose_move(&mut self.history, self.current, rng))
    }

    fn expect_turn(&self, requested: Side) -> Result<(), DuelError> {
        let expected = match self.phase {
            Phase::GameOver(_) => return Err(DuelError::GameAlreadyOver),
            Phase::AwaitingHumanMove => Side::Human,
            Phase::AwaitingComputerMove => Side::Computer,
        };
        if expected != requested {
            return Err(DuelError::NotYourTurn {
                expected,
                requested,
            });
        }
        Ok(())
    }

    fn apply(
        &mut self,
        mover: Side,
        multiplier: Multiplier,
        decision: Option<Decision>,
    ) -> TurnResult {
        let before = *self.state();
        let mut next = before;
        next.number = before.number * multiplier.get();

        let mut twists = Vec::with_capacity(2);
        let (score, bank) =
            rules::apply_with(next.number, before.score(mover), before.bank, |t| twists.push(t));
        *next.score_mut(mover) = score;
        next.bank = bank;

        let (bank_award, winner) = if next.is_terminal() {
            *next.score_mut(mover) += next.bank;
            let winner = next.leader();
            self.phase = Phase::GameOver(winner);
            (Some(next.bank), Some(winner))
        } else {
            next.turn = mover.opponent();
            self.phase = Phase::awaiting(next.turn);
            (None, None)
        };

        self.current = self.history.add_child(self.current, multiplier, next);
        info!(
            %mover,
            %multiplier,
            number = next.number,
            human = next.human_score,
            computer = next.computer_score,
            bank = next.bank,
            "move applied"
        );
        if let Some(winner) = winner {
            info!(
                %winner,
                human = next.human_score,
                computer = next.computer_score,
                "match over"
            );
        }

        TurnResult {
            mover,
            multiplier,
            state: next,
            score_delta: score - before.score(mover),
            bank_delta: bank - before.bank,
            twists,
            bank_award,
            winner,
            decision,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::interface::RngSource;

    struct Fixed(f64, usize);

    impl RandomSource for Fixed {
        fn unit(&mut self) -> f64 {
            self.0
        }

        fn index(&mut self, len: usize) -> usize {
            self.1 % len
        }
    }

    #[test]
    fn test_start_range() {
        assert_eq!(
            Match::start(24, Side::Human, Algorithm::Minimax).err(),
            Some(DuelError::InvalidRange(24))
        );
        assert_eq!(
            Match::start(41, Side::Human, Algorithm::Minimax).err(),
            Some(DuelError::InvalidRange(41))
        );
        let m = Match::start(40, Side::Computer, Algorithm::AlphaBeta).unwrap();
        assert_eq!(m.phase(), Phase::AwaitingComputerMove);
        assert_eq!(m.state().bank, 1);
    }

    #[test]
    fn test_opening_human_move() {
        let mut m = Match::start(25, Side::Human, Algorithm::Minimax).unwrap();
        assert_eq!(m.state().bank, 1);
        let result = m.submit_human_move(4).unwrap();
        assert_eq!(
            result.state,
            State {
                number: 100,
                human_score: -3,
                computer_score: 0,
                bank: 3,
                turn: Side::Computer,
            }
        );
        assert_eq!(result.score_delta, -3);
        assert_eq!(result.bank_delta, 2);
        assert_eq!(result.twists, vec![Twist::EvenCrash, Twist::BankBonus]);
        assert_eq!(result.winner, None);
        assert_eq!(m.phase(), Phase::AwaitingComputerMove);
        assert_eq!(m.history(), vec![Multiplier::try_from(4).unwrap()]);
    }

    #[test]
    fn test_rejected_moves_leave_match_unchanged() {
        let mut m = Match::start(33, Side::Human, Algorithm::Minimax).unwrap();
        let before = *m.state();
        assert_eq!(
            m.submit_human_move(5).err(),
            Some(DuelError::InvalidMultiplier(5))
        );
        assert_eq!(
            m.request_computer_move(&mut Fixed(0.5, 0)).err(),
            Some(DuelError::NotYourTurn {
                expected: Side::Human,
                requested: Side::Computer,
            })
        );
        assert_eq!(*m.state(), before);
        assert!(m.history().is_empty());

        m.submit_human_move(2).unwrap();
        assert_eq!(
            m.submit_human_move(2).err(),
            Some(DuelError::NotYourTurn {
                expected: Side::Computer,
                requested: Side::Human,
            })
        );
    }

    #[test]
    fn test_bank_goes_to_final_mover() {
        let state = State {
            number: 1667,
            human_score: 7,
            computer_score: 7,
            bank: 4,
            turn: Side::Human,
        };
        let mut m = Match::resume(state, SearchOptions::default()).unwrap();
        // 5001 is odd and does not end in 0 or 5.
        let result = m.submit_human_move(3).unwrap();
        assert_eq!(result.state.human_score, 14);
        assert_eq!(result.state.computer_score, 7);
        assert_eq!(result.bank_award, Some(4));
        assert_eq!(result.winner, Some(Winner::Human));
        assert_eq!(m.phase(), Phase::GameOver(Winner::Human));
        assert_eq!(
            m.submit_human_move(2).err(),
            Some(DuelError::GameAlreadyOver)
        );
        assert_eq!(
            m.request_computer_move(&mut Fixed(0.5, 0)).err(),
            Some(DuelError::GameAlreadyOver)
        );
    }

    #[test]
    fn test_resume_rejects_stuck_positions() {
        let mut state = State::new(30, Side::Human);
        state.number = 0;
        assert_eq!(
            Match::resume(state, SearchOptions::default()).err(),
            Some(DuelError::InvalidPosition { number: 0, bank: 1 })
        );

        let mut state = State::new(30, Side::Human);
        state.bank = -5;
        assert_eq!(
            Match::resume(state, SearchOptions::default()).err(),
            Some(DuelError::InvalidPosition {
                number: 30,
                bank: -5
            })
        );

        // Any positive number still reaches the threshold.
        let mut state = State::new(30, Side::Human);
        state.number = 1;
        let mut m = Match::resume(state, SearchOptions::default()).unwrap();
        let mut rng = Fixed(0.9, 0);
        while !m.is_over() {
            match m.phase() {
                Phase::AwaitingHumanMove => m.submit_human_move(2).unwrap(),
                _ => m.request_computer_move(&mut rng).unwrap(),
            };
        }
        assert!(m.state().number >= 5000);
    }

    #[test]
    fn test_computer_final_moves() {
        let state = State {
            number: 2000,
            human_score: 5,
            computer_score: 0,
            bank: 0,
            turn: Side::Computer,
        };
        let mut m = Match::resume(state, SearchOptions::default()).unwrap();
        // Rogue x4: 8000 crashes to -3, then the bank of 2 brings it to -1.
        let result = m.request_computer_move(&mut Fixed(0.0, 2)).unwrap();
        assert_eq!(result.multiplier.get(), 4);
        assert!(result.decision.as_ref().unwrap().is_rogue());
        assert_eq!(result.state.computer_score, -1);
        assert_eq!(result.bank_award, Some(2));
        assert_eq!(result.winner, Some(Winner::Human));

        let state = State {
            number: 1667,
            human_score: 5,
            computer_score: 0,
            bank: 2,
            turn: Side::Computer,
        };
        let mut m = Match::resume(state, SearchOptions::default()).unwrap();
        // Rogue x3: 5001 boosts to 3, the bank of 2 levels the scores.
        let result = m.request_computer_move(&mut Fixed(0.0, 1)).unwrap();
        assert_eq!(result.multiplier.get(), 3);
        assert_eq!(result.state.computer_score, 5);
        assert_eq!(result.winner, Some(Winner::Draw));
        assert_eq!(m.phase(), Phase::GameOver(Winner::Draw));
    }

    #[test]
    fn test_suggest_move_keeps_history() {
        let mut m = Match::start(31, Side::Human, Algorithm::AlphaBeta).unwrap();
        let helper = MoveSelector::new(SearchOptions::default()).unwrap();
        let decision = m.suggest_move(&helper, &mut Fixed(0.9, 0)).unwrap();
        assert!(!decision.is_rogue());
        assert!(m.history().is_empty());
        assert_eq!(m.phase(), Phase::AwaitingHumanMove);
        m.submit_human_move(decision.multiplier.get()).unwrap();
        assert_eq!(m.history(), vec![decision.multiplier]);
    }

    #[test]
    fn test_search_does_not_touch_live_state() {
        let mut m = Match::start(35, Side::Computer, Algorithm::Minimax).unwrap();
        let result = m.request_computer_move(&mut Fixed(0.9, 0)).unwrap();
        assert!(!result.decision.as_ref().unwrap().is_rogue());
        // Only the played move may change the bank.
        assert_eq!(result.state.bank - 1, result.bank_delta);
        assert_eq!(m.history().len(), 1);
    }

    #[test]
    fn test_full_match_terminates() {
        for algorithm in [Algorithm::Minimax, Algorithm::AlphaBeta] {
            for seed in 0..20 {
                let mut rng = RngSource::seeded(seed);
                let first = if seed % 2 == 0 { Side::Human } else { Side::Computer };
                let mut m = Match::start(25 + seed % 16, first, algorithm).unwrap();
                let mut turns = 0;
                while !m.is_over() {
                    let result = match m.phase() {
                        Phase::AwaitingHumanMove => m.submit_human_move(2).unwrap(),
                        _ => m.request_computer_move(&mut rng).unwrap(),
                    };
                    assert_eq!(result.score_delta.abs(), 3);
                    turns += 1;
                }
                assert!(m.state().number >= 5000);
                assert_eq!(m.history().len(), turns);
                assert_eq!(m.winner(), Some(m.state().leader()));
            }
        }
    }
}
