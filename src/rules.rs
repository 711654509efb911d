//! Parity and divisibility side effects of a multiplication.

/// Points gained on an odd result or lost on an even one.
pub const SWING: i64 = 3;
/// Bank growth when a result ends in 0 or 5.
pub const BANK_BONUS: i64 = 2;

/// A side effect triggered by one move, reported for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Twist {
    /// Even result: the mover loses [`SWING`] points.
    EvenCrash,
    /// Odd result: the mover gains [`SWING`] points.
    OddBoost,
    /// Result ends in 0 or 5: the bank grows by [`BANK_BONUS`].
    BankBonus,
}

impl std::fmt::Display for Twist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Twist::EvenCrash => write!(f, "Even Crash: -{SWING}!"),
            Twist::OddBoost => write!(f, "Odd Boost: +{SWING}!"),
            Twist::BankBonus => write!(f, "0/5 Twist: Bank +{BANK_BONUS}!"),
        }
    }
}

#[inline]
pub fn ends_in_0_or_5(number: u64) -> bool {
    number % 5 == 0
}

/// Returns the mover's new score and the new bank after a move produced
/// `result`.
#[inline]
pub fn apply(result: u64, score: i64, bank: i64) -> (i64, i64) {
    apply_with(result, score, bank, |_| {})
}

/// Same as [`apply`], calling `notify` once per triggered twist.
pub fn apply_with<F: FnMut(Twist)>(
    result: u64,
    score: i64,
    bank: i64,
    mut notify: F,
) -> (i64, i64) {
    let score = if result % 2 == 0 {
        notify(Twist::EvenCrash);
        score - SWING
    } else {
        notify(Twist::OddBoost);
        score + SWING
    };
    let bank = if ends_in_0_or_5(result) {
        notify(Twist::BankBonus);
        bank + BANK_BONUS
    } else {
        bank
    };
    (score, bank)
}
