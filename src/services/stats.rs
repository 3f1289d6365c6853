//! Derived statistics over win/loss/draw tallies.
//!
//! Pure functions, no I/O: callers pass in tallies read from already-loaded
//! rows. Overall rates are always computed from summed totals, never as an
//! average of per-team rates; the two disagree whenever teams have played
//! different numbers of matches.

/// Raw win/loss/draw tally for one competitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
}

impl Tally {
    #[must_use]
    pub const fn new(wins: i32, losses: i32, draws: i32) -> Self {
        Self {
            wins,
            losses,
            draws,
        }
    }

    /// Total matches: wins + losses + draws.
    #[must_use]
    pub const fn matches(self) -> i32 {
        self.wins + self.losses + self.draws
    }

    /// Win percentage for this tally.
    #[must_use]
    pub fn win_rate(self) -> i32 {
        win_rate(self.wins, self.losses, self.draws)
    }
}

/// Win percentage, rounded half-up to the nearest integer.
///
/// Draws count in the denominator but not the numerator; zero matches is 0%.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn win_rate(wins: i32, losses: i32, draws: i32) -> i32 {
    let total = wins + losses + draws;
    if total == 0 {
        return 0;
    }
    (100.0 * f64::from(wins) / f64::from(total)).round() as i32
}

/// Sum a collection of tallies into one.
#[must_use]
pub fn totals<I>(tallies: I) -> Tally
where
    I: IntoIterator<Item = Tally>,
{
    tallies.into_iter().fold(Tally::default(), |acc, t| Tally {
        wins: acc.wins + t.wins,
        losses: acc.losses + t.losses,
        draws: acc.draws + t.draws,
    })
}

/// Sort descending by win rate.
///
/// The sort is stable, so ties keep their input order; there is deliberately
/// no secondary key on raw win counts.
#[must_use]
pub fn rank_by_win_rate<T, F>(mut items: Vec<T>, tally: F) -> Vec<T>
where
    F: Fn(&T) -> Tally,
{
    items.sort_by_key(|item| std::cmp::Reverse(tally(item).win_rate()));
    items
}
