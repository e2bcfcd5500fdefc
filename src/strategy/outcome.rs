use std::ops::{AddAssign, SubAssign};

use crate::pay::{PayTable, PayTitle};

/// A frequency distribution of pay titles over a finite population of
/// completed hands.
///
/// `case_count` is the size of the population and `result` holds, per pay
/// title ordinal, how many of those hands are paid as that title. Counts are
/// signed so that inclusion-exclusion can subtract freely. A finished
/// correction is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedOutcome {
    pub case_count: i64,
    pub result: [i64; PayTitle::COUNT],
}

impl ExpectedOutcome {
    pub fn new(case_count: i64) -> Self {
        Self {
            case_count,
            result: [0; PayTitle::COUNT],
        }
    }

    pub fn count(&self, title: PayTitle) -> i64 {
        self.result[title.index()]
    }

    pub fn add_count(&mut self, title: PayTitle, count: i64) {
        self.result[title.index()] += count;
    }

    /// How many hands of the population pay anything.
    pub fn winning_count(&self) -> i64 {
        self.result.iter().sum()
    }

    /// Titles with a non zero count.
    pub fn iter(&self) -> impl Iterator<Item = (PayTitle, i64)> + '_ {
        PayTitle::ALL
            .iter()
            .map(|t| (*t, self.result[t.index()]))
            .filter(|(_, n)| *n != 0)
    }

    /// Expected pay per coin over the population.
    ///
    /// ```
    /// use rs_video_poker::pay::{PayTable, PayTitle};
    /// use rs_video_poker::strategy::ExpectedOutcome;
    ///
    /// let mut outcome = ExpectedOutcome::new(4);
    /// outcome.add_count(PayTitle::JacksOrBetter, 2);
    /// outcome.add_count(PayTitle::TwoPair, 1);
    /// assert_eq!(1.0, outcome.expected_value(&PayTable::jacks_or_better_9_6()));
    /// ```
    pub fn expected_value(&self, pay_table: &PayTable) -> f64 {
        if self.case_count == 0 {
            return 0.0;
        }
        let total: i64 = pay_table
            .entries()
            .iter()
            .map(|e| i64::from(e.payout) * self.result[e.title.index()])
            .sum();
        total as f64 / self.case_count as f64
    }
}

impl AddAssign<&ExpectedOutcome> for ExpectedOutcome {
    fn add_assign(&mut self, rhs: &ExpectedOutcome) {
        self.case_count += rhs.case_count;
        for (into, from) in self.result.iter_mut().zip(rhs.result.iter()) {
            *into += *from;
        }
    }
}

impl SubAssign<&ExpectedOutcome> for ExpectedOutcome {
    fn sub_assign(&mut self, rhs: &ExpectedOutcome) {
        self.case_count -= rhs.case_count;
        for (into, from) in self.result.iter_mut().zip(rhs.result.iter()) {
            *into -= *from;
        }
    }
}
