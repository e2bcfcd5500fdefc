use serde::{Deserialize, Serialize};

use crate::pay::PayTitle;

/// Streak multipliers. When a line wins, the next hand on that line has its
/// pay multiplied by the multiplier of the title it won with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierTable {
    multipliers: [u32; PayTitle::COUNT],
}

impl MultiplierTable {
    /// Titles that are not listed multiply by one.
    pub fn new<I>(multipliers: I) -> Self
    where
        I: IntoIterator<Item = (PayTitle, u32)>,
    {
        let mut table = [1; PayTitle::COUNT];
        for (title, multiplier) in multipliers {
            table[title.index()] = multiplier;
        }
        Self {
            multipliers: table,
        }
    }

    /// Ultimate X multipliers for Jacks or Better 6/5.
    pub fn ultimate_x_jacks_or_better_6_5() -> Self {
        Self::new([
            (PayTitle::RoyalStraightFlush, 7),
            (PayTitle::StraightFlush, 7),
            (PayTitle::FourOfAKind, 3),
            (PayTitle::FullHouse, 12),
            (PayTitle::Flush, 11),
            (PayTitle::Straight, 7),
            (PayTitle::ThreeOfAKind, 4),
            (PayTitle::TwoPair, 3),
            (PayTitle::JacksOrBetter, 2),
        ])
    }

    pub fn multiplier(&self, title: PayTitle) -> u32 {
        self.multipliers[title.index()]
    }

    /// The multiplier earned by the previous hand, one when it paid nothing.
    pub fn after(&self, previous: Option<PayTitle>) -> u32 {
        previous.map_or(1, |title| self.multiplier(title))
    }
}

impl Default for MultiplierTable {
    fn default() -> Self {
        Self::new([])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlisted_titles_multiply_by_one() {
        let table = MultiplierTable::ultimate_x_jacks_or_better_6_5();
        assert_eq!(12, table.multiplier(PayTitle::FullHouse));
        assert_eq!(1, table.multiplier(PayTitle::FiveOfAKind));
        assert_eq!(1, table.after(None));
        assert_eq!(2, table.after(Some(PayTitle::JacksOrBetter)));
        assert_eq!(1, MultiplierTable::default().after(Some(PayTitle::Flush)));
    }
}
