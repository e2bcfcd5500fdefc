use serde::{Deserialize, Serialize};

use crate::core::{Card, VideoPokerError};

use super::{CardGroups, JudgeFn, JudgeRegistry, PayTable, PayTitle};

/// What a final hand pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HandResult {
    /// `None` when no title matched.
    pub pay_title: Option<PayTitle>,
    pub pay: u32,
}

/// Classifies five card hands against a pay table.
///
/// Judges run in the pay table's priority order and the first one that
/// accepts the hand decides the title, so at most one title is ever paid.
#[derive(Debug, Clone)]
pub struct PayCalculator {
    pay_table: PayTable,
    judges: Vec<(PayTitle, JudgeFn)>,
}

impl PayCalculator {
    /// Resolve every title of the pay table against the registry.
    ///
    /// ```
    /// use rs_video_poker::pay::{JudgeRegistry, PayCalculator, PayTable, PayTitle};
    ///
    /// let mut registry = JudgeRegistry::standard();
    /// registry.unregister(PayTitle::TwoPair);
    ///
    /// assert!(PayCalculator::new(PayTable::jacks_or_better_9_6(), &registry).is_err());
    /// ```
    pub fn new(pay_table: PayTable, registry: &JudgeRegistry) -> Result<Self, VideoPokerError> {
        let judges = pay_table
            .titles()
            .map(|title| {
                registry
                    .get(title)
                    .map(|judge| (title, judge))
                    .ok_or(VideoPokerError::MissingJudge(title))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { pay_table, judges })
    }

    pub fn pay_table(&self) -> &PayTable {
        &self.pay_table
    }

    /// The slot of the first title whose judge accepts the cards.
    pub fn classify_slot(&self, cards: &[Card]) -> Option<usize> {
        let groups = CardGroups::new(cards);
        self.judges.iter().position(|(_, judge)| judge(&groups))
    }

    /// Score a final five card hand.
    ///
    /// ```
    /// use rs_video_poker::core::Hand;
    /// use rs_video_poker::pay::{JudgeRegistry, PayCalculator, PayTable, PayTitle};
    ///
    /// let calc = PayCalculator::new(PayTable::jacks_or_better_9_6(), &JudgeRegistry::standard()).unwrap();
    /// let result = calc.classify(&Hand::new_from_str("9h9d9c5s5d").unwrap());
    /// assert_eq!(Some(PayTitle::FullHouse), result.pay_title);
    /// assert_eq!(9, result.pay);
    /// ```
    pub fn classify(&self, cards: &[Card]) -> HandResult {
        match self.classify_slot(cards) {
            Some(slot) => {
                let entry = self.pay_table.entries()[slot];
                HandResult {
                    pay_title: Some(entry.title),
                    pay: entry.payout,
                }
            }
            None => HandResult::default(),
        }
    }
}
