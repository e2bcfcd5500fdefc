use serde::{Deserialize, Serialize};
use tracing::{Level, event};

use crate::core::VideoPokerError;

use super::PayTitle;

/// One line of a pay table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayEntry {
    pub title: PayTitle,
    /// Payout per coin bet.
    pub payout: u32,
}

/// An ordered mapping from pay titles to payouts.
///
/// The order of the entries is the classification priority: a hand is paid
/// as the first title whose judge accepts it. The position of a title in the
/// table is its slot, which is how the outcome table stores it.
///
/// ```
/// use rs_video_poker::pay::{PayTable, PayTitle};
///
/// let table = PayTable::jacks_or_better_9_6();
/// assert_eq!(Some(9), table.payout(PayTitle::FullHouse));
/// assert_eq!(Some(0), table.slot(PayTitle::RoyalStraightFlush));
/// assert_eq!(None, table.payout(PayTitle::FourDeuces));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<PayEntry>", into = "Vec<PayEntry>")]
pub struct PayTable {
    entries: Vec<PayEntry>,
}

impl PayTable {
    /// Build a pay table from entries listed highest priority first.
    pub fn new<I>(entries: I) -> Result<Self, VideoPokerError>
    where
        I: IntoIterator<Item = (PayTitle, u32)>,
    {
        let entries: Vec<PayEntry> = entries
            .into_iter()
            .map(|(title, payout)| PayEntry { title, payout })
            .collect();
        Self::try_from(entries)
    }

    /// Build a pay table whose priority is the payout, highest first. Ties
    /// keep the order they were given in.
    ///
    /// Payout order is only a heuristic for priority. Kicker titles that pay
    /// more than a royal, or a pair and two pair paying the same, can make a
    /// hand classify differently than the game intends.
    pub fn ordered_by_payout<I>(entries: I) -> Result<Self, VideoPokerError>
    where
        I: IntoIterator<Item = (PayTitle, u32)>,
    {
        let mut entries: Vec<(PayTitle, u32)> = entries.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        event!(
            Level::WARN,
            "pay table priority derived from payouts, declare the order explicitly to be sure"
        );
        Self::new(entries)
    }

    pub fn entries(&self) -> &[PayEntry] {
        &self.entries
    }

    /// Titles in priority order.
    pub fn titles(&self) -> impl Iterator<Item = PayTitle> + '_ {
        self.entries.iter().map(|e| e.title)
    }

    pub fn payout(&self, title: PayTitle) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.title == title)
            .map(|e| e.payout)
    }

    /// The priority position of a title.
    pub fn slot(&self, title: PayTitle) -> Option<usize> {
        self.entries.iter().position(|e| e.title == title)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full pay Jacks or Better, with the royal at its one coin rate of 250.
    pub fn jacks_or_better_9_6() -> Self {
        Self::preset(&[
            (PayTitle::RoyalStraightFlush, 250),
            (PayTitle::StraightFlush, 50),
            (PayTitle::FourOfAKind, 25),
            (PayTitle::FullHouse, 9),
            (PayTitle::Flush, 6),
            (PayTitle::Straight, 4),
            (PayTitle::ThreeOfAKind, 3),
            (PayTitle::TwoPair, 2),
            (PayTitle::JacksOrBetter, 1),
        ])
    }

    /// Full pay Jacks or Better as played with five coins, where the royal
    /// jumps to 4000, or 800 per coin. Published returns assume this rate.
    pub fn jacks_or_better_9_6_max_coin() -> Self {
        Self::preset(&[
            (PayTitle::RoyalStraightFlush, 800),
            (PayTitle::StraightFlush, 50),
            (PayTitle::FourOfAKind, 25),
            (PayTitle::FullHouse, 9),
            (PayTitle::Flush, 6),
            (PayTitle::Straight, 4),
            (PayTitle::ThreeOfAKind, 3),
            (PayTitle::TwoPair, 2),
            (PayTitle::JacksOrBetter, 1),
        ])
    }

    pub fn jacks_or_better_8_5() -> Self {
        Self::preset(&[
            (PayTitle::RoyalStraightFlush, 250),
            (PayTitle::StraightFlush, 50),
            (PayTitle::FourOfAKind, 25),
            (PayTitle::FullHouse, 8),
            (PayTitle::Flush, 5),
            (PayTitle::Straight, 4),
            (PayTitle::ThreeOfAKind, 3),
            (PayTitle::TwoPair, 2),
            (PayTitle::JacksOrBetter, 1),
        ])
    }

    /// The short pay Jacks or Better usually played with streak multipliers.
    pub fn jacks_or_better_6_5() -> Self {
        Self::preset(&[
            (PayTitle::RoyalStraightFlush, 250),
            (PayTitle::StraightFlush, 50),
            (PayTitle::FourOfAKind, 25),
            (PayTitle::FullHouse, 6),
            (PayTitle::Flush, 5),
            (PayTitle::Straight, 4),
            (PayTitle::ThreeOfAKind, 3),
            (PayTitle::TwoPair, 2),
            (PayTitle::JacksOrBetter, 1),
        ])
    }

    pub fn double_double_bonus_9_6() -> Self {
        Self::preset(&[
            (PayTitle::RoyalStraightFlush, 250),
            (PayTitle::StraightFlush, 50),
            (PayTitle::FourAcesWith234, 400),
            (PayTitle::Four234sWithA234, 160),
            (PayTitle::FourOfAKindAce, 160),
            (PayTitle::FourOfAKind234, 80),
            (PayTitle::FourOfAKind5ThruKing, 50),
            (PayTitle::FullHouse, 9),
            (PayTitle::Flush, 6),
            (PayTitle::Straight, 4),
            (PayTitle::ThreeOfAKind, 3),
            (PayTitle::TwoPair, 1),
            (PayTitle::JacksOrBetter, 1),
        ])
    }

    pub fn deuces_wild_full_pay() -> Self {
        Self::preset(&[
            (PayTitle::RoyalStraightFlush, 250),
            (PayTitle::FourDeuces, 200),
            (PayTitle::WildRoyalStraightFlush, 25),
            (PayTitle::FiveOfAKind, 15),
            (PayTitle::WildStraightFlush, 9),
            (PayTitle::WildFourOfAKind, 5),
            (PayTitle::WildFullHouse, 3),
            (PayTitle::WildFlush, 2),
            (PayTitle::WildStraight, 2),
            (PayTitle::WildThreeOfAKind, 1),
        ])
    }

    fn preset(entries: &[(PayTitle, u32)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(title, payout)| PayEntry {
                    title: *title,
                    payout: *payout,
                })
                .collect(),
        }
    }
}

impl TryFrom<Vec<PayEntry>> for PayTable {
    type Error = VideoPokerError;

    fn try_from(entries: Vec<PayEntry>) -> Result<Self, Self::Error> {
        if entries.is_empty() {
            return Err(VideoPokerError::EmptyPayTable);
        }
        let mut seen = [false; PayTitle::COUNT];
        for entry in &entries {
            if entry.payout == 0 {
                return Err(VideoPokerError::NonPositivePayout(entry.title));
            }
            if std::mem::replace(&mut seen[entry.title.index()], true) {
                return Err(VideoPokerError::DuplicatePayTitle(entry.title));
            }
        }
        Ok(Self { entries })
    }
}

impl From<PayTable> for Vec<PayEntry> {
    fn from(value: PayTable) -> Self {
        value.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for table in [
            PayTable::jacks_or_better_9_6(),
            PayTable::jacks_or_better_9_6_max_coin(),
            PayTable::jacks_or_better_8_5(),
            PayTable::jacks_or_better_6_5(),
            PayTable::double_double_bonus_9_6(),
            PayTable::deuces_wild_full_pay(),
        ] {
            assert_eq!(Ok(table.clone()), PayTable::try_from(table.entries().to_vec()));
        }
    }

    #[test]
    fn test_max_coin_only_changes_the_royal() {
        let one_coin = PayTable::jacks_or_better_9_6();
        let max_coin = PayTable::jacks_or_better_9_6_max_coin();
        assert!(one_coin.titles().eq(max_coin.titles()));
        assert_eq!(Some(250), one_coin.payout(PayTitle::RoyalStraightFlush));
        assert_eq!(Some(800), max_coin.payout(PayTitle::RoyalStraightFlush));
        for title in one_coin.titles().skip(1) {
            assert_eq!(one_coin.payout(title), max_coin.payout(title));
        }
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert_eq!(
            Err(VideoPokerError::EmptyPayTable),
            PayTable::new(Vec::<(PayTitle, u32)>::new())
        );
        assert_eq!(
            Err(VideoPokerError::NonPositivePayout(PayTitle::Flush)),
            PayTable::new([(PayTitle::Flush, 0)])
        );
        assert_eq!(
            Err(VideoPokerError::DuplicatePayTitle(PayTitle::Flush)),
            PayTable::new([(PayTitle::Flush, 6), (PayTitle::Flush, 5)])
        );
    }

    #[test]
    fn test_declared_order_is_kept() {
        let table = PayTable::double_double_bonus_9_6();
        let titles: Vec<PayTitle> = table.titles().collect();
        assert_eq!(PayTitle::RoyalStraightFlush, titles[0]);
        assert_eq!(PayTitle::StraightFlush, titles[1]);
        assert_eq!(PayTitle::FourAcesWith234, titles[2]);
        assert_eq!(Some(12), table.slot(PayTitle::JacksOrBetter));
    }

    #[test_log::test]
    fn test_ordered_by_payout_is_stable() {
        let table = PayTable::ordered_by_payout(
            PayTable::double_double_bonus_9_6()
                .entries()
                .iter()
                .map(|e| (e.title, e.payout)),
        )
        .unwrap();
        let titles: Vec<PayTitle> = table.titles().collect();
        assert_eq!(PayTitle::FourAcesWith234, titles[0]);
        assert_eq!(PayTitle::RoyalStraightFlush, titles[1]);
        // 160 ties keep their declared order, and so do the 50s.
        assert_eq!(PayTitle::Four234sWithA234, titles[2]);
        assert_eq!(PayTitle::FourOfAKindAce, titles[3]);
        assert_eq!(PayTitle::StraightFlush, titles[5]);
        assert_eq!(PayTitle::FourOfAKind5ThruKing, titles[6]);
        assert_eq!(PayTitle::JacksOrBetter, titles[12]);
    }

    #[test]
    fn test_serde_validates() {
        let json = serde_json::to_string(&PayTable::jacks_or_better_9_6()).unwrap();
        assert!(json.starts_with("[{\"title\":\"ROYAL_STRAIGHT_FLUSH\",\"payout\":250}"));
        let back: PayTable = serde_json::from_str(&json).unwrap();
        assert_eq!(PayTable::jacks_or_better_9_6(), back);

        let bad = r#"[{"title":"FLUSH","payout":0}]"#;
        assert!(serde_json::from_str::<PayTable>(bad).is_err());
    }
}
