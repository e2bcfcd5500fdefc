use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::VideoPokerError;

/// A named hand category that a pay table can pay out on.
///
/// The Jacks or Better titles come first, then the Double Double Bonus
/// kicker titles, then the Deuces Wild titles. The declaration order is only
/// the ordinal used for dense storage. Classification priority is always
/// the order of the active `PayTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayTitle {
    RoyalStraightFlush,
    StraightFlush,
    FourOfAKind,
    FullHouse,
    Flush,
    Straight,
    ThreeOfAKind,
    TwoPair,
    JacksOrBetter,

    #[serde(rename = "FOUR_ACES_WITH_234")]
    FourAcesWith234,
    #[serde(rename = "FOUR_234S_WITH_A234")]
    Four234sWithA234,
    FourOfAKindAce,
    #[serde(rename = "FOUR_OF_A_KIND_234")]
    FourOfAKind234,
    #[serde(rename = "FOUR_OF_A_KIND_5_THRU_KING")]
    FourOfAKind5ThruKing,

    FourDeuces,
    WildRoyalStraightFlush,
    FiveOfAKind,
    WildStraightFlush,
    WildFourOfAKind,
    WildFullHouse,
    WildFlush,
    WildStraight,
    WildThreeOfAKind,
}

impl PayTitle {
    pub const COUNT: usize = 23;

    pub const ALL: [PayTitle; PayTitle::COUNT] = [
        PayTitle::RoyalStraightFlush,
        PayTitle::StraightFlush,
        PayTitle::FourOfAKind,
        PayTitle::FullHouse,
        PayTitle::Flush,
        PayTitle::Straight,
        PayTitle::ThreeOfAKind,
        PayTitle::TwoPair,
        PayTitle::JacksOrBetter,
        PayTitle::FourAcesWith234,
        PayTitle::Four234sWithA234,
        PayTitle::FourOfAKindAce,
        PayTitle::FourOfAKind234,
        PayTitle::FourOfAKind5ThruKing,
        PayTitle::FourDeuces,
        PayTitle::WildRoyalStraightFlush,
        PayTitle::FiveOfAKind,
        PayTitle::WildStraightFlush,
        PayTitle::WildFourOfAKind,
        PayTitle::WildFullHouse,
        PayTitle::WildFlush,
        PayTitle::WildStraight,
        PayTitle::WildThreeOfAKind,
    ];

    /// Dense ordinal in `0..PayTitle::COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<PayTitle> {
        Self::ALL.get(index).copied()
    }

    /// The canonical upper snake case name, the same one serde uses.
    pub fn as_str(self) -> &'static str {
        match self {
            PayTitle::RoyalStraightFlush => "ROYAL_STRAIGHT_FLUSH",
            PayTitle::StraightFlush => "STRAIGHT_FLUSH",
            PayTitle::FourOfAKind => "FOUR_OF_A_KIND",
            PayTitle::FullHouse => "FULL_HOUSE",
            PayTitle::Flush => "FLUSH",
            PayTitle::Straight => "STRAIGHT",
            PayTitle::ThreeOfAKind => "THREE_OF_A_KIND",
            PayTitle::TwoPair => "TWO_PAIR",
            PayTitle::JacksOrBetter => "JACKS_OR_BETTER",
            PayTitle::FourAcesWith234 => "FOUR_ACES_WITH_234",
            PayTitle::Four234sWithA234 => "FOUR_234S_WITH_A234",
            PayTitle::FourOfAKindAce => "FOUR_OF_A_KIND_ACE",
            PayTitle::FourOfAKind234 => "FOUR_OF_A_KIND_234",
            PayTitle::FourOfAKind5ThruKing => "FOUR_OF_A_KIND_5_THRU_KING",
            PayTitle::FourDeuces => "FOUR_DEUCES",
            PayTitle::WildRoyalStraightFlush => "WILD_ROYAL_STRAIGHT_FLUSH",
            PayTitle::FiveOfAKind => "FIVE_OF_A_KIND",
            PayTitle::WildStraightFlush => "WILD_STRAIGHT_FLUSH",
            PayTitle::WildFourOfAKind => "WILD_FOUR_OF_A_KIND",
            PayTitle::WildFullHouse => "WILD_FULL_HOUSE",
            PayTitle::WildFlush => "WILD_FLUSH",
            PayTitle::WildStraight => "WILD_STRAIGHT",
            PayTitle::WildThreeOfAKind => "WILD_THREE_OF_A_KIND",
        }
    }
}

impl fmt::Display for PayTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayTitle {
    type Err = VideoPokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PayTitle::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| VideoPokerError::UnknownPayTitle(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_are_dense() {
        for (i, t) in PayTitle::ALL.iter().enumerate() {
            assert_eq!(i, t.index());
            assert_eq!(Some(*t), PayTitle::from_index(i));
        }
        assert_eq!(None, PayTitle::from_index(PayTitle::COUNT));
    }

    #[test]
    fn test_serde_names_match_display() {
        for t in PayTitle::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(format!("\"{t}\""), json);
            let back: PayTitle = serde_json::from_str(&json).unwrap();
            assert_eq!(t, back);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Ok(PayTitle::FullHouse), "FULL_HOUSE".parse());
        assert_eq!(Ok(PayTitle::FourAcesWith234), "four_aces_with_234".parse());
        assert!("FIVE_ACES".parse::<PayTitle>().is_err());
    }
}
