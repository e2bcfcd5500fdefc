//! Judge functions decide whether a five card hand belongs to a pay title.
//!
//! Every judge works on the same two groupings of the hand, cards counted by
//! suit and cards counted by rank, so the groupings are built once per hand
//! in `CardGroups` and then handed to each judge in priority order.
//!
//! The boundary logic here feeds the precomputed outcome table, so changing
//! any predicate changes every expected value computed from it.

use std::fmt;

use crate::core::{Card, Suit};

use super::PayTitle;

/// Deuces are the wild rank for every wild title.
pub const WILD_RANK: usize = 2;

const ROYAL_RANKS: [usize; 5] = [10, 11, 12, 13, 1];

/// Counts of a hand's cards by suit and by rank (Ace = 1, King = 13).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardGroups {
    suits: [u8; 4],
    ranks: [u8; 14],
    suits_without_wild: [u8; 4],
}

impl CardGroups {
    pub fn new(cards: &[Card]) -> Self {
        let mut groups = Self::default();
        for card in cards {
            let suit = card.suit as usize;
            let rank = card.value.rank() as usize;
            groups.suits[suit] += 1;
            groups.ranks[rank] += 1;
            if rank != WILD_RANK {
                groups.suits_without_wild[suit] += 1;
            }
        }
        groups
    }

    pub fn suit_count(&self, suit: Suit) -> u8 {
        self.suits[suit as usize]
    }

    /// Number of cards of a rank in `1..=13`.
    pub fn rank_count(&self, rank: usize) -> u8 {
        self.ranks[rank]
    }

    pub fn wild_count(&self) -> u8 {
        self.ranks[WILD_RANK]
    }
}

/// A pure predicate over the grouped hand.
pub type JudgeFn = fn(&CardGroups) -> bool;

fn non_wild_ranks() -> impl Iterator<Item = usize> {
    (1..=13).filter(|r| *r != WILD_RANK)
}

fn is_flush(g: &CardGroups) -> bool {
    g.suits.iter().any(|n| *n == 5)
}

fn is_royal_run(g: &CardGroups) -> bool {
    ROYAL_RANKS.iter().all(|r| g.ranks[*r] == 1)
}

// Walks the four ranks after `first`, wrapping King to Ace.
fn follows_run(g: &CardGroups, first: usize, accept: impl Fn(u8) -> bool) -> bool {
    (first..first + 4).all(|rank| accept(g.ranks[1 + rank % 13]))
}

fn first_rank(g: &CardGroups) -> Option<usize> {
    (1..=13).find(|r| g.ranks[*r] >= 1)
}

fn is_royal_straight_flush(g: &CardGroups) -> bool {
    is_flush(g) && is_royal_run(g)
}

fn is_straight_flush(g: &CardGroups) -> bool {
    if !is_flush(g) {
        return false;
    }
    let sequential = first_rank(g).is_some_and(|first| follows_run(g, first, |n| n != 0));
    sequential || is_royal_run(g)
}

fn is_four_of_a_kind(g: &CardGroups) -> bool {
    g.ranks[1..].iter().any(|n| *n == 4)
}

fn is_full_house(g: &CardGroups) -> bool {
    g.ranks[1..].iter().any(|n| *n == 3) && g.ranks[1..].iter().any(|n| *n == 2)
}

fn is_straight(g: &CardGroups) -> bool {
    let sequential = first_rank(g).is_some_and(|first| follows_run(g, first, |n| n == 1));
    sequential || is_royal_run(g)
}

fn is_three_of_a_kind(g: &CardGroups) -> bool {
    g.ranks[1..].iter().any(|n| *n == 3)
}

fn is_two_pair(g: &CardGroups) -> bool {
    g.ranks[1..].iter().filter(|n| **n == 2).count() == 2
}

fn is_jacks_or_better(g: &CardGroups) -> bool {
    [1, 11, 12, 13].iter().any(|r| g.ranks[*r] == 2)
}

fn is_four_aces_with_234(g: &CardGroups) -> bool {
    g.ranks[1] == 4 && [2, 3, 4].iter().any(|r| g.ranks[*r] == 1)
}

fn is_four_234s_with_a234(g: &CardGroups) -> bool {
    [2, 3, 4].iter().any(|r| g.ranks[*r] == 4) && [1, 2, 3, 4].iter().any(|r| g.ranks[*r] == 1)
}

fn is_four_of_a_kind_ace(g: &CardGroups) -> bool {
    g.ranks[1] == 4
}

fn is_four_of_a_kind_234(g: &CardGroups) -> bool {
    [2, 3, 4].iter().any(|r| g.ranks[*r] == 4)
}

fn is_four_of_a_kind_5_thru_king(g: &CardGroups) -> bool {
    g.ranks[5..=13].iter().any(|n| *n == 4)
}

fn is_four_deuces(g: &CardGroups) -> bool {
    g.ranks[WILD_RANK] == 4
}

fn is_wild_flush(g: &CardGroups) -> bool {
    let wild = g.wild_count();
    g.suits_without_wild.iter().any(|n| n + wild == 5)
}

// Every card is a wild or a distinct royal rank.
fn is_wild_royal_run(g: &CardGroups) -> bool {
    let royal: u8 = ROYAL_RANKS.iter().map(|r| g.ranks[*r]).sum();
    g.wild_count() + royal == 5 && ROYAL_RANKS.iter().all(|r| g.ranks[*r] <= 1)
}

fn is_wild_royal_straight_flush(g: &CardGroups) -> bool {
    is_wild_flush(g) && is_wild_royal_run(g)
}

fn is_five_of_a_kind(g: &CardGroups) -> bool {
    let wild = g.wild_count();
    non_wild_ranks().any(|r| g.ranks[r] + wild == 5)
}

// Each wild card buys one missing rank. A natural deuce met inside the run
// also spends one, so the counter can go negative.
fn is_wild_sequence(g: &CardGroups) -> bool {
    let Some(first) = non_wild_ranks().find(|r| g.ranks[*r] >= 1) else {
        return false;
    };
    if g.ranks[first] != 1 {
        return false;
    }

    let mut remain_skips = g.wild_count() as i32;
    let mut sequential = true;
    for rank in first..first + 4 {
        let next = 1 + rank % 13;
        if g.ranks[next] != 1 {
            if remain_skips > 0 {
                remain_skips -= 1;
                continue;
            }
            sequential = false;
            break;
        }
        if next == WILD_RANK {
            remain_skips -= 1;
        }
    }
    sequential || is_wild_royal_run(g)
}

fn is_wild_straight_flush(g: &CardGroups) -> bool {
    is_wild_flush(g) && is_wild_sequence(g)
}

fn is_wild_four_of_a_kind(g: &CardGroups) -> bool {
    let wild = g.wild_count();
    for rank in 1..=13 {
        if rank == WILD_RANK {
            if g.ranks[rank] == 4 {
                return true;
            }
            continue;
        }
        if wild + g.ranks[rank] >= 4 {
            return true;
        }
    }
    false
}

fn is_wild_full_house(g: &CardGroups) -> bool {
    let mut distribution = [0u8; 6];
    for rank in non_wild_ranks() {
        distribution[g.ranks[rank] as usize] += 1;
    }

    let mut longest = [0i32; 2];
    for slot in longest.iter_mut() {
        if let Some(len) = (0..distribution.len()).rev().find(|l| distribution[*l] > 0) {
            distribution[len] -= 1;
            *slot = len as i32;
        }
    }

    let mut remain_wild = g.wild_count() as i32;
    let [three, two] = longest;
    if !(three + remain_wild >= 3 && three < 4) {
        return false;
    }
    remain_wild -= (3 - three).max(0);
    two + remain_wild >= 2 && two < 3
}

fn is_wild_straight(g: &CardGroups) -> bool {
    is_wild_sequence(g)
}

fn is_wild_three_of_a_kind(g: &CardGroups) -> bool {
    let wild = g.wild_count();
    non_wild_ranks().any(|r| wild + g.ranks[r] >= 3 && g.ranks[r] < 4)
}

/// The predicate shipped for a pay title.
pub fn standard_judge(title: PayTitle) -> JudgeFn {
    match title {
        PayTitle::RoyalStraightFlush => is_royal_straight_flush,
        PayTitle::StraightFlush => is_straight_flush,
        PayTitle::FourOfAKind => is_four_of_a_kind,
        PayTitle::FullHouse => is_full_house,
        PayTitle::Flush => is_flush,
        PayTitle::Straight => is_straight,
        PayTitle::ThreeOfAKind => is_three_of_a_kind,
        PayTitle::TwoPair => is_two_pair,
        PayTitle::JacksOrBetter => is_jacks_or_better,
        PayTitle::FourAcesWith234 => is_four_aces_with_234,
        PayTitle::Four234sWithA234 => is_four_234s_with_a234,
        PayTitle::FourOfAKindAce => is_four_of_a_kind_ace,
        PayTitle::FourOfAKind234 => is_four_of_a_kind_234,
        PayTitle::FourOfAKind5ThruKing => is_four_of_a_kind_5_thru_king,
        PayTitle::FourDeuces => is_four_deuces,
        PayTitle::WildRoyalStraightFlush => is_wild_royal_straight_flush,
        PayTitle::FiveOfAKind => is_five_of_a_kind,
        PayTitle::WildStraightFlush => is_wild_straight_flush,
        PayTitle::WildFourOfAKind => is_wild_four_of_a_kind,
        PayTitle::WildFullHouse => is_wild_full_house,
        PayTitle::WildFlush => is_wild_flush,
        PayTitle::WildStraight => is_wild_straight,
        PayTitle::WildThreeOfAKind => is_wild_three_of_a_kind,
    }
}

/// Maps pay titles to their judge functions.
///
/// A `PayCalculator` refuses to build when its pay table names a title that
/// has nothing registered here.
#[derive(Clone)]
pub struct JudgeRegistry {
    judges: [Option<JudgeFn>; PayTitle::COUNT],
}

impl JudgeRegistry {
    /// A registry with nothing in it.
    pub fn empty() -> Self {
        Self {
            judges: [None; PayTitle::COUNT],
        }
    }

    /// Every pay title with its shipped judge.
    ///
    /// ```
    /// use rs_video_poker::pay::{JudgeRegistry, PayTitle};
    ///
    /// let registry = JudgeRegistry::standard();
    /// assert!(PayTitle::ALL.iter().all(|t| registry.contains(*t)));
    /// ```
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for title in PayTitle::ALL {
            registry.register(title, standard_judge(title));
        }
        registry
    }

    /// Register a judge, returning the one it replaced.
    pub fn register(&mut self, title: PayTitle, judge: JudgeFn) -> Option<JudgeFn> {
        self.judges[title.index()].replace(judge)
    }

    pub fn unregister(&mut self, title: PayTitle) -> Option<JudgeFn> {
        self.judges[title.index()].take()
    }

    pub fn get(&self, title: PayTitle) -> Option<JudgeFn> {
        self.judges[title.index()]
    }

    pub fn contains(&self, title: PayTitle) -> bool {
        self.judges[title.index()].is_some()
    }
}

impl Default for JudgeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for JudgeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(PayTitle::ALL.iter().filter(|t| self.contains(**t)))
            .finish()
    }
}
