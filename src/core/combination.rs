//! Binomial coefficients and the dense rank of a card subset.
//!
//! The rank of a sorted `k` card subset `c0 < c1 < ... < c(k-1)` is
//!
//! ```text
//! C(52, k) - C(52 - c0, k)
//!     + sum over i in 1..k of [ C(51 - c(i-1), k - i) - C(52 - c(i), k - i) ]
//! ```
//!
//! which numbers the subsets in the same order that `CardIter` produces them.

use super::{Card, DECK_SIZE};

/// The largest subset that gets ranked. Video poker hands are five cards.
pub const MAX_SUBSET_SIZE: usize = 5;

type BinomialTable = [[usize; MAX_SUBSET_SIZE + 1]; DECK_SIZE + 1];

const fn exact_binomial(n: usize, r: usize) -> usize {
    if r > n {
        return 0;
    }
    let mut c = 1;
    let mut i = 0;
    while i < r {
        // c holds C(n, i) here so the division is always exact.
        c = c * (n - i) / (i + 1);
        i += 1;
    }
    c
}

const fn build_binomials() -> BinomialTable {
    let mut table = [[0; MAX_SUBSET_SIZE + 1]; DECK_SIZE + 1];
    let mut n = 0;
    while n <= DECK_SIZE {
        let mut r = 0;
        while r <= MAX_SUBSET_SIZE {
            table[n][r] = exact_binomial(n, r);
            r += 1;
        }
        n += 1;
    }
    table
}

static BINOMIALS: BinomialTable = build_binomials();

/// `C(n, r)` for `n <= 52` and `r <= 5`. Zero when `r > n`.
///
/// ```
/// use rs_video_poker::core::binomial;
///
/// assert_eq!(2_598_960, binomial(52, 5));
/// assert_eq!(1_081, binomial(47, 2));
/// assert_eq!(0, binomial(3, 4));
/// ```
///
/// # Panics
///
/// Panics when `n` or `r` is outside of the precomputed table.
pub fn binomial(n: usize, r: usize) -> usize {
    BINOMIALS[n][r]
}

/// Rank a subset of card indices. The slice does not need to be sorted.
///
/// # Panics
///
/// Panics when more than five indices are given. Subset sizes
/// outside of `0..=5` are a programming error, not a runtime condition.
pub fn index_rank(indices: &[u8]) -> usize {
    let k = indices.len();
    assert!(
        k <= MAX_SUBSET_SIZE,
        "cannot rank a subset of {k} cards, at most {MAX_SUBSET_SIZE} are allowed"
    );
    if k == 0 {
        return 0;
    }

    let mut sorted = [0usize; MAX_SUBSET_SIZE];
    for (slot, idx) in sorted.iter_mut().zip(indices) {
        *slot = *idx as usize;
    }
    let sorted = &mut sorted[..k];
    sorted.sort_unstable();

    let mut rank = BINOMIALS[DECK_SIZE][k] - BINOMIALS[DECK_SIZE - sorted[0]][k];
    for i in 1..k {
        rank += BINOMIALS[DECK_SIZE - 1 - sorted[i - 1]][k - i]
            - BINOMIALS[DECK_SIZE - sorted[i]][k - i];
    }
    rank
}

/// Rank a subset of cards into `0..C(52, cards.len())`.
///
/// ```
/// use rs_video_poker::core::{Card, subset_rank};
///
/// let cards: Vec<Card> = (0..5).filter_map(Card::from_index).collect();
/// assert_eq!(0, subset_rank(&cards));
/// assert_eq!(0, subset_rank(&[]));
/// ```
pub fn subset_rank(cards: &[Card]) -> usize {
    let mut indices = [0u8; MAX_SUBSET_SIZE];
    assert!(
        cards.len() <= MAX_SUBSET_SIZE,
        "cannot rank a subset of {} cards, at most {MAX_SUBSET_SIZE} are allowed",
        cards.len()
    );
    for (slot, card) in indices.iter_mut().zip(cards) {
        *slot = card.index();
    }
    index_rank(&indices[..cards.len()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardIter;

    #[test]
    fn test_known_binomials() {
        assert_eq!(1, binomial(52, 0));
        assert_eq!(52, binomial(52, 1));
        assert_eq!(1_326, binomial(52, 2));
        assert_eq!(22_100, binomial(52, 3));
        assert_eq!(270_725, binomial(52, 4));
        assert_eq!(2_598_960, binomial(52, 5));
        assert_eq!(1_533_939, binomial(47, 5));
        assert_eq!(0, binomial(0, 1));
        assert_eq!(1, binomial(0, 0));
    }

    #[test]
    fn test_pascal_rule() {
        for n in 1..=DECK_SIZE {
            for r in 1..=MAX_SUBSET_SIZE {
                assert_eq!(
                    binomial(n, r),
                    binomial(n - 1, r - 1) + binomial(n - 1, r),
                    "C({n}, {r})"
                );
            }
        }
    }

    #[test]
    fn test_rank_follows_enumeration_order() {
        // Walking every k subset in lexicographic order must give
        // exactly 0, 1, 2, ... which makes the rank a bijection.
        for k in 0..=MAX_SUBSET_SIZE {
            let mut count = 0;
            for (position, subset) in CardIter::new(Card::all().collect(), k).enumerate() {
                assert_eq!(position, subset_rank(&subset));
                count += 1;
            }
            assert_eq!(binomial(DECK_SIZE, k), count);
        }
    }

    #[test]
    fn test_rank_ignores_order() {
        let a = [8u8, 21, 40, 30, 25];
        let b = [40u8, 30, 25, 21, 8];
        assert_eq!(index_rank(&a), index_rank(&b));
    }

    #[test]
    fn test_last_subset() {
        let top: Vec<u8> = (47..52).collect();
        assert_eq!(binomial(52, 5) - 1, index_rank(&top));
        assert_eq!(51, index_rank(&[51]));
    }

    #[test]
    #[should_panic]
    fn test_rank_too_many_cards() {
        index_rank(&[0, 1, 2, 3, 4, 5]);
    }
}
