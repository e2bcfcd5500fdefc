use std::io;
use std::sync::Arc;
use std::time::Instant;

use tracing::{Level, event, trace_span};

use crate::core::{Card, CardIter, DECK_SIZE, HAND_SIZE, binomial, index_rank};
use crate::pay::{PayCalculator, PayTitle};

use super::{CacheError, ExpectedOutcome, HOLD_COUNT, TableCache};

/// How many completed hands contain a given `held` card subset when the
/// rest is drawn from the full deck.
pub fn completions(held: usize) -> i64 {
    binomial(DECK_SIZE - held, HAND_SIZE - held) as i64
}

/// For every card subset of size 0 to 5, how each pay title is reached
/// by the five card hands that contain it.
///
/// Tiers 0 to 4 store one `u32` count per pay table slot, laid out as
/// `rank * slots + slot` where `rank` is the subset rank. Tier 5 stores one
/// byte per complete hand: zero when it pays nothing, otherwise its
/// slot plus one.
///
/// The table never changes once built and is shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeTable {
    titles: Vec<PayTitle>,
    counts: [Vec<u32>; HAND_SIZE],
    full_hands: Vec<u8>,
}

impl OutcomeTable {
    /// Enumerate every hand of the deck once and credit its pay title to
    /// all 32 of its subsets.
    pub fn build(calculator: &PayCalculator) -> Self {
        let titles: Vec<PayTitle> = calculator.pay_table().titles().collect();
        let slots = titles.len();
        let mut counts: [Vec<u32>; HAND_SIZE] =
            std::array::from_fn(|held| vec![0; binomial(DECK_SIZE, held) * slots]);
        let mut full_hands = vec![0u8; binomial(DECK_SIZE, HAND_SIZE)];

        let span = trace_span!("build_outcome_table", slots);
        let _enter = span.enter();
        event!(Level::INFO, slots, "building outcome table");
        let start = Instant::now();

        let mut indices = [0u8; HAND_SIZE];
        let mut subset = [0u8; HAND_SIZE];
        for hand in CardIter::all_hands() {
            let Some(slot) = calculator.classify_slot(&hand) else {
                continue;
            };
            for (idx, card) in indices.iter_mut().zip(&hand) {
                *idx = card.index();
            }
            for mask in 0..HOLD_COUNT {
                let mut len = 0;
                for (pos, idx) in indices.iter().enumerate() {
                    if mask & (1 << pos) != 0 {
                        subset[len] = *idx;
                        len += 1;
                    }
                }
                let rank = index_rank(&subset[..len]);
                if len == HAND_SIZE {
                    full_hands[rank] = slot as u8 + 1;
                } else {
                    counts[len][rank * slots + slot] += 1;
                }
            }
        }

        event!(
            Level::INFO,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "outcome table built"
        );
        Self {
            titles,
            counts,
            full_hands,
        }
    }

    /// Load the table for this calculator's pay table from the cache, or
    /// build it. A cache that is missing or unreadable only costs a rebuild,
    /// and a failed write is logged and otherwise ignored.
    pub fn load_or_build(calculator: &PayCalculator, cache: Option<&TableCache>) -> Arc<Self> {
        if let Some(cache) = cache {
            match cache.load(calculator.pay_table()) {
                Ok(table) => {
                    event!(Level::INFO, dir = %cache.dir().display(), "outcome table cache hit");
                    return Arc::new(table);
                }
                Err(CacheError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                    event!(Level::INFO, "outcome table cache miss");
                }
                Err(e) => {
                    event!(Level::INFO, error = %e, "outcome table cache unreadable, rebuilding");
                }
            }
        }

        let table = Self::build(calculator);

        if let Some(cache) = cache {
            match cache.store(calculator.pay_table(), &table) {
                Ok(path) => event!(Level::INFO, path = %path.display(), "outcome table cached"),
                Err(e) => event!(Level::WARN, error = %e, "unable to cache outcome table"),
            }
        }
        Arc::new(table)
    }

    /// Assemble a table from stored tiers, checking every length.
    pub(crate) fn from_parts(
        titles: Vec<PayTitle>,
        counts: [Vec<u32>; HAND_SIZE],
        full_hands: Vec<u8>,
    ) -> Result<Self, CacheError> {
        let slots = titles.len();
        for (held, tier) in counts.iter().enumerate() {
            let expected = binomial(DECK_SIZE, held) * slots;
            if tier.len() != expected {
                return Err(CacheError::ShapeMismatch(format!(
                    "tier {held} holds {} counts, expected {expected}",
                    tier.len()
                )));
            }
        }
        if full_hands.len() != binomial(DECK_SIZE, HAND_SIZE) {
            return Err(CacheError::ShapeMismatch(format!(
                "{} complete hands stored",
                full_hands.len()
            )));
        }
        if let Some(bad) = full_hands.iter().find(|s| **s as usize > slots) {
            return Err(CacheError::ShapeMismatch(format!(
                "complete hand slot {bad} outside of {slots} slots"
            )));
        }
        Ok(Self {
            titles,
            counts,
            full_hands,
        })
    }

    /// Pay titles in slot order.
    pub fn titles(&self) -> &[PayTitle] {
        &self.titles
    }

    pub(crate) fn tier(&self, held: usize) -> &[u32] {
        &self.counts[held]
    }

    pub(crate) fn full_hands(&self) -> &[u8] {
        &self.full_hands
    }

    /// The raw distribution for a held subset, completed from all 52 cards.
    ///
    /// # Panics
    ///
    /// Panics when more than five cards are given.
    pub fn outcome(&self, held: &[Card]) -> ExpectedOutcome {
        let mut indices = [0u8; HAND_SIZE];
        assert!(held.len() <= HAND_SIZE, "a hold has at most {HAND_SIZE} cards");
        for (idx, card) in indices.iter_mut().zip(held) {
            *idx = card.index();
        }
        self.outcome_of_indices(&indices[..held.len()])
    }

    pub(crate) fn outcome_of_indices(&self, indices: &[u8]) -> ExpectedOutcome {
        let held = indices.len();
        let rank = index_rank(indices);
        let mut outcome = ExpectedOutcome::new(completions(held));
        if held == HAND_SIZE {
            if let Some(title) = self.full_hand_title(rank) {
                outcome.add_count(title, 1);
            }
            return outcome;
        }
        let slots = self.titles.len();
        let row = &self.counts[held][rank * slots..(rank + 1) * slots];
        for (title, count) in self.titles.iter().zip(row) {
            outcome.add_count(*title, i64::from(*count));
        }
        outcome
    }

    fn full_hand_title(&self, rank: usize) -> Option<PayTitle> {
        match self.full_hands[rank] {
            0 => None,
            slot => self.titles.get(slot as usize - 1).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Hand;
    use crate::strategy::HoldMask;
    use crate::test_util::jacks_or_better_table;

    #[test]
    fn test_completions() {
        assert_eq!(2_598_960, completions(0));
        assert_eq!(48, completions(4));
        assert_eq!(1, completions(5));
    }

    #[test]
    fn test_empty_hold_counts_every_winner() {
        let table = jacks_or_better_table();
        let outcome = table.outcome(&[]);
        assert_eq!(2_598_960, outcome.case_count);
        assert_eq!(536_100, outcome.winning_count());
        assert_eq!(4, outcome.count(PayTitle::RoyalStraightFlush));
        assert_eq!(337_920, outcome.count(PayTitle::JacksOrBetter));
    }

    #[test]
    fn test_four_to_a_royal() {
        let table = jacks_or_better_table();
        let held = Hand::new_from_str("AhKhQhJh").unwrap();
        let outcome = table.outcome(&held);
        assert_eq!(48, outcome.case_count);
        assert_eq!(1, outcome.count(PayTitle::RoyalStraightFlush));
        assert_eq!(8, outcome.count(PayTitle::Flush));
        assert_eq!(3, outcome.count(PayTitle::Straight));
        assert_eq!(12, outcome.count(PayTitle::JacksOrBetter));
        assert_eq!(24, outcome.winning_count());
    }

    #[test]
    fn test_complete_hand() {
        let table = jacks_or_better_table();
        let royal = table.outcome(&Hand::new_from_str("AhKhQhJhTh").unwrap());
        assert_eq!(1, royal.case_count);
        assert_eq!(1, royal.count(PayTitle::RoyalStraightFlush));
        assert_eq!(1, royal.winning_count());

        let nothing = table.outcome(&Hand::new_from_str("9h8d2c5sKd").unwrap());
        assert_eq!(1, nothing.case_count);
        assert_eq!(0, nothing.winning_count());
    }

    #[test]
    fn test_mass_is_conserved() {
        let table = jacks_or_better_table();
        for hand in CardIter::all_hands().step_by(50_021) {
            for hold in HoldMask::ALL.submasks() {
                let outcome = table.outcome(&hold.held_cards(&hand));
                assert_eq!(completions(hold.held_count()), outcome.case_count);
                assert!(outcome.winning_count() <= outcome.case_count);
                assert!(outcome.result.iter().all(|n| *n >= 0));
            }
        }
    }

    #[test]
    fn test_from_parts_rejects_bad_shape() {
        let table = jacks_or_better_table();
        let mut counts: [Vec<u32>; HAND_SIZE] = std::array::from_fn(|h| table.tier(h).to_vec());
        counts[2].pop();
        assert!(matches!(
            OutcomeTable::from_parts(
                table.titles().to_vec(),
                counts,
                table.full_hands().to_vec()
            ),
            Err(CacheError::ShapeMismatch(_))
        ));
    }
}
