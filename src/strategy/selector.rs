use std::sync::Arc;

use crate::core::{Card, Deck, HAND_SIZE, VideoPokerError};
use crate::pay::{PayCalculator, PayTable};

use super::{ExpectedOutcome, HoldMask, OutcomeTable, TableCache};

/// Decides which cards of a dealt hand to keep.
pub trait HoldSelector {
    /// `deck` is the deck the replacement cards will come from.
    fn select_hold(&self, hand: &[Card], deck: &Deck) -> HoldMask;
}

/// One candidate hold and what it is worth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldEvaluation {
    pub hold: HoldMask,
    pub expected_value: f64,
    pub outcome: ExpectedOutcome,
}

/// Keeps the first maximum in iteration order.
fn first_best<I>(evaluations: I) -> Option<HoldEvaluation>
where
    I: IntoIterator<Item = HoldEvaluation>,
{
    let mut best: Option<HoldEvaluation> = None;
    for evaluation in evaluations {
        match best {
            Some(b) if b.expected_value >= evaluation.expected_value => {}
            _ => best = Some(evaluation),
        }
    }
    best
}

fn hand_indices(hand: &[Card]) -> [u8; HAND_SIZE] {
    assert_eq!(
        HAND_SIZE,
        hand.len(),
        "holds are chosen from a complete {HAND_SIZE} card hand"
    );
    let mut indices = [0u8; HAND_SIZE];
    for (idx, card) in indices.iter_mut().zip(hand) {
        *idx = card.index();
    }
    indices
}

fn gather(indices: &[u8; HAND_SIZE], mask: HoldMask, out: &mut [u8; HAND_SIZE]) -> usize {
    let mut len = 0;
    for pos in mask.positions() {
        out[len] = indices[pos];
        len += 1;
    }
    len
}

/// Picks the hold with the highest exact expected value, using the
/// precomputed outcome table.
///
/// The table counts completions drawn from all 52 cards. A real draw can
/// never bring back the cards that were just thrown away, so the outcome of
/// a hold `S` with discards `D` is corrected by inclusion-exclusion:
/// the sum over every `D'` in `D` of `(-1)^|D'| * table[S + D']`.
#[derive(Debug, Clone)]
pub struct OptimalHoldSelector {
    table: Arc<OutcomeTable>,
    pay_table: PayTable,
    ignore_discards: bool,
}

impl OptimalHoldSelector {
    /// Pair a table with a pay table. The table counts titles by slot, so
    /// both must list the same titles in the same order. Payouts may differ.
    pub fn new(table: Arc<OutcomeTable>, pay_table: PayTable) -> Result<Self, VideoPokerError> {
        if !table.titles().iter().copied().eq(pay_table.titles()) {
            return Err(VideoPokerError::OutcomeTableMismatch);
        }
        Ok(Self {
            table,
            pay_table,
            ignore_discards: false,
        })
    }

    /// Load or build the table for a calculator and select with it.
    pub fn from_calculator(calculator: &PayCalculator, cache: Option<&TableCache>) -> Self {
        // Built from, or checked against, the calculator's own titles.
        Self {
            table: OutcomeTable::load_or_build(calculator, cache),
            pay_table: calculator.pay_table().clone(),
            ignore_discards: false,
        }
    }

    /// Select with the raw table lookups, as if the discards went back into
    /// the deck. This is how a hand is played when its held cards also seed
    /// extra lines dealt from fresh decks.
    pub fn ignoring_discards(mut self) -> Self {
        self.ignore_discards = true;
        self
    }

    pub fn table(&self) -> &Arc<OutcomeTable> {
        &self.table
    }

    pub fn pay_table(&self) -> &PayTable {
        &self.pay_table
    }

    /// The distribution of final hands when holding `hold` and drawing from
    /// the 47 cards that were not dealt. `case_count` is `C(47, discards)`.
    pub fn outcome_with_discard(&self, hand: &[Card], hold: HoldMask) -> ExpectedOutcome {
        let indices = hand_indices(hand);
        let mut subset = [0u8; HAND_SIZE];
        let mut outcome = ExpectedOutcome::new(0);
        for extra in hold.discards().submasks() {
            let len = gather(&indices, hold.union(extra), &mut subset);
            let term = self.table.outcome_of_indices(&subset[..len]);
            if extra.held_count() % 2 == 0 {
                outcome += &term;
            } else {
                outcome -= &term;
            }
        }
        outcome
    }

    /// The raw table entry for the held cards.
    pub fn outcome_ignoring_discards(&self, hand: &[Card], hold: HoldMask) -> ExpectedOutcome {
        let indices = hand_indices(hand);
        let mut subset = [0u8; HAND_SIZE];
        let len = gather(&indices, hold, &mut subset);
        self.table.outcome_of_indices(&subset[..len])
    }

    fn evaluate(&self, hold: HoldMask, outcome: ExpectedOutcome) -> HoldEvaluation {
        HoldEvaluation {
            hold,
            expected_value: outcome.expected_value(&self.pay_table),
            outcome,
        }
    }

    /// All 32 holds in search order.
    pub fn evaluate_holds(&self, hand: &[Card]) -> Vec<HoldEvaluation> {
        HoldMask::search_order()
            .iter()
            .map(|hold| self.evaluate(*hold, self.outcome_with_discard(hand, *hold)))
            .collect()
    }

    pub fn evaluate_holds_ignoring_discards(&self, hand: &[Card]) -> Vec<HoldEvaluation> {
        HoldMask::search_order()
            .iter()
            .map(|hold| self.evaluate(*hold, self.outcome_ignoring_discards(hand, *hold)))
            .collect()
    }

    /// The first hold in search order with the greatest expected value.
    pub fn best_hold(&self, hand: &[Card]) -> HoldEvaluation {
        let evaluations = HoldMask::search_order().iter().map(|hold| {
            let outcome = if self.ignore_discards {
                self.outcome_ignoring_discards(hand, *hold)
            } else {
                self.outcome_with_discard(hand, *hold)
            };
            self.evaluate(*hold, outcome)
        });
        // The search order is never empty.
        first_best(evaluations).unwrap_or_else(|| self.evaluate(HoldMask::ALL, ExpectedOutcome::new(1)))
    }

    /// ```no_run
    /// use rs_video_poker::core::Hand;
    /// use rs_video_poker::pay::{JudgeRegistry, PayCalculator, PayTable};
    /// use rs_video_poker::strategy::{HoldMask, OptimalHoldSelector, TableCache};
    ///
    /// let calc = PayCalculator::new(PayTable::jacks_or_better_9_6(), &JudgeRegistry::standard()).unwrap();
    /// let selector = OptimalHoldSelector::from_calculator(&calc, Some(&TableCache::from_env()));
    /// let hand = Hand::new_from_str("9h9d2c5sKd").unwrap();
    /// assert_eq!(HoldMask::from_positions(&[0, 1]), selector.select(&hand));
    /// ```
    pub fn select(&self, hand: &[Card]) -> HoldMask {
        self.best_hold(hand).hold
    }
}

impl HoldSelector for OptimalHoldSelector {
    fn select_hold(&self, hand: &[Card], _deck: &Deck) -> HoldMask {
        self.select(hand)
    }
}

/// Knows the order of the shuffled deck and keeps whatever actually pays
/// the most once the replacements come off the top.
#[derive(Debug, Clone)]
pub struct ForeknowledgeHoldSelector {
    calculator: PayCalculator,
}

impl ForeknowledgeHoldSelector {
    pub fn new(calculator: PayCalculator) -> Self {
        Self { calculator }
    }
}

impl HoldSelector for ForeknowledgeHoldSelector {
    fn select_hold(&self, hand: &[Card], deck: &Deck) -> HoldMask {
        let upcoming = deck.peek(HAND_SIZE);
        let evaluations = HoldMask::search_order().iter().map(|hold| {
            let mut final_hand = hold.held_cards(hand);
            let draws = HAND_SIZE - final_hand.len();
            final_hand.extend(upcoming.iter().take(draws));
            HoldEvaluation {
                hold: *hold,
                expected_value: f64::from(self.calculator.classify(&final_hand).pay),
                outcome: ExpectedOutcome::new(1),
            }
        });
        first_best(evaluations).map_or(HoldMask::ALL, |best| best.hold)
    }
}
