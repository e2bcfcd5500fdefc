use std::sync::{Arc, OnceLock};

use crate::pay::{JudgeRegistry, PayCalculator, PayTable};
use crate::strategy::{OptimalHoldSelector, OutcomeTable};

static JACKS_OR_BETTER_TABLE: OnceLock<Arc<OutcomeTable>> = OnceLock::new();

pub fn jacks_or_better_calculator() -> PayCalculator {
    PayCalculator::new(PayTable::jacks_or_better_9_6(), &JudgeRegistry::standard()).unwrap()
}

/// Built on first use and shared by every test in the binary.
pub fn jacks_or_better_table() -> Arc<OutcomeTable> {
    JACKS_OR_BETTER_TABLE
        .get_or_init(|| Arc::new(OutcomeTable::build(&jacks_or_better_calculator())))
        .clone()
}

pub fn jacks_or_better_selector() -> OptimalHoldSelector {
    OptimalHoldSelector::new(jacks_or_better_table(), PayTable::jacks_or_better_9_6()).unwrap()
}

/// Same table, with the royal paid at the five coin rate.
pub fn jacks_or_better_max_coin_selector() -> OptimalHoldSelector {
    OptimalHoldSelector::new(jacks_or_better_table(), PayTable::jacks_or_better_9_6_max_coin())
        .unwrap()
}
