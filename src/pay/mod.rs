//! Pay titles, the judges that recognize them, pay tables and
//! the calculator that scores a final hand.

mod pay_title;
pub use self::pay_title::PayTitle;

/// Predicates for every pay title.
mod judge;
pub use self::judge::{CardGroups, JudgeFn, JudgeRegistry, WILD_RANK, standard_judge};

mod pay_table;
pub use self::pay_table::{PayEntry, PayTable};

/// Hand classification.
mod calculator;
pub use self::calculator::{HandResult, PayCalculator};
