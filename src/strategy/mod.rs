//! Optimal hold strategy. The outcome table is built once per pay table,
//! optionally cached on disk, and every dealt hand is then decided by
//! lookups and an inclusion-exclusion correction.

mod outcome;
pub use self::outcome::ExpectedOutcome;

/// Hold masks and the order they are searched in.
mod hold;
pub use self::hold::{HOLD_COUNT, HoldMask, Submasks};

mod table;
pub use self::table::{OutcomeTable, completions};

/// Binary cache of outcome tables.
mod cache;
pub use self::cache::{CACHE_DIR_ENV, CacheError, TableCache, read_table, write_table};

mod selector;
pub use self::selector::{
    ForeknowledgeHoldSelector, HoldEvaluation, HoldSelector, OptimalHoldSelector,
};
