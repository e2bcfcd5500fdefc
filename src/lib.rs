//! rs_video_poker is a library for five card draw video poker.
//! It finds the hold with the best expected return for any dealt hand
//! and uses that to compute the exact return to player of a pay table,
//! or to simulate sessions of play.

/// Cards, decks, hands and the combinatorics to index card subsets.
/// Nothing in core knows about pay tables.
pub mod core;
/// Pay titles, pay tables and classification of final hands.
pub mod pay;
/// The outcome table and optimal hold selection.
pub mod strategy;
/// Playing games one after another.
pub mod game;
/// Exhaustive and simulated runs spread over worker threads.
pub mod engine;

#[cfg(test)]
mod test_util;
