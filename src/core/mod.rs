//! This is the core module. It exports the cards, the deck
//! and the combinatorics that everything else is built on.

/// card.rs has value and suit.
mod card;
/// Re-export Card, Value, and Suit
pub use self::card::{Card, DECK_SIZE, Suit, Value};

/// Code related to cards in hands.
mod hand;
/// Everything in there should be public.
pub use self::hand::*;

/// We want to be able to iterate over every subset of cards.
mod card_iter;
/// Make that functionality public.
pub use self::card_iter::*;

/// Deck is the pool of undealt cards.
mod deck;
/// Export `Deck`
pub use self::deck::Deck;

/// Binomials and subset ranking.
mod combination;
pub use self::combination::{MAX_SUBSET_SIZE, binomial, index_rank, subset_rank};

/// Rust Video Poker error
mod error;
pub use self::error::VideoPokerError;
