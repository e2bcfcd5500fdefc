use thiserror::Error;

use super::Card;
use crate::pay::PayTitle;

/// This is the core error type for the
/// RS-Video-Poker library. It uses `thiserror` to provide
/// readable error messages
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum VideoPokerError {
    #[error("Unable to parse value")]
    UnexpectedValueChar,
    #[error("Unable to parse suit")]
    UnexpectedSuitChar,
    #[error("Error reading characters while parsing")]
    TooFewChars,
    #[error("Card already added to hand {0}")]
    DuplicateCardInHand(Card),
    #[error("Video poker hands never have more than 5 cards, got {0}")]
    InvalidHandSize(usize),
    #[error("Card index {0} is outside of the deck")]
    InvalidCardIndex(u8),
    #[error("Unknown pay title {0}")]
    UnknownPayTitle(String),
    #[error("Pay title {0} has no registered judge function")]
    MissingJudge(PayTitle),
    #[error("Pay title {0} is listed more than once")]
    DuplicatePayTitle(PayTitle),
    #[error("Pay title {0} must have a positive payout")]
    NonPositivePayout(PayTitle),
    #[error("A pay table needs at least one pay title")]
    EmptyPayTable,
    #[error("Outcome table was built for other pay titles than the pay table")]
    OutcomeTableMismatch,
}
