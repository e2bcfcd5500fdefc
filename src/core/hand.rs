use std::fmt;
use std::ops::Deref;

use super::{Card, Suit, Value, VideoPokerError};

/// Number of cards in a dealt video poker hand.
pub const HAND_SIZE: usize = 5;

/// An ordered set of at most five distinct cards.
///
/// Order matters: hold decisions refer to cards by their position
/// in the dealt hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Create a new empty hand
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_video_poker::core::Hand;
    ///
    /// let hand = Hand::new();
    ///
    /// assert!(hand.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_cards(cards: Vec<Card>) -> Result<Self, VideoPokerError> {
        let mut hand = Self::new();
        for card in cards {
            hand.push(card)?;
        }
        Ok(hand)
    }

    /// Add a card to the end of the hand.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_video_poker::core::{Card, Hand, Suit, Value};
    ///
    /// let mut hand = Hand::new();
    /// let card = Card::new(Value::Ace, Suit::Club);
    ///
    /// assert!(hand.push(card).is_ok());
    /// assert!(hand.push(card).is_err());
    /// assert!(hand.contains(&card));
    /// ```
    pub fn push(&mut self, card: Card) -> Result<(), VideoPokerError> {
        if self.cards.contains(&card) {
            return Err(VideoPokerError::DuplicateCardInHand(card));
        }
        if self.cards.len() >= HAND_SIZE {
            return Err(VideoPokerError::InvalidHandSize(self.cards.len() + 1));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Given a card, is it in the current hand?
    pub fn contains(&self, c: &Card) -> bool {
        self.cards.contains(c)
    }

    /// A hand is complete once all five cards are dealt.
    pub fn is_complete(&self) -> bool {
        self.cards.len() == HAND_SIZE
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Parse a hand written as value and suit pairs.
    ///
    /// ```
    /// use rs_video_poker::core::{Card, Hand, Suit, Value};
    ///
    /// let hand = Hand::new_from_str("9h9d2c5sKd").unwrap();
    /// assert_eq!(5, hand.len());
    /// assert_eq!(Card::new(Value::King, Suit::Diamond), hand[4]);
    /// ```
    pub fn new_from_str(hand_string: &str) -> Result<Self, VideoPokerError> {
        let mut chars = hand_string.chars().filter(|c| !c.is_whitespace());
        let mut hand = Self::new();

        // Keep looping until we explicitly break
        while let Some(vc) = chars.next() {
            let v = Value::from_char(vc).ok_or(VideoPokerError::UnexpectedValueChar)?;
            let s = chars
                .next()
                .ok_or(VideoPokerError::TooFewChars)
                .and_then(|sc| Suit::from_char(sc).ok_or(VideoPokerError::UnexpectedSuitChar))?;
            hand.push(Card::new(v, s))?;
        }

        Ok(hand)
    }
}

impl Deref for Hand {
    type Target = [Card];

    fn deref(&self) -> &[Card] {
        &self.cards
    }
}

impl From<Hand> for Vec<Card> {
    fn from(value: Hand) -> Self {
        value.cards
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
