use std::fmt;

/// Card rank or value.
/// Aces are low here: the discriminant is the face value with Ace = 1,
/// which is the numbering every pay title predicate is written against.
#[derive(PartialEq, PartialOrd, Eq, Ord, Debug, Clone, Copy, Hash)]
pub enum Value {
    /// A
    Ace = 1,
    /// 2
    Two = 2,
    /// 3
    Three = 3,
    /// 4
    Four = 4,
    /// 5
    Five = 5,
    /// 6
    Six = 6,
    /// 7
    Seven = 7,
    /// 8
    Eight = 8,
    /// 9
    Nine = 9,
    /// T
    Ten = 10,
    /// J
    Jack = 11,
    /// Q
    Queen = 12,
    /// K
    King = 13,
}

/// Constant of all the values.
/// This is what `Value::values()` returns
const VALUES: [Value; 13] = [
    Value::Ace,
    Value::Two,
    Value::Three,
    Value::Four,
    Value::Five,
    Value::Six,
    Value::Seven,
    Value::Eight,
    Value::Nine,
    Value::Ten,
    Value::Jack,
    Value::Queen,
    Value::King,
];

impl Value {
    /// Take a face value in `1..=13` and convert it to a value.
    ///
    /// ```
    /// use rs_video_poker::core::Value;
    ///
    /// assert_eq!(Some(Value::Ace), Value::from_rank(1));
    /// assert_eq!(Some(Value::King), Value::from_rank(13));
    /// assert_eq!(None, Value::from_rank(0));
    /// ```
    pub fn from_rank(rank: u8) -> Option<Value> {
        if (1..=13).contains(&rank) {
            Some(VALUES[(rank - 1) as usize])
        } else {
            None
        }
    }

    /// Get all of the `Value`'s that are possible, Ace first.
    pub fn values() -> [Value; 13] {
        VALUES
    }

    /// The face value with Ace = 1 and King = 13.
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn from_char(c: char) -> Option<Value> {
        match c {
            'A' => Some(Value::Ace),
            'K' => Some(Value::King),
            'Q' => Some(Value::Queen),
            'J' => Some(Value::Jack),
            'T' => Some(Value::Ten),
            '9' => Some(Value::Nine),
            '8' => Some(Value::Eight),
            '7' => Some(Value::Seven),
            '6' => Some(Value::Six),
            '5' => Some(Value::Five),
            '4' => Some(Value::Four),
            '3' => Some(Value::Three),
            '2' => Some(Value::Two),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Value::Ace => 'A',
            Value::King => 'K',
            Value::Queen => 'Q',
            Value::Jack => 'J',
            Value::Ten => 'T',
            Value::Nine => '9',
            Value::Eight => '8',
            Value::Seven => '7',
            Value::Six => '6',
            Value::Five => '5',
            Value::Four => '4',
            Value::Three => '3',
            Value::Two => '2',
        }
    }
}

/// Enum for the four different suits.
/// The discriminant is the suit block of the card index, so
/// hearts are cards 0..13, diamonds 13..26 and so on.
#[derive(PartialEq, PartialOrd, Eq, Ord, Debug, Clone, Copy, Hash)]
pub enum Suit {
    /// Hearts
    Heart = 0,
    /// Diamonds
    Diamond = 1,
    /// Spades
    Spade = 2,
    /// Clubs
    Club = 3,
}

/// All of the `Suit`'s. This is what `Suit::suits()` returns.
const SUITS: [Suit; 4] = [Suit::Heart, Suit::Diamond, Suit::Spade, Suit::Club];

impl Suit {
    /// Provide all the Suit's that there are.
    pub fn suits() -> [Suit; 4] {
        SUITS
    }

    pub fn from_index(s: u8) -> Option<Suit> {
        SUITS.get(s as usize).copied()
    }

    pub fn from_char(s: char) -> Option<Suit> {
        match s {
            'h' => Some(Suit::Heart),
            'd' => Some(Suit::Diamond),
            's' => Some(Suit::Spade),
            'c' => Some(Suit::Club),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Heart => 'h',
            Suit::Diamond => 'd',
            Suit::Spade => 's',
            Suit::Club => 'c',
        }
    }
}

/// Number of distinct cards in the deck.
pub const DECK_SIZE: usize = 52;

/// The main struct of this library.
/// This is a carrier for Suit and Value combined.
///
/// Suit is declared first so that the derived ordering is the
/// same as the ordering of the card index `suit * 13 + rank - 1`.
#[derive(PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub struct Card {
    /// The suit of this card.
    pub suit: Suit,
    /// The face value of this card.
    pub value: Value,
}

impl Card {
    pub fn new(value: Value, suit: Suit) -> Self {
        Self { suit, value }
    }

    /// The dense index of this card in `0..52`.
    ///
    /// ```
    /// use rs_video_poker::core::{Card, Suit, Value};
    ///
    /// assert_eq!(0, Card::new(Value::Ace, Suit::Heart).index());
    /// assert_eq!(21, Card::new(Value::Nine, Suit::Diamond).index());
    /// assert_eq!(51, Card::new(Value::King, Suit::Club).index());
    /// ```
    pub fn index(self) -> u8 {
        self.suit as u8 * 13 + self.value as u8 - 1
    }

    /// Build a card from its dense index. `None` when the index is 52 or more.
    pub fn from_index(index: u8) -> Option<Card> {
        let suit = Suit::from_index(index / 13)?;
        let value = Value::from_rank(index % 13 + 1)?;
        Some(Card { suit, value })
    }

    /// Every card in index order.
    pub fn all() -> impl Iterator<Item = Card> {
        (0..DECK_SIZE as u8).filter_map(Card::from_index)
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.index()
    }
}

impl TryFrom<u8> for Card {
    type Error = crate::core::VideoPokerError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Card::from_index(index).ok_or(crate::core::VideoPokerError::InvalidCardIndex(index))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value.to_char(), self.suit.to_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({self})")
    }
}
