use std::ops::{Index, RangeFull};

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::core::card::Card;

/// `Deck` is the pool of cards that are still available to be dealt.
///
/// Cards are dealt from the top, which is the back of the storage. A deck
/// created with `Deck::new` is ordered, call `shuffle` before dealing from
/// the top if the order should be random.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    /// Card storage.
    cards: Vec<Card>,
}

impl Deck {
    /// Create the full 52 card deck.
    ///
    /// ```
    /// use rs_video_poker::core::Deck;
    ///
    /// assert_eq!(52, Deck::new().len());
    /// ```
    pub fn new() -> Self {
        Self {
            cards: Card::all().collect(),
        }
    }

    /// A full deck with some cards taken out.
    ///
    /// ```
    /// use rs_video_poker::core::{Card, Deck, Suit, Value};
    ///
    /// let held = [Card::new(Value::Ace, Suit::Spade)];
    /// let deck = Deck::without(&held);
    /// assert_eq!(51, deck.len());
    /// assert!(!deck.contains(&held[0]));
    /// ```
    pub fn without(excluded: &[Card]) -> Self {
        Self {
            cards: Card::all().filter(|c| !excluded.contains(c)).collect(),
        }
    }

    /// Given a card, is it in the current deck?
    pub fn contains(&self, c: &Card) -> bool {
        self.cards.contains(c)
    }

    /// Given a card remove it from the deck if it is present.
    pub fn remove(&mut self, c: &Card) -> bool {
        match self.cards.iter().position(|x| x == c) {
            Some(pos) => {
                self.cards.remove(pos);
                true
            }
            None => false,
        }
    }

    /// How many cards are there in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Have all of the cards been dealt from this deck?
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Get an iterator from this deck
    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    /// Randomly shuffle the deck.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng)
    }

    /// Deal the top card if there is one there to deal.
    /// None if the deck is empty
    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Deal up to `n` cards off the top, in the order they come off.
    pub fn deal_many(&mut self, n: usize) -> Vec<Card> {
        let keep = self.cards.len().saturating_sub(n);
        let mut dealt = self.cards.split_off(keep);
        dealt.reverse();
        dealt
    }

    /// Look at the next `n` cards that `deal` would hand out, without
    /// dealing them.
    pub fn peek(&self, n: usize) -> Vec<Card> {
        self.cards.iter().rev().take(n).copied().collect()
    }

    /// Draw `n` distinct cards uniformly at random from anywhere in the deck.
    pub fn deal_random<R: Rng>(&mut self, n: usize, rng: &mut R) -> Vec<Card> {
        let mut dealt = Vec::with_capacity(n);
        for _ in 0..n {
            if self.cards.is_empty() {
                break;
            }
            let pos = rng.random_range(0..self.cards.len());
            dealt.push(self.cards.swap_remove(pos));
        }
        dealt
    }

    /// Give a random sample of the cards still left in the deck
    pub fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<Card> {
        self.cards.choose_multiple(rng, n).copied().collect()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Card>> for Deck {
    fn from(value: Vec<Card>) -> Self {
        Self { cards: value }
    }
}

impl Index<RangeFull> for Deck {
    type Output = [Card];
    fn index(&self, index: RangeFull) -> &[Card] {
        &self.cards[index]
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::core::card::{Suit, Value};

    #[test]
    fn test_contains_in() {
        let d = Deck::new();
        assert!(d.contains(&Card {
            value: Value::Eight,
            suit: Suit::Heart,
        }));
    }

    #[test]
    fn test_remove() {
        let mut d = Deck::new();
        let c = Card::new(Value::Ace, Suit::Heart);
        assert!(d.contains(&c));
        assert!(d.remove(&c));
        assert!(!d.contains(&c));
        assert!(!d.remove(&c));
        assert_eq!(51, d.len());
    }

    #[test]
    fn test_deal_from_top() {
        let mut d: Deck = vec![
            Card::new(Value::Two, Suit::Club),
            Card::new(Value::Three, Suit::Club),
            Card::new(Value::Four, Suit::Club),
        ]
        .into();

        assert_eq!(
            vec![
                Card::new(Value::Four, Suit::Club),
                Card::new(Value::Three, Suit::Club)
            ],
            d.peek(2)
        );
        assert_eq!(d.peek(2), d.deal_many(2));
        assert_eq!(Some(Card::new(Value::Two, Suit::Club)), d.deal());
        assert!(d.is_empty());
        assert_eq!(None, d.deal());
        assert!(d.deal_many(3).is_empty());
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let mut a = Deck::new();
        let mut b = Deck::new();
        a.shuffle(&mut StdRng::seed_from_u64(420));
        b.shuffle(&mut StdRng::seed_from_u64(420));
        assert_eq!(a, b);
        assert_ne!(Deck::new(), a);
    }

    #[test]
    fn test_deal_random_distinct() {
        let mut rng = StdRng::seed_from_u64(420);
        let mut d = Deck::new();
        let mut dealt = d.deal_random(5, &mut rng);
        assert_eq!(47, d.len());
        for c in &dealt {
            assert!(!d.contains(c));
        }
        dealt.sort();
        dealt.dedup();
        assert_eq!(5, dealt.len());
    }

    #[test]
    fn test_sample_leaves_deck() {
        let mut rng = StdRng::seed_from_u64(420);
        let d = Deck::new();
        assert_eq!(5, d.sample(5, &mut rng).len());
        assert_eq!(52, d.len());
    }
}
