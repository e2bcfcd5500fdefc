use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::core::{Card, HAND_SIZE};

/// Which positions of a dealt hand are kept. Bit `i` set means the card at
/// position `i` is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HoldMask(u8);

const FULL_BITS: u8 = (1 << HAND_SIZE) - 1;

/// Number of distinct holds of a five card hand.
pub const HOLD_COUNT: usize = 1 << HAND_SIZE;

fn hold_masks_from(offset: usize) -> Vec<u8> {
    let mut masks = Vec::with_capacity(1 << (HAND_SIZE - offset));
    for i in offset..HAND_SIZE {
        masks.extend(hold_masks_from(i + 1).into_iter().map(|m| m | 1 << i));
    }
    masks.push(0);
    masks
}

static SEARCH_ORDER: LazyLock<Vec<HoldMask>> =
    LazyLock::new(|| hold_masks_from(0).into_iter().map(HoldMask).collect());

impl HoldMask {
    pub const ALL: HoldMask = HoldMask(FULL_BITS);
    pub const NONE: HoldMask = HoldMask(0);

    /// # Panics
    ///
    /// Panics when a bit above the fifth position is set.
    pub fn new(bits: u8) -> Self {
        assert!(bits <= FULL_BITS, "hold mask {bits:#b} names more than {HAND_SIZE} positions");
        Self(bits)
    }

    /// Hold the given hand positions.
    ///
    /// ```
    /// use rs_video_poker::strategy::HoldMask;
    ///
    /// assert_eq!(0b00011, HoldMask::from_positions(&[0, 1]).bits());
    /// ```
    pub fn from_positions(positions: &[usize]) -> Self {
        Self::new(positions.iter().fold(0, |bits, p| bits | 1 << p))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_held(self, position: usize) -> bool {
        self.0 & (1 << position) != 0
    }

    pub fn held_count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// The positions that get thrown away.
    pub fn discards(self) -> HoldMask {
        HoldMask(!self.0 & FULL_BITS)
    }

    pub fn union(self, other: HoldMask) -> HoldMask {
        HoldMask(self.0 | other.0)
    }

    /// Held positions, lowest first.
    pub fn positions(self) -> impl Iterator<Item = usize> {
        (0..HAND_SIZE).filter(move |p| self.is_held(*p))
    }

    pub fn held_cards(self, hand: &[Card]) -> Vec<Card> {
        self.positions().filter_map(|p| hand.get(p).copied()).collect()
    }

    pub fn discarded_cards(self, hand: &[Card]) -> Vec<Card> {
        self.discards().held_cards(hand)
    }

    /// Every subset of this mask, from the mask itself down to the empty one.
    pub fn submasks(self) -> Submasks {
        Submasks {
            of: self.0,
            next: Some(self.0),
        }
    }

    /// The order holds are considered in when searching for the best one.
    ///
    /// Produced by a recursive generator: for each position `i` from the
    /// offset, every mask of the positions after `i` with `i` added, and
    /// finally the empty mask. The full hold comes first and the empty hold
    /// last. Ties between holds go to the one earlier in this order.
    pub fn search_order() -> &'static [HoldMask] {
        &SEARCH_ORDER
    }
}

impl fmt::Display for HoldMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in 0..HAND_SIZE {
            write!(f, "{}", if self.is_held(p) { 'H' } else { '-' })?;
        }
        Ok(())
    }
}

/// Iterator over the submasks of a hold mask.
#[derive(Debug, Clone)]
pub struct Submasks {
    of: u8,
    next: Option<u8>,
}

impl Iterator for Submasks {
    type Item = HoldMask;

    fn next(&mut self) -> Option<HoldMask> {
        let current = self.next?;
        self.next = if current == 0 {
            None
        } else {
            Some((current - 1) & self.of)
        };
        Some(HoldMask(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Hand;

    #[test]
    fn test_search_order_is_pinned() {
        let bits: Vec<u8> = HoldMask::search_order().iter().map(|m| m.bits()).collect();
        assert_eq!(
            vec![
                31, 15, 23, 7, 27, 11, 19, 3, 29, 13, 21, 5, 25, 9, 17, 1, 30, 14, 22, 6, 26, 10,
                18, 2, 28, 12, 20, 4, 24, 8, 16, 0
            ],
            bits
        );
    }

    #[test]
    fn test_search_order_covers_every_hold() {
        let mut bits: Vec<u8> = HoldMask::search_order().iter().map(|m| m.bits()).collect();
        bits.sort();
        assert_eq!((0..HOLD_COUNT as u8).collect::<Vec<_>>(), bits);
    }

    #[test]
    fn test_submasks() {
        let subs: Vec<u8> = HoldMask::new(0b10110).submasks().map(|m| m.bits()).collect();
        assert_eq!(vec![0b10110, 0b10100, 0b10010, 0b10000, 0b00110, 0b00100, 0b00010, 0], subs);
        assert_eq!(vec![HoldMask::NONE], HoldMask::NONE.submasks().collect::<Vec<_>>());
        assert_eq!(32, HoldMask::ALL.submasks().count());
    }

    #[test]
    fn test_held_and_discarded() {
        let hand = Hand::new_from_str("9h9d2c5sKd").unwrap();
        let hold = HoldMask::from_positions(&[0, 1]);
        assert_eq!(2, hold.held_count());
        assert_eq!(vec![hand[0], hand[1]], hold.held_cards(&hand));
        assert_eq!(vec![hand[2], hand[3], hand[4]], hold.discarded_cards(&hand));
        assert_eq!(0b11100, hold.discards().bits());
        assert_eq!(HoldMask::ALL, hold.union(hold.discards()));
        assert_eq!("HH---", hold.to_string());
    }

    #[test]
    #[should_panic]
    fn test_too_many_positions() {
        HoldMask::new(0b100000);
    }
}
