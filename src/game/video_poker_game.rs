use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{Card, Deck, HAND_SIZE};
use crate::pay::{HandResult, PayCalculator, PayTitle};
use crate::strategy::HoldMask;

use super::MultiplierTable;

/// How every line of one game paid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameResult {
    pub main: HandResult,
    /// One per sub hand, in the order they were dealt.
    pub subs: Vec<HandResult>,
}

/// State of a single machine across games.
///
/// Every game deals five cards from a freshly shuffled deck. After the hold
/// decision the main hand draws its replacements from the top of that same
/// deck. Each sub hand starts from the held cards and completes them from a
/// fresh deck that only lacks the held cards.
#[derive(Debug, Clone)]
pub struct VideoPokerGame {
    calculator: PayCalculator,
    multipliers: Option<MultiplierTable>,
    deck: Deck,
    hand: Vec<Card>,
    sub_hands: Vec<Vec<Card>>,
    previous_main: Option<PayTitle>,
    previous_subs: Vec<Option<PayTitle>>,
}

impl VideoPokerGame {
    pub fn new(calculator: PayCalculator) -> Self {
        Self {
            calculator,
            multipliers: None,
            deck: Deck::new(),
            hand: Vec::with_capacity(HAND_SIZE),
            sub_hands: vec![],
            previous_main: None,
            previous_subs: vec![],
        }
    }

    /// Play with streak multipliers carried from hand to hand.
    pub fn with_multipliers(mut self, multipliers: MultiplierTable) -> Self {
        self.multipliers = Some(multipliers);
        self
    }

    pub fn calculator(&self) -> &PayCalculator {
        &self.calculator
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn sub_hands(&self) -> &[Vec<Card>] {
        &self.sub_hands
    }

    /// The cards left to draw from.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Shuffle a full deck and deal a new hand.
    pub fn new_game<R: Rng>(&mut self, rng: &mut R) {
        let mut deck = Deck::new();
        deck.shuffle(rng);
        self.new_game_from_deck(deck);
    }

    /// Deal a new hand off the top of the given deck.
    pub fn new_game_from_deck(&mut self, mut deck: Deck) {
        self.hand = deck.deal_many(HAND_SIZE);
        self.deck = deck;
        self.sub_hands.clear();
    }

    /// Throw away the cards not in `hold`, refill the main hand from the
    /// deck and deal `sub_hand_count` extra lines from the held cards.
    pub fn discard_and_draw<R: Rng>(&mut self, hold: HoldMask, sub_hand_count: usize, rng: &mut R) {
        let held = hold.held_cards(&self.hand);
        let draws = HAND_SIZE - held.len();

        self.sub_hands = (0..sub_hand_count)
            .map(|_| {
                let mut sub_deck = Deck::without(&held);
                let mut sub_hand = held.clone();
                sub_hand.extend(sub_deck.deal_random(draws, rng));
                sub_hand
            })
            .collect();

        let mut hand = held;
        hand.extend(self.deck.deal_many(draws));
        self.hand = hand;
    }

    /// Score every line and remember the titles for the next streak.
    pub fn result(&mut self) -> GameResult {
        let mut main = self.calculator.classify(&self.hand);
        if let Some(multipliers) = &self.multipliers {
            main.pay *= multipliers.after(self.previous_main);
        }
        self.previous_main = main.pay_title;

        let mut subs = Vec::with_capacity(self.sub_hands.len());
        for (i, sub_hand) in self.sub_hands.iter().enumerate() {
            let mut sub = self.calculator.classify(sub_hand);
            if let Some(multipliers) = &self.multipliers {
                let previous = self.previous_subs.get(i).copied().flatten();
                sub.pay *= multipliers.after(previous);
            }
            subs.push(sub);
        }
        self.previous_subs = subs.iter().map(|s| s.pay_title).collect();

        GameResult { main, subs }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::core::Hand;
    use crate::test_util::jacks_or_better_calculator;

    /// A deck whose top cards are `top`, first card on top.
    fn stacked(top: &[&str]) -> Deck {
        let top: Vec<Card> = top
            .iter()
            .flat_map(|s| Hand::new_from_str(s).unwrap().to_vec())
            .collect();
        let mut cards: Vec<Card> = Deck::without(&top).iter().copied().collect();
        cards.extend(top.iter().rev());
        cards.into()
    }

    #[test]
    fn test_deal_and_draw_from_the_top() {
        let mut rng = StdRng::seed_from_u64(420);
        let mut game = VideoPokerGame::new(jacks_or_better_calculator());
        game.new_game_from_deck(stacked(&["9h9d2c5sKd", "9s9c3h"]));
        assert_eq!(Hand::new_from_str("9h9d2c5sKd").unwrap().to_vec(), game.hand());
        assert_eq!(47, game.deck().len());

        game.discard_and_draw(HoldMask::new(0b00011), 0, &mut rng);
        assert_eq!(Hand::new_from_str("9h9d9s9c3h").unwrap().to_vec(), game.hand());
        let result = game.result();
        assert_eq!(Some(PayTitle::FourOfAKind), result.main.pay_title);
        assert_eq!(25, result.main.pay);
        assert!(result.subs.is_empty());
    }

    #[test]
    fn test_sub_hands_keep_the_held_cards() {
        let mut rng = StdRng::seed_from_u64(420);
        let mut game = VideoPokerGame::new(jacks_or_better_calculator());
        game.new_game(&mut rng);
        let dealt = game.hand().to_vec();
        let hold = HoldMask::new(0b10101);
        game.discard_and_draw(hold, 3, &mut rng);

        let held = hold.held_cards(&dealt);
        assert_eq!(3, game.sub_hands().len());
        for sub_hand in game.sub_hands() {
            assert_eq!(HAND_SIZE, sub_hand.len());
            assert_eq!(held.as_slice(), &sub_hand[..held.len()]);
            let mut unique = sub_hand.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(HAND_SIZE, unique.len());
        }
        assert_eq!(3, game.result().subs.len());
    }

    #[test]
    fn test_seeded_games_repeat() {
        let play = || {
            let mut rng = StdRng::seed_from_u64(420);
            let mut game = VideoPokerGame::new(jacks_or_better_calculator());
            (0..20)
                .map(|_| {
                    game.new_game(&mut rng);
                    game.discard_and_draw(HoldMask::NONE, 1, &mut rng);
                    game.result()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn test_streak_multiplies_the_next_hand() {
        let mut rng = StdRng::seed_from_u64(420);
        let mut game = VideoPokerGame::new(jacks_or_better_calculator())
            .with_multipliers(MultiplierTable::ultimate_x_jacks_or_better_6_5());

        // First hand has nothing to multiply by.
        game.new_game_from_deck(stacked(&["AhAd2c5sKd"]));
        game.discard_and_draw(HoldMask::ALL, 0, &mut rng);
        let first = game.result();
        assert_eq!(Some(PayTitle::JacksOrBetter), first.main.pay_title);
        assert_eq!(1, first.main.pay);

        // A pair of jacks or better doubles the next win.
        game.new_game_from_deck(stacked(&["AhAdAc5sKd"]));
        game.discard_and_draw(HoldMask::ALL, 0, &mut rng);
        let second = game.result();
        assert_eq!(Some(PayTitle::ThreeOfAKind), second.main.pay_title);
        assert_eq!(6, second.main.pay);

        // Trips give four times, but a losing hand still pays nothing.
        game.new_game_from_deck(stacked(&["2h7d9c5sKd"]));
        game.discard_and_draw(HoldMask::ALL, 0, &mut rng);
        assert_eq!(HandResult::default(), game.result().main);

        // And the losing hand resets the streak.
        game.new_game_from_deck(stacked(&["AhAd2c5sKd"]));
        game.discard_and_draw(HoldMask::ALL, 0, &mut rng);
        assert_eq!(1, game.result().main.pay);
    }

    #[test]
    fn test_streaks_are_tracked_per_sub_hand() {
        let mut rng = StdRng::seed_from_u64(420);
        let mut game = VideoPokerGame::new(jacks_or_better_calculator())
            .with_multipliers(MultiplierTable::ultimate_x_jacks_or_better_6_5());

        game.new_game_from_deck(stacked(&["AhAdAcAsKd"]));
        game.discard_and_draw(HoldMask::ALL, 2, &mut rng);
        let first = game.result();
        assert!(first.subs.iter().all(|s| s.pay == 25));

        game.new_game_from_deck(stacked(&["AhAdAc5sKd"]));
        game.discard_and_draw(HoldMask::ALL, 2, &mut rng);
        let second = game.result();
        assert_eq!(9, second.main.pay);
        assert!(second.subs.iter().all(|s| s.pay == 9));
    }
}
