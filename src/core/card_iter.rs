use super::Card;

/// Iterate every `num_cards` sized subset of a list of cards.
///
/// Subsets come out in lexicographic order of their positions in
/// `possible_cards`. When the possible cards are in index order this is the
/// same order that `subset_rank` numbers them in.
#[derive(Debug, Clone)]
pub struct CardIter {
    // All the possible cards that can be dealt
    possible_cards: Vec<Card>,

    // Set of current offsets being used to create card sets.
    idx: Vec<usize>,

    // size of card sets requested.
    num_cards: usize,

    started: bool,
    exhausted: bool,
}

impl CardIter {
    pub fn new(possible_cards: Vec<Card>, num_cards: usize) -> CardIter {
        let exhausted = num_cards > possible_cards.len();
        CardIter {
            idx: (0..num_cards).collect(),
            possible_cards,
            num_cards,
            started: false,
            exhausted,
        }
    }

    /// Every five card hand of the full deck, in rank order.
    ///
    /// ```
    /// use rs_video_poker::core::CardIter;
    ///
    /// let first = CardIter::all_hands().next().unwrap();
    /// assert_eq!(5, first.len());
    /// ```
    pub fn all_hands() -> CardIter {
        CardIter::new(Card::all().collect(), 5)
    }

    // Move the offsets to the next subset. False when there is none.
    fn advance(&mut self) -> bool {
        let n = self.possible_cards.len();
        let k = self.num_cards;
        let mut level = k;
        while level > 0 {
            level -= 1;
            if self.idx[level] < n - k + level {
                self.idx[level] += 1;
                for next in level + 1..k {
                    self.idx[next] = self.idx[next - 1] + 1;
                }
                return true;
            }
        }
        false
    }

    fn step(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        if !self.started {
            self.started = true;
            return true;
        }
        if self.advance() {
            true
        } else {
            self.exhausted = true;
            false
        }
    }

    fn current(&self) -> Vec<Card> {
        self.idx.iter().map(|i| self.possible_cards[*i]).collect()
    }
}

impl Iterator for CardIter {
    type Item = Vec<Card>;

    fn next(&mut self) -> Option<Vec<Card>> {
        if self.step() {
            Some(self.current())
        } else {
            None
        }
    }

    /// Skipping only moves the offsets, no subsets are built along the way.
    fn nth(&mut self, n: usize) -> Option<Vec<Card>> {
        for _ in 0..n {
            if !self.step() {
                return None;
            }
        }
        self.next()
    }
}
