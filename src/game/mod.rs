//! Game state for playing hands one after another.

mod multiplier;
pub use self::multiplier::MultiplierTable;

mod video_poker_game;
pub use self::video_poker_game::{GameResult, VideoPokerGame};
