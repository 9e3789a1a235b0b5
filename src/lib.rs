//! A depth-limited game tree search agent for the board game 'Connect 4'
//!
//! The agent scores positions with a static count of the lines each player
//! can still complete, orders candidate columns by that score and by
//! centrality, and searches the tree with either alpha-beta minimax or
//! NegaScout (principal variation search).
//!
//! # Basic Usage
//!
//! ```
//! use connect4_search::{agent::Agent, bitboard::StandardBoard};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let board = StandardBoard::from_moves("121212")?;
//! let mut agent = Agent::negascout();
//!
//! // player 1 completes the vertical line in the first column
//! assert_eq!(agent.choose_column(&board, 1)?, 0);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod position;

pub mod bitboard;

pub mod evaluation;

pub mod move_ordering;

pub mod search;

pub mod agent;

mod test;

pub use agent::{search_position, Agent, Algorithm, ColumnInput, SearchConfig, SearchOutcome};
pub use bitboard::{BitBoard, StandardBoard};
pub use position::{GameStatus, Player, Position};
pub use search::{SearchContext, SearchError, SearchNode, SearchStats};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// ensure that the given dimensions fit in a u64 for the bitboard representation
const_assert!(WIDTH * (HEIGHT + 1) <= 64);

// heuristic scores must never reach the score of the slowest possible win
const_assert!(
    evaluation::win_line_count(WIDTH, HEIGHT) + (WIDTH * HEIGHT + 1) / 2
        < evaluation::WIN_SCORE as usize
);
