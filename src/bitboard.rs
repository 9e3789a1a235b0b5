use anyhow::{anyhow, Result};

use crate::position::{GameStatus, Player, Position};
use crate::{HEIGHT, WIDTH};

/// The standard 7x6 board
pub type StandardBoard = BitBoard<WIDTH, HEIGHT>;

/// A `W` x `H` board stored as two bitmasks
///
/// Each column takes `H + 1` bits, bottom cell first, so the cell at
/// (`column`, `row`) is bit `column * (H + 1) + row`. The extra bit on top of
/// each column is always empty and stops alignments wrapping between columns.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct BitBoard<const W: usize, const H: usize> {
    // mask of the current player's tiles
    player_mask: u64,
    // mask of all tiles
    board_mask: u64,
    num_moves: usize,
}

impl<const W: usize, const H: usize> BitBoard<W, H> {
    const DIMENSIONS_FIT: () = assert!(
        W >= 1 && H >= 1 && W * (H + 1) <= 64,
        "board dimensions do not fit in a u64"
    );

    const BOTTOM_MASK: u64 = {
        let mut mask = 0;
        let mut column = 0;
        while column < W {
            mask |= 1 << (column * (H + 1));
            column += 1;
        }
        mask
    };

    const FULL_BOARD_MASK: u64 = Self::BOTTOM_MASK * ((1 << H) - 1);

    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::DIMENSIONS_FIT;
        Self {
            player_mask: 0,
            board_mask: 0,
            num_moves: 0,
        }
    }

    /// Builds a position from a string of 1-indexed column digits, e.g. `"4453"`
    ///
    /// The final move may end the game; any move after that is rejected.
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column) if (1..=W).contains(&column) => {
                    board = board.try_successor(column - 1)?;
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    /// Plays a 0-indexed column, rejecting moves that are out of range,
    /// into a full column, or made after the game has ended
    pub fn try_successor(&self, column: usize) -> Result<Self> {
        if column >= W {
            return Err(anyhow!(
                "Invalid move, column {} out of range. Columns must be between 1 and {}",
                column + 1,
                W
            ));
        }
        if !self.playable(column) {
            return Err(anyhow!("Invalid move, column {} full", column + 1));
        }
        if self.status().is_terminal() {
            return Err(anyhow!("Invalid position, game is over"));
        }
        Ok(self.successor(column))
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    pub fn board_mask(&self) -> u64 {
        self.board_mask
    }

    pub fn top_mask(column: usize) -> u64 {
        1 << (column * (H + 1) + (H - 1))
    }

    pub fn bottom_mask(column: usize) -> u64 {
        1 << (column * (H + 1))
    }

    pub fn column_mask(column: usize) -> u64 {
        ((1 << H) - 1) << (column * (H + 1))
    }

    pub fn cell_mask(column: usize, row: usize) -> u64 {
        Self::bottom_mask(column) << row
    }

    /// The owner of the cell at (`column`, `row`), counting rows from the bottom
    pub fn cell(&self, column: usize, row: usize) -> Option<Player> {
        let mask = Self::cell_mask(column, row);
        if self.player_tokens(Player::First) & mask != 0 {
            Some(Player::First)
        } else if self.player_tokens(Player::Second) & mask != 0 {
            Some(Player::Second)
        } else {
            None
        }
    }

    pub fn playable(&self, column: usize) -> bool {
        Self::top_mask(column) & self.board_mask == 0
    }

    fn play(&mut self, move_bitmap: u64) {
        // switch the current player
        self.player_mask ^= self.board_mask;
        // add a cell of the previous player to the correct column
        self.board_mask |= move_bitmap;
        self.num_moves += 1;
    }

    /// Does `mask` contain four tiles in a row in any direction?
    pub fn has_alignment(mask: u64) -> bool {
        // check horizontal alignment
        // mark all horizontal runs of 2
        let mut m = mask & (mask >> (H + 1));
        // check for runs of 2 * (runs of 2)
        if m & (m >> (2 * (H + 1))) != 0 {
            return true;
        }

        // check diagonal alignment 1
        m = mask & (mask >> H);
        if m & (m >> (2 * H)) != 0 {
            return true;
        }

        // check diagonal alignment 2
        m = mask & (mask >> (H + 2));
        if m & (m >> (2 * (H + 2))) != 0 {
            return true;
        }

        // check vertical alignment
        m = mask & (mask >> 1);
        m & (m >> 2) != 0
    }

    /// Masks of every line of four cells on the board
    pub fn all_win_masks() -> Vec<u64> {
        // (column step, row step): horizontal, vertical, diagonal /, diagonal \
        const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        let mut masks = Vec::new();
        for column in 0..W as isize {
            for row in 0..H as isize {
                for &(dc, dr) in DIRECTIONS.iter() {
                    let (end_column, end_row) = (column + 3 * dc, row + 3 * dr);
                    if end_column >= W as isize || end_row < 0 || end_row >= H as isize {
                        continue;
                    }
                    masks.push((0..4).fold(0u64, |mask, i| {
                        mask | Self::cell_mask((column + i * dc) as usize, (row + i * dr) as usize)
                    }));
                }
            }
        }
        masks
    }
}

impl<const W: usize, const H: usize> Default for BitBoard<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> Position for BitBoard<W, H> {
    fn width(&self) -> usize {
        W
    }

    fn possible_columns(&self) -> Vec<usize> {
        (0..W).filter(|&column| self.playable(column)).collect()
    }

    fn successor(&self, column: usize) -> Self {
        debug_assert!(self.playable(column), "column {} is full", column);
        let mut next = *self;
        let move_bitmap =
            (self.board_mask + Self::bottom_mask(column)) & Self::column_mask(column);
        next.play(move_bitmap);
        next
    }

    fn status(&self) -> GameStatus {
        // only the player who just moved can have completed a line
        let last = self.next_to_move().other();
        if Self::has_alignment(self.player_tokens(last)) {
            match last {
                Player::First => GameStatus::FirstPlayerWin,
                Player::Second => GameStatus::SecondPlayerWin,
            }
        } else if self.board_mask == Self::FULL_BOARD_MASK {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }

    fn player_tokens(&self, player: Player) -> u64 {
        if player == self.next_to_move() {
            self.player_mask
        } else {
            self.player_mask ^ self.board_mask
        }
    }

    fn next_to_move(&self) -> Player {
        if self.num_moves % 2 == 0 {
            Player::First
        } else {
            Player::Second
        }
    }

    fn win_masks(&self) -> Vec<u64> {
        Self::all_win_masks()
    }
}
