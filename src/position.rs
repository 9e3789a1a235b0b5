//! The board interface consumed by the search

/// One of the two players
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Player {
    /// The player who drops the first token
    First,
    Second,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameStatus {
    FirstPlayerWin,
    SecondPlayerWin,
    Draw,
    InProgress,
}

impl GameStatus {
    /// The player who won the game, if any
    pub fn winner(self) -> Option<Player> {
        match self {
            GameStatus::FirstPlayerWin => Some(Player::First),
            GameStatus::SecondPlayerWin => Some(Player::Second),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// An immutable game position
///
/// Every operation leaves `self` untouched; playing a column produces a new
/// position. Token masks may use any cell layout, as long as the masks
/// returned by [`Position::win_masks`] use the same one.
pub trait Position: Clone + Send + Sync {
    /// The number of columns on the board
    fn width(&self) -> usize;

    /// Columns that still have room for a token, in ascending order
    fn possible_columns(&self) -> Vec<usize>;

    /// The position after the player to move drops a token in `column`
    ///
    /// `column` must be one of [`Position::possible_columns`].
    fn successor(&self, column: usize) -> Self;

    fn status(&self) -> GameStatus;

    /// Bitmask of the cells occupied by `player`
    fn player_tokens(&self, player: Player) -> u64;

    fn next_to_move(&self) -> Player;

    /// Every line of four cells that wins the game, one mask per line
    fn win_masks(&self) -> Vec<u64>;

    fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }
}
