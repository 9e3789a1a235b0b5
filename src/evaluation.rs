//! Static scoring of positions for the maximizing player

use crate::position::{GameStatus, Player, Position};
use crate::search::SearchContext;

/// Base score of a decided game, before the token count adjustment
pub const WIN_SCORE: i32 = 1000;

/// The number of lines of four on a `width` x `height` board
///
/// This bounds the magnitude of any non-terminal score.
pub const fn win_line_count(width: usize, height: usize) -> usize {
    let w = width.saturating_sub(3);
    let h = height.saturating_sub(3);
    // horizontal + vertical + both diagonals
    w * height + width * h + 2 * w * h
}

/// Scores `position` from the point of view of `context.max_player()`
///
/// Decided games score `WIN_SCORE` less the winner's token count for a win,
/// and the negation of that for a loss, so that quick wins and slow losses
/// are preferred. Other positions score the number of lines the maximizing
/// player could still complete minus the number the minimizing player could.
pub fn evaluate<P: Position>(position: &P, context: &SearchContext) -> i32 {
    let max_player = context.max_player();
    let min_player = context.min_player();

    match position.status() {
        GameStatus::Draw => 0,
        GameStatus::InProgress => {
            let max_tokens = position.player_tokens(max_player);
            let min_tokens = position.player_tokens(min_player);
            let mut score = 0;
            for &mask in context.win_masks() {
                // still open for the maximizing player
                if mask & min_tokens == 0 {
                    score += 1;
                }
                if mask & max_tokens == 0 {
                    score -= 1;
                }
            }
            score
        }
        status => {
            if status.winner() == Some(max_player) {
                WIN_SCORE - tokens_placed(position, max_player)
            } else {
                -WIN_SCORE + tokens_placed(position, min_player)
            }
        }
    }
}

fn tokens_placed<P: Position>(position: &P, player: Player) -> i32 {
    position.player_tokens(player).count_ones() as i32
}
