//! Minimax search with alpha-beta pruning
//!
//! Scores are always from the maximizing player's point of view: the
//! maximizing player raises `alpha`, the minimizing player lowers `beta`, and
//! a node stops exploring its children once the window `[alpha, beta]` is empty.

use crate::evaluation::evaluate;
use crate::move_ordering::order_columns;
use crate::position::{Player, Position};

use super::{enter, SearchContext, SearchError, SearchNode, SearchStats, INFINITY};

/// Performs game tree search from `node`, with `player` to move
///
/// Returns the minimax value of the node and records in `node.best_child`
/// the first column that reached it.
pub fn search<P: Position>(
    node: &mut SearchNode<P>,
    context: &SearchContext,
    player: Player,
    mut alpha: i32,
    mut beta: i32,
    depth: usize,
    stats: &mut SearchStats,
) -> Result<i32, SearchError> {
    enter(context, stats)?;

    // a decided game is scored as such even at the depth bound
    if node.position.is_terminal() || context.depth_reached(depth) {
        return Ok(evaluate(&node.position, context));
    }

    let columns = order_columns(&node.position, context);
    node.best_child = Some(*columns.first().ok_or(SearchError::NoLegalColumns)?);

    let maximizing = player == context.max_player();
    let mut score = if maximizing { -INFINITY } else { INFINITY };

    for column in columns {
        let mut child = node.child(column);
        let child_score = search(
            &mut child,
            context,
            player.other(),
            alpha,
            beta,
            depth + 1,
            stats,
        )?;

        if maximizing {
            if child_score > score {
                score = child_score;
                node.best_child = Some(column);
            }
            alpha = alpha.max(score);
        } else {
            if child_score < score {
                score = child_score;
                node.best_child = Some(column);
            }
            beta = beta.min(score);
        }

        // the opponent will never allow this line, prune the remaining columns
        if alpha >= beta {
            break;
        }
    }

    Ok(score)
}
