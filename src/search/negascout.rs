//! NegaScout (principal variation search)
//!
//! Scores are from the point of view of the player to move, so each child's
//! score is negated and its window flipped. The first ordered column is
//! searched with the full window; every later column is first probed with a
//! null window and only searched again in full if the probe shows it could
//! beat the current best.

use crate::evaluation::evaluate;
use crate::move_ordering::order_columns;
use crate::position::{Player, Position};

use super::{enter, SearchContext, SearchError, SearchNode, SearchStats, INFINITY};

/// Performs game tree search from `node`, with `player` to move
///
/// Returns the value of the node for `player`, which is the same game value
/// alpha-beta minimax finds, and records the best column in `node.best_child`.
pub fn search<P: Position>(
    node: &mut SearchNode<P>,
    context: &SearchContext,
    player: Player,
    mut alpha: i32,
    beta: i32,
    depth: usize,
    stats: &mut SearchStats,
) -> Result<i32, SearchError> {
    enter(context, stats)?;

    if node.position.is_terminal() || context.depth_reached(depth) {
        let score = evaluate(&node.position, context);
        return Ok(if player == context.min_player() {
            -score
        } else {
            score
        });
    }

    let other = player.other();
    let columns = order_columns(&node.position, context);
    node.best_child = Some(*columns.first().ok_or(SearchError::NoLegalColumns)?);

    let mut score = -INFINITY;
    for (i, &column) in columns.iter().enumerate() {
        let mut child = node.child(column);

        let child_score = if i == 0 {
            // assume the first column leads to the principal variation
            -search(&mut child, context, other, -beta, -alpha, depth + 1, stats)?
        } else {
            let probe = -search(&mut child, context, other, -alpha - 1, -alpha, depth + 1, stats)?;
            if alpha < probe && probe < beta {
                // the probe beat alpha, find the exact value with the full window
                -search(&mut child, context, other, -beta, -alpha, depth + 1, stats)?
            } else {
                probe
            }
        };

        if child_score > score {
            score = child_score;
            node.best_child = Some(column);
        }
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }

    Ok(score)
}
