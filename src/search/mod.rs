//! Depth-limited game tree search
//!
//! Both algorithms share the same scaffolding: a [`SearchContext`] built once
//! per top-level search and passed by reference through the recursion, a
//! [`SearchNode`] per visited position that remembers which child column led
//! to its best score, and a [`SearchStats`] counter owned by the caller.
//!
//! [`alpha_beta`] returns scores from the maximizing player's point of view;
//! [`negascout`] returns scores from the point of view of the player to move.

use log::debug;
use rayon::prelude::*;
use thiserror::Error;

use std::time::Instant;

use crate::evaluation::{evaluate, WIN_SCORE};
use crate::move_ordering::order_columns;
use crate::position::{Player, Position};

pub mod alpha_beta;

pub mod negascout;

/// A bound larger in magnitude than any score
pub const INFINITY: i32 = 1_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("cannot search a position where the game is already over")]
    TerminalPosition,
    #[error("position is in progress but has no legal columns")]
    NoLegalColumns,
    #[error("{lines} lines on a {cells} cell board could outscore a win")]
    HeuristicOutOfRange { lines: usize, cells: usize },
    #[error("search deadline reached")]
    Interrupted,
}

/// Parameters shared by every node of one top-level search
///
/// Never modified once the search starts, so independent searches (or
/// independent root branches) can share it freely.
#[derive(Clone, Debug)]
pub struct SearchContext {
    max_player: Player,
    min_player: Player,
    // None searches to the end of the game
    depth_bound: Option<usize>,
    win_masks: Vec<u64>,
    deadline: Option<Instant>,
}

impl SearchContext {
    /// Creates the context for a search from `position`, where the player
    /// to move maximizes. A `depth_bound` of 0 searches to the end of the game.
    pub fn new<P: Position>(position: &P, depth_bound: usize) -> Result<Self, SearchError> {
        Self::for_player(position, position.next_to_move(), depth_bound)
    }

    /// Creates a context where `max_player` maximizes, whoever is to move
    pub fn for_player<P: Position>(
        position: &P,
        max_player: Player,
        depth_bound: usize,
    ) -> Result<Self, SearchError> {
        let win_masks = position.win_masks();

        // a heuristic score must stay below the slowest possible win
        let cells = win_masks.iter().fold(0u64, |all, mask| all | mask).count_ones() as usize;
        let lines = win_masks.len();
        if lines + (cells + 1) / 2 >= WIN_SCORE as usize {
            return Err(SearchError::HeuristicOutOfRange { lines, cells });
        }

        Ok(Self {
            max_player,
            min_player: max_player.other(),
            depth_bound: if depth_bound == 0 {
                None
            } else {
                Some(depth_bound)
            },
            win_masks,
            deadline: None,
        })
    }

    /// Makes the search give up with [`SearchError::Interrupted`] once
    /// `deadline` has passed
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn max_player(&self) -> Player {
        self.max_player
    }

    pub fn min_player(&self) -> Player {
        self.min_player
    }

    pub fn depth_bound(&self) -> Option<usize> {
        self.depth_bound
    }

    pub fn win_masks(&self) -> &[u64] {
        &self.win_masks
    }

    /// Has the search reached the configured depth bound?
    pub fn depth_reached(&self, depth: usize) -> bool {
        self.depth_bound == Some(depth)
    }

    fn check_deadline(&self) -> Result<(), SearchError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(SearchError::Interrupted),
            _ => Ok(()),
        }
    }
}

/// A position reached during the search
#[derive(Clone, Debug)]
pub struct SearchNode<P> {
    pub position: P,
    /// The column played to reach this node, `None` at the root
    pub column: Option<usize>,
    /// The child column that led to the best score found so far
    pub best_child: Option<usize>,
}

impl<P: Position> SearchNode<P> {
    pub fn root(position: P) -> Self {
        Self {
            position,
            column: None,
            best_child: None,
        }
    }

    /// The node reached by playing `column` from this one
    pub fn child(&self, column: usize) -> Self {
        Self {
            position: self.position.successor(column),
            column: Some(column),
            best_child: None,
        }
    }
}

/// Counters collected during one search (for diagnostics only)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// The number of nodes entered
    pub nodes: usize,
}

impl std::ops::AddAssign for SearchStats {
    fn add_assign(&mut self, other: Self) {
        self.nodes += other.nodes;
    }
}

/// Common node entry: counts the node and checks the deadline
fn enter(context: &SearchContext, stats: &mut SearchStats) -> Result<(), SearchError> {
    stats.nodes += 1;
    context.check_deadline()
}

/// Searches every root column independently on the rayon thread pool
///
/// `child_value` scores one child node, from the maximizing player's point of
/// view, with its own [`SearchStats`]. Branches share nothing but the
/// context, so no window is passed between them. The first column in move
/// order with the best value is recorded in `root.best_child`, which gives the
/// same value and column as the sequential search.
///
/// If any branch hits the deadline, the best of the completed branches is
/// kept in `root.best_child` and [`SearchError::Interrupted`] is returned.
pub fn search_root_parallel<P, F>(
    root: &mut SearchNode<P>,
    context: &SearchContext,
    stats: &mut SearchStats,
    child_value: F,
) -> Result<i32, SearchError>
where
    P: Position,
    F: Fn(&mut SearchNode<P>, &mut SearchStats) -> Result<i32, SearchError> + Send + Sync,
{
    enter(context, stats)?;

    // search_position never gets here with a finished game, direct callers might
    if root.position.is_terminal() {
        return Ok(evaluate(&root.position, context));
    }

    let columns = order_columns(&root.position, context);
    root.best_child = Some(*columns.first().ok_or(SearchError::NoLegalColumns)?);

    let parent = &*root;
    let results: Vec<(usize, Result<i32, SearchError>, SearchStats)> = columns
        .par_iter()
        .map(|&column| {
            let mut child = parent.child(column);
            let mut branch_stats = SearchStats::default();
            let value = child_value(&mut child, &mut branch_stats);
            (column, value, branch_stats)
        })
        .collect();

    let mut score = -INFINITY;
    let mut interrupted = false;
    for (column, value, branch_stats) in results {
        *stats += branch_stats;
        match value {
            Ok(value) => {
                debug!("root column {} scored {}", column, value);
                if value > score {
                    score = value;
                    root.best_child = Some(column);
                }
            }
            Err(SearchError::Interrupted) => interrupted = true,
            Err(err) => return Err(err),
        }
    }

    if interrupted {
        Err(SearchError::Interrupted)
    } else {
        Ok(score)
    }
}
