//! Agents that choose a column to play
//!
//! [`Agent::choose_column`] is the single capability every agent offers. The
//! search agents build a fresh [`SearchContext`] and root [`SearchNode`] for
//! every call, so one agent value can be reused across moves and games.

use anyhow::{anyhow, Result};
use log::{info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::move_ordering::order_columns;
use crate::position::Position;
use crate::search::{
    alpha_beta, negascout, search_root_parallel, SearchContext, SearchError, SearchNode,
    SearchStats, INFINITY,
};

/// The tree search used by a search agent
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Algorithm {
    AlphaBeta,
    NegaScout,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::AlphaBeta => write!(f, "alpha-beta"),
            Algorithm::NegaScout => write!(f, "negascout"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "alpha-beta" | "alphabeta" | "minimax" => Ok(Algorithm::AlphaBeta),
            "negascout" | "pvs" => Ok(Algorithm::NegaScout),
            _ => Err(anyhow!("unknown search algorithm '{}'", s)),
        }
    }
}

/// Options for the search agents
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SearchConfig {
    /// Stop searching after this long and play the best column found so far
    pub time_limit: Option<Duration>,
    /// Search the root columns on the rayon thread pool
    pub parallel: bool,
}

/// The result of one top-level search
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SearchOutcome {
    pub column: usize,
    /// The game value for the player to move, `None` if the search was interrupted
    pub score: Option<i32>,
    pub stats: SearchStats,
}

/// A source of column choices for a human player
pub trait ColumnInput {
    /// Returns one of the `legal` columns
    fn read_column(&mut self, legal: &[usize]) -> Result<usize>;
}

pub enum Agent {
    /// Delegates every choice to a [`ColumnInput`]
    Human(Box<dyn ColumnInput>),
    /// Plays a uniformly random legal column, a weak baseline for testing
    Random(StdRng),
    AlphaBeta(SearchConfig),
    NegaScout(SearchConfig),
}

impl Agent {
    pub fn human<I: ColumnInput + 'static>(input: I) -> Self {
        Agent::Human(Box::new(input))
    }

    pub fn random() -> Self {
        Agent::Random(StdRng::from_entropy())
    }

    pub fn random_seeded(seed: u64) -> Self {
        Agent::Random(StdRng::seed_from_u64(seed))
    }

    pub fn alpha_beta() -> Self {
        Agent::AlphaBeta(SearchConfig::default())
    }

    pub fn negascout() -> Self {
        Agent::NegaScout(SearchConfig::default())
    }

    /// Creates a search agent for `algorithm`
    pub fn search(algorithm: Algorithm, config: SearchConfig) -> Self {
        match algorithm {
            Algorithm::AlphaBeta => Agent::AlphaBeta(config),
            Algorithm::NegaScout => Agent::NegaScout(config),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Agent::Human(_) => "human",
            Agent::Random(_) => "random",
            Agent::AlphaBeta(_) => "alpha-beta",
            Agent::NegaScout(_) => "negascout",
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Agent::Human(_))
    }

    /// Chooses the column to play in `position`
    ///
    /// Search agents look `depth_bound` plies ahead, or to the end of the game
    /// if `depth_bound` is 0. Other agents ignore it.
    pub fn choose_column<P: Position>(&mut self, position: &P, depth_bound: usize) -> Result<usize> {
        match self {
            Agent::Human(input) => {
                let legal = legal_columns(position)?;
                let column = input.read_column(&legal)?;
                if !legal.contains(&column) {
                    return Err(anyhow!("column {} is not playable", column + 1));
                }
                Ok(column)
            }
            Agent::Random(rng) => {
                let legal = legal_columns(position)?;
                Ok(legal[rng.gen_range(0..legal.len())])
            }
            Agent::AlphaBeta(config) => {
                Ok(search_position(Algorithm::AlphaBeta, *config, position, depth_bound)?.column)
            }
            Agent::NegaScout(config) => {
                Ok(search_position(Algorithm::NegaScout, *config, position, depth_bound)?.column)
            }
        }
    }
}

fn legal_columns<P: Position>(position: &P) -> Result<Vec<usize>> {
    if position.is_terminal() {
        return Err(SearchError::TerminalPosition.into());
    }
    let legal = position.possible_columns();
    if legal.is_empty() {
        return Err(SearchError::NoLegalColumns.into());
    }
    Ok(legal)
}

/// Runs one top-level search of `position` with the player to move maximizing
///
/// Rejects positions where the game is already over. If the time limit runs
/// out, the best column among the fully searched root columns is returned
/// (the first column in move order if none finished).
pub fn search_position<P: Position>(
    algorithm: Algorithm,
    config: SearchConfig,
    position: &P,
    depth_bound: usize,
) -> Result<SearchOutcome, SearchError> {
    if position.is_terminal() {
        return Err(SearchError::TerminalPosition);
    }

    let start = Instant::now();
    let mut context = SearchContext::new(position, depth_bound)?;
    if let Some(limit) = config.time_limit {
        context = context.with_deadline(start + limit);
    }
    let context = context;

    let mut root = SearchNode::root(position.clone());
    let mut stats = SearchStats::default();
    let max_player = context.max_player();
    let min_player = context.min_player();

    let result = match (algorithm, config.parallel) {
        (Algorithm::AlphaBeta, false) => alpha_beta::search(
            &mut root, &context, max_player, -INFINITY, INFINITY, 0, &mut stats,
        ),
        (Algorithm::NegaScout, false) => negascout::search(
            &mut root, &context, max_player, -INFINITY, INFINITY, 0, &mut stats,
        ),
        (Algorithm::AlphaBeta, true) => {
            search_root_parallel(&mut root, &context, &mut stats, |child, branch_stats| {
                alpha_beta::search(
                    child, &context, min_player, -INFINITY, INFINITY, 1, branch_stats,
                )
            })
        }
        (Algorithm::NegaScout, true) => {
            search_root_parallel(&mut root, &context, &mut stats, |child, branch_stats| {
                // negate back to the root player's point of view
                negascout::search(
                    child, &context, min_player, -INFINITY, INFINITY, 1, branch_stats,
                )
                .map(|score| -score)
            })
        }
    };

    let score = match result {
        Ok(score) => Some(score),
        Err(SearchError::Interrupted) => {
            warn!(
                "{} search interrupted after {:?}, playing the best column found so far",
                algorithm,
                start.elapsed()
            );
            None
        }
        Err(err) => return Err(err),
    };

    let column = match root.best_child {
        Some(column) => column,
        None => *order_columns(position, &context)
            .first()
            .ok_or(SearchError::NoLegalColumns)?,
    };

    info!(
        "{} search (depth bound {}) chose column {} with score {:?}: {} nodes in {:?}",
        algorithm,
        depth_bound,
        column + 1,
        score,
        stats.nodes,
        start.elapsed()
    );

    Ok(SearchOutcome {
        column,
        score,
        stats,
    })
}
