//! Command line arguments

use anyhow::{anyhow, Result};
use connect4_search::{agent::Algorithm, Agent, ColumnInput, SearchConfig};
use structopt::StructOpt;

use std::io::{stdin, stdout, Write};
use std::str::FromStr;
use std::time::Duration;

#[derive(StructOpt)]
#[structopt(
    name = "connect4",
    about = "Play Connect 4 against a depth-limited alpha-beta or NegaScout search"
)]
pub enum Connect4 {
    #[structopt(
        name = "play",
        about = "Play a game. Each player is `human`, `random`, `alpha-beta` or `negascout` (default: human vs negascout)."
    )]
    Play(PlayArgs),
    #[structopt(
        name = "best-move",
        about = "Print the column the search would play in the position given by `--moves`."
    )]
    BestMove(BestMoveArgs),
    #[structopt(
        name = "match",
        about = "Play `--games` games between two computer players, alternating who starts, and report the results."
    )]
    Match(MatchArgs),
}

/// Who controls a player
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AgentKind {
    Human,
    Random,
    Search(Algorithm),
}

impl FromStr for AgentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "human" => Ok(AgentKind::Human),
            "random" => Ok(AgentKind::Random),
            other => Ok(AgentKind::Search(other.parse()?)),
        }
    }
}

impl AgentKind {
    pub fn build(self, config: SearchConfig, seed: Option<u64>) -> Agent {
        match self {
            AgentKind::Human => Agent::human(StdinInput),
            AgentKind::Random => match seed {
                Some(seed) => Agent::random_seeded(seed),
                None => Agent::random(),
            },
            AgentKind::Search(algorithm) => Agent::search(algorithm, config),
        }
    }
}

#[derive(StructOpt)]
pub struct SearchArgs {
    /// Plies to search ahead, 0 searches to the end of the game
    #[structopt(short, long, default_value = "4")]
    pub depth: usize,
    /// Play the best column found so far after this many milliseconds
    #[structopt(long)]
    pub time_limit_ms: Option<u64>,
    /// Search the root columns in parallel
    #[structopt(long)]
    pub parallel: bool,
}

impl SearchArgs {
    pub fn config(&self) -> SearchConfig {
        SearchConfig {
            time_limit: self.time_limit_ms.map(Duration::from_millis),
            parallel: self.parallel,
        }
    }
}

#[derive(StructOpt)]
pub struct PlayArgs {
    #[structopt(long, default_value = "human")]
    pub first: AgentKind,
    #[structopt(long, default_value = "negascout")]
    pub second: AgentKind,
    /// Starting position as 1-indexed columns, e.g. "4453"
    #[structopt(long, default_value = "")]
    pub moves: String,
    #[structopt(flatten)]
    pub search: SearchArgs,
}

#[derive(StructOpt)]
pub struct BestMoveArgs {
    #[structopt(long, default_value = "")]
    pub moves: String,
    #[structopt(short, long, default_value = "negascout")]
    pub algorithm: Algorithm,
    #[structopt(flatten)]
    pub search: SearchArgs,
}

#[derive(StructOpt)]
pub struct MatchArgs {
    #[structopt(long, default_value = "negascout")]
    pub first: AgentKind,
    #[structopt(long, default_value = "random")]
    pub second: AgentKind,
    #[structopt(short, long, default_value = "20")]
    pub games: usize,
    /// Seed for random players, offset by the game number
    #[structopt(long)]
    pub seed: Option<u64>,
    #[structopt(flatten)]
    pub search: SearchArgs,
}

/// Reads 1-indexed columns from stdin, asking again until a legal one is given
pub struct StdinInput;

impl ColumnInput for StdinInput {
    fn read_column(&mut self, legal: &[usize]) -> Result<usize> {
        loop {
            print!("Move input > ");
            stdout().flush()?;

            let mut input_str = String::new();
            if stdin().read_line(&mut input_str)? == 0 {
                return Err(anyhow!("input closed"));
            }

            match input_str.trim().parse::<usize>() {
                Ok(column) if column >= 1 && legal.contains(&(column - 1)) => return Ok(column - 1),
                Ok(column) => println!("Invalid move, column {} is not playable", column),
                Err(_) => println!("Invalid number: {}", input_str.trim()),
            }
        }
    }
}
