use anyhow::{anyhow, Result};
use indicatif::*;
use log::info;
use rayon::prelude::*;
use structopt::StructOpt;

use std::io::{stdout, Write};
use std::time::Instant;

use connect4_search::*;

mod cli;
use cli::*;

mod display;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Connect4::from_args() {
        Connect4::Play(args) => play(args),
        Connect4::BestMove(args) => best_move(args),
        Connect4::Match(args) => run_match(args),
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let mut board = StandardBoard::from_moves(&args.moves)?;
    let config = args.search.config();
    let mut players = [
        args.first.build(config, None),
        args.second.build(config, None),
    ];

    println!("Welcome to Connect 4\n");

    // game loop
    loop {
        display::draw(&board)?;

        match board.status() {
            GameStatus::InProgress => {
                let player = &mut players[board.num_moves() % 2];
                let number = board.num_moves() % 2 + 1;

                if !player.is_human() {
                    println!("Player {} ({}) is thinking...", number, player.name());
                    stdout().flush()?;
                }

                let start = Instant::now();
                let column = player.choose_column(&board, args.search.depth)?;
                if !player.is_human() {
                    info!("player {} chose column {} in {:?}", number, column + 1, start.elapsed());
                    println!("Best move: {}", column + 1);
                }

                board = board.try_successor(column)?;
            }

            // end states
            GameStatus::FirstPlayerWin => {
                println!("Player 1 wins!");
                break;
            }
            GameStatus::SecondPlayerWin => {
                println!("Player 2 wins!");
                break;
            }
            GameStatus::Draw => {
                println!("Draw!");
                break;
            }
        }
    }
    Ok(())
}

fn best_move(args: BestMoveArgs) -> Result<()> {
    let board = StandardBoard::from_moves(&args.moves)?;
    let outcome = search_position(args.algorithm, args.search.config(), &board, args.search.depth)?;

    match outcome.score {
        Some(score) => println!(
            "Best move: {} (score {}, {} positions searched)",
            outcome.column + 1,
            score,
            outcome.stats.nodes
        ),
        None => println!(
            "Best move: {} (search interrupted after {} positions)",
            outcome.column + 1,
            outcome.stats.nodes
        ),
    }
    Ok(())
}

/// The result of one game, from the point of view of the `--first` agent
enum MatchResult {
    Win,
    Loss,
    Draw,
}

fn run_match(args: MatchArgs) -> Result<()> {
    if args.first == AgentKind::Human || args.second == AgentKind::Human {
        return Err(anyhow!("matches are between computer players only"));
    }

    let start = Instant::now();
    let config = args.search.config();

    let progress = ProgressBar::new(args.games as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Playing games: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let results = (0..args.games)
        .into_par_iter()
        .map(|game| {
            let seed = args.seed.map(|seed| seed.wrapping_add(game as u64));
            let first = args.first.build(config, seed);
            let second = args.second.build(config, seed);
            // alternate who starts
            let (mut players, swapped) = if game % 2 == 0 {
                ([first, second], false)
            } else {
                ([second, first], true)
            };

            let mut board = StandardBoard::new();
            while !board.is_terminal() {
                let column = players[board.num_moves() % 2].choose_column(&board, args.search.depth)?;
                board = board.try_successor(column)?;
            }
            progress.inc(1);

            Ok(match (board.status(), swapped) {
                (GameStatus::FirstPlayerWin, false) | (GameStatus::SecondPlayerWin, true) => {
                    MatchResult::Win
                }
                (GameStatus::FirstPlayerWin, true) | (GameStatus::SecondPlayerWin, false) => {
                    MatchResult::Loss
                }
                _ => MatchResult::Draw,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    progress.finish();

    let count = |wanted: fn(&MatchResult) -> bool| results.iter().filter(|r| wanted(*r)).count();
    println!(
        "{:?} vs {:?} over {} games: {} wins, {} losses, {} draws ({})",
        args.first,
        args.second,
        args.games,
        count(|r| matches!(r, MatchResult::Win)),
        count(|r| matches!(r, MatchResult::Loss)),
        count(|r| matches!(r, MatchResult::Draw)),
        HumanDuration(start.elapsed())
    );
    Ok(())
}
