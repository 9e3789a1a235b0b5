use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_search::{Player, StandardBoard, HEIGHT, WIDTH};

/// Draws the board to stdout, top row first, with the column numbers above it
pub fn draw(board: &StandardBoard) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;

    for row in (0..HEIGHT).rev() {
        for column in 0..WIDTH {
            stdout.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(match board.cell(column, row) {
                        Some(Player::First) => Color::Red,
                        Some(Player::Second) => Color::Yellow,
                        None => Color::DarkBlue,
                    }),
            ))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;
    Ok(())
}
