//! Terminal game loop: the engine is player one when it opens, player two
//! otherwise.
use std::io::{BufRead, Write};

use anyhow::Context;
use connect4::{choose_move, GameState, GameStatus, Player, STANDARD_COLUMNS};
use tracing::info;

/// Plays one game, reading human moves from `input`. Returns the final status,
/// which is still [`GameStatus::InProgress`] if the input ran out first.
pub(crate) fn run<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    depth: usize,
    human_first: bool,
) -> anyhow::Result<GameStatus> {
    let human = if human_first {
        Player::PlayerOne
    } else {
        Player::PlayerTwo
    };
    let mut game = GameState::new();
    writeln!(output, "Welcome to Connect 4! You are {human}, search depth {depth}.")?;
    write!(output, "\n{}", game.board())?;

    while game.status() == GameStatus::InProgress {
        if game.to_move() == human {
            let Some(column) = read_column(&mut input, &mut output, &game)? else {
                writeln!(output, "\nInput closed, game abandoned.")?;
                return Ok(game.status());
            };
            game.play(column)?;
        } else {
            writeln!(output, "\nAI is thinking...")?;
            let column = choose_move(game.board(), depth, game.to_move())
                .context("engine could not move")?;
            info!(column, depth, "engine moved");
            game.play(column)?;
            writeln!(output, "AI chooses column {column}")?;
        }
        write!(output, "\n{}", game.board())?;
    }

    let status = game.status();
    match status {
        GameStatus::Won(player) if player == human => writeln!(output, "\nYou win!")?,
        GameStatus::Won(_) => writeln!(output, "\nAI wins!")?,
        GameStatus::Draw => writeln!(output, "\nIt's a draw!")?,
        GameStatus::InProgress => {}
    }
    writeln!(output, "Game over.")?;
    Ok(status)
}

/// Prompts until a legal column is entered. `None` once input is exhausted.
fn read_column<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    game: &GameState,
) -> anyhow::Result<Option<usize>> {
    let mut line = String::new();
    loop {
        write!(output, "\nYour turn (0-{}). Choose a column: ", STANDARD_COLUMNS - 1)?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim().parse::<usize>() {
            Ok(column) if game.board().is_legal(column) => return Ok(Some(column)),
            Ok(_) => writeln!(output, "Column is full or out of bounds. Try again.")?,
            Err(_) => writeln!(output, "Invalid input. Enter a number.")?,
        }
    }
}
