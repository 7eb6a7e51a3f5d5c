//! Connect Four engine built on fixed-depth minimax with alpha-beta pruning.
//!
//! The core is stateless: callers hold a [`Board`] (or a [`GameState`]), ask
//! [`choose_move`] for a column at some depth, apply it and check the result
//! for a win or draw. Outer surfaces that only have a move history use
//! [`best_move`], which replays a history string such as `3342` (column
//! digits, player one first) and searches for the side to move.
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod board;
mod eval;
mod search;

pub use board::{
    Board, Player, StandardBoard, Successors, STANDARD_COLUMNS, STANDARD_ROWS, WINDOW,
};
pub use eval::{evaluate, heuristic, score_window, Score, INFINITY, NEG_INFINITY};
pub use search::{
    choose_move, choose_move_scored, minimax, minimax_no_pruning, search_best,
    search_with_node_count, MoveChoice, NodeCount, Pruning, SearchOutcome,
};

/// Deepest search [`best_move`] accepts.
pub const MAX_LEVEL: u8 = 10;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid move string at position {position}: {reason}")]
    ParseMove { position: usize, reason: String },
    #[error("column {column} is out of bounds or full")]
    InvalidColumn { column: usize },
    #[error("no legal moves remain")]
    NoLegalMoves,
    #[error("depth {0} is out of range (1-10)")]
    DepthOutOfRange(u8),
    #[error("the game is already over")]
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "winner", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won(Player),
    Draw,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub player: Player,
    pub column: usize,
    pub row: usize,
    pub won: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub position: String,
    pub level: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub column: usize,
    pub score: Score,
}

/// A standard board plus whose turn it is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: StandardBoard,
    to_move: Player,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Empty board, player one to move.
    pub fn new() -> Self {
        Self {
            board: StandardBoard::new(),
            to_move: Player::PlayerOne,
        }
    }

    /// Replays `columns` from the empty board, alternating sides.
    pub fn from_history(columns: &[usize]) -> Result<Self, GameError> {
        let mut state = Self::new();
        for &column in columns {
            state.play(column)?;
        }
        Ok(state)
    }

    pub fn board(&self) -> &StandardBoard {
        &self.board
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn status(&self) -> GameStatus {
        match self.board.winner() {
            Some(player) => GameStatus::Won(player),
            None if self.board.is_draw() => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }

    /// Drops the side to move's piece into `column` and passes the turn.
    pub fn play(&mut self, column: usize) -> Result<MoveOutcome, GameError> {
        if self.status() != GameStatus::InProgress {
            return Err(GameError::GameOver);
        }
        let player = self.to_move;
        let row = self.board.play(column, player)?;
        self.to_move = player.opponent();
        Ok(MoveOutcome {
            player,
            column,
            row,
            won: self.board.has_won(player),
        })
    }
}

/// Parses a history of column digits. Whitespace is ignored.
pub fn parse_history(history: &str) -> Result<Vec<usize>, GameError> {
    history
        .chars()
        .enumerate()
        .filter(|(_, ch)| !ch.is_whitespace())
        .map(|(position, ch)| -> Result<usize, GameError> {
            let column = ch.to_digit(10).ok_or_else(|| GameError::ParseMove {
                position,
                reason: format!("expected column digit, found {ch}"),
            })? as usize;
            if column >= STANDARD_COLUMNS {
                return Err(GameError::ParseMove {
                    position,
                    reason: format!("column must be 0-{}", STANDARD_COLUMNS - 1),
                });
            }
            Ok(column)
        })
        .collect()
}

/// Picks a move for whichever side is to move after `request.position`.
pub fn best_move(request: MoveRequest) -> Result<MoveResponse, GameError> {
    if !(1..=MAX_LEVEL).contains(&request.level) {
        return Err(GameError::DepthOutOfRange(request.level));
    }
    let columns = parse_history(&request.position)?;
    let state = GameState::from_history(&columns)?;
    if state.status() != GameStatus::InProgress {
        return Err(GameError::GameOver);
    }
    let choice = choose_move_scored(state.board(), request.level as usize, state.to_move())?;
    Ok(MoveResponse {
        column: choice.column,
        score: choice.score,
    })
}
