//! Positional heuristic: every 4-cell window is scored by how many pieces
//! each side has in it, and pieces in the centre column earn a small bonus.
use crate::board::{Board, Player};

/// Search scores. Only comparable within one search.
pub type Score = i32;

/// Value of a position the perspective player has won.
pub const INFINITY: Score = i32::MAX;
/// Value of a position the perspective player has lost. Kept symmetric with
/// [`INFINITY`] so negating a score never overflows.
pub const NEG_INFINITY: Score = -i32::MAX;

const FOUR: Score = 1000;
const THREE: Score = 100;
const TWO: Score = 10;
// Losing a completed line outweighs completing one.
const OPPONENT_FOUR: Score = -1500;
const OPPONENT_THREE: Score = -100;
const OPPONENT_TWO: Score = -10;
/// Per piece in the centre column.
const CENTER_WEIGHT: Score = 3;

/// Scores one window from its piece counts. Own and opponent terms are added
/// independently; any combination outside the table is worth nothing.
pub fn score_window(own: usize, theirs: usize, empty: usize) -> Score {
    let attack = match (own, empty) {
        (4, 0) => FOUR,
        (3, 1) => THREE,
        (2, 2) => TWO,
        _ => 0,
    };
    let defence = match (theirs, empty) {
        (4, 0) => OPPONENT_FOUR,
        (3, 1) => OPPONENT_THREE,
        (2, 2) => OPPONENT_TWO,
        _ => 0,
    };
    attack + defence
}

/// Raw heuristic sum for `player`. Meaningful on non-terminal boards; use
/// [`evaluate`] when the board may already be decided.
pub fn heuristic<const ROWS: usize, const COLUMNS: usize>(
    board: &Board<ROWS, COLUMNS>,
    player: Player,
) -> Score {
    let opponent = player.opponent();
    let windows: Score = board
        .windows()
        .map(|window| {
            let own = window.iter().filter(|&&cell| cell == Some(player)).count();
            let theirs = window.iter().filter(|&&cell| cell == Some(opponent)).count();
            score_window(own, theirs, window.len() - own - theirs)
        })
        .sum();

    let center = COLUMNS / 2;
    let center_score: Score = (0..ROWS)
        .map(|row| match board.cell(row, center) {
            Some(owner) if owner == player => CENTER_WEIGHT,
            Some(_) => -CENTER_WEIGHT,
            None => 0,
        })
        .sum();

    windows + center_score
}

/// Heuristic with terminal overrides: [`INFINITY`] if `player` has won,
/// [`NEG_INFINITY`] if the opponent has, 0 for a draw.
pub fn evaluate<const ROWS: usize, const COLUMNS: usize>(
    board: &Board<ROWS, COLUMNS>,
    player: Player,
) -> Score {
    if board.has_won(player) {
        INFINITY
    } else if board.has_won(player.opponent()) {
        NEG_INFINITY
    } else if board.is_draw() {
        0
    } else {
        heuristic(board, player)
    }
}
