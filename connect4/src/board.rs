//! Grid representation, legal-move generation and terminal detection.
//!
//! Row 0 is the top of the board and pieces fall towards row `ROWS - 1`.
//! [`Board`] is a plain `Copy` value: every search branch works on its own
//! copy, so sibling branches can never observe each other's moves.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Number of aligned pieces needed to win, and the length of a scoring window.
pub const WINDOW: usize = 4;

/// Standard Connect Four dimensions.
pub const STANDARD_ROWS: usize = 6;
pub const STANDARD_COLUMNS: usize = 7;

/// The classic 6×7 board.
pub type StandardBoard = Board<STANDARD_ROWS, STANDARD_COLUMNS>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    PlayerOne,
    PlayerTwo,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::PlayerOne => Player::PlayerTwo,
            Player::PlayerTwo => Player::PlayerOne,
        }
    }

    /// Single-character token used by the textual board.
    pub fn token(self) -> char {
        match self {
            Player::PlayerOne => '1',
            Player::PlayerTwo => '2',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::PlayerOne => f.write_str("Player 1"),
            Player::PlayerTwo => f.write_str("Player 2"),
        }
    }
}

/// A `ROWS × COLUMNS` grid; `None` marks an empty cell.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Board<const ROWS: usize = 6, const COLUMNS: usize = 7> {
    cells: [[Option<Player>; COLUMNS]; ROWS],
}

impl<const ROWS: usize, const COLUMNS: usize> Default for Board<ROWS, COLUMNS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROWS: usize, const COLUMNS: usize> Board<ROWS, COLUMNS> {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [[None; COLUMNS]; ROWS],
        }
    }

    pub const fn rows(&self) -> usize {
        ROWS
    }

    pub const fn columns(&self) -> usize {
        COLUMNS
    }

    /// Occupant of `(row, column)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the board.
    pub fn cell(&self, row: usize, column: usize) -> Option<Player> {
        self.cells[row][column]
    }

    /// A column is playable while its top cell is empty.
    pub fn is_legal(&self, column: usize) -> bool {
        column < COLUMNS && ROWS > 0 && self.cells[0][column].is_none()
    }

    /// Lowest empty row of `column`.
    pub fn landing_row(&self, column: usize) -> Result<usize, GameError> {
        if column >= COLUMNS {
            return Err(GameError::InvalidColumn { column });
        }
        (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][column].is_none())
            .ok_or(GameError::InvalidColumn { column })
    }

    /// Writes `player` into `(row, column)`.
    ///
    /// Only bounds and vacancy are checked; keeping pieces stacked from the
    /// bottom is up to the caller, which normally passes
    /// [`Board::landing_row`].
    pub fn drop(&mut self, row: usize, column: usize, player: Player) -> Result<(), GameError> {
        if column >= COLUMNS || row >= ROWS || self.cells[row][column].is_some() {
            return Err(GameError::InvalidColumn { column });
        }
        self.cells[row][column] = Some(player);
        Ok(())
    }

    /// Drops `player` into `column` under gravity and returns the row it
    /// landed on.
    pub fn play(&mut self, column: usize, player: Player) -> Result<usize, GameError> {
        let row = self.landing_row(column)?;
        self.drop(row, column, player)?;
        Ok(row)
    }

    /// Playable columns in ascending order.
    pub fn legal_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..COLUMNS).filter(move |&column| self.is_legal(column))
    }

    /// One child board per legal column, in ascending column order, each with
    /// `player`'s piece dropped at that column's landing row.
    ///
    /// The iterator is lazy so a search that prunes never builds the
    /// remaining children. `self` is never modified.
    pub fn successors(&self, player: Player) -> Successors<ROWS, COLUMNS> {
        Successors {
            parent: *self,
            player,
            next_column: 0,
        }
    }

    pub fn move_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        (0..COLUMNS).all(|column| !self.is_legal(column))
    }

    /// Every column is full. Says nothing about whether a line of four
    /// exists, so check [`Board::has_won`] first.
    pub fn is_draw(&self) -> bool {
        self.is_full()
    }

    /// `player` owns all four cells of at least one window.
    pub fn has_won(&self, player: Player) -> bool {
        self.windows()
            .any(|window| window.iter().all(|&cell| cell == Some(player)))
    }

    pub fn winner(&self) -> Option<Player> {
        [Player::PlayerOne, Player::PlayerTwo]
            .into_iter()
            .find(|&player| self.has_won(player))
    }

    /// A win for either side, or a full board.
    pub fn is_terminal(&self) -> bool {
        self.has_won(Player::PlayerOne) || self.has_won(Player::PlayerTwo) || self.is_draw()
    }

    /// Contents of every 4-cell window: horizontal, vertical, diagonal ↘,
    /// then diagonal ↗.
    pub fn windows(&self) -> impl Iterator<Item = [Option<Player>; WINDOW]> + '_ {
        window_coordinates::<ROWS, COLUMNS>()
            .map(move |window| window.map(|(row, column)| self.cells[row][column]))
    }
}

/// Coordinates of every window on a `ROWS × COLUMNS` grid. Dimensions below
/// [`WINDOW`] just leave the affected families empty.
fn window_coordinates<const ROWS: usize, const COLUMNS: usize>(
) -> impl Iterator<Item = [(usize, usize); WINDOW]> {
    let row_starts = ROWS.saturating_sub(WINDOW - 1);
    let column_starts = COLUMNS.saturating_sub(WINDOW - 1);

    let line = |start: (usize, usize), step: fn((usize, usize), usize) -> (usize, usize)| {
        std::array::from_fn::<_, WINDOW, _>(|i| step(start, i))
    };

    let horizontal = (0..ROWS).flat_map(move |row| {
        (0..column_starts).map(move |column| line((row, column), |(r, c), i| (r, c + i)))
    });
    let vertical = (0..row_starts).flat_map(move |row| {
        (0..COLUMNS).map(move |column| line((row, column), |(r, c), i| (r + i, c)))
    });
    let falling = (0..row_starts).flat_map(move |row| {
        (0..column_starts).map(move |column| line((row, column), |(r, c), i| (r + i, c + i)))
    });
    let rising = (WINDOW - 1..ROWS).flat_map(move |row| {
        (0..column_starts).map(move |column| line((row, column), |(r, c), i| (r - i, c + i)))
    });

    horizontal.chain(vertical).chain(falling).chain(rising)
}

/// Lazy child generator returned by [`Board::successors`].
#[derive(Clone, Debug)]
pub struct Successors<const ROWS: usize, const COLUMNS: usize> {
    parent: Board<ROWS, COLUMNS>,
    player: Player,
    next_column: usize,
}

impl<const ROWS: usize, const COLUMNS: usize> Iterator for Successors<ROWS, COLUMNS> {
    /// The column played and the resulting board.
    type Item = (usize, Board<ROWS, COLUMNS>);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_column < COLUMNS {
            let column = self.next_column;
            self.next_column += 1;
            let mut child = self.parent;
            if child.play(column, self.player).is_ok() {
                return Some((column, child));
            }
        }
        None
    }
}

impl<const ROWS: usize, const COLUMNS: usize> fmt::Display for Board<ROWS, COLUMNS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = (0..COLUMNS).map(|column| column.to_string()).collect();
        writeln!(f, "  {}", header.join("  "))?;
        for row in &self.cells {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| cell.map_or('.', Player::token).to_string())
                .collect();
            writeln!(f, "| {} |", cells.join("  "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn board_from_rows(rows: [&str; STANDARD_ROWS]) -> StandardBoard {
        let mut board = StandardBoard::new();
        for (row, line) in rows.iter().enumerate() {
            for (column, token) in line.chars().enumerate() {
                let player = match token {
                    '1' => Player::PlayerOne,
                    '2' => Player::PlayerTwo,
                    _ => continue,
                };
                board.drop(row, column, player).unwrap();
            }
        }
        board
    }

    #[test]
    fn new_board_is_empty() {
        let board = StandardBoard::new();
        assert_eq!(board.move_count(), 0);
        assert_eq!(board.legal_columns().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(!board.is_terminal());
    }

    #[test]
    fn pieces_stack_from_the_bottom() {
        let mut board = StandardBoard::new();
        assert_eq!(board.landing_row(2).unwrap(), 5);
        assert_eq!(board.play(2, Player::PlayerOne).unwrap(), 5);
        assert_eq!(board.play(2, Player::PlayerTwo).unwrap(), 4);
        assert_eq!(board.cell(5, 2), Some(Player::PlayerOne));
        assert_eq!(board.cell(4, 2), Some(Player::PlayerTwo));
        assert_eq!(board.landing_row(2).unwrap(), 3);
    }

    #[test]
    fn drop_writes_the_cell() {
        let mut board = StandardBoard::new();
        board.drop(5, 6, Player::PlayerTwo).unwrap();
        assert_eq!(board.cell(5, 6), Some(Player::PlayerTwo));
        assert!(matches!(
            board.drop(5, 6, Player::PlayerOne),
            Err(GameError::InvalidColumn { column: 6 })
        ));
    }

    #[test]
    fn full_column_is_rejected() {
        let mut board = StandardBoard::new();
        for i in 0..STANDARD_ROWS {
            let player = if i % 2 == 0 { Player::PlayerOne } else { Player::PlayerTwo };
            board.play(4, player).unwrap();
        }
        assert!(!board.is_legal(4));
        assert!(matches!(board.landing_row(4), Err(GameError::InvalidColumn { column: 4 })));
        assert!(matches!(
            board.play(4, Player::PlayerOne),
            Err(GameError::InvalidColumn { column: 4 })
        ));
        assert!(matches!(
            board.drop(0, 4, Player::PlayerOne),
            Err(GameError::InvalidColumn { column: 4 })
        ));
    }

    #[test]
    fn out_of_range_column_is_rejected() {
        let mut board = StandardBoard::new();
        assert!(!board.is_legal(STANDARD_COLUMNS));
        assert!(matches!(board.landing_row(7), Err(GameError::InvalidColumn { column: 7 })));
        assert!(matches!(
            board.drop(0, 9, Player::PlayerOne),
            Err(GameError::InvalidColumn { column: 9 })
        ));
    }

    #[test]
    fn successors_follow_column_order_without_touching_parent() {
        let mut board = StandardBoard::new();
        for _ in 0..STANDARD_ROWS {
            board.play(1, Player::PlayerTwo).unwrap();
        }
        let before = board;
        let children: Vec<_> = board.successors(Player::PlayerOne).collect();
        assert_eq!(board, before);
        let columns: Vec<usize> = children.iter().map(|(column, _)| *column).collect();
        assert_eq!(columns, vec![0, 2, 3, 4, 5, 6]);
        for (column, child) in children {
            assert_eq!(child.cell(5, column), Some(Player::PlayerOne));
            assert_eq!(child.move_count(), before.move_count() + 1);
        }
    }

    #[test]
    fn detects_every_direction() {
        let horizontal = board_from_rows([
            ".......", ".......", ".......", ".......", ".......", "...1111",
        ]);
        let vertical = board_from_rows([
            ".......", ".......", "2......", "2......", "2......", "2......",
        ]);
        let falling = board_from_rows([
            ".......", ".......", "1......", "21.....", "221....", "2221...",
        ]);
        let rising = board_from_rows([
            ".......", ".......", "......2", ".....21", "....211", "...2111",
        ]);
        assert!(horizontal.has_won(Player::PlayerOne));
        assert!(!horizontal.has_won(Player::PlayerTwo));
        assert!(vertical.has_won(Player::PlayerTwo));
        assert!(falling.has_won(Player::PlayerOne));
        assert!(!falling.has_won(Player::PlayerTwo));
        assert!(rising.has_won(Player::PlayerTwo));
        assert_eq!(rising.winner(), Some(Player::PlayerTwo));
    }

    #[test]
    fn three_in_a_row_is_not_a_win() {
        let board = board_from_rows([
            ".......", ".......", ".......", ".......", ".......", "111.111",
        ]);
        assert!(!board.has_won(Player::PlayerOne));
        assert_eq!(board.winner(), None);
        assert!(!board.is_terminal());
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let board = board_from_rows([
            "1122112", "2211221", "1122112", "2211221", "1122112", "2211221",
        ]);
        assert!(board.is_full());
        assert!(board.is_draw());
        assert!(!board.has_won(Player::PlayerOne));
        assert!(!board.has_won(Player::PlayerTwo));
        assert!(board.is_terminal());
        assert_eq!(board.legal_columns().count(), 0);
    }

    #[test]
    fn window_count_matches_standard_board() {
        // 24 horizontal, 21 vertical, 12 per diagonal direction.
        assert_eq!(StandardBoard::new().windows().count(), 69);
        assert_eq!(Board::<4, 4>::new().windows().count(), 10);
        assert_eq!(Board::<3, 3>::new().windows().count(), 0);
    }

    #[test]
    fn short_boards_keep_horizontal_lines() {
        let mut board = Board::<3, 5>::new();
        for column in 0..5 {
            board.play(column, Player::PlayerOne).unwrap();
        }
        assert!(board.has_won(Player::PlayerOne));
        let mut tiny = Board::<2, 2>::new();
        tiny.play(0, Player::PlayerOne).unwrap();
        tiny.play(0, Player::PlayerOne).unwrap();
        assert!(!tiny.has_won(Player::PlayerOne));
    }

    #[test]
    fn renders_top_row_first() {
        let mut board = Board::<2, 3>::new();
        board.play(0, Player::PlayerOne).unwrap();
        board.play(0, Player::PlayerTwo).unwrap();
        board.play(2, Player::PlayerTwo).unwrap();
        assert_eq!(board.to_string(), "  0  1  2\n| 2  .  . |\n| 1  .  2 |\n");
    }
}
