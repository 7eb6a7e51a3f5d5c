//! Fixed-depth minimax, with and without alpha-beta pruning.
//!
//! Every leaf of a single search is scored from one fixed perspective player,
//! whichever side is to move there. Children are visited in ascending column
//! order and a column only replaces the current best on a strictly better
//! score, so ties go to the lowest column.
use tracing::debug;

use crate::board::{Board, Player};
use crate::eval::{evaluate, Score, INFINITY, NEG_INFINITY};
use crate::GameError;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Pruning {
    AlphaBeta,
    Disabled,
}

/// Score of a node together with the column that achieved it. `column` is
/// `None` for base-case nodes (depth exhausted or game over).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SearchOutcome {
    pub column: Option<usize>,
    pub score: Score,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NodeCount {
    pub score: Score,
    /// Recursive invocations, the root included.
    pub nodes: u64,
}

/// A move picked at the root.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MoveChoice {
    pub column: usize,
    pub score: Score,
}

/// State threaded through one tree walk.
struct Search {
    perspective: Player,
    pruning: Pruning,
    nodes: u64,
}

impl Search {
    fn new(perspective: Player, pruning: Pruning) -> Self {
        Self {
            perspective,
            pruning,
            nodes: 0,
        }
    }

    fn run<const ROWS: usize, const COLUMNS: usize>(
        &mut self,
        board: &Board<ROWS, COLUMNS>,
        depth: usize,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> SearchOutcome {
        self.nodes += 1;
        if depth == 0 || board.is_terminal() {
            return SearchOutcome {
                column: None,
                score: evaluate(board, self.perspective),
            };
        }

        let mover = if maximizing {
            self.perspective
        } else {
            self.perspective.opponent()
        };
        let mut best = SearchOutcome {
            column: None,
            score: if maximizing { NEG_INFINITY } else { INFINITY },
        };
        for (column, child) in board.successors(mover) {
            let score = self.run(&child, depth - 1, alpha, beta, !maximizing).score;
            // A node whose every child is a forced loss still names a move.
            if best.column.is_none() {
                best.column = Some(column);
            }
            if maximizing {
                if score > best.score {
                    best = SearchOutcome {
                        column: Some(column),
                        score,
                    };
                }
                if self.pruning == Pruning::AlphaBeta {
                    alpha = alpha.max(best.score);
                }
            } else {
                if score < best.score {
                    best = SearchOutcome {
                        column: Some(column),
                        score,
                    };
                }
                if self.pruning == Pruning::AlphaBeta {
                    beta = beta.min(best.score);
                }
            }
            if self.pruning == Pruning::AlphaBeta && beta <= alpha {
                break;
            }
        }
        best
    }
}

/// Alpha-beta minimax value of `board` for `perspective`. The maximizing side
/// is `perspective`, the minimizing side its opponent.
pub fn minimax<const ROWS: usize, const COLUMNS: usize>(
    board: &Board<ROWS, COLUMNS>,
    depth: usize,
    alpha: Score,
    beta: Score,
    maximizing: bool,
    perspective: Player,
) -> Score {
    Search::new(perspective, Pruning::AlphaBeta)
        .run(board, depth, alpha, beta, maximizing)
        .score
}

/// Plain minimax over the full tree. Always agrees with [`minimax`] called
/// with a full window.
pub fn minimax_no_pruning<const ROWS: usize, const COLUMNS: usize>(
    board: &Board<ROWS, COLUMNS>,
    depth: usize,
    maximizing: bool,
    perspective: Player,
) -> Score {
    Search::new(perspective, Pruning::Disabled)
        .run(board, depth, NEG_INFINITY, INFINITY, maximizing)
        .score
}

/// Alpha-beta search that also reports the column chosen at the root.
/// Maximizing nodes play `ai`'s pieces and minimizing nodes the opponent's.
pub fn search_best<const ROWS: usize, const COLUMNS: usize>(
    board: &Board<ROWS, COLUMNS>,
    depth: usize,
    alpha: Score,
    beta: Score,
    maximizing: bool,
    ai: Player,
) -> SearchOutcome {
    Search::new(ai, Pruning::AlphaBeta).run(board, depth, alpha, beta, maximizing)
}

/// Full-window search that counts visited nodes. The count never changes the
/// score.
pub fn search_with_node_count<const ROWS: usize, const COLUMNS: usize>(
    board: &Board<ROWS, COLUMNS>,
    depth: usize,
    maximizing: bool,
    perspective: Player,
    pruning: Pruning,
) -> NodeCount {
    let mut search = Search::new(perspective, pruning);
    let outcome = search.run(board, depth, NEG_INFINITY, INFINITY, maximizing);
    NodeCount {
        score: outcome.score,
        nodes: search.nodes,
    }
}

/// Column `ai` should play, looking `depth` plies ahead.
pub fn choose_move<const ROWS: usize, const COLUMNS: usize>(
    board: &Board<ROWS, COLUMNS>,
    depth: usize,
    ai: Player,
) -> Result<usize, GameError> {
    choose_move_scored(board, depth, ai).map(|choice| choice.column)
}

/// Like [`choose_move`], but also returns the score of the chosen column.
///
/// Each legal column is tried in ascending order and the resulting position
/// is searched with the opponent to move at `depth - 1`. The first column
/// with the strictly greatest score wins.
pub fn choose_move_scored<const ROWS: usize, const COLUMNS: usize>(
    board: &Board<ROWS, COLUMNS>,
    depth: usize,
    ai: Player,
) -> Result<MoveChoice, GameError> {
    let mut best: Option<MoveChoice> = None;
    for (column, child) in board.successors(ai) {
        let score = minimax(
            &child,
            depth.saturating_sub(1),
            NEG_INFINITY,
            INFINITY,
            false,
            ai,
        );
        if best.map_or(true, |choice| score > choice.score) {
            best = Some(MoveChoice { column, score });
        }
    }
    let choice = best.ok_or(GameError::NoLegalMoves)?;
    debug!(
        column = choice.column,
        score = choice.score,
        depth,
        ?ai,
        "chose move"
    );
    Ok(choice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::StandardBoard;

    fn board_with(moves: &[(usize, Player)]) -> StandardBoard {
        let mut board = StandardBoard::new();
        for &(column, player) in moves {
            board.play(column, player).unwrap();
        }
        board
    }

    /// Player one holds row 5, columns 0..3; column 3 is open.
    fn player_one_threatens() -> StandardBoard {
        use Player::*;
        board_with(&[
            (0, PlayerOne),
            (1, PlayerOne),
            (2, PlayerOne),
            (0, PlayerTwo),
            (1, PlayerTwo),
            (6, PlayerTwo),
        ])
    }

    /// Player two holds row 5, columns 0..3; column 3 is open.
    fn player_two_threatens() -> StandardBoard {
        use Player::*;
        board_with(&[
            (0, PlayerTwo),
            (1, PlayerTwo),
            (2, PlayerTwo),
            (0, PlayerOne),
            (1, PlayerOne),
            (6, PlayerOne),
        ])
    }

    #[test]
    fn empty_board_prefers_centre() {
        let board = StandardBoard::new();
        assert_eq!(choose_move(&board, 1, Player::PlayerOne).unwrap(), 3);
        assert_eq!(choose_move(&board, 2, Player::PlayerOne).unwrap(), 3);
        assert_eq!(choose_move(&board, 1, Player::PlayerTwo).unwrap(), 3);
    }

    #[test]
    fn completes_a_winning_line() {
        let board = player_one_threatens();
        for depth in 1..=4 {
            let choice = choose_move_scored(&board, depth, Player::PlayerOne).unwrap();
            assert_eq!(choice, MoveChoice { column: 3, score: INFINITY }, "depth {depth}");
        }
    }

    #[test]
    fn blocks_an_opponent_line() {
        let board = player_two_threatens();
        for depth in 1..=4 {
            assert_eq!(choose_move(&board, depth, Player::PlayerOne).unwrap(), 3, "depth {depth}");
        }
    }

    #[test]
    fn ties_go_to_the_lowest_column() {
        use Player::*;
        // Centre column full, so columns 1, 2, 4 and 5 all score 30.
        let board = board_with(&[
            (3, PlayerOne),
            (3, PlayerTwo),
            (3, PlayerOne),
            (3, PlayerTwo),
            (3, PlayerOne),
            (3, PlayerTwo),
        ]);
        let choice = choose_move_scored(&board, 1, PlayerOne).unwrap();
        assert_eq!(choice, MoveChoice { column: 1, score: 30 });
    }

    #[test]
    fn full_board_has_no_move() {
        let mut board = StandardBoard::new();
        for column in 0..7 {
            for row in 0..6 {
                let player = if (row / 2 + column / 2) % 2 == 0 {
                    Player::PlayerOne
                } else {
                    Player::PlayerTwo
                };
                board.play(column, player).unwrap();
            }
        }
        assert!(board.is_full());
        assert!(matches!(
            choose_move(&board, 3, Player::PlayerOne),
            Err(GameError::NoLegalMoves)
        ));
    }

    #[test]
    fn decided_board_still_yields_a_legal_column() {
        let mut board = StandardBoard::new();
        for _ in 0..4 {
            board.play(5, Player::PlayerTwo).unwrap();
        }
        let column = choose_move(&board, 3, Player::PlayerOne).unwrap();
        assert!(board.is_legal(column));
    }

    #[test]
    fn depth_zero_and_terminal_nodes_are_leaves() {
        let board = player_one_threatens();
        let leaf = search_best(&board, 0, NEG_INFINITY, INFINITY, true, Player::PlayerOne);
        assert_eq!(leaf.column, None);
        assert_eq!(leaf.score, evaluate(&board, Player::PlayerOne));

        let mut won = board;
        won.play(3, Player::PlayerOne).unwrap();
        let counted = search_with_node_count(&won, 5, true, Player::PlayerOne, Pruning::Disabled);
        assert_eq!(counted, NodeCount { score: INFINITY, nodes: 1 });
    }

    #[test]
    fn search_best_names_the_root_move() {
        let outcome = search_best(
            &player_one_threatens(),
            3,
            NEG_INFINITY,
            INFINITY,
            true,
            Player::PlayerOne,
        );
        assert_eq!(outcome, SearchOutcome { column: Some(3), score: INFINITY });

        let outcome = search_best(
            &StandardBoard::new(),
            1,
            NEG_INFINITY,
            INFINITY,
            true,
            Player::PlayerOne,
        );
        assert_eq!(outcome, SearchOutcome { column: Some(3), score: 3 });
    }

    #[test]
    fn forced_loss_defaults_to_first_column() {
        use Player::*;
        // Player two has two open threats on row 5; one block is not enough.
        let board = board_with(&[(2, PlayerTwo), (3, PlayerTwo), (4, PlayerTwo), (6, PlayerOne)]);
        let outcome = search_best(&board, 2, NEG_INFINITY, INFINITY, true, PlayerOne);
        assert_eq!(outcome, SearchOutcome { column: Some(0), score: NEG_INFINITY });
    }

    #[test]
    fn empty_board_values_and_node_counts() {
        let expected = [(1, 3, 8, 8), (2, 0, 33, 57), (3, 16, 192, 400), (4, 0, 866, 2801)];
        let board = StandardBoard::new();
        for (depth, score, pruned_nodes, full_nodes) in expected {
            let pruned = search_with_node_count(&board, depth, true, Player::PlayerOne, Pruning::AlphaBeta);
            let full = search_with_node_count(&board, depth, true, Player::PlayerOne, Pruning::Disabled);
            assert_eq!(pruned, NodeCount { score, nodes: pruned_nodes }, "depth {depth}");
            assert_eq!(full, NodeCount { score, nodes: full_nodes }, "depth {depth}");
            assert_eq!(minimax(&board, depth, NEG_INFINITY, INFINITY, true, Player::PlayerOne), score);
            assert_eq!(minimax_no_pruning(&board, depth, true, Player::PlayerOne), score);
        }
    }

    #[test]
    fn minimizing_root_scores_for_the_fixed_perspective() {
        // Player two to move on an empty board: its best reply is the centre,
        // which costs player one 3 points.
        let board = StandardBoard::new();
        assert_eq!(minimax(&board, 1, NEG_INFINITY, INFINITY, false, Player::PlayerOne), -3);
        assert_eq!(minimax_no_pruning(&board, 1, false, Player::PlayerOne), -3);
    }
}
