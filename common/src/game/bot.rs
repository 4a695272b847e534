use std::fmt;

use super::board::{Board, CELL_COUNT};
use super::rules::check_win;
use super::types::Mark;

const WIN_SCORE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    BoardFull,
    InvalidMark,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::BoardFull => write!(f, "no empty cell left to search"),
            SearchError::InvalidMark => write!(f, "search mark must be X or O"),
        }
    }
}

/// Returns the optimal move for `bot_mark` on the given board.
///
/// Full-depth minimax over all empty cells; at 9 cells the game tree is small
/// enough that no pruning is needed. The input board is never mutated, the
/// search works on its own copy. Ties keep the lowest index.
pub fn best_move(board: &Board, bot_mark: Mark) -> Result<usize, SearchError> {
    let opponent = bot_mark.opponent().ok_or(SearchError::InvalidMark)?;

    let moves = board.available_moves();
    if moves.is_empty() {
        return Err(SearchError::BoardFull);
    }

    let mut scratch = *board;
    let mut best_index = moves[0];
    let mut best_score = i32::MIN;

    for index in moves {
        scratch.set(index, bot_mark);
        let score = minimax(&mut scratch, 0, false, bot_mark, opponent);
        scratch.set(index, Mark::Empty);

        if score > best_score {
            best_score = score;
            best_index = index;
        }
    }

    Ok(best_index)
}

/// A won leaf scores `WIN_SCORE - depth` for the searching side and
/// `depth - WIN_SCORE` for its opponent, so an earlier win beats a later one
/// and a later loss beats an earlier one. Draw leaves score 0.
fn minimax(board: &mut Board, depth: i32, maximizing: bool, bot_mark: Mark, opponent: Mark) -> i32 {
    if let Some(winner) = check_win(board) {
        return if winner == bot_mark {
            WIN_SCORE - depth
        } else {
            depth - WIN_SCORE
        };
    }

    if board.is_full() {
        return 0;
    }

    let (mark_to_place, next_maximizing) = if maximizing {
        (bot_mark, false)
    } else {
        (opponent, true)
    };

    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for index in 0..CELL_COUNT {
        if board.cells()[index] != Mark::Empty {
            continue;
        }

        board.set(index, mark_to_place);
        let score = minimax(board, depth + 1, next_maximizing, bot_mark, opponent);
        board.set(index, Mark::Empty);

        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::game_state::GameState;
    use super::super::rules::outcome;
    use super::super::types::{GameMode, GameOutcome};
    use rand::prelude::*;

    #[test]
    fn test_takes_immediate_win_over_blocking() {
        // O completes its own row instead of blocking X's.
        let board = Board::from_pattern("OO.XX....");
        assert_eq!(best_move(&board, Mark::O), Ok(2));
    }

    #[test]
    fn test_blocks_opponent_immediate_win() {
        let board = Board::from_pattern("XX.O.....");
        assert_eq!(best_move(&board, Mark::O), Ok(2));
    }

    #[test]
    fn test_search_side_is_a_parameter() {
        // The same position searched for X completes X's column.
        let board = Board::from_pattern("X.OX.O...");
        assert_eq!(best_move(&board, Mark::X), Ok(6));
    }

    #[test]
    fn test_fails_fast_on_full_board() {
        let board = Board::from_pattern("XOXXOXOXO");
        assert_eq!(best_move(&board, Mark::O), Err(SearchError::BoardFull));
    }

    #[test]
    fn test_rejects_empty_search_mark() {
        assert_eq!(
            best_move(&Board::new(), Mark::Empty),
            Err(SearchError::InvalidMark)
        );
    }

    #[test]
    fn test_ties_keep_the_lowest_index() {
        // Perfect play from an empty board is always a draw, so every opening
        // scores 0 and the first cell wins the tie.
        assert_eq!(best_move(&Board::new(), Mark::X), Ok(0));
    }

    #[test]
    fn test_idempotent_and_side_effect_free() {
        let board = Board::from_pattern("X...O...X");
        let before = board;

        let first = best_move(&board, Mark::O);
        assert_eq!(board, before);
        let second = best_move(&board, Mark::O);
        assert_eq!(board, before);
        assert_eq!(first, second);
    }

    #[test]
    fn test_prefers_the_faster_win() {
        // The immediate win sits at index 8; lower indices only lead to slower
        // wins, so picking 8 shows the depth term at work, not the tie-break.
        let board = Board::from_pattern("..XX..OO.");
        assert_eq!(best_move(&board, Mark::O), Ok(8));
    }

    #[test]
    fn test_self_play_always_draws() {
        let mut state = GameState::new(
            GameMode::PlayerVsPlayer,
            "left".to_string(),
            "right".to_string(),
        );

        for _ in 0..CELL_COUNT {
            let index = best_move(state.board(), state.current_mark()).unwrap();
            state.place_mark(index).unwrap();
            if outcome(state.board()) != GameOutcome::InProgress {
                break;
            }
        }

        assert_eq!(outcome(state.board()), GameOutcome::Draw);
    }

    #[test]
    fn test_never_loses_against_random_play() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let mut state = GameState::new(
                GameMode::PlayerVsComputer,
                "random".to_string(),
                "bot".to_string(),
            );

            loop {
                let index = if state.current_mark() == Mark::X {
                    let moves = state.board().available_moves();
                    moves[rng.random_range(0..moves.len())]
                } else {
                    best_move(state.board(), Mark::O).unwrap()
                };
                state.place_mark(index).unwrap();

                match outcome(state.board()) {
                    GameOutcome::InProgress => {}
                    GameOutcome::Won(winner) => {
                        assert_ne!(winner, Mark::X, "bot lost: {:?}", state.board());
                        break;
                    }
                    GameOutcome::Draw => break,
                }
            }
        }
    }
}
