mod board;
mod bot;
mod game_state;
mod rules;
mod score;
mod types;

pub use board::{Board, CELL_COUNT, MoveError};
pub use bot::{SearchError, best_move};
pub use game_state::GameState;
pub use rules::{WIN_LINES, check_win, check_win_with_line, is_draw, outcome};
pub use score::ScoreBoard;
pub use types::{GameMode, GameOutcome, GameStatus, Mark, WinningLine};
