use super::board::{Board, MoveError};
use super::rules::{check_win, check_win_with_line};
use super::types::{GameMode, GameStatus, Mark, WinningLine};

/// The state machine of one running game: board, turn marker and status.
/// Scores live outside of it so a round reset cannot touch them.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    mode: GameMode,
    player_x: String,
    player_o: String,
    current_mark: Mark,
    status: GameStatus,
    last_move: Option<usize>,
}

impl GameState {
    pub fn new(mode: GameMode, player_x: String, player_o: String) -> Self {
        Self {
            board: Board::new(),
            mode,
            player_x,
            player_o,
            current_mark: Mark::X,
            status: GameStatus::InProgress,
            last_move: None,
        }
    }

    /// Claims a cell for the player whose turn it is, then re-evaluates the
    /// outcome and switches the turn while the round is still running.
    pub fn place_mark(&mut self, index: usize) -> Result<(), MoveError> {
        if self.status != GameStatus::InProgress {
            return Err(MoveError::GameOver);
        }

        self.board.place(index, self.current_mark)?;
        self.last_move = Some(index);

        self.check_round_over();

        if self.status == GameStatus::InProgress {
            self.switch_turn();
        }

        Ok(())
    }

    fn switch_turn(&mut self) {
        self.current_mark = if self.current_mark == Mark::X {
            Mark::O
        } else {
            Mark::X
        };
    }

    fn check_round_over(&mut self) {
        if let Some(winner) = check_win(&self.board) {
            self.status = match winner {
                Mark::X => GameStatus::XWon,
                Mark::O => GameStatus::OWon,
                Mark::Empty => unreachable!(),
            };
            return;
        }

        if self.board.is_full() {
            self.status = GameStatus::Draw;
        }
    }

    /// Clears the board for the next round. Players, mode and the score tally
    /// are untouched; X moves first again.
    pub fn reset_round(&mut self) {
        self.board.reset();
        self.current_mark = Mark::X;
        self.status = GameStatus::InProgress;
        self.last_move = None;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn current_mark(&self) -> Mark {
        self.current_mark
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn last_move(&self) -> Option<usize> {
        self.last_move
    }

    pub fn player_x_name(&self) -> &str {
        &self.player_x
    }

    pub fn player_o_name(&self) -> &str {
        &self.player_o
    }

    pub fn winner_mark(&self) -> Option<Mark> {
        match self.status {
            GameStatus::XWon => Some(Mark::X),
            GameStatus::OWon => Some(Mark::O),
            _ => None,
        }
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winner_mark().map(|mark| match mark {
            Mark::X => self.player_x.as_str(),
            _ => self.player_o.as_str(),
        })
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        if self.winner_mark().is_none() {
            return None;
        }
        check_win_with_line(&self.board).map(|(_, line)| line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_state() -> GameState {
        GameState::new(
            GameMode::PlayerVsPlayer,
            "Alice".to_string(),
            "Bob".to_string(),
        )
    }

    #[test]
    fn test_x_moves_first_and_turns_alternate() {
        let mut state = new_state();
        assert_eq!(state.current_mark(), Mark::X);

        state.place_mark(0).unwrap();
        assert_eq!(state.current_mark(), Mark::O);
        assert_eq!(state.board().mark_at(0), Some(Mark::X));

        state.place_mark(4).unwrap();
        assert_eq!(state.current_mark(), Mark::X);
        assert_eq!(state.board().mark_at(4), Some(Mark::O));
    }

    #[test]
    fn test_occupied_cell_does_not_switch_the_turn() {
        let mut state = new_state();
        state.place_mark(0).unwrap();

        assert_eq!(state.place_mark(0), Err(MoveError::Occupied));
        assert_eq!(state.current_mark(), Mark::O);
        assert_eq!(state.board().mark_at(0), Some(Mark::X));
    }

    #[test]
    fn test_win_finishes_the_round() {
        let mut state = new_state();
        // X: 0, 1, 2 / O: 3, 4
        for index in [0, 3, 1, 4, 2] {
            state.place_mark(index).unwrap();
        }

        assert_eq!(state.status(), GameStatus::XWon);
        assert_eq!(state.winner_mark(), Some(Mark::X));
        assert_eq!(state.winner_name(), Some("Alice"));
        assert_eq!(state.winning_line().unwrap().cells, [0, 1, 2]);
        // The turn does not switch once the round is over.
        assert_eq!(state.current_mark(), Mark::X);
    }

    #[test]
    fn test_no_moves_after_the_round_is_over() {
        let mut state = new_state();
        for index in [0, 3, 1, 4, 2] {
            state.place_mark(index).unwrap();
        }

        assert_eq!(state.place_mark(5), Err(MoveError::GameOver));
        assert_eq!(state.board().mark_at(5), Some(Mark::Empty));
    }

    #[test]
    fn test_full_board_without_winner_is_a_draw() {
        let mut state = new_state();
        // X O X / X O O / O X X, no line completed.
        for index in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            state.place_mark(index).unwrap();
        }

        assert_eq!(state.status(), GameStatus::Draw);
        assert_eq!(state.winner_mark(), None);
        assert_eq!(state.winning_line(), None);
    }

    #[test]
    fn test_reset_round_clears_board_and_keeps_players() {
        let mut state = new_state();
        for index in [0, 3, 1, 4, 2] {
            state.place_mark(index).unwrap();
        }

        state.reset_round();

        assert_eq!(state.status(), GameStatus::InProgress);
        assert_eq!(state.current_mark(), Mark::X);
        assert_eq!(state.board(), &Board::new());
        assert_eq!(state.last_move(), None);
        assert_eq!(state.player_x_name(), "Alice");
        assert_eq!(state.player_o_name(), "Bob");
    }
}
