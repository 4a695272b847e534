use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use crate::game::{GameMode, GameState, GameStatus, Mark, ScoreBoard, best_move};
use crate::log;

use super::{
    GameBroadcaster, GameEndReason, GameOverNotification, GameStateUpdate, MAX_PLAYER_NAME_LEN,
    MatchSettings, PlayerIdentity, ScoreEntry,
};

/// Shared state of one running match. Cloned into the match loop and kept by
/// the command handler side; the board is only touched under the mutex.
#[derive(Clone)]
pub struct MatchSessionState {
    pub game_state: Arc<Mutex<GameState>>,
    pub scores: Arc<Mutex<ScoreBoard>>,
    pub turn_notify: Arc<Notify>,
    pub bot_mark: Option<Mark>,
}

pub fn create_session(settings: &MatchSettings) -> Result<MatchSessionState, String> {
    let player_x = validate_player_name(&settings.player_x)?;
    let player_o = validate_player_name(&settings.player_o)?;

    // The computer always plays O; X is always a human and moves first.
    let bot_mark = match settings.mode {
        GameMode::PlayerVsComputer => Some(Mark::O),
        GameMode::PlayerVsPlayer => None,
    };

    let game_state = GameState::new(settings.mode, player_x, player_o);

    Ok(MatchSessionState {
        game_state: Arc::new(Mutex::new(game_state)),
        scores: Arc::new(Mutex::new(ScoreBoard::new())),
        turn_notify: Arc::new(Notify::new()),
        bot_mark,
    })
}

fn validate_player_name(name: &str) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Player name must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_PLAYER_NAME_LEN {
        return Err(format!(
            "Player name must be at most {} characters",
            MAX_PLAYER_NAME_LEN
        ));
    }
    Ok(trimmed.to_string())
}

impl MatchSessionState {
    /// A human claims a cell. Ignored while the computer's move is pending;
    /// an invalid target is logged and dropped, never fatal.
    pub async fn handle_place_mark(&self, index: usize) {
        let mut game_state = self.game_state.lock().await;

        if self.bot_mark == Some(game_state.current_mark()) {
            return;
        }

        match game_state.place_mark(index) {
            Ok(()) => {
                drop(game_state);
                self.turn_notify.notify_one();
            }
            Err(err) => log!("Ignoring move at {}: {}", index, err),
        }
    }

    pub async fn handle_restart_round(&self) {
        self.game_state.lock().await.reset_round();
        self.turn_notify.notify_one();
    }

    pub async fn handle_reset_scores(&self) {
        self.scores.lock().await.reset();
        self.turn_notify.notify_one();
    }
}

/// Drives the match until the task is dropped: per round, broadcast the state
/// and either compute the computer's move or wait for a human one; once the
/// round ends, record the score, notify, pause and start the next round.
pub async fn run_match_loop<B: GameBroadcaster>(
    session_state: MatchSessionState,
    settings: MatchSettings,
    broadcaster: B,
) {
    loop {
        run_round(&session_state, &settings, &broadcaster).await;

        let notification = finish_round(&session_state).await;
        broadcaster.broadcast_game_over(notification.clone()).await;

        match &notification.winner {
            Some(winner) => log!("Round over, {} wins", winner.name),
            None => log!("Round over, draw"),
        }

        let restart_delay = match notification.reason {
            GameEndReason::Win => settings.win_restart_delay,
            GameEndReason::Draw => settings.draw_restart_delay,
        };
        tokio::time::sleep(restart_delay).await;

        session_state.game_state.lock().await.reset_round();
    }
}

async fn run_round<B: GameBroadcaster>(
    session_state: &MatchSessionState,
    settings: &MatchSettings,
    broadcaster: &B,
) {
    loop {
        broadcast_state(session_state, broadcaster).await;

        let (is_round_over, is_bot_turn) = {
            let game_state = session_state.game_state.lock().await;
            (
                game_state.status() != GameStatus::InProgress,
                session_state.bot_mark == Some(game_state.current_mark()),
            )
        };

        if is_round_over {
            break;
        }

        if is_bot_turn {
            play_bot_turn(session_state, settings).await;
        } else {
            session_state.turn_notify.notified().await;
        }
    }
}

async fn play_bot_turn(session_state: &MatchSessionState, settings: &MatchSettings) {
    let Some(bot_mark) = session_state.bot_mark else {
        return;
    };

    let board = {
        let game_state = session_state.game_state.lock().await;
        if game_state.status() != GameStatus::InProgress
            || game_state.current_mark() != bot_mark
        {
            return;
        }
        *game_state.board()
    };

    tokio::time::sleep(settings.bot_delay).await;

    let calculated = tokio::task::spawn_blocking(move || best_move(&board, bot_mark)).await;

    match calculated {
        Ok(Ok(index)) => {
            let mut game_state = session_state.game_state.lock().await;
            // The round may have been restarted while the move was pending;
            // then it is X's turn again and the stale move is dropped.
            if game_state.current_mark() == bot_mark {
                if let Err(err) = game_state.place_mark(index) {
                    log!("Ignoring computer move at {}: {}", index, err);
                }
            }
        }
        Ok(Err(err)) => log!("Move search failed: {}", err),
        Err(err) => log!("Move search task failed: {}", err),
    }
}

async fn broadcast_state<B: GameBroadcaster>(session_state: &MatchSessionState, broadcaster: &B) {
    let update = {
        let game_state = session_state.game_state.lock().await;
        let scores = session_state.scores.lock().await;
        build_state_update(&game_state, &scores, session_state.bot_mark)
    };

    broadcaster.broadcast_state(update).await;
}

fn build_state_update(
    game_state: &GameState,
    scores: &ScoreBoard,
    bot_mark: Option<Mark>,
) -> GameStateUpdate {
    GameStateUpdate {
        cells: *game_state.board().cells(),
        current_mark: game_state.current_mark(),
        status: game_state.status(),
        player_x: PlayerIdentity {
            name: game_state.player_x_name().to_string(),
            is_bot: bot_mark == Some(Mark::X),
        },
        player_o: PlayerIdentity {
            name: game_state.player_o_name().to_string(),
            is_bot: bot_mark == Some(Mark::O),
        },
        thinking: game_state.status() == GameStatus::InProgress
            && bot_mark == Some(game_state.current_mark()),
        x_wins: scores.wins(Mark::X),
        o_wins: scores.wins(Mark::O),
        last_move: game_state.last_move(),
        winning_line: game_state.winning_line(),
    }
}

/// Records the finished round in the tally (once) and builds the notification.
async fn finish_round(session_state: &MatchSessionState) -> GameOverNotification {
    let game_state = session_state.game_state.lock().await;
    let mut scores = session_state.scores.lock().await;

    if let Some(winner_mark) = game_state.winner_mark() {
        scores.record_win(winner_mark);
    }

    let identity = |mark: Mark| PlayerIdentity {
        name: match mark {
            Mark::X => game_state.player_x_name().to_string(),
            _ => game_state.player_o_name().to_string(),
        },
        is_bot: session_state.bot_mark == Some(mark),
    };

    let winner_mark = game_state.winner_mark();

    GameOverNotification {
        winner: winner_mark.map(identity),
        winner_mark,
        reason: if winner_mark.is_some() {
            GameEndReason::Win
        } else {
            GameEndReason::Draw
        },
        winning_line: game_state.winning_line(),
        scores: vec![
            ScoreEntry {
                identity: identity(Mark::X),
                wins: scores.wins(Mark::X),
            },
            ScoreEntry {
                identity: identity(Mark::O),
                wins: scores.wins(Mark::O),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameOutcome;

    fn settings(mode: GameMode, player_x: &str, player_o: &str) -> MatchSettings {
        MatchSettings::new(mode, player_x.to_string(), player_o.to_string())
    }

    #[test]
    fn test_create_session_assigns_bot_to_o_in_pvc() {
        let session =
            create_session(&settings(GameMode::PlayerVsComputer, "Alice", "Computer")).unwrap();
        assert_eq!(session.bot_mark, Some(Mark::O));

        let session = create_session(&settings(GameMode::PlayerVsPlayer, "Alice", "Bob")).unwrap();
        assert_eq!(session.bot_mark, None);
    }

    #[test]
    fn test_create_session_rejects_blank_names() {
        assert!(create_session(&settings(GameMode::PlayerVsPlayer, "  ", "Bob")).is_err());
        assert!(create_session(&settings(GameMode::PlayerVsPlayer, "Alice", "")).is_err());
    }

    #[test]
    fn test_create_session_rejects_oversized_names() {
        let long_name = "x".repeat(MAX_PLAYER_NAME_LEN + 1);
        assert!(create_session(&settings(GameMode::PlayerVsPlayer, &long_name, "Bob")).is_err());
    }

    #[test]
    fn test_create_session_trims_names() {
        let session =
            create_session(&settings(GameMode::PlayerVsPlayer, "  Alice ", " Bob ")).unwrap();
        let game_state = session.game_state.try_lock().unwrap();
        assert_eq!(game_state.player_x_name(), "Alice");
        assert_eq!(game_state.player_o_name(), "Bob");
    }

    #[tokio::test]
    async fn test_place_mark_is_ignored_during_bot_turn() {
        let session =
            create_session(&settings(GameMode::PlayerVsComputer, "Alice", "Computer")).unwrap();

        // X opens, then it is the computer's turn; the next click must not land.
        session.handle_place_mark(0).await;
        session.handle_place_mark(1).await;

        let game_state = session.game_state.lock().await;
        assert_eq!(game_state.board().mark_at(0), Some(Mark::X));
        assert_eq!(game_state.board().mark_at(1), Some(Mark::Empty));
        assert_eq!(game_state.current_mark(), Mark::O);
    }

    #[tokio::test]
    async fn test_finish_round_records_the_score_once() {
        let session = create_session(&settings(GameMode::PlayerVsPlayer, "Alice", "Bob")).unwrap();

        {
            let mut game_state = session.game_state.lock().await;
            for index in [0, 3, 1, 4, 2] {
                game_state.place_mark(index).unwrap();
            }
            assert_eq!(crate::game::outcome(game_state.board()), GameOutcome::Won(Mark::X));
        }

        let notification = finish_round(&session).await;
        assert_eq!(notification.winner_mark, Some(Mark::X));
        assert_eq!(notification.reason, GameEndReason::Win);
        assert_eq!(notification.winning_line.unwrap().cells, [0, 1, 2]);
        assert_eq!(notification.scores[0].wins, 1);
        assert_eq!(notification.scores[1].wins, 0);
        assert_eq!(session.scores.lock().await.wins(Mark::X), 1);
    }
}
