use common::game::{GameMode, GameStatus};
use common::session::{GameOverNotification, GameStateUpdate};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum ClientCommand {
    Menu(MenuCommand),
    Game(GameCommand),
}

#[derive(Debug, Clone)]
pub enum MenuCommand {
    StartMatch {
        mode: GameMode,
        player_x: String,
        player_o: String,
    },
    LeaveMatch,
}

#[derive(Debug, Clone)]
pub enum GameCommand {
    PlaceMark { index: usize },
    RestartRound,
    ResetScores,
}

#[derive(Debug, Clone)]
pub enum AppState {
    Selection,
    InMatch {
        update: Option<GameStateUpdate>,
        game_over: Option<GameOverNotification>,
    },
}

pub struct SharedState {
    state: Arc<Mutex<AppState>>,
    error: Arc<Mutex<Option<String>>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(AppState::Selection)),
            error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_state(&self, state: AppState) {
        *self.state.lock().unwrap() = state;
    }

    pub fn get_state(&self) -> AppState {
        self.state.lock().unwrap().clone()
    }

    pub fn set_game_update(&self, update: GameStateUpdate) {
        let mut state = self.state.lock().unwrap();
        match &mut *state {
            AppState::InMatch { update: slot, game_over } => {
                // A fresh round replaces the previous game-over banner.
                if update.status == GameStatus::InProgress {
                    *game_over = None;
                }
                *slot = Some(update);
            }
            AppState::Selection => {
                *state = AppState::InMatch {
                    update: Some(update),
                    game_over: None,
                };
            }
        }
    }

    pub fn set_game_over(&self, notification: GameOverNotification) {
        if let AppState::InMatch { game_over, .. } = &mut *self.state.lock().unwrap() {
            *game_over = Some(notification);
        }
    }

    pub fn set_error(&self, error: String) {
        *self.error.lock().unwrap() = Some(error);
    }

    pub fn get_error(&self) -> Option<String> {
        self.error.lock().unwrap().clone()
    }

    pub fn clear_error(&self) {
        *self.error.lock().unwrap() = None;
    }
}

impl Clone for SharedState {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            error: Arc::clone(&self.error),
        }
    }
}
