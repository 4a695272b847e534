mod match_session;

use std::future::Future;
use std::time::Duration;

use crate::game::{CELL_COUNT, GameMode, GameStatus, Mark, WinningLine};

pub use match_session::{MatchSessionState, create_session, run_match_loop};

pub const MAX_PLAYER_NAME_LEN: usize = 20;

const DEFAULT_BOT_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_WIN_RESTART_DELAY: Duration = Duration::from_millis(2000);
const DEFAULT_DRAW_RESTART_DELAY: Duration = Duration::from_millis(1500);

/// Receives state pushes from a running match. The client backs this with its
/// shared UI state; a future networked frontend would fan updates out instead.
pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, update: GameStateUpdate) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(
        &self,
        notification: GameOverNotification,
    ) -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone)]
pub struct MatchSettings {
    pub mode: GameMode,
    pub player_x: String,
    pub player_o: String,
    /// Pause before the computer places its mark. Presentation flavor only,
    /// the search itself returns immediately.
    pub bot_delay: Duration,
    pub win_restart_delay: Duration,
    pub draw_restart_delay: Duration,
}

impl MatchSettings {
    pub fn new(mode: GameMode, player_x: String, player_o: String) -> Self {
        Self {
            mode,
            player_x,
            player_o,
            bot_delay: DEFAULT_BOT_DELAY,
            win_restart_delay: DEFAULT_WIN_RESTART_DELAY,
            draw_restart_delay: DEFAULT_DRAW_RESTART_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub name: String,
    pub is_bot: bool,
}

#[derive(Debug, Clone)]
pub struct GameStateUpdate {
    pub cells: [Mark; CELL_COUNT],
    pub current_mark: Mark,
    pub status: GameStatus,
    pub player_x: PlayerIdentity,
    pub player_o: PlayerIdentity,
    /// True while the computer's move is pending; the UI locks the board.
    pub thinking: bool,
    pub x_wins: u32,
    pub o_wins: u32,
    pub last_move: Option<usize>,
    pub winning_line: Option<WinningLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEndReason {
    Win,
    Draw,
}

#[derive(Debug, Clone)]
pub struct ScoreEntry {
    pub identity: PlayerIdentity,
    pub wins: u32,
}

#[derive(Debug, Clone)]
pub struct GameOverNotification {
    pub winner: Option<PlayerIdentity>,
    pub winner_mark: Option<Mark>,
    pub reason: GameEndReason,
    pub winning_line: Option<WinningLine>,
    pub scores: Vec<ScoreEntry>,
}
