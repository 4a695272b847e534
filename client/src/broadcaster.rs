use common::session::{GameBroadcaster, GameOverNotification, GameStateUpdate};

use crate::state::SharedState;

/// Feeds match updates straight into the shared UI state; the local
/// counterpart of a networked fan-out.
#[derive(Clone)]
pub struct LocalBroadcaster {
    shared_state: SharedState,
}

impl LocalBroadcaster {
    pub fn new(shared_state: SharedState) -> Self {
        Self { shared_state }
    }
}

impl GameBroadcaster for LocalBroadcaster {
    async fn broadcast_state(&self, update: GameStateUpdate) {
        self.shared_state.set_game_update(update);
    }

    async fn broadcast_game_over(&self, notification: GameOverNotification) {
        self.shared_state.set_game_over(notification);
    }
}
