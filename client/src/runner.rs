use std::time::Duration;
use tokio::sync::mpsc;

use common::game::GameMode;
use common::log;
use common::session::{MatchSettings, create_session, run_match_loop};

use crate::broadcaster::LocalBroadcaster;
use crate::state::{AppState, ClientCommand, GameCommand, MenuCommand, SharedState};

/// Waits for StartMatch commands and runs one match at a time; everything else
/// arriving while no match is active is dropped.
pub async fn local_match_task(
    shared_state: SharedState,
    mut command_rx: mpsc::UnboundedReceiver<ClientCommand>,
    bot_delay: Duration,
) {
    while let Some(command) = command_rx.recv().await {
        if let ClientCommand::Menu(MenuCommand::StartMatch {
            mode,
            player_x,
            player_o,
        }) = command
        {
            run_match(
                &shared_state,
                &mut command_rx,
                mode,
                player_x,
                player_o,
                bot_delay,
            )
            .await;
            shared_state.set_state(AppState::Selection);
        }
    }
}

async fn run_match(
    shared_state: &SharedState,
    command_rx: &mut mpsc::UnboundedReceiver<ClientCommand>,
    mode: GameMode,
    player_x: String,
    player_o: String,
    bot_delay: Duration,
) {
    let mut settings = MatchSettings::new(mode, player_x, player_o);
    settings.bot_delay = bot_delay;

    let session_state = match create_session(&settings) {
        Ok(state) => state,
        Err(err) => {
            shared_state.set_error(err);
            return;
        }
    };

    log!(
        "Starting match: {} (X) vs {} (O)",
        settings.player_x,
        settings.player_o
    );

    shared_state.set_state(AppState::InMatch {
        update: None,
        game_over: None,
    });

    let broadcaster = LocalBroadcaster::new(shared_state.clone());
    let session_for_commands = session_state.clone();

    let mut match_handle = tokio::spawn(async move {
        run_match_loop(session_state, settings, broadcaster).await;
    });

    loop {
        tokio::select! {
            _ = &mut match_handle => {
                log!("Match loop ended unexpectedly");
                break;
            }
            Some(command) = command_rx.recv() => {
                match command {
                    ClientCommand::Game(GameCommand::PlaceMark { index }) => {
                        session_for_commands.handle_place_mark(index).await;
                    }
                    ClientCommand::Game(GameCommand::RestartRound) => {
                        session_for_commands.handle_restart_round().await;
                    }
                    ClientCommand::Game(GameCommand::ResetScores) => {
                        session_for_commands.handle_reset_scores().await;
                    }
                    ClientCommand::Menu(MenuCommand::LeaveMatch) => {
                        match_handle.abort();
                        break;
                    }
                    ClientCommand::Menu(MenuCommand::StartMatch { .. }) => {}
                }
            }
        }
    }
}
