mod broadcaster;
mod config;
mod game_ui;
mod menu_ui;
mod runner;
mod state;

use clap::Parser;
use eframe::egui;
use std::time::Duration;
use tokio::sync::mpsc;

use config::get_config_manager;
use menu_ui::MenuApp;
use runner::local_match_task;
use state::SharedState;

#[derive(Parser)]
#[command(name = "tictactoe_client", about = "Tic-tac-toe desktop client")]
struct Args {
    /// Path to the YAML config file, defaults to a file next to the executable
    #[arg(long)]
    config: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    common::logger::init_logger("client");

    let config_manager = get_config_manager(args.config.as_deref());
    let config = config_manager.get_config()?;

    let shared_state = SharedState::new();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let shared_state_clone = shared_state.clone();
    let bot_delay = Duration::from_millis(config.bot_delay_ms);

    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(local_match_task(shared_state_clone, command_rx, bot_delay));
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 560.0])
            .with_title("Tic-Tac-Toe"),
        ..Default::default()
    };

    eframe::run_native(
        "Tic-Tac-Toe",
        options,
        Box::new(|_cc| {
            Ok(Box::new(MenuApp::new(
                shared_state,
                command_tx,
                config_manager,
                config,
            )))
        }),
    )?;

    Ok(())
}
