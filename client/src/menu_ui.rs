use common::config::ConfigManager;
use common::game::GameMode;
use common::session::MAX_PLAYER_NAME_LEN;
use eframe::egui;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::game_ui::GameUi;
use crate::state::{AppState, ClientCommand, MenuCommand, SharedState};

pub struct MenuApp {
    shared_state: SharedState,
    command_tx: mpsc::UnboundedSender<ClientCommand>,
    config_manager: ConfigManager<Config>,
    config: Config,
    selected_mode: Option<GameMode>,
    player_x_input: String,
    player_o_input: String,
    game_ui: GameUi,
}

impl MenuApp {
    pub fn new(
        shared_state: SharedState,
        command_tx: mpsc::UnboundedSender<ClientCommand>,
        config_manager: ConfigManager<Config>,
        config: Config,
    ) -> Self {
        let selected_mode = config.last_mode;
        let player_x_input = config.player_x_name.clone();
        let player_o_input = match selected_mode {
            Some(GameMode::PlayerVsComputer) => "Computer".to_string(),
            _ => config.player_o_name.clone(),
        };

        Self {
            shared_state,
            command_tx,
            config_manager,
            config,
            selected_mode,
            player_x_input,
            player_o_input,
            game_ui: GameUi::new(),
        }
    }

    fn render_selection(&mut self, ui: &mut egui::Ui) {
        ui.add_space(20.0);
        ui.heading("Tic-Tac-Toe");
        ui.separator();
        ui.add_space(10.0);

        ui.label("Game mode:");
        ui.horizontal(|ui| {
            if ui
                .selectable_label(
                    self.selected_mode == Some(GameMode::PlayerVsPlayer),
                    "Player vs Player",
                )
                .clicked()
            {
                self.selected_mode = Some(GameMode::PlayerVsPlayer);
                if self.player_o_input == "Computer" {
                    self.player_o_input = self.config.player_o_name.clone();
                }
            }

            if ui
                .selectable_label(
                    self.selected_mode == Some(GameMode::PlayerVsComputer),
                    "Player vs Computer",
                )
                .clicked()
            {
                self.selected_mode = Some(GameMode::PlayerVsComputer);
                self.player_o_input = "Computer".to_string();
            }
        });

        if let Some(mode) = self.selected_mode {
            ui.add_space(10.0);

            ui.label("Player 1 (X):");
            ui.add(
                egui::TextEdit::singleline(&mut self.player_x_input)
                    .char_limit(MAX_PLAYER_NAME_LEN),
            );

            if mode == GameMode::PlayerVsPlayer {
                ui.label("Player 2 (O):");
                ui.add(
                    egui::TextEdit::singleline(&mut self.player_o_input)
                        .char_limit(MAX_PLAYER_NAME_LEN),
                );
            } else {
                ui.label("Player 2 (O): Computer");
            }

            ui.add_space(15.0);

            let start_enabled = self.start_allowed();
            let start_clicked = ui
                .add_enabled(start_enabled, egui::Button::new("Start Game"))
                .clicked();
            let enter_pressed = start_enabled && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if start_clicked || enter_pressed {
                self.start_match(mode);
            }
        }
    }

    fn start_allowed(&self) -> bool {
        let Some(mode) = self.selected_mode else {
            return false;
        };
        if self.player_x_input.trim().is_empty() {
            return false;
        }
        mode == GameMode::PlayerVsComputer || !self.player_o_input.trim().is_empty()
    }

    fn start_match(&mut self, mode: GameMode) {
        let player_x = self.player_x_input.trim().to_string();
        let player_o = match mode {
            GameMode::PlayerVsComputer => "Computer".to_string(),
            GameMode::PlayerVsPlayer => self.player_o_input.trim().to_string(),
        };

        self.config.player_x_name = player_x.clone();
        if mode == GameMode::PlayerVsPlayer {
            self.config.player_o_name = player_o.clone();
        }
        self.config.last_mode = Some(mode);

        if let Err(err) = self.config_manager.set_config(&self.config) {
            common::log!("Failed to save config: {}", err);
        }

        let _ = self
            .command_tx
            .send(ClientCommand::Menu(MenuCommand::StartMatch {
                mode,
                player_x,
                player_o,
            }));
    }
}

impl eframe::App for MenuApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(error) = self.shared_state.get_error() {
            egui::Window::new("Error")
                .collapsible(false)
                .show(ctx, |ui| {
                    ui.label(&error);
                    if ui.button("OK").clicked() {
                        self.shared_state.clear_error();
                    }
                });
        }

        let state = self.shared_state.get_state();

        egui::CentralPanel::default().show(ctx, |ui| match state {
            AppState::Selection => self.render_selection(ui),
            AppState::InMatch { update, game_over } => {
                self.game_ui
                    .render_match(ui, &update, &game_over, &self.command_tx);
            }
        });

        // Match updates come from the runner thread, so poll for them.
        ctx.request_repaint_after(std::time::Duration::from_millis(50));
    }
}
