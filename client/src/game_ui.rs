use common::game::{GameStatus, Mark};
use common::session::{GameOverNotification, GameStateUpdate};
use eframe::egui;
use tokio::sync::mpsc;

use crate::state::{ClientCommand, GameCommand, MenuCommand};

const FIELD_SIZE: usize = 3;

pub struct GameUi {
    last_hover: Option<usize>,
}

impl GameUi {
    const BOARD_PADDING: f32 = 40.0;
    const INFO_PANEL_WIDTH: f32 = 220.0;
    const MIN_CELL_SIZE: f32 = 40.0;
    const MAX_CELL_SIZE: f32 = 140.0;
    const LINE_WIDTH: f32 = 2.0;

    pub fn new() -> Self {
        Self { last_hover: None }
    }

    fn calculate_cell_size(available_width: f32, available_height: f32) -> f32 {
        let available_board_width =
            available_width - Self::INFO_PANEL_WIDTH - Self::BOARD_PADDING * 2.0;
        let available_board_height = available_height - Self::BOARD_PADDING * 2.0;

        let cell_size = (available_board_width / FIELD_SIZE as f32)
            .min(available_board_height / FIELD_SIZE as f32);

        cell_size.clamp(Self::MIN_CELL_SIZE, Self::MAX_CELL_SIZE)
    }

    pub fn render_match(
        &mut self,
        ui: &mut egui::Ui,
        update: &Option<GameStateUpdate>,
        game_over: &Option<GameOverNotification>,
        command_tx: &mpsc::UnboundedSender<ClientCommand>,
    ) {
        let Some(update) = update else {
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Starting game...");
                    ui.spinner();
                });
            });
            return;
        };

        let available_width = ui.available_width();
        let available_height = ui.available_height();
        let cell_size = Self::calculate_cell_size(available_width, available_height);
        let board_size = cell_size * FIELD_SIZE as f32;

        ui.horizontal(|ui| {
            ui.allocate_ui(
                egui::vec2(board_size + Self::BOARD_PADDING * 2.0, available_height),
                |ui| {
                    self.render_board(ui, update, cell_size, command_tx);
                },
            );

            ui.separator();

            ui.vertical(|ui| {
                self.render_info_panel(ui, update, game_over, command_tx);
            });
        });
    }

    fn render_board(
        &mut self,
        ui: &mut egui::Ui,
        update: &GameStateUpdate,
        cell_size: f32,
        command_tx: &mpsc::UnboundedSender<ClientCommand>,
    ) {
        let board_size = cell_size * FIELD_SIZE as f32;

        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(board_size, board_size), egui::Sense::click());

        let painter = ui.painter();

        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(240, 240, 240));

        for i in 0..=FIELD_SIZE {
            let x = rect.left() + i as f32 * cell_size;
            painter.line_segment(
                [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
                egui::Stroke::new(Self::LINE_WIDTH, egui::Color32::BLACK),
            );

            let y = rect.top() + i as f32 * cell_size;
            painter.line_segment(
                [egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)],
                egui::Stroke::new(Self::LINE_WIDTH, egui::Color32::BLACK),
            );
        }

        for (index, mark) in update.cells.iter().enumerate() {
            let cell_rect = Self::cell_rect(rect, index, cell_size);
            match mark {
                Mark::X => self.draw_x(painter, cell_rect),
                Mark::O => self.draw_o(painter, cell_rect),
                Mark::Empty => {}
            }
        }

        let accepts_input = update.status == GameStatus::InProgress && !update.thinking;

        if accepts_input {
            if let Some(hover_pos) = response.hover_pos() {
                let col = ((hover_pos.x - rect.left()) / cell_size) as usize;
                let row = ((hover_pos.y - rect.top()) / cell_size) as usize;

                self.last_hover = None;
                if col < FIELD_SIZE && row < FIELD_SIZE {
                    let index = row * FIELD_SIZE + col;
                    if update.cells[index] == Mark::Empty {
                        painter.rect_filled(
                            Self::cell_rect(rect, index, cell_size),
                            0.0,
                            egui::Color32::from_rgba_unmultiplied(100, 150, 255, 50),
                        );
                        self.last_hover = Some(index);
                    }
                }
            } else {
                self.last_hover = None;
            }

            if response.clicked()
                && let Some(index) = self.last_hover
            {
                let _ = command_tx.send(ClientCommand::Game(GameCommand::PlaceMark { index }));
            }
        } else {
            self.last_hover = None;
        }

        if let Some(line) = &update.winning_line {
            let start = Self::cell_rect(rect, line.cells[0], cell_size).center();
            let end = Self::cell_rect(rect, line.cells[2], cell_size).center();
            painter.line_segment(
                [start, end],
                egui::Stroke::new(6.0, egui::Color32::from_rgba_unmultiplied(50, 200, 50, 200)),
            );
        }
    }

    fn cell_rect(board_rect: egui::Rect, index: usize, cell_size: f32) -> egui::Rect {
        let col = index % FIELD_SIZE;
        let row = index / FIELD_SIZE;
        egui::Rect::from_min_size(
            egui::pos2(
                board_rect.left() + col as f32 * cell_size,
                board_rect.top() + row as f32 * cell_size,
            ),
            egui::vec2(cell_size, cell_size),
        )
    }

    fn draw_x(&self, painter: &egui::Painter, rect: egui::Rect) {
        let padding = rect.width() * 0.2;
        let stroke = egui::Stroke::new(4.0, egui::Color32::from_rgb(220, 50, 50));

        painter.line_segment(
            [
                egui::pos2(rect.left() + padding, rect.top() + padding),
                egui::pos2(rect.right() - padding, rect.bottom() - padding),
            ],
            stroke,
        );

        painter.line_segment(
            [
                egui::pos2(rect.right() - padding, rect.top() + padding),
                egui::pos2(rect.left() + padding, rect.bottom() - padding),
            ],
            stroke,
        );
    }

    fn draw_o(&self, painter: &egui::Painter, rect: egui::Rect) {
        let padding = rect.width() * 0.2;
        let radius = rect.width() / 2.0 - padding;
        let stroke = egui::Stroke::new(4.0, egui::Color32::from_rgb(50, 50, 220));

        painter.circle_stroke(rect.center(), radius, stroke);
    }

    fn render_info_panel(
        &self,
        ui: &mut egui::Ui,
        update: &GameStateUpdate,
        game_over: &Option<GameOverNotification>,
        command_tx: &mpsc::UnboundedSender<ClientCommand>,
    ) {
        ui.heading("Tic-Tac-Toe");
        ui.separator();

        let in_progress = update.status == GameStatus::InProgress;

        let x_label = format!(
            "X: {}{}",
            update.player_x.name,
            if update.player_x.is_bot { " (Bot)" } else { "" }
        );
        if in_progress && update.current_mark == Mark::X {
            ui.colored_label(egui::Color32::from_rgb(220, 50, 50), x_label);
        } else {
            ui.label(x_label);
        }

        let o_label = format!(
            "O: {}{}",
            update.player_o.name,
            if update.player_o.is_bot { " (Bot)" } else { "" }
        );
        if in_progress && update.current_mark == Mark::O {
            ui.colored_label(egui::Color32::from_rgb(50, 50, 220), o_label);
        } else {
            ui.label(o_label);
        }

        ui.separator();

        ui.label("Score");
        ui.label(format!("{}: {}", update.player_x.name, update.x_wins));
        ui.label(format!("{}: {}", update.player_o.name, update.o_wins));

        ui.separator();

        match update.status {
            GameStatus::InProgress => {
                if update.thinking {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Computer is thinking...");
                    });
                } else {
                    let current = match update.current_mark {
                        Mark::X => &update.player_x.name,
                        _ => &update.player_o.name,
                    };
                    ui.label(format!("{}'s turn ({})", current, update.current_mark));
                }
            }
            GameStatus::XWon | GameStatus::OWon | GameStatus::Draw => {
                if let Some(notification) = game_over {
                    match &notification.winner {
                        Some(winner) => {
                            ui.colored_label(
                                egui::Color32::GREEN,
                                egui::RichText::new(format!("{} wins!", winner.name)).strong(),
                            );
                        }
                        None => {
                            ui.label(egui::RichText::new("It's a draw!").strong());
                        }
                    }
                }
                ui.label("Next round is starting...");
            }
        }

        ui.add_space(10.0);
        ui.separator();

        if ui.button("New Round").clicked() {
            let _ = command_tx.send(ClientCommand::Game(GameCommand::RestartRound));
        }

        if ui.button("Reset Scores").clicked() {
            let _ = command_tx.send(ClientCommand::Game(GameCommand::ResetScores));
        }

        if ui.button("Back to Menu").clicked() {
            let _ = command_tx.send(ClientCommand::Menu(MenuCommand::LeaveMatch));
        }
    }
}
