use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{ApiCommand, ApiEvent, ConnectionState};

use super::components::{chat_area, input_bar, pairing, sidebar, status_banner};
use super::state::AppState;

pub struct BridgeApp {
    state: AppState,
    command_sender: mpsc::Sender<ApiCommand>,
    event_receiver: mpsc::Receiver<ApiEvent>,
}

impl BridgeApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        command_sender: mpsc::Sender<ApiCommand>,
        event_receiver: mpsc::Receiver<ApiEvent>,
    ) -> Self {
        Self {
            state: AppState::new(),
            command_sender,
            event_receiver,
        }
    }

    fn handle_api_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply(event);
        }
    }

    fn send_command(&self, command: ApiCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to API worker: {err}");
        }
    }
}

impl eframe::App for BridgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_api_events();

        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            status_banner::render(ui, &self.state);
        });

        if self.state.status == ConnectionState::Connected && !self.state.syncing {
            egui::SidePanel::left("chat_sidebar")
                .resizable(true)
                .default_width(240.0)
                .show(ctx, |ui| {
                    if let Some(chat_id) = sidebar::render(ui, &self.state) {
                        let command = self.state.select_chat(chat_id);
                        self.send_command(command);
                    }
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.state.status {
            ConnectionState::Disconnected => {
                ui.vertical_centered(|ui| {
                    ui.add_space(48.0);
                    ui.heading("Bridge offline");
                    let message = self
                        .state
                        .status_message
                        .as_deref()
                        .unwrap_or("The bridge is disconnected. Waiting for it to come back…");
                    ui.label(message);
                });
            }
            ConnectionState::WaitingForQr => {
                if pairing::render(ui, &mut self.state) {
                    if let Some(command) = self.state.request_qr_refresh() {
                        self.send_command(command);
                    }
                }
            }
            ConnectionState::Connected => {
                if self.state.syncing {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Syncing conversations…");
                    });
                    return;
                }

                egui::TopBottomPanel::bottom("compose_bar")
                    .show_inside(ui, |ui| {
                        if input_bar::render(ui, &mut self.state) {
                            if let Some(command) = self.state.submit_draft() {
                                self.send_command(command);
                            }
                        }
                    });
                chat_area::render(ui, &self.state);
            }
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(200));
    }
}

impl Drop for BridgeApp {
    fn drop(&mut self) {
        // Teardown: stop the poll loop and drop the QR handle with the view.
        let _ = self.command_sender.try_send(ApiCommand::Shutdown);
        self.state.release_qr();
    }
}
