use eframe::egui;

use crate::common::ConnectionState;
use crate::ui::state::AppState;

/// Top strip: connection indicator plus the soft-failure banner.
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        let (color, label) = match state.status {
            ConnectionState::Connected => (egui::Color32::GREEN, "Connected"),
            ConnectionState::WaitingForQr => (egui::Color32::YELLOW, "Waiting for pairing"),
            ConnectionState::Disconnected => (egui::Color32::RED, "Disconnected"),
        };
        ui.colored_label(color, "●");
        ui.label(label);
        if let Some(message) = &state.status_message {
            ui.label(egui::RichText::new(message).weak());
        }
    });

    if let Some(error) = &state.error {
        ui.colored_label(egui::Color32::LIGHT_RED, error);
    }
}
