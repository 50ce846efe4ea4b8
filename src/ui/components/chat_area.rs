use eframe::egui;

use crate::common::Sender;
use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    if state.selected_chat.is_none() {
        ui.label("Select a conversation to see its messages.");
        return;
    }

    if state.loading_messages {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading messages…");
        });
        return;
    }

    if state.messages.is_empty() {
        ui.label("No messages in this conversation yet.");
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, true])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in &state.messages {
                let time = format_time(message.timestamp);
                match message.sender {
                    // Own messages hug the right edge, like any chat app.
                    Sender::User => {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                            ui.label(egui::RichText::new(&message.content).strong());
                            ui.label(egui::RichText::new(time).weak().small());
                        });
                    }
                    Sender::Bot => {
                        ui.horizontal(|ui| {
                            ui.label(&message.content);
                            ui.label(egui::RichText::new(time).weak().small());
                        });
                    }
                }
            }
        });
}

pub fn format_time(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}
