use eframe::egui;

use crate::ui::state::AppState;

/// Compose row. Returns true when the user asked to send; the draft is left
/// untouched here — it only clears once the backend confirms the send.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut submit = false;
    ui.horizontal(|ui| {
        let can_send =
            !state.sending && state.selected_chat.is_some() && !state.draft.trim().is_empty();

        let response = ui.add_sized(
            [ui.available_width() - 64.0, 22.0],
            egui::TextEdit::singleline(&mut state.draft).hint_text("Type a message…"),
        );

        if ui.add_enabled(can_send, egui::Button::new("Send")).clicked() {
            submit = true;
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submit = true;
        }
    });

    if state.sending {
        ui.label(egui::RichText::new("Sending…").weak().small());
    }
    submit
}
