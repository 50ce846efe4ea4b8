use eframe::egui;

use crate::ui::state::AppState;

const QR_SIDE: f32 = 256.0;

/// Pairing view shown while the backend reports `waiting_for_qr`. Returns
/// true when the user asked for a fresh QR code.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut refresh = false;

    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.heading("Link your device");
        ui.label("Scan the QR code with the phone that owns this account.");
        ui.add_space(16.0);

        if let Some(err) = state.qr_error.clone() {
            ui.colored_label(egui::Color32::LIGHT_RED, err);
            ui.label("Press Refresh to request a new code.");
        } else if let Some(qr) = state.qr.as_mut() {
            if let Some(texture) = qr.texture(ui.ctx()) {
                ui.add(
                    egui::Image::new(texture).fit_to_exact_size(egui::vec2(QR_SIDE, QR_SIDE)),
                );
            } else {
                ui.colored_label(egui::Color32::LIGHT_RED, "QR image could not be decoded");
            }
        } else {
            ui.spinner();
            ui.label("Requesting QR code…");
        }

        ui.add_space(16.0);
        if ui
            .add_enabled(!state.qr_pending, egui::Button::new("Refresh QR"))
            .clicked()
        {
            refresh = true;
        }
    });

    refresh
}
