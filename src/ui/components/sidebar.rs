use eframe::egui;

use crate::ui::state::AppState;

/// Chat list. Returns the id of a clicked chat; clicking the selected chat
/// again reloads its messages.
pub fn render(ui: &mut egui::Ui, state: &AppState) -> Option<String> {
    ui.heading("Chats");
    ui.separator();

    if state.chats.is_empty() {
        ui.label("No conversations yet");
        return None;
    }

    let mut clicked = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for chat in &state.chats {
            let selected = state.selected_chat.as_deref() == Some(chat.id.as_str());
            let response = ui.selectable_label(selected, &chat.name);
            if response.clicked() {
                clicked = Some(chat.id.clone());
            }

            ui.horizontal(|ui| {
                if let Some(preview) = &chat.last_message {
                    ui.label(egui::RichText::new(truncate(preview, 32)).weak().small());
                }
                if chat.timestamp > 0 {
                    ui.label(
                        egui::RichText::new(super::chat_area::format_time(chat.timestamp))
                            .weak()
                            .small(),
                    );
                }
            });
            ui.separator();
        }
    });
    clicked
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("héllo wörld", 5), "héllo…");
    }
}
