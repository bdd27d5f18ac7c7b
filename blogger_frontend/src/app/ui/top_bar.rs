use eframe::egui::{self, RichText};

use crate::notify::{NoticeKind, Notifier};
use crate::route::Route;

use super::super::state::ViewState;
use super::super::BloggerApp;

impl BloggerApp {
    pub(crate) fn render_top_bar(&mut self, ui: &mut egui::Ui) {
        let mut route = None;
        let mut refresh = false;
        let mut apply_url = false;

        ui.horizontal(|ui| {
            ui.label(RichText::new("Blogger Box").strong().size(18.0));
            ui.separator();
            if ui.button("Home").clicked() {
                route = Some(Route::Home);
            }
            if ui.button("New Post").clicked() {
                route = Some(Route::NewPost);
            }
            if ui.button("Refresh").clicked() {
                refresh = true;
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Apply").clicked() {
                    apply_url = true;
                }
                let field = ui.add(
                    egui::TextEdit::singleline(&mut self.base_url_input).desired_width(260.0),
                );
                if field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    apply_url = true;
                }
                ui.label("API URL");
            });
        });

        if apply_url {
            match self.api.set_base_url(&self.base_url_input) {
                Ok(()) => {
                    self.base_url_input = self.api.base_url().to_string();
                    self.toasts.show(NoticeKind::Info, "API URL updated");
                    refresh = true;
                }
                Err(err) => {
                    self.toasts
                        .show(NoticeKind::Error, &format!("Failed to update URL: {err:#}"));
                }
            }
        }
        if let Some(route) = route {
            self.navigate(route);
        } else if refresh {
            self.refresh_view();
        }
    }

    fn refresh_view(&mut self) {
        self.spawn_load_categories();
        if matches!(self.view, ViewState::Home) {
            self.spawn_load_posts();
            return;
        }
        let post_id = match &mut self.view {
            ViewState::Post(state) => {
                state.loading = true;
                state.error = None;
                state.post_id.clone()
            }
            _ => return,
        };
        self.spawn_load_post(&post_id);
    }
}
