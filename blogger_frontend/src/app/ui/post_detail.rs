use eframe::egui::{self, Color32, RichText};

use crate::form::FieldError;
use crate::models::{Category, UpdatePostInput};
use crate::route::Route;

use super::super::state::{EditState, PostDetailState, ViewState};
use super::super::{format_timestamp, tasks, BloggerApp};

enum DetailAction {
    None,
    Back,
    Retry(String),
    Save(String, UpdatePostInput),
    Delete(String),
}

impl BloggerApp {
    pub(crate) fn render_post_detail(&mut self, ui: &mut egui::Ui) {
        if !matches!(self.view, ViewState::Post(_)) {
            return;
        }
        let ViewState::Post(mut state) = std::mem::replace(&mut self.view, ViewState::Home) else {
            unreachable!()
        };
        let action = render_detail(ui, &mut state, &self.categories);
        self.view = ViewState::Post(state);

        match action {
            DetailAction::None => {}
            DetailAction::Back => self.navigate(Route::Home),
            DetailAction::Retry(post_id) => self.spawn_load_post(&post_id),
            DetailAction::Save(post_id, payload) => {
                tasks::update_post(self.api.clone(), self.tx.clone(), post_id, payload);
            }
            DetailAction::Delete(post_id) => {
                tasks::delete_post(self.api.clone(), self.tx.clone(), post_id);
            }
        }
    }
}

fn render_detail(
    ui: &mut egui::Ui,
    state: &mut PostDetailState,
    categories: &[Category],
) -> DetailAction {
    let mut action = DetailAction::None;

    if ui.button("← Back to posts").clicked() {
        action = DetailAction::Back;
    }
    ui.separator();

    if state.loading && state.post.is_none() {
        ui.add(egui::Spinner::new());
        return action;
    }
    if let Some(err) = &state.error {
        ui.colored_label(Color32::LIGHT_RED, err);
        if ui.button("Retry").clicked() {
            state.loading = true;
            state.error = None;
            action = DetailAction::Retry(state.post_id.clone());
        }
        return action;
    }
    let Some(post) = state.post.as_ref() else {
        return action;
    };

    if let Some(edit) = state.edit.as_mut() {
        let mut cancel = false;
        let mut save = false;
        ui.label("Title");
        ui.text_edit_singleline(&mut edit.title);
        field_errors(ui, &edit.title_errors());
        ui.add_space(6.0);
        ui.label("Content");
        ui.add(
            egui::TextEdit::multiline(&mut edit.content)
                .desired_rows(12)
                .desired_width(f32::INFINITY),
        );
        field_errors(ui, &edit.content_errors());
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if edit.saving {
                ui.add(egui::Spinner::new());
            } else if ui
                .add_enabled(edit.is_valid(), egui::Button::new("Save"))
                .clicked()
            {
                save = true;
            }
            if ui.button("Cancel").clicked() {
                cancel = true;
            }
        });
        if save {
            edit.saving = true;
            action = DetailAction::Save(state.post_id.clone(), edit.to_input());
        }
        if cancel {
            state.edit = None;
        }
        return action;
    }

    ui.heading(&post.title);
    ui.horizontal(|ui| {
        if let Some(category_id) = &post.category_id {
            let label = categories
                .iter()
                .find(|c| &c.id == category_id)
                .map_or(category_id.as_str(), |c| c.name.as_str());
            ui.label(RichText::new(label).italics());
        }
        if let Some(created) = &post.created_date {
            ui.label(format_timestamp(created));
        }
    });
    ui.add_space(8.0);
    egui::ScrollArea::vertical()
        .max_height((ui.available_height() - 48.0).max(80.0))
        .show(ui, |ui| {
            ui.label(&post.content);
        });
    ui.add_space(8.0);

    let mut start_edit = false;
    ui.horizontal(|ui| {
        if ui.button("Edit").clicked() {
            start_edit = true;
        }
        if state.deleting {
            ui.add(egui::Spinner::new());
        } else if state.confirm_delete {
            ui.label("Delete this post?");
            if ui.button("Yes, delete").clicked() {
                state.deleting = true;
                state.confirm_delete = false;
                action = DetailAction::Delete(state.post_id.clone());
            }
            if ui.button("No").clicked() {
                state.confirm_delete = false;
            }
        } else if ui.button("Delete").clicked() {
            state.confirm_delete = true;
        }
    });
    if start_edit {
        state.edit = Some(EditState::from_post(post));
    }

    action
}

fn field_errors(ui: &mut egui::Ui, errors: &[FieldError]) {
    for err in errors {
        ui.colored_label(Color32::LIGHT_RED, err.to_string());
    }
}
