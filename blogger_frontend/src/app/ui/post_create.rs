use eframe::egui::{self, Color32, RichText};

use crate::controller::{CategoriesState, Phase, PostCreateController};
use crate::form::{FieldName, FieldState, CONTENT_MAX_LEN, TITLE_MAX_LEN};

/// Renders the new-post form. Returns true when the user backed out.
pub fn render(ui: &mut egui::Ui, controller: &mut PostCreateController) -> bool {
    let mut cancelled = false;

    ui.heading("New Post");
    ui.add_space(8.0);

    ui.label("Title");
    let mut title = controller.form().field(FieldName::Title).value.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut title)
            .hint_text("At least 5 characters")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        controller.form_mut().set_title(title);
    }
    if response.lost_focus() {
        controller.form_mut().touch(FieldName::Title);
    }
    field_footer(ui, controller.form().field(FieldName::Title), TITLE_MAX_LEN);

    ui.add_space(6.0);
    render_category_select(ui, controller);

    ui.add_space(6.0);
    ui.label("Content");
    let mut content = controller.form().field(FieldName::Content).value.clone();
    let response = ui.add(
        egui::TextEdit::multiline(&mut content)
            .desired_rows(14)
            .desired_width(f32::INFINITY)
            .hint_text("Write your post…"),
    );
    if response.changed() {
        controller.form_mut().set_content(content);
    }
    if response.lost_focus() {
        controller.form_mut().touch(FieldName::Content);
    }
    field_footer(ui, controller.form().field(FieldName::Content), CONTENT_MAX_LEN);

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        let publish = ui.add_enabled(!controller.is_submitting(), egui::Button::new("Publish"));
        if publish.clicked() {
            controller.submit();
        }
        match controller.phase() {
            Phase::Submitting => {
                ui.add(egui::Spinner::new());
            }
            Phase::Succeeded => {
                ui.label("Redirecting…");
            }
            Phase::Idle | Phase::Navigated => {}
        }
        if ui.button("Cancel").clicked() {
            cancelled = true;
        }
    });

    cancelled
}

fn render_category_select(ui: &mut egui::Ui, controller: &mut PostCreateController) {
    let selected_id = controller.form().field(FieldName::CategoryId).value.clone();
    let selected_text = controller
        .categories()
        .iter()
        .find(|c| c.id == selected_id)
        .map_or("Select a category", |c| c.name.as_str())
        .to_string();

    let mut chosen = None;
    ui.horizontal(|ui| {
        egui::ComboBox::from_label("Category")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for category in controller.categories() {
                    let active = category.id == selected_id;
                    if ui.selectable_label(active, &category.name).clicked() {
                        chosen = Some(category.id.clone());
                    }
                }
            });
        match controller.categories_state() {
            CategoriesState::Loading => {
                ui.add(egui::Spinner::new());
            }
            CategoriesState::Failed => {
                ui.label(RichText::new("Categories unavailable").color(Color32::LIGHT_RED));
            }
            CategoriesState::Loaded => {}
        }
    });

    if let Some(id) = chosen {
        let form = controller.form_mut();
        form.set_category_id(id);
        form.touch(FieldName::CategoryId);
    }
    field_footer(ui, controller.form().field(FieldName::CategoryId), 0);
}

/// Visible errors plus a character counter when `max` is non-zero.
fn field_footer(ui: &mut egui::Ui, field: &FieldState, max: usize) {
    ui.horizontal(|ui| {
        for err in field.visible_errors() {
            ui.colored_label(Color32::LIGHT_RED, err.to_string());
        }
        if max > 0 {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let count = field.value.chars().count();
                let text = RichText::new(format!("{count}/{max}")).small();
                if count > max {
                    ui.label(text.color(Color32::LIGHT_RED));
                } else {
                    ui.label(text.weak());
                }
            });
        }
    });
}
