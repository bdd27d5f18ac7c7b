use eframe::egui::{self, Color32, RichText};

use crate::models::Post;
use crate::route::Route;

use super::super::state::PostQuery;
use super::super::{format_timestamp, preview, BloggerApp};

impl BloggerApp {
    pub(crate) fn render_post_list(&mut self, ui: &mut egui::Ui) {
        let mut next_query = None;
        let selected = match &self.list.query {
            PostQuery::Category(id) => self.category_name(id).unwrap_or(id).to_string(),
            _ => "All categories".to_string(),
        };

        ui.horizontal(|ui| {
            let search = ui.add(
                egui::TextEdit::singleline(&mut self.list.search_input)
                    .hint_text("Search posts…")
                    .desired_width(240.0),
            );
            let submitted = search.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Search").clicked() || submitted {
                let term = self.list.search_input.clone();
                next_query = Some(if term.is_empty() {
                    PostQuery::All
                } else {
                    PostQuery::Search(term)
                });
            }
            if ui.button("Clear").clicked() {
                self.list.search_input.clear();
                next_query = Some(PostQuery::All);
            }

            ui.separator();

            egui::ComboBox::from_label("Category")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    let unfiltered = !matches!(self.list.query, PostQuery::Category(_));
                    if ui.selectable_label(unfiltered, "All categories").clicked() {
                        next_query = Some(PostQuery::All);
                    }
                    for category in &self.categories {
                        let active = self.list.query == PostQuery::Category(category.id.clone());
                        if ui.selectable_label(active, &category.name).clicked() {
                            next_query = Some(PostQuery::Category(category.id.clone()));
                        }
                    }
                });
        });
        ui.separator();

        if let Some(query) = next_query {
            if query != self.list.query {
                self.set_query(query);
            }
        }

        if self.list.loading && self.list.posts.is_empty() {
            ui.add(egui::Spinner::new());
        }
        if let Some(err) = &self.list.error {
            ui.colored_label(Color32::LIGHT_RED, err);
            if ui.button("Retry").clicked() {
                self.spawn_load_posts();
            }
            ui.separator();
        }

        let mut post_to_open = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            if self.list.posts.is_empty() && !self.list.loading && self.list.error.is_none() {
                ui.label("No posts yet. Write the first one with \"New Post\".");
            }
            for post in &self.list.posts {
                let category = post
                    .category_id
                    .as_deref()
                    .map(|id| self.category_name(id).unwrap_or(id));
                if render_post_item(ui, post, category) {
                    post_to_open = Some(post.id.clone());
                }
                ui.add_space(6.0);
            }
        });

        if let Some(post_id) = post_to_open {
            self.navigate(Route::Post(post_id));
        }
    }
}

/// One card in the list; returns true when the title was clicked.
fn render_post_item(ui: &mut egui::Ui, post: &Post, category: Option<&str>) -> bool {
    let mut clicked = false;
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::vec2(12.0, 8.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                let title = if post.title.is_empty() {
                    "(untitled post)"
                } else {
                    post.title.as_str()
                };
                if ui.button(RichText::new(title).strong()).clicked() {
                    clicked = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(created) = &post.created_date {
                        ui.label(format_timestamp(created));
                    }
                    if let Some(category) = category {
                        ui.label(RichText::new(category).italics());
                    }
                });
            });
            ui.label(preview(&post.content));
        });
    clicked
}
