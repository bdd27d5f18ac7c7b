use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use eframe::egui::{self, Context};
use log::error;

use crate::api::{ApiClient, TransportError};
use crate::controller::{CategoriesState, DetachedOutcomes, FormServices, PostCreateController};
use crate::models::{Category, Post};
use crate::notify::Toasts;
use crate::route::{Navigator, Route};
use crate::runtime::{SystemClock, ThreadRunner};

mod messages;
mod state;
mod tasks;
mod ui;

use messages::AppMessage;
use state::{PostDetailState, PostListState, PostQuery, ViewState};

const PREVIEW_CHARS: usize = 200;

/// Routes requested by a controller are applied on the next message drain,
/// after the controller has finished its own frame. Create results from a
/// closed form come back the same way.
#[derive(Clone)]
struct AppChannel {
    tx: Sender<AppMessage>,
}

impl Navigator for AppChannel {
    fn navigate(&self, route: Route) {
        if self.tx.send(AppMessage::Navigate(route)).is_err() {
            error!("failed to send Navigate message");
        }
    }
}

impl DetachedOutcomes for AppChannel {
    fn post_created(&self, result: Result<Post, TransportError>) {
        if self.tx.send(AppMessage::PostCreated(result)).is_err() {
            error!("failed to send PostCreated message");
        }
    }
}

pub struct BloggerApp {
    api: ApiClient,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    toasts: Toasts,
    view: ViewState,
    list: PostListState,
    categories: Vec<Category>,
    base_url_input: String,
}

impl BloggerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, api: ApiClient) -> Self {
        let mut app = Self::with_client(api);
        app.spawn_load_posts();
        app.spawn_load_categories();
        app
    }

    /// Bare app state on the home view; nothing is loaded yet.
    fn with_client(api: ApiClient) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            base_url_input: api.base_url().to_string(),
            api,
            tx,
            rx,
            toasts: Toasts::new(),
            view: ViewState::Home,
            list: PostListState::default(),
            categories: Vec::new(),
        }
    }

    fn spawn_load_posts(&mut self) {
        self.list.loading = true;
        self.list.error = None;
        tasks::load_posts(self.api.clone(), self.tx.clone(), self.list.query.clone());
    }

    fn spawn_load_categories(&mut self) {
        tasks::load_categories(self.api.clone(), self.tx.clone());
    }

    fn set_query(&mut self, query: PostQuery) {
        self.list.query = query;
        self.spawn_load_posts();
    }

    fn spawn_load_post(&mut self, post_id: &str) {
        tasks::load_post(self.api.clone(), self.tx.clone(), post_id.to_string());
    }

    fn new_post_controller(&self) -> PostCreateController {
        let api = Arc::new(self.api.clone());
        let channel = AppChannel {
            tx: self.tx.clone(),
        };
        PostCreateController::new(FormServices {
            posts: api.clone(),
            categories: api,
            notifier: Box::new(self.toasts.clone()),
            navigator: Box::new(channel.clone()),
            clock: Box::new(SystemClock),
            runner: Box::new(ThreadRunner),
            detached: Arc::new(channel),
        })
    }

    /// Replacing the view drops whatever controller it held, including any
    /// redirect it still had pending.
    fn navigate(&mut self, route: Route) {
        match route {
            Route::Home => {
                self.view = ViewState::Home;
                self.spawn_load_posts();
            }
            Route::NewPost => {
                self.view = ViewState::CreatePost(Box::new(self.new_post_controller()));
            }
            Route::Post(post_id) => {
                self.spawn_load_post(&post_id);
                self.view = ViewState::Post(PostDetailState::new(post_id));
            }
        }
    }

    fn process_messages(&mut self) {
        messages::process_messages(self);
    }

    fn has_pending_work(&self) -> bool {
        if self.list.loading {
            return true;
        }
        match &self.view {
            ViewState::Home => false,
            ViewState::CreatePost(controller) => {
                controller.categories_state() == CategoriesState::Loading
            }
            ViewState::Post(state) => {
                state.loading
                    || state.deleting
                    || state.edit.as_ref().is_some_and(|edit| edit.saving)
            }
        }
    }

    fn category_name(&self, category_id: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.as_str())
    }
}

impl eframe::App for BloggerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if let ViewState::CreatePost(controller) = &mut self.view {
            controller.poll();
            if let Some(wait) = controller.redirect_in() {
                ctx.request_repaint_after(wait);
            } else if controller.is_submitting() {
                ctx.request_repaint_after(Duration::from_millis(100));
            }
        }
        self.process_messages();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            self.render_top_bar(ui);
        });

        let mut cancelled = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            if let ViewState::CreatePost(controller) = &mut self.view {
                cancelled = ui::post_create::render(ui, controller);
            } else if matches!(self.view, ViewState::Post(_)) {
                self.render_post_detail(ui);
            } else {
                self.render_post_list(ui);
            }
        });
        if cancelled {
            self.navigate(Route::Home);
        }

        self.toasts.render(ctx);

        // Background results only arrive between frames, so keep polling
        // while anything is outstanding.
        if self.has_pending_work() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

pub(crate) fn format_timestamp(ts: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string();
    }
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| ts.to_string())
}

pub(crate) fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}
