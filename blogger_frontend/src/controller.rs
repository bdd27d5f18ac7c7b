//! Post-creation form controller.
//!
//! Owns the form, loads the category options once, and drives a submission
//! through `Idle -> Submitting -> Succeeded -> Navigated` (or back to `Idle`
//! on failure). Transport calls run on the injected [`TaskRunner`]; their
//! outcomes come back over a channel and are applied by [`poll`]. A create
//! that finishes after the controller is dropped is handed to
//! [`DetachedOutcomes`] instead; only the pending redirect is lost.
//!
//! [`poll`]: PostCreateController::poll

use std::sync::mpsc::{self, Receiver, SendError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::api::{CategoryTransport, PostTransport, TransportError};
use crate::form::PostForm;
use crate::models::{Category, Post};
use crate::notify::{NoticeKind, Notifier};
use crate::route::{Navigator, Route};
use crate::runtime::{Clock, TaskRunner};

pub const REDIRECT_DELAY: Duration = Duration::from_millis(1000);

pub const REVIEW_NOTICE: &str = "Please review your post";
pub const SUBMITTED_NOTICE: &str = "Post Submitted Successfully";
pub const CREATE_FAILED_NOTICE: &str = "Error creating post";
pub const CATEGORIES_FAILED_NOTICE: &str = "Error loading categories";

pub enum FormEvent {
    CategoriesLoaded(Result<Vec<Category>, TransportError>),
    PostCreated(Result<Post, TransportError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Navigated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Rejected,
    /// A create request is still outstanding.
    AlreadySubmitting,
    Sent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoriesState {
    Loading,
    Loaded,
    Failed,
}

/// Receives create results whose form has already been closed.
pub trait DetachedOutcomes: Send + Sync {
    fn post_created(&self, result: Result<Post, TransportError>);
}

pub struct FormServices {
    pub posts: Arc<dyn PostTransport>,
    pub categories: Arc<dyn CategoryTransport>,
    pub notifier: Box<dyn Notifier>,
    pub navigator: Box<dyn Navigator>,
    pub clock: Box<dyn Clock>,
    pub runner: Box<dyn TaskRunner>,
    pub detached: Arc<dyn DetachedOutcomes>,
}

pub struct PostCreateController {
    form: PostForm,
    categories: Vec<Category>,
    categories_state: CategoriesState,
    submitting: bool,
    phase: Phase,
    created: Option<Post>,
    redirect_at: Option<Instant>,
    posts: Arc<dyn PostTransport>,
    notifier: Box<dyn Notifier>,
    navigator: Box<dyn Navigator>,
    clock: Box<dyn Clock>,
    runner: Box<dyn TaskRunner>,
    detached: Arc<dyn DetachedOutcomes>,
    tx: Sender<FormEvent>,
    rx: Receiver<FormEvent>,
}

impl PostCreateController {
    pub fn new(services: FormServices) -> Self {
        let (tx, rx) = mpsc::channel();
        let controller = Self {
            form: PostForm::new(),
            categories: Vec::new(),
            categories_state: CategoriesState::Loading,
            submitting: false,
            phase: Phase::Idle,
            created: None,
            redirect_at: None,
            posts: services.posts,
            notifier: services.notifier,
            navigator: services.navigator,
            clock: services.clock,
            runner: services.runner,
            detached: services.detached,
            tx,
            rx,
        };
        controller.spawn_load_categories(services.categories);
        controller
    }

    fn spawn_load_categories(&self, categories: Arc<dyn CategoryTransport>) {
        let tx = self.tx.clone();
        self.runner.spawn(Box::new(move || {
            let result = categories.list_categories();
            if tx.send(FormEvent::CategoriesLoaded(result)).is_err() {
                debug!("post form closed before categories arrived");
            }
        }));
    }

    pub fn form(&self) -> &PostForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PostForm {
        &mut self.form
    }

    /// Selector options, in the order the server returned them.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn categories_state(&self) -> CategoriesState {
        self.categories_state
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn created_post(&self) -> Option<&Post> {
        self.created.as_ref()
    }

    /// Time left before the pending redirect fires, if one is scheduled.
    pub fn redirect_in(&self) -> Option<Duration> {
        self.redirect_at
            .map(|deadline| deadline.saturating_duration_since(self.clock.now()))
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        if self.submitting {
            debug!("ignoring submit while a post is in flight");
            return SubmitOutcome::AlreadySubmitting;
        }
        if !self.form.is_valid() {
            self.form.mark_all_touched();
            self.notifier.show(NoticeKind::Error, REVIEW_NOTICE);
            return SubmitOutcome::Rejected;
        }

        self.submitting = true;
        self.phase = Phase::Submitting;
        let input = self.form.to_input();
        info!("creating post {:?}", input.title);

        let posts = Arc::clone(&self.posts);
        let tx = self.tx.clone();
        let detached = Arc::clone(&self.detached);
        self.runner.spawn(Box::new(move || {
            let result = posts.create(&input);
            if let Err(SendError(event)) = tx.send(FormEvent::PostCreated(result)) {
                debug!("post form closed before create finished");
                if let FormEvent::PostCreated(result) = event {
                    detached.post_created(result);
                }
            }
        }));
        SubmitOutcome::Sent
    }

    /// Applies finished background work and fires the redirect once due.
    /// Called once per frame.
    pub fn poll(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.handle_event(event);
        }

        let due = self
            .redirect_at
            .is_some_and(|deadline| self.clock.now() >= deadline);
        if due {
            self.redirect_at = None;
            self.submitting = false;
            self.phase = Phase::Navigated;
            self.navigator.navigate(Route::Home);
        }
    }

    fn handle_event(&mut self, event: FormEvent) {
        match event {
            FormEvent::CategoriesLoaded(Ok(categories)) => {
                debug!("loaded {} categories", categories.len());
                self.form.set_category_options(&categories);
                self.categories = categories;
                self.categories_state = CategoriesState::Loaded;
            }
            FormEvent::CategoriesLoaded(Err(err)) => {
                error!("Error loading categories: {err}");
                self.categories_state = CategoriesState::Failed;
                self.notifier.show(NoticeKind::Error, CATEGORIES_FAILED_NOTICE);
            }
            FormEvent::PostCreated(Ok(post)) => {
                info!("created post {}", post.id);
                self.created = Some(post);
                self.phase = Phase::Succeeded;
                self.notifier.show(NoticeKind::Success, SUBMITTED_NOTICE);
                // The submit control stays disabled until the redirect fires.
                self.redirect_at = Some(self.clock.now() + REDIRECT_DELAY);
            }
            FormEvent::PostCreated(Err(err)) => {
                error!("Error creating post: {err}");
                self.submitting = false;
                self.phase = Phase::Idle;
                self.notifier.show(NoticeKind::Error, CREATE_FAILED_NOTICE);
            }
        }
    }
}

impl Drop for PostCreateController {
    fn drop(&mut self) {
        // Results already queued but not yet polled still need reporting.
        while let Ok(event) = self.rx.try_recv() {
            if let FormEvent::PostCreated(result) = event {
                self.detached.post_created(result);
            }
        }
    }
}
