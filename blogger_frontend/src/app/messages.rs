use log::{debug, error, warn};

use crate::api::TransportError;
use crate::controller::{CREATE_FAILED_NOTICE, SUBMITTED_NOTICE};
use crate::models::{Category, Post};
use crate::notify::{NoticeKind, Notifier};
use crate::route::Route;

use super::state::{PostQuery, ViewState};
use super::BloggerApp;

pub enum AppMessage {
    PostsLoaded {
        query: PostQuery,
        result: Result<Vec<Post>, TransportError>,
    },
    CategoriesLoaded(Result<Vec<Category>, TransportError>),
    PostLoaded {
        post_id: String,
        result: Result<Post, TransportError>,
    },
    PostUpdated {
        post_id: String,
        result: Result<Post, TransportError>,
    },
    PostDeleted {
        post_id: String,
        result: Result<(), TransportError>,
    },
    /// A create that finished after its form was closed.
    PostCreated(Result<Post, TransportError>),
    Navigate(Route),
}

pub(super) fn process_messages(app: &mut BloggerApp) {
    while let Ok(message) = app.rx.try_recv() {
        match message {
            AppMessage::PostsLoaded { query, result } => {
                if query != app.list.query {
                    debug!("dropping stale post list for {query:?}");
                    continue;
                }
                app.list.loading = false;
                match result {
                    Ok(posts) => {
                        app.list.posts = posts;
                        app.list.error = None;
                    }
                    Err(err) => {
                        error!("Error loading posts: {err}");
                        app.list.error = Some(err.to_string());
                    }
                }
            }
            AppMessage::CategoriesLoaded(result) => match result {
                Ok(categories) => app.categories = categories,
                Err(err) => warn!("category labels unavailable: {err}"),
            },
            AppMessage::PostLoaded { post_id, result } => {
                if let ViewState::Post(state) = &mut app.view {
                    if state.post_id == post_id {
                        state.loading = false;
                        match result {
                            Ok(post) => {
                                state.post = Some(post);
                                state.error = None;
                            }
                            Err(err) => {
                                error!("Error loading post {post_id}: {err}");
                                state.error = Some(err.to_string());
                            }
                        }
                    }
                }
            }
            AppMessage::PostUpdated { post_id, result } => {
                let outcome = result.map_err(|err| {
                    error!("Error updating post {post_id}: {err}");
                });
                if let ViewState::Post(state) = &mut app.view {
                    if state.post_id == post_id {
                        match &outcome {
                            Ok(post) => {
                                state.post = Some(post.clone());
                                state.edit = None;
                            }
                            Err(()) => {
                                if let Some(edit) = state.edit.as_mut() {
                                    edit.saving = false;
                                }
                            }
                        }
                    }
                }
                match outcome {
                    Ok(post) => {
                        if let Some(entry) = app.list.posts.iter_mut().find(|p| p.id == post.id) {
                            *entry = post;
                        }
                        app.toasts.show(NoticeKind::Success, "Post updated");
                    }
                    Err(()) => app.toasts.show(NoticeKind::Error, "Error updating post"),
                }
            }
            AppMessage::PostDeleted { post_id, result } => match result {
                Ok(()) => {
                    app.list.posts.retain(|post| post.id != post_id);
                    app.toasts.show(NoticeKind::Success, "Post deleted");
                    let viewing = matches!(&app.view, ViewState::Post(state) if state.post_id == post_id);
                    if viewing {
                        app.navigate(Route::Home);
                    }
                }
                Err(err) => {
                    error!("Error deleting post {post_id}: {err}");
                    if let ViewState::Post(state) = &mut app.view {
                        if state.post_id == post_id {
                            state.deleting = false;
                        }
                    }
                    app.toasts.show(NoticeKind::Error, "Error deleting post");
                }
            },
            AppMessage::PostCreated(result) => match result {
                Ok(post) => {
                    debug!("post {} created after its form closed", post.id);
                    app.toasts.show(NoticeKind::Success, SUBMITTED_NOTICE);
                    if matches!(app.view, ViewState::Home) {
                        app.spawn_load_posts();
                    }
                }
                Err(err) => {
                    error!("Error creating post: {err}");
                    app.toasts.show(NoticeKind::Error, CREATE_FAILED_NOTICE);
                }
            },
            AppMessage::Navigate(route) => app.navigate(route),
        }
    }
}
