use std::sync::mpsc::Sender;
use std::thread;

use log::error;

use crate::api::{ApiClient, CategoryTransport, PostTransport};
use crate::models::UpdatePostInput;

use super::messages::AppMessage;
use super::state::PostQuery;

pub fn load_posts(client: ApiClient, tx: Sender<AppMessage>, query: PostQuery) {
    thread::spawn(move || {
        let result = match &query {
            PostQuery::All => client.list(None),
            PostQuery::Search(term) => client.list(Some(term.as_str())),
            PostQuery::Category(category_id) => client.list_by_category(category_id),
        };
        if tx.send(AppMessage::PostsLoaded { query, result }).is_err() {
            error!("failed to send PostsLoaded message");
        }
    });
}

pub fn load_categories(client: ApiClient, tx: Sender<AppMessage>) {
    thread::spawn(move || {
        let result = client.list_categories();
        if tx.send(AppMessage::CategoriesLoaded(result)).is_err() {
            error!("failed to send CategoriesLoaded message");
        }
    });
}

pub fn load_post(client: ApiClient, tx: Sender<AppMessage>, post_id: String) {
    thread::spawn(move || {
        let result = client.get(&post_id);
        if tx.send(AppMessage::PostLoaded { post_id, result }).is_err() {
            error!("failed to send PostLoaded message");
        }
    });
}

pub fn update_post(
    client: ApiClient,
    tx: Sender<AppMessage>,
    post_id: String,
    payload: UpdatePostInput,
) {
    thread::spawn(move || {
        let result = client.update(&post_id, &payload);
        if tx.send(AppMessage::PostUpdated { post_id, result }).is_err() {
            error!("failed to send PostUpdated message");
        }
    });
}

pub fn delete_post(client: ApiClient, tx: Sender<AppMessage>, post_id: String) {
    thread::spawn(move || {
        let result = client.delete(&post_id);
        if tx.send(AppMessage::PostDeleted { post_id, result }).is_err() {
            error!("failed to send PostDeleted message");
        }
    });
}
