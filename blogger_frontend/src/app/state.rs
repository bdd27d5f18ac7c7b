use crate::controller::PostCreateController;
use crate::form::{validate_content, validate_title, FieldError};
use crate::models::{Post, UpdatePostInput};

/// Which posts the list is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PostQuery {
    #[default]
    All,
    Search(String),
    Category(String),
}

pub enum ViewState {
    Home,
    CreatePost(Box<PostCreateController>),
    Post(PostDetailState),
}

#[derive(Default)]
pub struct PostListState {
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: Option<String>,
    pub query: PostQuery,
    pub search_input: String,
}

pub struct PostDetailState {
    pub post_id: String,
    pub post: Option<Post>,
    pub loading: bool,
    pub error: Option<String>,
    pub edit: Option<EditState>,
    pub deleting: bool,
    pub confirm_delete: bool,
}

impl PostDetailState {
    pub fn new(post_id: String) -> Self {
        Self {
            post_id,
            post: None,
            loading: true,
            error: None,
            edit: None,
            deleting: false,
            confirm_delete: false,
        }
    }
}

#[derive(Default)]
pub struct EditState {
    pub title: String,
    pub content: String,
    pub saving: bool,
}

impl EditState {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            saving: false,
        }
    }

    pub fn title_errors(&self) -> Vec<FieldError> {
        validate_title(&self.title)
    }

    pub fn content_errors(&self) -> Vec<FieldError> {
        validate_content(&self.content)
    }

    pub fn is_valid(&self) -> bool {
        self.title_errors().is_empty() && self.content_errors().is_empty()
    }

    pub fn to_input(&self) -> UpdatePostInput {
        UpdatePostInput {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}
