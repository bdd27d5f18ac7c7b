use std::fmt;

use crate::models::{Category, CreatePostInput};

pub const TITLE_MIN_LEN: usize = 5;
pub const TITLE_MAX_LEN: usize = 150;
pub const CONTENT_MAX_LEN: usize = 2500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required,
    TooShort { min: usize, actual: usize },
    TooLong { max: usize, actual: usize },
    UnknownCategory,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => write!(f, "This field is required"),
            FieldError::TooShort { min, actual } => {
                write!(f, "Must be at least {min} characters ({actual} so far)")
            }
            FieldError::TooLong { max, actual } => {
                write!(f, "Must be at most {max} characters ({actual} entered)")
            }
            FieldError::UnknownCategory => write!(f, "Pick one of the listed categories"),
        }
    }
}

impl Rule {
    /// Length rules leave empty values to `Required`.
    pub fn check(self, value: &str) -> Option<FieldError> {
        let len = value.chars().count();
        match self {
            Rule::Required if value.is_empty() => Some(FieldError::Required),
            Rule::MinLength(min) if len > 0 && len < min => {
                Some(FieldError::TooShort { min, actual: len })
            }
            Rule::MaxLength(max) if len > max => Some(FieldError::TooLong { max, actual: len }),
            _ => None,
        }
    }
}

pub const TITLE_RULES: &[Rule] = &[
    Rule::Required,
    Rule::MinLength(TITLE_MIN_LEN),
    Rule::MaxLength(TITLE_MAX_LEN),
];
pub const CATEGORY_RULES: &[Rule] = &[Rule::Required];
pub const CONTENT_RULES: &[Rule] = &[Rule::Required, Rule::MaxLength(CONTENT_MAX_LEN)];

pub fn validate(value: &str, rules: &[Rule]) -> Vec<FieldError> {
    rules.iter().filter_map(|rule| rule.check(value)).collect()
}

pub fn validate_title(value: &str) -> Vec<FieldError> {
    validate(value, TITLE_RULES)
}

pub fn validate_content(value: &str) -> Vec<FieldError> {
    validate(value, CONTENT_RULES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    Title,
    CategoryId,
    Content,
}

impl FieldName {
    pub const ALL: [FieldName; 3] = [FieldName::Title, FieldName::CategoryId, FieldName::Content];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub errors: Vec<FieldError>,
    pub touched: bool,
}

impl FieldState {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors are only surfaced once the user has interacted with the field.
    pub fn visible_errors(&self) -> &[FieldError] {
        if self.touched {
            &self.errors
        } else {
            &[]
        }
    }
}

/// The new-post form: title, category and content, validated eagerly.
#[derive(Debug, Clone)]
pub struct PostForm {
    title: FieldState,
    category_id: FieldState,
    content: FieldState,
    category_ids: Vec<String>,
}

impl Default for PostForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PostForm {
    pub fn new() -> Self {
        let mut form = Self {
            title: FieldState::default(),
            category_id: FieldState::default(),
            content: FieldState::default(),
            category_ids: Vec::new(),
        };
        form.revalidate_all();
        form
    }

    pub fn field(&self, name: FieldName) -> &FieldState {
        match name {
            FieldName::Title => &self.title,
            FieldName::CategoryId => &self.category_id,
            FieldName::Content => &self.content,
        }
    }

    fn field_mut(&mut self, name: FieldName) -> &mut FieldState {
        match name {
            FieldName::Title => &mut self.title,
            FieldName::CategoryId => &mut self.category_id,
            FieldName::Content => &mut self.content,
        }
    }

    pub fn set(&mut self, name: FieldName, value: impl Into<String>) {
        self.field_mut(name).value = value.into();
        self.revalidate(name);
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.set(FieldName::Title, value);
    }

    pub fn set_category_id(&mut self, value: impl Into<String>) {
        self.set(FieldName::CategoryId, value);
    }

    pub fn set_content(&mut self, value: impl Into<String>) {
        self.set(FieldName::Content, value);
    }

    /// Replaces the set of selectable categories and rechecks the selection.
    pub fn set_category_options(&mut self, categories: &[Category]) {
        self.category_ids = categories.iter().map(|c| c.id.clone()).collect();
        self.revalidate(FieldName::CategoryId);
    }

    pub fn touch(&mut self, name: FieldName) {
        self.field_mut(name).touched = true;
    }

    pub fn mark_all_touched(&mut self) {
        for name in FieldName::ALL {
            self.touch(name);
        }
    }

    pub fn is_valid(&self) -> bool {
        FieldName::ALL.iter().all(|name| self.field(*name).is_valid())
    }

    pub fn to_input(&self) -> CreatePostInput {
        CreatePostInput {
            title: self.title.value.clone(),
            content: self.content.value.clone(),
            category_id: Some(self.category_id.value.clone()).filter(|id| !id.is_empty()),
        }
    }

    fn revalidate(&mut self, name: FieldName) {
        let errors = match name {
            FieldName::Title => validate_title(&self.title.value),
            FieldName::Content => validate_content(&self.content.value),
            FieldName::CategoryId => {
                let value = &self.category_id.value;
                let mut errors = validate(value, CATEGORY_RULES);
                if !value.is_empty() && !self.category_ids.iter().any(|id| id == value) {
                    errors.push(FieldError::UnknownCategory);
                }
                errors
            }
        };
        self.field_mut(name).errors = errors;
    }

    fn revalidate_all(&mut self) {
        for name in FieldName::ALL {
            self.revalidate(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: "cat-1".into(),
                name: "Rust".into(),
            },
            Category {
                id: "cat-2".into(),
                name: "Travel".into(),
            },
        ]
    }

    fn filled_form() -> PostForm {
        let mut form = PostForm::new();
        form.set_category_options(&categories());
        form.set_title("My First Post");
        form.set_category_id("cat-1");
        form.set_content("Hello world");
        form
    }

    #[test]
    fn fresh_form_is_invalid_and_untouched() {
        let form = PostForm::new();
        assert!(!form.is_valid());
        for name in FieldName::ALL {
            let field = form.field(name);
            assert!(!field.touched);
            assert!(field.visible_errors().is_empty());
            assert_eq!(field.errors, vec![FieldError::Required]);
        }
    }

    #[test]
    fn title_length_bounds() {
        assert_eq!(
            validate_title("abcd"),
            vec![FieldError::TooShort { min: 5, actual: 4 }]
        );
        assert!(validate_title("abcde").is_empty());
        assert!(validate_title(&"x".repeat(150)).is_empty());
        assert_eq!(
            validate_title(&"x".repeat(151)),
            vec![FieldError::TooLong {
                max: 150,
                actual: 151
            }]
        );
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        assert!(validate_title("héllo").is_empty());
        assert!(validate_content(&"é".repeat(2500)).is_empty());
    }

    #[test]
    fn content_max_length() {
        assert!(validate_content(&"a".repeat(2500)).is_empty());
        assert_eq!(
            validate_content(&"a".repeat(2501)),
            vec![FieldError::TooLong {
                max: 2500,
                actual: 2501
            }]
        );
    }

    #[test]
    fn category_must_be_a_loaded_option() {
        let mut form = filled_form();
        assert!(form.is_valid());

        form.set_category_id("cat-404");
        assert_eq!(
            form.field(FieldName::CategoryId).errors,
            vec![FieldError::UnknownCategory]
        );

        form.set_category_options(&[Category {
            id: "cat-404".into(),
            name: "Late".into(),
        }]);
        assert!(form.field(FieldName::CategoryId).is_valid());
    }

    #[test]
    fn validity_tracks_every_change() {
        let mut form = filled_form();
        form.set_title("tiny");
        assert!(!form.is_valid());
        form.set_title("not so tiny");
        assert!(form.is_valid());
    }

    #[test]
    fn mark_all_touched_reveals_errors() {
        let mut form = PostForm::new();
        form.mark_all_touched();
        assert_eq!(
            form.field(FieldName::Title).visible_errors(),
            &[FieldError::Required]
        );
    }

    #[test]
    fn to_input_extracts_all_fields() {
        assert_eq!(
            filled_form().to_input(),
            CreatePostInput {
                title: "My First Post".into(),
                content: "Hello world".into(),
                category_id: Some("cat-1".into()),
            }
        );
    }
}
