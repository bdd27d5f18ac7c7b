use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::{normalize_api_url, FrontendConfig};
use crate::models::{Category, CreatePostInput, Post, UpdatePostInput};

const POSTS_RESOURCE: &str = "v1/posts";
const CATEGORIES_RESOURCE: &str = "v1/categories";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Operations against the posts resource. One call, one HTTP request.
pub trait PostTransport: Send + Sync {
    fn list(&self, search: Option<&str>) -> Result<Vec<Post>, TransportError>;
    fn get(&self, id: &str) -> Result<Post, TransportError>;
    fn list_by_category(&self, category_id: &str) -> Result<Vec<Post>, TransportError>;
    fn create(&self, input: &CreatePostInput) -> Result<Post, TransportError>;
    fn update(&self, id: &str, input: &UpdatePostInput) -> Result<Post, TransportError>;
    fn delete(&self, id: &str) -> Result<(), TransportError>;
}

pub trait CategoryTransport: Send + Sync {
    fn list_categories(&self) -> Result<Vec<Category>, TransportError>;
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(config: &FrontendConfig) -> Result<Self> {
        let base_url = Url::parse(&normalize_api_url(&config.api_url)?)
            .context("invalid API URL")?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.base_url = Url::parse(&normalize_api_url(base_url)?).context("invalid API URL")?;
        Ok(())
    }

    fn resource_url(&self, resource: &str, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self
            .base_url
            .join(resource)
            .map_err(|err| TransportError::InvalidUrl(err.to_string()))?;
        if !segments.is_empty() {
            let display = url.to_string();
            url.path_segments_mut()
                .map_err(|()| TransportError::InvalidUrl(display))?
                .extend(segments);
        }
        Ok(url)
    }

    fn posts_url(&self, segments: &[&str]) -> Result<Url, TransportError> {
        self.resource_url(POSTS_RESOURCE, segments)
    }

    /// `{apiUrl}v1/posts/{segments..}/{id}`. An empty id would address the
    /// collection itself, so it is refused before any request is built.
    fn post_item_url(&self, prefix: &[&str], id: &str) -> Result<Url, TransportError> {
        if id.is_empty() {
            return Err(TransportError::InvalidUrl(format!(
                "empty id for {}",
                self.posts_url(prefix)?
            )));
        }
        let mut segments = prefix.to_vec();
        segments.push(id);
        self.posts_url(&segments)
    }

    fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TransportError> {
        let response = ensure_success(request.send()?)?;
        let bytes = response.bytes()?;
        serde_json::from_slice(&bytes).map_err(|err| TransportError::Decode(err.to_string()))
    }
}

fn ensure_success(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body
    };
    Err(TransportError::Status {
        status: status.as_u16(),
        message,
    })
}

impl PostTransport for ApiClient {
    fn list(&self, search: Option<&str>) -> Result<Vec<Post>, TransportError> {
        let mut url = self.posts_url(&[])?;
        // The term goes out as typed, surrounding whitespace included.
        if let Some(term) = search.filter(|term| !term.is_empty()) {
            url.query_pairs_mut().append_pair("value", term);
        }
        self.fetch(self.client.get(url))
    }

    fn get(&self, id: &str) -> Result<Post, TransportError> {
        let url = self.post_item_url(&[], id)?;
        self.fetch(self.client.get(url))
    }

    fn list_by_category(&self, category_id: &str) -> Result<Vec<Post>, TransportError> {
        let url = self.post_item_url(&["category"], category_id)?;
        self.fetch(self.client.get(url))
    }

    fn create(&self, input: &CreatePostInput) -> Result<Post, TransportError> {
        let url = self.posts_url(&[])?;
        self.fetch(self.client.post(url).json(input))
    }

    fn update(&self, id: &str, input: &UpdatePostInput) -> Result<Post, TransportError> {
        let url = self.post_item_url(&[], id)?;
        self.fetch(self.client.put(url).json(input))
    }

    fn delete(&self, id: &str) -> Result<(), TransportError> {
        let url = self.post_item_url(&[], id)?;
        ensure_success(self.client.delete(url).send()?)?;
        Ok(())
    }
}

impl CategoryTransport for ApiClient {
    fn list_categories(&self) -> Result<Vec<Category>, TransportError> {
        let url = self.resource_url(CATEGORIES_RESOURCE, &[])?;
        self.fetch(self.client.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> ApiClient {
        let config = FrontendConfig::default().with_api_url(api_url).unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn posts_url_sits_under_api_root() {
        let api = client("http://localhost:8080/api/");
        assert_eq!(
            api.posts_url(&[]).unwrap().as_str(),
            "http://localhost:8080/api/v1/posts"
        );
        assert_eq!(
            api.posts_url(&["category", "cat-1"]).unwrap().as_str(),
            "http://localhost:8080/api/v1/posts/category/cat-1"
        );
    }

    #[test]
    fn path_segments_are_escaped() {
        let api = client("http://localhost:8080");
        assert_eq!(
            api.posts_url(&["a/b c"]).unwrap().as_str(),
            "http://localhost:8080/v1/posts/a%2Fb%20c"
        );
    }

    #[test]
    fn set_base_url_retargets_requests() {
        let mut api = client("http://localhost:8080");
        api.set_base_url("blog.internal:9000").unwrap();
        assert_eq!(api.base_url(), "http://blog.internal:9000/");
        assert_eq!(
            api.resource_url(CATEGORIES_RESOURCE, &[]).unwrap().as_str(),
            "http://blog.internal:9000/v1/categories"
        );
    }

    #[test]
    fn empty_ids_never_reach_the_collection() {
        // Nothing listens on the discard port; these must fail before sending.
        let api = client("http://127.0.0.1:9");
        let update = UpdatePostInput {
            title: "Still a title".into(),
            content: "Body".into(),
        };

        assert!(matches!(api.get(""), Err(TransportError::InvalidUrl(_))));
        assert!(matches!(api.delete(""), Err(TransportError::InvalidUrl(_))));
        assert!(matches!(
            api.update("", &update),
            Err(TransportError::InvalidUrl(_))
        ));
        assert!(matches!(
            api.list_by_category(""),
            Err(TransportError::InvalidUrl(_))
        ));
    }

    #[test]
    fn item_urls_append_the_id() {
        let api = client("http://localhost:8080");
        assert_eq!(
            api.post_item_url(&["category"], "cat 1").unwrap().as_str(),
            "http://localhost:8080/v1/posts/category/cat%201"
        );
    }

    #[test]
    fn status_error_exposes_code() {
        let err = TransportError::Status {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "server returned 503: down");
    }
}
