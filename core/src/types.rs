//! Value types passed into the list client.
//!
//! # Design
//! Payload schema is the caller's business: bodies are opaque strings and
//! responses come back raw. The types here only carry what the transport
//! contract needs.

use std::fmt;

/// Bearer token for the list service.
///
/// Acquired and owned by the caller's authentication flow; the client reads
/// it for one request and never stores it. `Debug` is redacted so tokens
/// stay out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Entry payload for create and update.
///
/// Any content type set here is replaced with `application/atom+xml` when
/// the request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content: String,
    pub content_type: Option<String>,
}

impl RequestBody {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl From<&str> for RequestBody {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for RequestBody {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

/// The lists this application works with. Names are resolved through
/// `ListServiceConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Projects,
    References,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Projects => f.write_str("projects"),
            ListKind::References => f.write_str("references"),
        }
    }
}
