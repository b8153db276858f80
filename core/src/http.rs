//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `ListClient` builds `HttpRequest`
//! values without touching the network; `RemoteListClient` (or any other
//! host) executes them and hands back an `HttpResponse` untouched.
//!
//! Headers are kept as an ordered `Vec` of owned pairs so tests can assert
//! on exactly what goes over the wire.

/// Header names used by the list service contract.
pub mod header {
    pub const ACCEPT: &str = "accept";
    pub const AUTHORIZATION: &str = "authorization";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const ETAG: &str = "etag";
    pub const IF_MATCH: &str = "if-match";
    pub const IF_NONE_MATCH: &str = "if-none-match";
    pub const X_HTTP_METHOD: &str = "x-http-method";
}

/// Media types used by the list service contract.
pub mod media_type {
    pub const XML: &str = "application/xml";
    pub const ATOM_XML: &str = "application/atom+xml";
}

/// HTTP method for a request.
///
/// There is no `Patch`: updates travel as `Post` with an `X-Http-Method`
/// override because the list service does not accept the literal verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `ListClient::build_*`. Discarded once the response comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First value of the named header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// The raw response returned to the caller.
///
/// The client never interprets it. The accessors below are conveniences
/// for callers routing on status or chaining the next ETag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Decoded as text using the response charset (UTF-8 by default).
    /// Undecodable bytes become U+FFFD, so non-text payloads are not kept
    /// byte-for-byte.
    pub body: String,
}

impl HttpResponse {
    /// First value of the named header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The item's current entity tag, if the service sent one.
    pub fn etag(&self) -> Option<&str> {
        self.header(header::ETAG)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_modified(&self) -> bool {
        self.status == 304
    }

    /// True when an `If-Match` precondition was rejected (lost update).
    pub fn is_precondition_failed(&self) -> bool {
        self.status == 412
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
