//! Client core for a SharePoint-style list service.
//!
//! # Overview
//! Reads and mutates list items ("Projects", "References") over the
//! service's REST API, with ETag-based optimistic concurrency. The remote
//! store has no transactions; conflicting writes are detected by sending
//! the caller's last-seen entity tag in `If-Match` and letting the service
//! answer 412.
//!
//! # Design
//! - `ListClient` builds `HttpRequest` values without touching the network
//!   (host-does-IO). All header and precondition rules live there.
//! - `RemoteListClient` executes them with `reqwest`, one exchange per call,
//!   and returns the raw `HttpResponse`. Statuses are never turned into
//!   errors; only transport failures are.
//! - `ListServiceConfig` is built once at startup and passed in by value.

pub mod client;
pub mod config;
pub mod error;
pub mod etag;
pub mod http;
pub mod remote;
pub mod types;

pub use client::ListClient;
pub use config::ListServiceConfig;
pub use error::ApiError;
pub use etag::EntityTag;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use remote::RemoteListClient;
pub use types::{AccessToken, ListKind, RequestBody};
