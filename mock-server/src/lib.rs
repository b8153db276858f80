//! In-memory stand-in for a SharePoint-style list service.
//!
//! Honours the parts of the remote contract the client depends on: bearer
//! auth on every list route, atom entries for writes, `X-Http-Method`
//! override for updates, and ETag preconditions (`If-None-Match` on reads,
//! `If-Match` on updates and deletes). `/echo` reflects whatever it receives;
//! `/moved` and `/slow/{millis}` give clients a redirect and a stall.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const ATOM_XML: &str = "application/atom+xml";
const X_HTTP_METHOD: &str = "x-http-method";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub etag: String,
    pub version: u64,
    pub content: String,
}

#[derive(Debug, Default)]
struct ListData {
    items: BTreeMap<u64, Item>,
    next_id: u64,
}

impl ListData {
    fn insert(&mut self, content: String) -> Item {
        self.next_id = self.next_id.max(self.items.keys().max().copied().unwrap_or(0)) + 1;
        let item = Item {
            id: self.next_id,
            etag: etag_for(1),
            version: 1,
            content,
        };
        self.items.insert(item.id, item.clone());
        item
    }
}

/// What `/echo` sends back.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EchoedRequest {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Shared list storage, keyed by list title.
#[derive(Clone, Debug, Default)]
pub struct MockStore(Arc<RwLock<HashMap<String, ListData>>>);

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item with an arbitrary tag.
    pub async fn seed(&self, list: &str, id: u64, etag: &str, content: &str) {
        let mut lists = self.0.write().await;
        let data = lists.entry(list.to_string()).or_default();
        data.items.insert(
            id,
            Item {
                id,
                etag: etag.to_string(),
                version: 1,
                content: content.to_string(),
            },
        );
    }

    pub async fn item(&self, list: &str, id: u64) -> Option<Item> {
        let lists = self.0.read().await;
        lists.get(list).and_then(|data| data.items.get(&id)).cloned()
    }
}

pub fn app() -> Router {
    app_with_store(MockStore::new())
}

pub fn app_with_store(store: MockStore) -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/moved", any(moved))
        .route("/slow/{millis}", any(slow))
        .route("/_api/web/lists/{list}/items", get(list_items).post(create_item))
        .route(
            "/_api/web/lists/{list}/{item}",
            get(get_item).post(update_item).delete(delete_item),
        )
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_store(listener: TcpListener, store: MockStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(store)).await
}

pub fn etag_for(version: u64) -> String {
    format!("\"{version}\"")
}

/// `getbytitle('Bob''s List')` -> `Bob's List`
pub fn parse_list_title(segment: &str) -> Option<String> {
    let inner = segment.strip_prefix("getbytitle('")?.strip_suffix("')")?;
    Some(inner.replace("''", "'"))
}

/// `items(12)` -> `12`
pub fn parse_item_id(segment: &str) -> Option<u64> {
    segment.strip_prefix("items(")?.strip_suffix(')')?.parse().ok()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn authorize(headers: &HeaderMap) -> Result<(), StatusCode> {
    match header_str(headers, header::AUTHORIZATION.as_str()).and_then(|v| v.strip_prefix("Bearer ")) {
        Some(token) if !token.trim().is_empty() => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

fn require_atom(headers: &HeaderMap) -> Result<(), StatusCode> {
    let content_type = header_str(headers, header::CONTENT_TYPE.as_str()).unwrap_or_default();
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case(ATOM_XML) {
        Ok(())
    } else {
        Err(StatusCode::UNSUPPORTED_MEDIA_TYPE)
    }
}

fn check_if_match(headers: &HeaderMap, item: &Item) -> Result<(), StatusCode> {
    match header_str(headers, header::IF_MATCH.as_str()) {
        None => Err(StatusCode::PRECONDITION_REQUIRED),
        Some("*") => Ok(()),
        Some(tag) if tag == item.etag => Ok(()),
        Some(tag) => {
            debug!(presented = tag, current = %item.etag, "If-Match rejected");
            Err(StatusCode::PRECONDITION_FAILED)
        }
    }
}

fn locate(list: &str, item: &str) -> Result<(String, u64), StatusCode> {
    let title = parse_list_title(list).ok_or(StatusCode::NOT_FOUND)?;
    let id = parse_item_id(item).ok_or(StatusCode::NOT_FOUND)?;
    Ok((title, id))
}

fn entry_response(status: StatusCode, item: &Item) -> Response {
    (
        status,
        [
            (header::ETAG, item.etag.clone()),
            (header::CONTENT_TYPE, ATOM_XML.to_string()),
        ],
        item.content.clone(),
    )
        .into_response()
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<EchoedRequest> {
    let headers = headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(EchoedRequest {
        method: method.to_string(),
        headers,
        body,
    })
}

/// Always 302 to `/echo`, whatever the method.
async fn moved() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/echo")]).into_response()
}

/// Sleeps before answering 200, for exercising client timeouts.
async fn slow(Path(millis): Path<u64>) -> StatusCode {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    StatusCode::OK
}

async fn list_items(
    State(store): State<MockStore>,
    Path(list): Path<String>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    let title = parse_list_title(&list).ok_or(StatusCode::NOT_FOUND)?;
    let lists = store.0.read().await;
    let entries: String = lists
        .get(&title)
        .map(|data| data.items.values().map(|item| item.content.as_str()).collect())
        .unwrap_or_default();
    let feed = format!("<feed xmlns=\"http://www.w3.org/2005/Atom\">{entries}</feed>");
    Ok(([(header::CONTENT_TYPE, ATOM_XML)], feed).into_response())
}

async fn create_item(
    State(store): State<MockStore>,
    Path(list): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    let title = parse_list_title(&list).ok_or(StatusCode::NOT_FOUND)?;
    require_atom(&headers)?;
    let item = store.0.write().await.entry(title).or_default().insert(body);
    debug!(id = item.id, "item created");
    let location = format!("/_api/web/lists/{list}/items({})", item.id);
    let mut response = entry_response(StatusCode::CREATED, &item);
    if let Ok(value) = location.parse() {
        response.headers_mut().insert(header::LOCATION, value);
    }
    Ok(response)
}

async fn get_item(
    State(store): State<MockStore>,
    Path((list, item)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    let (title, id) = locate(&list, &item)?;
    let found = store.item(&title, id).await.ok_or(StatusCode::NOT_FOUND)?;
    if header_str(&headers, header::IF_NONE_MATCH.as_str()) == Some(found.etag.as_str()) {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, found.etag)]).into_response());
    }
    Ok(entry_response(StatusCode::OK, &found))
}

async fn update_item(
    State(store): State<MockStore>,
    Path((list, item)): Path<(String, String)>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    let (title, id) = locate(&list, &item)?;
    let override_method = header_str(&headers, X_HTTP_METHOD).unwrap_or_default();
    if !(override_method.eq_ignore_ascii_case("PATCH") || override_method.eq_ignore_ascii_case("MERGE")) {
        return Err(StatusCode::BAD_REQUEST);
    }
    require_atom(&headers)?;

    let mut lists = store.0.write().await;
    let current = lists
        .get_mut(&title)
        .and_then(|data| data.items.get_mut(&id))
        .ok_or(StatusCode::NOT_FOUND)?;
    check_if_match(&headers, current)?;

    current.version += 1;
    current.etag = etag_for(current.version);
    current.content = body;
    debug!(id, etag = %current.etag, "item updated");
    Ok((StatusCode::NO_CONTENT, [(header::ETAG, current.etag.clone())]).into_response())
}

async fn delete_item(
    State(store): State<MockStore>,
    Path((list, item)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    authorize(&headers)?;
    let (title, id) = locate(&list, &item)?;

    let mut lists = store.0.write().await;
    let data = lists.get_mut(&title).ok_or(StatusCode::NOT_FOUND)?;
    let current = data.items.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    check_if_match(&headers, current)?;
    data.items.remove(&id);
    debug!(id, "item deleted");
    Ok(StatusCode::OK)
}
