//! Stateless request builder for the list service.
//!
//! # Design
//! `ListClient` holds only the immutable `ListServiceConfig` and carries no
//! state between calls. Each operation has a `build_*` method producing an
//! `HttpRequest`; executing it is the host's job (see `RemoteListClient`).
//! Every header rule of the remote contract lives here:
//!
//! - all requests: `Accept: application/xml`, `Authorization: Bearer <token>`
//! - read: `If-None-Match` only for a specific tag
//! - create/update: content type forced to `application/atom+xml`
//! - update: literal POST + `X-Http-Method: PATCH` + `If-Match`
//! - delete: `If-Match`, no body

use crate::config::ListServiceConfig;
use crate::error::ApiError;
use crate::etag::EntityTag;
use crate::http::{header, media_type, HttpMethod, HttpRequest};
use crate::types::{AccessToken, ListKind, RequestBody};

pub const METHOD_OVERRIDE_PATCH: &str = "PATCH";

#[derive(Debug, Clone)]
pub struct ListClient {
    config: ListServiceConfig,
}

impl ListClient {
    pub fn new(config: ListServiceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ListServiceConfig {
        &self.config
    }

    /// `{site}/_api/web/lists/getbytitle('{name}')/items`
    pub fn items_uri(&self, list: ListKind) -> String {
        format!("{}/items", self.list_uri(list))
    }

    /// `{site}/_api/web/lists/getbytitle('{name}')/items({id})`
    pub fn item_uri(&self, list: ListKind, id: u64) -> String {
        format!("{}/items({id})", self.list_uri(list))
    }

    fn list_uri(&self, list: ListKind) -> String {
        // The service escapes a quote inside a quoted literal by doubling it.
        let title = self.config.list_name(list).replace('\'', "''");
        format!(
            "{}/_api/web/lists/getbytitle('{title}')",
            self.config.site_url
        )
    }

    /// GET, conditioned with `If-None-Match` when `etag` names a version.
    pub fn build_read(
        &self,
        uri: &str,
        token: &AccessToken,
        etag: &EntityTag,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = base_headers(token)?;
        if let Some(tag) = etag.if_none_match() {
            headers.push(checked(header::IF_NONE_MATCH, tag)?);
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: uri.to_string(),
            headers,
            body: None,
        })
    }

    /// POST of a new entry. Never conditioned.
    pub fn build_create(
        &self,
        uri: &str,
        token: &AccessToken,
        body: RequestBody,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = base_headers(token)?;
        headers.push(entry_content_type(&body));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: uri.to_string(),
            headers,
            body: Some(body.content),
        })
    }

    /// POST with a PATCH method override, guarded by `If-Match`.
    pub fn build_update(
        &self,
        uri: &str,
        token: &AccessToken,
        etag: &EntityTag,
        body: RequestBody,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = base_headers(token)?;
        headers.push(entry_content_type(&body));
        headers.push(if_match(etag)?);
        headers.push((
            header::X_HTTP_METHOD.to_string(),
            METHOD_OVERRIDE_PATCH.to_string(),
        ));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: uri.to_string(),
            headers,
            body: Some(body.content),
        })
    }

    /// DELETE guarded by `If-Match`.
    pub fn build_delete(
        &self,
        uri: &str,
        token: &AccessToken,
        etag: &EntityTag,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = base_headers(token)?;
        headers.push(if_match(etag)?);
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            url: uri.to_string(),
            headers,
            body: None,
        })
    }
}

fn base_headers(token: &AccessToken) -> Result<Vec<(String, String)>, ApiError> {
    Ok(vec![
        (header::ACCEPT.to_string(), media_type::XML.to_string()),
        checked(header::AUTHORIZATION, &token.bearer())?,
    ])
}

fn entry_content_type(body: &RequestBody) -> (String, String) {
    if let Some(requested) = body.content_type.as_deref() {
        if requested != media_type::ATOM_XML {
            tracing::trace!(requested, "overriding entry content type");
        }
    }
    (
        header::CONTENT_TYPE.to_string(),
        media_type::ATOM_XML.to_string(),
    )
}

fn if_match(etag: &EntityTag) -> Result<(String, String), ApiError> {
    let tag = etag.if_match().ok_or(ApiError::MissingEntityTag)?;
    checked(header::IF_MATCH, tag)
}

/// Reject values that would break header framing (CR, LF, other controls).
fn checked(name: &'static str, value: &str) -> Result<(String, String), ApiError> {
    if value.bytes().any(|b| (b < 0x20 && b != b'\t') || b == 0x7f) {
        return Err(ApiError::InvalidHeader { name });
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM: &str = "https://svc/items(1)";

    fn client() -> ListClient {
        ListClient::new(ListServiceConfig::new("https://contoso.example/sites/rt"))
    }

    fn token() -> AccessToken {
        AccessToken::new("tok123")
    }

    #[test]
    fn build_read_without_tag_has_no_precondition() {
        let req = client().build_read(ITEM, &token(), &EntityTag::Absent).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, ITEM);
        assert!(req.body.is_none());
        assert_eq!(
            req.headers,
            vec![
                ("accept".to_string(), "application/xml".to_string()),
                ("authorization".to_string(), "Bearer tok123".to_string()),
            ]
        );
    }

    #[test]
    fn build_read_with_wildcard_has_no_precondition() {
        let req = client().build_read(ITEM, &token(), &EntityTag::Any).unwrap();
        assert!(req.header("if-none-match").is_none());
        assert!(req.header("if-match").is_none());
    }

    #[test]
    fn build_read_with_specific_tag_sets_if_none_match() {
        let req = client()
            .build_read(ITEM, &token(), &EntityTag::from("\"v1\""))
            .unwrap();
        assert_eq!(req.header("If-None-Match"), Some("\"v1\""));
        assert_eq!(req.headers.len(), 3);
    }

    #[test]
    fn build_read_is_repeatable() {
        let c = client();
        let first = c.build_read(ITEM, &token(), &EntityTag::Absent).unwrap();
        let second = c.build_read(ITEM, &token(), &EntityTag::Absent).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn build_create_forces_atom_content_type() {
        let body = RequestBody::new("<entry/>").with_content_type("application/json");
        let req = client().build_create(ITEM, &token(), body).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("content-type"), Some("application/atom+xml"));
        assert_eq!(req.body.as_deref(), Some("<entry/>"));
        assert!(req.header("if-match").is_none());
        assert!(req.header("x-http-method").is_none());
    }

    #[test]
    fn build_update_uses_post_with_patch_override() {
        let body = RequestBody::new("<entry/>").with_content_type("text/plain");
        let req = client()
            .build_update(ITEM, &token(), &EntityTag::from("\"v1\""), body)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("x-http-method"), Some("PATCH"));
        assert_eq!(req.header("if-match"), Some("\"v1\""));
        assert_eq!(req.header("content-type"), Some("application/atom+xml"));
        assert_eq!(req.header("accept"), Some("application/xml"));
        assert_eq!(req.header("authorization"), Some("Bearer tok123"));
    }

    #[test]
    fn build_update_with_wildcard_matches_any() {
        let req = client()
            .build_update(ITEM, &token(), &EntityTag::Any, RequestBody::new(""))
            .unwrap();
        assert_eq!(req.header("if-match"), Some("*"));
    }

    #[test]
    fn build_update_requires_a_tag() {
        let err = client()
            .build_update(ITEM, &token(), &EntityTag::Absent, RequestBody::new(""))
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingEntityTag));
    }

    #[test]
    fn build_delete_sets_if_match_and_no_body() {
        let req = client()
            .build_delete(ITEM, &token(), &EntityTag::from("\"3\""))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.header("if-match"), Some("\"3\""));
        assert!(req.body.is_none());
        assert!(req.header("content-type").is_none());

        let req = client().build_delete(ITEM, &token(), &EntityTag::Any).unwrap();
        assert_eq!(req.header("if-match"), Some("*"));
    }

    #[test]
    fn build_delete_requires_a_tag() {
        let err = client()
            .build_delete(ITEM, &token(), &EntityTag::Absent)
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingEntityTag));
    }

    #[test]
    fn header_injection_is_rejected() {
        let err = client()
            .build_read(ITEM, &AccessToken::new("tok\r\nX-Evil: 1"), &EntityTag::Absent)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader { name: "authorization" }));

        let err = client()
            .build_delete(ITEM, &token(), &EntityTag::from("\"1\"\n"))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader { name: "if-match" }));
    }

    #[test]
    fn list_uris_come_from_config() {
        let c = ListClient::new(
            ListServiceConfig::new("https://contoso.example/sites/rt/")
                .with_list_names("Research Projects", "Bob's References"),
        );
        assert_eq!(
            c.items_uri(ListKind::Projects),
            "https://contoso.example/sites/rt/_api/web/lists/getbytitle('Research Projects')/items"
        );
        assert_eq!(
            c.item_uri(ListKind::References, 12),
            "https://contoso.example/sites/rt/_api/web/lists/getbytitle('Bob''s References')/items(12)"
        );
    }
}
