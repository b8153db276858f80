//! Verify request building against JSON test vectors stored in `test-vectors/`.
//!
//! Each case names an operation, its inputs, and either the exact request
//! expected (method, ordered headers, body) or the error expected.

use sp_list_core::{
    AccessToken, ApiError, EntityTag, HttpMethod, HttpRequest, ListClient, ListServiceConfig,
    RequestBody,
};

fn client() -> ListClient {
    ListClient::new(ListServiceConfig::new("https://svc"))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn build(case: &serde_json::Value) -> Result<HttpRequest, ApiError> {
    let c = client();
    let uri = case["uri"].as_str().unwrap();
    let token = AccessToken::new(case["token"].as_str().unwrap());
    let etag = EntityTag::from(case["etag"].as_str());
    let body = || {
        let mut body = RequestBody::new(case["body"].as_str().unwrap());
        if let Some(content_type) = case["body_content_type"].as_str() {
            body = body.with_content_type(content_type);
        }
        body
    };

    match case["operation"].as_str().unwrap() {
        "read" => c.build_read(uri, &token, &etag),
        "create" => c.build_create(uri, &token, body()),
        "update" => c.build_update(uri, &token, &etag, body()),
        "delete" => c.build_delete(uri, &token, &etag),
        other => panic!("unknown operation: {other}"),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        if let Some(expected_error) = case["expected_error"].as_str() {
            let err = build(case).unwrap_err();
            match expected_error {
                "missing_entity_tag" => {
                    assert!(matches!(err, ApiError::MissingEntityTag), "{name}: {err}")
                }
                other => panic!("{name}: unknown expected error {other}"),
            }
            continue;
        }

        let req = build(case).unwrap();
        let expected_req = &case["expected_request"];

        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, case["uri"].as_str().unwrap(), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        assert_eq!(req.body.as_deref(), expected_req["body"].as_str(), "{name}: body");
    }
}
