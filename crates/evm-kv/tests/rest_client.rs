//! HTTP-level tests for the REST key-value client.
//!
//! Each test mounts the PostgREST responses it expects on a wiremock server
//! and checks both the request shape and the mapped result.

use evm_kv::{KvError, KvStore, Record, RestKvClient, RestKvConfig, WriteMode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLE_PATH: &str = "/rest/v1/objects";
const API_KEY: &str = "test-anon-key";

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client_for(server: &MockServer, write_mode: WriteMode) -> RestKvClient {
    RestKvClient::new(RestKvConfig {
        endpoint: format!("{}{}", server.uri(), TABLE_PATH),
        api_key: API_KEY.to_string(),
        write_mode,
        timeout: None,
    })
    .expect("client builds")
}

#[tokio::test]
async fn test_get_returns_first_value_and_sends_auth_headers() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(query_param("select", "value"))
        .and(query_param("key", "eq.user:anton"))
        .and(header("apikey", API_KEY))
        .and(header("authorization", "Bearer test-anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"value": {"name": "Anton", "age": 33}},
            {"value": {"name": "Shadowed"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    let value = client.get("user:anton").await.unwrap();
    assert_eq!(value, Some(json!({"name": "Anton", "age": 33})));
}

#[tokio::test]
async fn test_get_without_rows_is_absent() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    assert_eq!(client.get("event:missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_get_null_value_is_absent() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"value": null}])))
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    assert_eq!(client.get("event:null").await.unwrap(), None);
}

#[tokio::test]
async fn test_get_non_2xx_is_status_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid API key"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    let err = client.get("event:1").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn test_get_malformed_json_is_decode_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    let err = client.get("event:1").await.unwrap_err();
    match err {
        KvError::Decode { body, .. } => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_set_posts_key_and_value() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .and(header("apikey", API_KEY))
        .and(header("content-type", "application/json"))
        .and(query_param_is_missing("on_conflict"))
        .and(body_json(json!({"key": "event:1000", "value": {"name": "Launch"}})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    let ok = client
        .set("event:1000", &json!({"name": "Launch"}))
        .await
        .unwrap();
    assert!(ok);
}

#[tokio::test]
async fn test_set_rejected_returns_false() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    assert!(!client.set("event:1", &json!({"name": "x"})).await.unwrap());
}

#[tokio::test]
async fn test_set_upsert_sends_merge_preference() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .and(query_param("on_conflict", "key"))
        .and(header("prefer", "resolution=merge-duplicates"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Upsert);
    assert!(client.set("event:1", &json!({"name": "x"})).await.unwrap());
}

#[tokio::test]
async fn test_delete_nonexistent_key_succeeds() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    // PostgREST answers 204 even when the filter matched zero rows.
    Mock::given(method("DELETE"))
        .and(path(TABLE_PATH))
        .and(query_param("key", "eq.event:nope"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    assert!(client.delete("event:nope").await.unwrap());
}

#[tokio::test]
async fn test_delete_rejected_returns_false() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    assert!(!client.delete("event:1").await.unwrap());
}

#[tokio::test]
async fn test_get_with_prefix_uses_like_filter_and_keeps_order() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(query_param("select", "key,value"))
        .and(query_param("key", "like.event:%"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"key": "event:2000", "value": {"name": "Second"}},
            {"key": "event:1000", "value": {"name": "Launch"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    let rows = client.get_with_prefix("event:").await.unwrap();
    assert_eq!(
        rows,
        vec![
            Record::new("event:2000", json!({"name": "Second"})),
            Record::new("event:1000", json!({"name": "Launch"})),
        ]
    );
}

#[tokio::test]
async fn test_get_with_prefix_drops_wildcard_matches() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    // `_` matches any single character server-side.
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(query_param("key", "like.my_ns:%"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"key": "my_ns:1", "value": 1},
            {"key": "myXns:2", "value": 2}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    let rows = client.get_with_prefix("my_ns:").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, "my_ns:1");
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct User {
    name: String,
    age: u32,
}

#[tokio::test]
async fn test_typed_helpers_round_trip_through_json() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .and(body_json(json!({"key": "user:john", "value": {"name": "John", "age": 25}})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(query_param("key", "eq.user:john"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"value": {"name": "John", "age": 25}}])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    let john = User {
        name: "John".to_string(),
        age: 25,
    };
    assert!(client.set_as("user:john", &john).await.unwrap());
    let loaded: Option<User> = client.get_as("user:john").await.unwrap();
    assert_eq!(loaded, Some(john));
}

#[tokio::test]
async fn test_typed_get_with_wrong_shape_is_decode_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"value": {"name": 7}}])))
        .mount(&server)
        .await;

    let client = client_for(&server, WriteMode::Insert);
    let result: Result<Option<User>, KvError> = client.get_as("user:bad").await;
    assert!(matches!(result, Err(KvError::Decode { .. })));
}

#[test]
fn test_invalid_endpoint_is_rejected() {
    let err = RestKvClient::new(RestKvConfig {
        endpoint: "::not-a-url::".to_string(),
        api_key: API_KEY.to_string(),
        write_mode: WriteMode::Insert,
        timeout: None,
    })
    .unwrap_err();
    assert!(matches!(err, KvError::InvalidEndpoint { .. }));
}
