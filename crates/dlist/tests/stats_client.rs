//! Integration tests for guild count reporting against a mock API.

use std::time::Duration;

use dlist::{ClientConfig, DListClient, Error, ErrorKind};
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOT_ID: &str = "123456789012345678";
const API_KEY: &str = "test-api-key";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn setup() -> (MockServer, DListClient) {
    init_tracing();
    let server = MockServer::start().await;
    let config = ClientConfig::new()
        .with_base_url(format!("{}/v0", server.uri()))
        .with_timeout_millis(2_000);
    let client = DListClient::with_config(API_KEY, config).expect("client should build");
    (server, client)
}

// ==================== Wire Format Tests ====================

#[tokio::test]
async fn test_set_guild_count_puts_query_parameter() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path(format!("/v0/bots/{BOT_ID}/guilds")))
        .and(query_param("count", "42"))
        .and(header("authorization", "Bearer test-api-key"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(true))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.bot().set_guild_count(BOT_ID, 42).await;
    assert_eq!(result, Ok(true));

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_set_guild_count_post_sends_count_body() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(format!("/v0/bots/{BOT_ID}/guilds")))
        .and(header("authorization", "Bearer test-api-key"))
        .and(body_json(json!({ "count": 42 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(true))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.bot().set_guild_count_post(BOT_ID, 42).await;
    assert_eq!(result, Ok(true));
}

#[tokio::test]
async fn test_set_guild_count_top_gg_sends_server_count_body() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(format!("/v0/bots/{BOT_ID}/stats")))
        .and(header("authorization", "Bearer test-api-key"))
        .and(body_json(json!({ "server_count": 42 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(true))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.bot().set_guild_count_top_gg(BOT_ID, 42).await;
    assert_eq!(result, Ok(true));
}

#[tokio::test]
async fn test_post_and_top_gg_use_different_routes_and_bodies() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    assert_eq!(client.bot().set_guild_count_post(BOT_ID, 42).await, Ok(true));
    assert_eq!(client.bot().set_guild_count_top_gg(BOT_ID, 42).await, Ok(true));

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
    assert_ne!(requests[0].url.path(), requests[1].url.path());
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&requests[0].body).ok(),
        Some(json!({ "count": 42 }))
    );
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&requests[1].body).ok(),
        Some(json!({ "server_count": 42 }))
    );
}

#[tokio::test]
async fn test_numeric_bot_id_is_accepted() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/v0/bots/42/guilds"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.bot().set_guild_count(42_u64, 7_u32).await, Ok(true));
}

#[tokio::test]
async fn test_no_content_response_is_success() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    assert_eq!(client.bot().set_guild_count(BOT_ID, 0).await, Ok(true));
}

// ==================== Error Mapping Tests ====================

#[test_case(400, ErrorKind::BadRequest ; "bad request")]
#[test_case(401, ErrorKind::Authentication ; "unauthorized")]
#[test_case(403, ErrorKind::Forbidden ; "forbidden")]
#[test_case(404, ErrorKind::NotFound ; "not found")]
#[test_case(429, ErrorKind::RateLimit ; "rate limited")]
#[test_case(500, ErrorKind::Server ; "server error")]
#[test_case(503, ErrorKind::Server ; "unmapped status")]
#[tokio::test]
async fn test_status_codes_map_to_kinds(status: u16, expected: ErrorKind) {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .bot()
        .set_guild_count(BOT_ID, 42)
        .await
        .expect_err("non-2xx must fail");
    assert_eq!(err.kind(), expected);
    assert_eq!(err.message(), expected.default_message());
}

#[tokio::test]
async fn test_server_message_is_preferred() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Unknown bot" })),
        )
        .mount(&server)
        .await;

    let result = client.bot().set_guild_count_post(BOT_ID, 42).await;
    assert_eq!(
        result,
        Err(Error::NotFound {
            message: "Unknown bot".to_string()
        })
    );
}

#[tokio::test]
async fn test_timeout_is_generic() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(server.uri())
        .with_timeout_millis(50);
    let client = DListClient::with_config(API_KEY, config).expect("client should build");

    let err = client
        .bot()
        .set_guild_count(BOT_ID, 42)
        .await
        .expect_err("request should time out");
    assert_eq!(err.kind(), ErrorKind::Generic);
}

#[tokio::test]
async fn test_connection_failure_is_generic() {
    let config = ClientConfig::new()
        .with_base_url("http://127.0.0.1:9/v0")
        .with_timeout_millis(1_000);
    let client = DListClient::with_config(API_KEY, config).expect("client should build");

    let err = client
        .bot()
        .set_guild_count(BOT_ID, 42)
        .await
        .expect_err("nothing listens on the discard port");
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert!(!err.message().is_empty());
}

// ==================== Validation Tests ====================

#[test_case("abc", 42.0 ; "letters in bot id")]
#[test_case("12.3", 42.0 ; "decimal bot id")]
#[test_case("", 42.0 ; "empty bot id")]
#[test_case(BOT_ID, -1.0 ; "negative count")]
#[test_case(BOT_ID, 3.5 ; "fractional count")]
#[tokio::test]
async fn test_invalid_input_never_reaches_network(bot_id: &str, count: f64) {
    let (server, client) = setup().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let put = client.bot().set_guild_count(bot_id, count).await;
    let post = client.bot().set_guild_count_post(bot_id, count).await;
    let top_gg = client.bot().set_guild_count_top_gg(bot_id, count).await;

    for result in [put, post, top_gg] {
        let err = result.expect_err("validation must fail");
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert!(err.message().starts_with("Invalid "));
    }
}
