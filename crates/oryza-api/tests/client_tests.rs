//! Integration tests for the prediction client against a mock server

use std::sync::Arc;
use std::time::Duration;

use oryza_api::{
    ApiConfig, ApiError, AutocompleteRequest, PredictionApi, PredictionClient, VerifyRequest,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> PredictionClient {
    PredictionClient::new(ApiConfig::with_base_url(server.uri()), "user-token-1")
        .expect("client should build")
}

fn sample_request() -> AutocompleteRequest {
    AutocompleteRequest {
        left_context: "for ".to_string(),
        right_context: "\n".to_string(),
        trigger_point: Some("for".to_string()),
        language: "python".to_string(),
        ide: "oryza".to_string(),
        keybind: false,
        plugin_version: None,
        store_context: false,
    }
}

#[tokio::test]
async fn autocomplete_deserializes_success_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prediction/autocomplete"))
        .and(header("Authorization", "Bearer user-token-1"))
        .and(body_partial_json(json!({ "triggerPoint": "for" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": ["i in arr:"],
            "verifyToken": "abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .autocomplete(&sample_request())
        .await
        .expect("success response");

    assert_eq!(response.predictions, vec!["i in arr:".to_string()]);
    assert_eq!(response.verify_token, "abc");
    assert!(!response.survey);
}

#[tokio::test]
async fn error_body_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prediction/autocomplete"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "missing language" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .autocomplete(&sample_request())
        .await
        .expect_err("error response");

    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(message, "missing language");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_success_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prediction/autocomplete"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .autocomplete(&sample_request())
        .await
        .expect_err("non-json body");

    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status.as_u16(), 200);
            assert_eq!(message, "<html>gateway</html>");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn second_fetch_while_first_in_flight_fails_fast() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prediction/autocomplete"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "predictions": ["x"], "verifyToken": "t" }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server));

    let first = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.autocomplete(&sample_request()).await })
    };

    // let the first request reach the wire before contending
    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = client.autocomplete(&sample_request()).await;
    assert!(matches!(second, Err(ApiError::AlreadyInFlight)));

    // the rejected attempt must not disturb the outstanding call
    let first = first.await.expect("join").expect("first fetch succeeds");
    assert_eq!(first.predictions, vec!["x".to_string()]);

    // and the lock is released once the first call resolves
    let third = client.autocomplete(&sample_request()).await;
    assert!(third.is_ok());
}

#[tokio::test]
async fn lock_is_released_after_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prediction/autocomplete"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.autocomplete(&sample_request()).await.is_err());
    // a failed round trip must not leave the lock held
    assert!(matches!(
        client.autocomplete(&sample_request()).await,
        Err(ApiError::Server { .. })
    ));
}

#[tokio::test]
async fn verify_calls_bypass_the_single_flight_lock() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prediction/autocomplete"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "predictions": ["x"], "verifyToken": "t" }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/prediction/verify"))
        .and(header("Authorization", "Bearer user-token-1"))
        .and(body_partial_json(json!({ "verifyToken": "t" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server));

    let fetch = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.autocomplete(&sample_request()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // two overlapping verify reports while the fetch is still outstanding
    let verify_request = VerifyRequest {
        verify_token: "t".to_string(),
        chosen_prediction: Some("x".to_string()),
        ground_truth: "x".to_string(),
    };
    let (a, b) = tokio::join!(client.verify(&verify_request), client.verify(&verify_request));
    assert!(a.is_ok());
    assert!(b.is_ok());

    assert!(fetch.await.expect("join").is_ok());
}
