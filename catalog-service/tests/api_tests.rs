mod common;

use auth::TokenScope;
use catalog_service::domain::permission::models::MOVIES_READ;
use catalog_service::domain::permission::models::MOVIES_WRITE;
use common::TestApp;
use common::TestOptions;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

#[tokio::test]
async fn test_healthcheck_reports_available() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/v1/healthcheck")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["status"], "available");
    assert_eq!(body["data"]["system_info"]["environment"], "test");
}

#[tokio::test]
async fn test_unknown_route_returns_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/v1/nowhere")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"].is_string());
}

#[tokio::test]
async fn test_register_user_success() {
    let app = TestApp::spawn().await;

    let body = app.register("Alice Smith", "alice@example.com", "pa55word!").await;

    assert_eq!(body["data"]["name"], "Alice Smith");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["activated"], false);
    assert!(body["data"].get("password").is_none());

    // Welcome email carries the activation token
    let token = app.wait_for_token("alice@example.com", "user_welcome").await;
    assert_eq!(token.len(), 26);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;
    app.register("Alice", "alice@example.com", "pa55word!").await;

    let response = app
        .post("/v1/users")
        .json(&json!({
            "name": "Another Alice",
            "email": "alice@example.com",
            "password": "pa55word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_rejects_invalid_fields() {
    let app = TestApp::spawn().await;

    let cases = [
        json!({ "name": "", "email": "a@example.com", "password": "pa55word!" }),
        json!({ "name": "Alice", "email": "not-an-email", "password": "pa55word!" }),
        json!({ "name": "Alice", "email": "a@example.com", "password": "short" }),
    ];

    for case in cases {
        let response = app
            .post("/v1/users")
            .json(&case)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "payload {case}"
        );
    }
}

#[tokio::test]
async fn test_register_rejects_malformed_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/v1/users")
        .header("Content-Type", "application/json")
        .body(r#"{"name": "Alice", "#)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post("/v1/users")
        .json(&json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "pa55word!",
            "admin": true
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activation_token_is_single_use() {
    let app = TestApp::spawn().await;
    app.register("Alice", "alice@example.com", "pa55word!").await;
    let token = app.wait_for_token("alice@example.com", "user_welcome").await;

    let response = app
        .put("/v1/users/activated")
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["activated"], true);

    let response = app
        .put("/v1/users/activated")
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::spawn().await;
    app.register("Alice", "alice@example.com", "pa55word!").await;

    let response = app
        .post("/v1/tokens/authentication")
        .json(&json!({ "email": "alice@example.com", "password": "wrongpass1" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_unknown_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/v1/tokens/authentication")
        .json(&json!({ "email": "ghost@example.com", "password": "pa55word!" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_requires_authentication() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/v1/movies")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("www-authenticate").unwrap(),
        "Bearer"
    );
    assert!(response
        .headers()
        .get_all("vary")
        .iter()
        .any(|v| v == "Authorization"));
}

#[tokio::test]
async fn test_malformed_bearer_token_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/v1/healthcheck")
        .header("Authorization", "Bearer not-a-real-token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("www-authenticate").unwrap(),
        "Bearer"
    );

    let response = app
        .get("/v1/healthcheck")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_bearer_token_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/v1/movies")
        .bearer_auth("Y3QMGX3PJ3WLRL2YRTQGQ6KRHU")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["data"]["message"],
        "invalid or missing authentication token"
    );
}

#[tokio::test]
async fn test_inactive_user_is_forbidden() {
    let app = TestApp::spawn().await;
    app.register("Alice", "alice@example.com", "pa55word!").await;
    let token = app.login("alice@example.com", "pa55word!").await;

    let response = app
        .get("/v1/movies")
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_permission_is_forbidden() {
    let app = TestApp::spawn().await;
    // Registration grants movies:read only
    let token = app.signed_in_user("alice@example.com", &[]).await;

    let response = app
        .get("/v1/movies")
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post("/v1/movies")
        .bearer_auth(&token)
        .json(&json!({
            "title": "Moana",
            "year": 2016,
            "runtime": "107 mins",
            "genres": ["animation", "adventure"]
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_permissions_granted_later_take_effect_immediately() {
    let app = TestApp::spawn().await;
    let token = app.signed_in_user("alice@example.com", &[MOVIES_READ]).await;

    let create = || {
        app.post("/v1/movies").bearer_auth(&token).json(&json!({
            "title": "Moana",
            "year": 2016,
            "runtime": "107 mins",
            "genres": ["animation"]
        }))
    };

    let response = create().send().await.expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let user_id = app.store.user_id("alice@example.com").expect("user stored");
    app.store.grant(user_id, MOVIES_WRITE);

    let response = create().send().await.expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_resend_activation_token() {
    let app = TestApp::spawn().await;
    app.register("Alice", "alice@example.com", "pa55word!").await;

    let response = app
        .post("/v1/tokens/activation")
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let token = app
        .wait_for_token("alice@example.com", "token_activation")
        .await;
    let response = app
        .put("/v1/users/activated")
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    // Already active now
    let response = app
        .post("/v1/tokens/activation")
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = TestApp::spawn().await;
    let old_token = app.signed_in_user("alice@example.com", &[]).await;

    let response = app
        .post("/v1/tokens/password-reset")
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let reset = app
        .wait_for_token("alice@example.com", "token_password_reset")
        .await;
    let response = app
        .put("/v1/users/password")
        .json(&json!({ "password": "n3w-pa55word", "token": reset }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["data"]["message"],
        "your password was successfully reset"
    );

    // The reset token is spent
    let response = app
        .put("/v1/users/password")
        .json(&json!({ "password": "an0ther-pa55word", "token": reset }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Old password no longer works, new one does
    let response = app
        .post("/v1/tokens/authentication")
        .json(&json!({ "email": "alice@example.com", "password": "pa55word!" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    app.login("alice@example.com", "n3w-pa55word").await;

    // Sessions issued before the reset stay valid
    let response = app
        .get("/v1/movies")
        .bearer_auth(&old_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_password_reset_requires_active_account() {
    let app = TestApp::spawn().await;
    app.register("Alice", "alice@example.com", "pa55word!").await;

    let response = app
        .post("/v1/tokens/password-reset")
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_resent_activation_token_supersedes_welcome_token() {
    let app = TestApp::spawn().await;
    app.register("Alice", "alice@example.com", "pa55word!").await;
    let first = app.wait_for_token("alice@example.com", "user_welcome").await;

    let response = app
        .post("/v1/tokens/activation")
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let second = app
        .wait_for_token("alice@example.com", "token_activation")
        .await;
    assert_ne!(first, second);

    let response = app
        .put("/v1/users/activated")
        .json(&json!({ "token": first }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .put("/v1/users/activated")
        .json(&json!({ "token": second }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_second_reset_request_supersedes_first() {
    let app = TestApp::spawn().await;
    app.signed_in_user("alice@example.com", &[]).await;

    let request_reset = || {
        app.post("/v1/tokens/password-reset")
            .json(&json!({ "email": "alice@example.com" }))
            .send()
    };

    let response = request_reset().await.expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let first = app
        .wait_for_token("alice@example.com", "token_password_reset")
        .await;

    let response = request_reset().await.expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let second = app
        .wait_for_fresh_token("alice@example.com", "token_password_reset", &first)
        .await;
    assert_ne!(first, second);

    let user_id = app.store.user_id("alice@example.com").expect("user stored");
    assert_eq!(app.store.token_count(user_id, TokenScope::PasswordReset), 1);

    let response = app
        .put("/v1/users/password")
        .json(&json!({ "password": "n3w-pa55word", "token": first }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_expired_authentication_token_rejected() {
    let app = TestApp::spawn().await;
    let token = app.signed_in_user("alice@example.com", &[]).await;

    let response = app
        .get("/v1/movies")
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let user_id = app.store.user_id("alice@example.com").expect("user stored");
    app.store.expire_all(user_id, TokenScope::Authentication);

    let response = app
        .get("/v1/movies")
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("www-authenticate").unwrap(),
        "Bearer"
    );
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["data"]["message"],
        "invalid or missing authentication token"
    );
}

#[tokio::test]
async fn test_expired_activation_token_rejected() {
    let app = TestApp::spawn().await;
    app.register("Alice", "alice@example.com", "pa55word!").await;
    let token = app.wait_for_token("alice@example.com", "user_welcome").await;

    let user_id = app.store.user_id("alice@example.com").expect("user stored");
    app.store.expire_all(user_id, TokenScope::Activation);

    let response = app
        .put("/v1/users/activated")
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_wrong_method_returns_enveloped_405() {
    let app = TestApp::spawn().await;

    let response = app
        .put("/v1/movies")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 405);
    assert_eq!(
        body["data"]["message"],
        "the PUT method is not supported for this resource"
    );
}

#[tokio::test]
async fn test_debug_vars_counts_requests_by_status() {
    let app = TestApp::spawn().await;

    for _ in 0..2 {
        app.get("/v1/healthcheck")
            .send()
            .await
            .expect("Failed to execute request");
    }
    app.get("/v1/nowhere")
        .send()
        .await
        .expect("Failed to execute request");
    app.get("/v1/movies")
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .get("/debug/vars")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let text = response.text().await.expect("Failed to read body");
    // The scrape itself is counted as received but not yet sent
    assert!(text.contains("catalog_http_requests_received_total 5"));
    assert!(text.contains("catalog_http_responses_sent_total 4"));
    assert!(text.contains("catalog_http_responses_sent_by_status_total{status=\"200\"} 2"));
    assert!(text.contains("catalog_http_responses_sent_by_status_total{status=\"401\"} 1"));
    assert!(text.contains("catalog_http_responses_sent_by_status_total{status=\"404\"} 1"));
    assert!(text.contains("catalog_http_processing_time_microseconds_total"));
}

#[tokio::test]
async fn test_rate_limited_responses_are_counted() {
    let app = TestApp::spawn_with(TestOptions {
        limiter_enabled: true,
        limiter_rps: 0.5,
        limiter_burst: 1,
        ..TestOptions::default()
    })
    .await;

    for _ in 0..3 {
        app.get("/v1/healthcheck")
            .send()
            .await
            .expect("Failed to execute request");
    }

    assert_eq!(app.metrics.requests_received(), 3);
    assert_eq!(app.metrics.responses_with_status(200), 1);
    assert_eq!(app.metrics.responses_with_status(429), 2);
}
