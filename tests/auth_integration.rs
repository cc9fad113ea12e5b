mod common;

use std::time::Duration;

use common::{error_code, jwt_settings, spawn_app, spawn_app_with};
use serde_json::{json, Value};
use session_gate::auth::{JwtManager, TokenType};

// --- Login Tests ---

#[tokio::test]
async fn login_returns_200_with_both_tokens_for_valid_credentials() {
    let app = spawn_app().await;

    let response = app
        .post_login(&json!({ "username": "alice", "password": "pw123" }))
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
}

#[tokio::test]
async fn login_returns_401_for_wrong_password() {
    let app = spawn_app().await;

    let response = app
        .post_login(&json!({ "username": "alice", "password": "wrong" }))
        .await;

    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid Credentials!");
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn login_returns_404_for_unknown_user() {
    let app = spawn_app().await;

    let response = app
        .post_login(&json!({ "username": "bob", "password": "x" }))
        .await;

    assert_eq!(404, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User does not exist.");
}

#[tokio::test]
async fn login_returns_400_for_missing_fields() {
    let app = spawn_app().await;

    let test_cases = vec![
        (json!({ "username": "alice" }), "missing password"),
        (json!({ "password": "pw123" }), "missing username"),
        (json!({ "username": "", "password": "pw123" }), "blank username"),
        (json!({ "username": "alice", "password": "  " }), "blank password"),
        (json!({}), "missing all fields"),
    ];

    for (body, reason) in test_cases {
        let response = app.post_login(&body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "Should reject request: {}",
            reason
        );
        assert_eq!(error_code(response).await, "MISSING_REQUIRED_FIELD");
    }
}

#[tokio::test]
async fn login_issues_fresh_access_token_and_refresh_token() {
    let app = spawn_app().await;
    let tokens = app.login("alice", "pw123").await;
    let jwt = JwtManager::new(&app.jwt);

    let access = jwt.decode(&tokens.access_token, TokenType::Access).unwrap();
    let refresh = jwt.decode(&tokens.refresh_token, TokenType::Refresh).unwrap();

    assert!(access.fresh);
    assert_eq!(access.sub, app.alice_id.to_string());
    assert_eq!(access.role, "user");
    assert_eq!(refresh.sub, app.alice_id.to_string());
    assert_ne!(access.jti, refresh.jti);
}

// --- Logout Tests ---

#[tokio::test]
async fn logout_revokes_the_presented_access_token() {
    let app = spawn_app().await;
    let tokens = app.login("alice", "pw123").await;

    let response = app.get_with_token("/me", &tokens.access_token).await;
    assert_eq!(200, response.status().as_u16());

    let response = app.post_with_token("/logout", &tokens.access_token).await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Successfully logged out");

    let response = app.get_with_token("/me", &tokens.access_token).await;
    assert_eq!(401, response.status().as_u16());
    assert_eq!(error_code(response).await, "TOKEN_REVOKED");
}

#[tokio::test]
async fn logout_twice_is_a_consistent_rejection() {
    let app = spawn_app().await;
    let tokens = app.login("alice", "pw123").await;

    let first = app.post_with_token("/logout", &tokens.access_token).await;
    assert_eq!(200, first.status().as_u16());

    for _ in 0..2 {
        let again = app.post_with_token("/logout", &tokens.access_token).await;
        assert_eq!(401, again.status().as_u16());
        assert_eq!(error_code(again).await, "TOKEN_REVOKED");
    }
}

#[tokio::test]
async fn logout_only_revokes_the_presented_token() {
    let app = spawn_app().await;
    let first_session = app.login("alice", "pw123").await;
    let second_session = app.login("alice", "pw123").await;

    app.post_with_token("/logout", &first_session.access_token)
        .await;

    let response = app.get_with_token("/me", &second_session.access_token).await;
    assert_eq!(200, response.status().as_u16());

    let response = app
        .post_with_token("/token/refresh", &first_session.refresh_token)
        .await;
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn logout_returns_401_without_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(&format!("{}/logout", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(401, response.status().as_u16());
    assert_eq!(error_code(response).await, "TOKEN_INVALID");
}

#[tokio::test]
async fn logout_rejects_refresh_token() {
    let app = spawn_app().await;
    let tokens = app.login("alice", "pw123").await;

    let response = app.post_with_token("/logout", &tokens.refresh_token).await;

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let app = spawn_app().await;
    let tokens = app.login("alice", "pw123").await;

    let tampered = format!("{}X", tokens.access_token);
    let response = app.get_with_token("/me", &tampered).await;

    assert_eq!(401, response.status().as_u16());
}

// --- Refresh Tests ---

#[tokio::test]
async fn refresh_returns_non_fresh_access_token() {
    let app = spawn_app().await;
    let tokens = app.login("alice", "pw123").await;

    let response = app
        .post_with_token("/token/refresh", &tokens.refresh_token)
        .await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert!(body.get("refresh_token").is_none());
    let access_token = body["access_token"].as_str().unwrap();

    let claims = JwtManager::new(&app.jwt)
        .decode(access_token, TokenType::Access)
        .unwrap();
    assert!(!claims.fresh);
    assert_eq!(claims.sub, app.alice_id.to_string());

    let response = app.get_with_token("/me", access_token).await;
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn refresh_rejects_access_token() {
    let app = spawn_app().await;
    let tokens = app.login("alice", "pw123").await;

    let response = app
        .post_with_token("/token/refresh", &tokens.access_token)
        .await;

    assert_eq!(401, response.status().as_u16());
    assert_eq!(error_code(response).await, "TOKEN_INVALID");
}

#[tokio::test]
async fn refresh_rejects_expired_refresh_token() {
    let app = spawn_app_with(jwt_settings(900, 1)).await;
    let tokens = app.login("alice", "pw123").await;

    tokio::time::sleep(Duration::from_millis(2100)).await;

    let response = app
        .post_with_token("/token/refresh", &tokens.refresh_token)
        .await;

    assert_eq!(401, response.status().as_u16());
    assert_eq!(error_code(response).await, "TOKEN_EXPIRED");
}

#[tokio::test]
async fn refresh_rejects_token_signed_with_another_secret() {
    let app = spawn_app().await;

    let mut foreign = app.jwt.clone();
    foreign.secret = "some-other-secret-that-is-32-bytes-long".to_string();
    let identity = session_gate::auth::Identity {
        user_id: app.alice_id,
        username: "alice".to_string(),
        role: "admin".to_string(),
    };
    let forged = JwtManager::new(&foreign)
        .issue_refresh_token(&identity)
        .unwrap();

    let response = app.post_with_token("/token/refresh", &forged).await;

    assert_eq!(401, response.status().as_u16());
}

// --- Access Guard Tests ---

#[tokio::test]
async fn current_user_returns_profile() {
    let app = spawn_app().await;
    let tokens = app.login("alice", "pw123").await;

    let response = app.get_with_token("/me", &tokens.access_token).await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], app.alice_id.to_string());
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "user");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn author_guard_allows_only_own_profile() {
    let app = spawn_app().await;
    let tokens = app.login("alice", "pw123").await;

    let own = app.get_with_token("/users/alice", &tokens.access_token).await;
    assert_eq!(200, own.status().as_u16());

    let other = app.get_with_token("/users/root", &tokens.access_token).await;
    assert_eq!(403, other.status().as_u16());
    let body: Value = other.json().await.unwrap();
    assert_eq!(
        body["message"],
        "caller does not meet the required authorization for this operation"
    );
}

#[tokio::test]
async fn role_guard_allows_admin() {
    let app = spawn_app().await;
    let tokens = app.login("root", "rootpw").await;

    let response = app
        .get_with_token("/admin/users/alice", &tokens.access_token)
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn role_guard_rejects_other_roles_with_403() {
    let app = spawn_app().await;
    let tokens = app.login("alice", "pw123").await;

    let response = app
        .get_with_token("/admin/users/alice", &tokens.access_token)
        .await;

    assert_eq!(403, response.status().as_u16());
    assert_eq!(error_code(response).await, "FORBIDDEN");
}

#[tokio::test]
async fn role_guard_requires_a_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(&format!("{}/admin/users/alice", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn role_guard_rejects_revoked_admin_token() {
    let app = spawn_app().await;
    let tokens = app.login("root", "rootpw").await;

    app.post_with_token("/logout", &tokens.access_token).await;
    let response = app
        .get_with_token("/admin/users/alice", &tokens.access_token)
        .await;

    assert_eq!(401, response.status().as_u16());
}
