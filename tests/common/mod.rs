#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use reqwest::Response;
use serde_json::{json, Value};
use session_gate::auth::{hash_password_with_cost, MokaRevocationStore, TokenService};
use session_gate::configuration::JwtSettings;
use session_gate::startup::{run, AppState};
use session_gate::users::{InMemoryUserStore, User};
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub jwt: JwtSettings,
    pub alice_id: Uuid,
}

pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
}

pub fn jwt_settings(access_token_expiry: i64, refresh_token_expiry: i64) -> JwtSettings {
    JwtSettings {
        secret: TEST_SECRET.to_string(),
        access_token_expiry,
        refresh_token_expiry,
        issuer: "session-gate-tests".to_string(),
        leeway: 0,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(jwt_settings(900, 3600)).await
}

/// Start the server on a random port with alice/pw123 (role `user`) and
/// root/rootpw (role `admin`) in an in-memory user store.
pub async fn spawn_app_with(jwt: JwtSettings) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let alice_id = Uuid::new_v4();
    let users = InMemoryUserStore::new()
        .with_user(User {
            id: alice_id,
            username: "alice".to_string(),
            password_hash: hash_password_with_cost("pw123", 4).unwrap(),
            role: "user".to_string(),
        })
        .with_user(User {
            id: Uuid::new_v4(),
            username: "root".to_string(),
            password_hash: hash_password_with_cost("rootpw", 4).unwrap(),
            role: "admin".to_string(),
        });

    let state = AppState {
        tokens: TokenService::new(&jwt, Arc::new(MokaRevocationStore::new())),
        users: Arc::new(users),
    };
    let server = run(listener, state).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        client: reqwest::Client::new(),
        jwt,
        alice_id,
    }
}

impl TestApp {
    pub async fn post_login(&self, body: &Value) -> Response {
        self.client
            .post(&format!("{}/login", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, username: &str, password: &str) -> Tokens {
        let response = self
            .post_login(&json!({ "username": username, "password": password }))
            .await;
        assert_eq!(200, response.status().as_u16());

        let body: Value = response.json().await.expect("Failed to parse response");
        Tokens {
            access_token: body["access_token"].as_str().unwrap().to_string(),
            refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn post_with_token(&self, path: &str, token: &str) -> Response {
        self.client
            .post(&format!("{}{}", &self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> Response {
        self.client
            .get(&format!("{}{}", &self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// `code` field of an error body
pub async fn error_code(response: Response) -> String {
    let body: Value = response.json().await.expect("Failed to parse response");
    body["code"].as_str().unwrap_or_default().to_string()
}
