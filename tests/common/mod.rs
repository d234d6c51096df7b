#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::sync::{mpsc, Mutex};
use tower::ServiceExt;

use agora::app::auth::TokenVerifier;
use agora::app::engagement::EngagementFacade;
use agora::app::feed::FeedWindows;
use agora::app::notifications::NotificationOutbox;
use agora::domain::moderation::ReportCategory;
use agora::domain::notification::EngagementEvent;
use agora::domain::thread::AuthorSnippet;
use agora::infra::memory::MemoryStore;
use agora::AppState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

// "0123456789abcdef0123456789abcdef" (32 bytes), test-only
const TEST_PASETO_ACCESS_KEY: [u8; 32] = *b"0123456789abcdef0123456789abcdef";
const TEST_ADMIN_TOKEN: &str = "test-admin-token-12345";
pub const SPAM_CATEGORY_ID: i64 = 1;

// ---------------------------------------------------------------------------
// TestApp: one isolated in-memory instance per test
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    events: Mutex<mpsc::Receiver<EngagementEvent>>,
    next_id: AtomicI64,
}

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }

    /// Thread ids of a `{"items": [...]}` feed response, in order.
    pub fn thread_ids(&self) -> Vec<i64> {
        self.json()["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| item["thread"]["id"].as_i64().unwrap())
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub struct TestUser {
    pub id: i64,
    pub name: String,
    pub access_token: String,
}

pub async fn app() -> TestApp {
    TestApp::setup().await
}

impl TestApp {
    async fn setup() -> Self {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_report_category(ReportCategory {
                id: SPAM_CATEGORY_ID,
                name: "spam".into(),
            })
            .await;

        let (outbox, receiver) = NotificationOutbox::channel(64);
        let engagement = EngagementFacade::new(store.clone(), outbox, FeedWindows::default());

        let state = AppState {
            engagement,
            tokens: TokenVerifier::new(TEST_PASETO_ACCESS_KEY),
            cache: None,
            admin_token: Some(TEST_ADMIN_TOKEN.to_string()),
        };
        let router = agora::http::router(state.clone());

        TestApp {
            router,
            state,
            store,
            events: Mutex::new(receiver),
            next_id: AtomicI64::new(1),
        }
    }

    // ------------------------------------------------------------------
    // Low-level request helper
    // ------------------------------------------------------------------
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost");

        for &(key, value) in headers {
            builder = builder.header(key, value);
        }

        let request = if let Some(body) = body {
            builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }

    // ------------------------------------------------------------------
    // Convenience HTTP helpers
    // ------------------------------------------------------------------
    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, path, None, token).await
    }

    pub async fn post_json(&self, path: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.send(Method::POST, path, Some(body), token).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::POST, path, None, token).await
    }

    pub async fn patch_json(&self, path: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.send(Method::PATCH, path, Some(body), token).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, path, None, token).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut headers = vec![];
        let auth;
        if let Some(t) = token {
            auth = format!("Bearer {}", t);
            headers.push(("Authorization", auth.as_str()));
        }
        self.request(method, path, body, &headers).await
    }

    /// Request carrying both a bearer token and the admin header.
    pub async fn admin_request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        admin_token: Option<&str>,
    ) -> TestResponse {
        let mut headers = vec![];
        let auth;
        if let Some(t) = token {
            auth = format!("Bearer {}", t);
            headers.push(("Authorization", auth.as_str()));
        }
        if let Some(t) = admin_token {
            headers.push(("x-admin-token", t));
        }
        self.request(method, path, None, &headers).await
    }

    pub fn admin_token(&self) -> &str {
        TEST_ADMIN_TOKEN
    }

    // ------------------------------------------------------------------
    // Test data helpers
    // ------------------------------------------------------------------

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Seeds a user on the identity side and mints an access token for it.
    pub async fn create_user(&self, name: &str) -> TestUser {
        let id = self.next_id();
        self.store
            .insert_user(AuthorSnippet {
                id,
                name: name.to_string(),
                profile_image_url: None,
                profession: Some("tester".into()),
            })
            .await;
        let access_token = self
            .state
            .tokens
            .issue_access_token(id, Duration::from_secs(600))
            .expect("issue_access_token failed");

        TestUser {
            id,
            name: name.to_string(),
            access_token,
        }
    }

    pub async fn create_community(&self) -> i64 {
        let id = self.next_id();
        self.store.insert_community(id).await;
        id
    }

    /// Creates a thread through the API. Returns its id.
    pub async fn create_thread(&self, author: &TestUser, community_id: i64, title: &str) -> i64 {
        let resp = self
            .post_json(
                "/threads",
                json!({
                    "community_id": community_id,
                    "title": title,
                    "body": format!("body of {}", title),
                }),
                Some(&author.access_token),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "create thread failed");
        resp.json()["id"].as_i64().unwrap()
    }

    /// Adds a comment through the API. Returns its id.
    pub async fn create_comment(&self, author: &TestUser, thread_id: i64, body: &str) -> i64 {
        let resp = self
            .post_json(
                &format!("/threads/{}/comments", thread_id),
                json!({ "body": body }),
                Some(&author.access_token),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "create comment failed");
        resp.json()["id"].as_i64().unwrap()
    }

    pub fn engagement(&self) -> &EngagementFacade {
        &self.state.engagement
    }

    /// Notification events queued so far.
    pub async fn drain_events(&self) -> Vec<EngagementEvent> {
        let mut receiver = self.events.lock().await;
        let mut events = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        events
    }
}
