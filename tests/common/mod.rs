//! Test harness: the full router over an in-memory store, with real JWTs.

#![allow(dead_code, clippy::panic)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use campus_events::api;
use campus_events::app_state::AppState;
use campus_events::auth::JwtIdentityResolver;
use campus_events::persistence::{MemoryStore, Store};

pub const SECRET: &str = "integration-test-secret";

/// A router plus a resolver able to mint tokens it accepts.
pub struct TestApp {
    router: Router,
    resolver: JwtIdentityResolver,
}

/// A profile created through the API, with its bearer token.
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn Store>) -> Self {
        let resolver = JwtIdentityResolver::new(SECRET, None);
        let state = AppState::new(store, Arc::new(resolver.clone()));
        Self {
            router: api::build_router().with_state(state),
            resolver,
        }
    }

    pub fn token(&self, id: Uuid, email: &str) -> String {
        let Ok(token) = self
            .resolver
            .issue(id, Some(email), chrono::Duration::hours(1))
        else {
            panic!("failed to mint token");
        };
        token
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let Ok(request) = builder.body(body) else {
            panic!("invalid request for {uri}");
        };
        let Ok(response) = self.router.clone().oneshot(request).await else {
            panic!("router failed for {uri}");
        };
        let status = response.status();
        let Ok(collected) = response.into_body().collect().await else {
            panic!("failed to read body for {uri}");
        };
        let bytes = collected.to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    /// Creates a profile through `POST /profiles`.
    pub async fn user(&self, email: &str) -> TestUser {
        let id = Uuid::new_v4();
        let token = self.token(id, email);
        let (status, _) = self
            .send(
                Method::POST,
                "/profiles",
                Some(&token),
                Some(json!({ "first_name": "Test", "last_name": "User" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "profile creation failed");
        TestUser { id, token }
    }

    /// Creates an organization administered by `admin`.
    pub async fn organization(&self, admin: &TestUser, email: &str) -> Uuid {
        let (status, body) = self
            .send(
                Method::POST,
                "/organizations",
                Some(&admin.token),
                Some(json!({ "organization_name": "Chess Club", "email": email })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "organization creation failed: {body}");
        uuid_at(&body, "organizationId")
    }

    pub async fn building(&self, name: &str) -> Uuid {
        let (status, body) = self
            .send(
                Method::POST,
                "/buildings",
                None,
                Some(json!({ "name": name, "latitude": 42.39, "longitude": -72.52 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "building creation failed: {body}");
        uuid_at(&body, "id")
    }

    /// Creates an event as `user`, returning the raw response.
    pub async fn create_event(
        &self,
        user: &TestUser,
        organization: Uuid,
        building: Option<Uuid>,
    ) -> (StatusCode, Value) {
        self.create_event_on(user, organization, building, "2025-04-12")
            .await
    }

    /// Like [`TestApp::create_event`] with an explicit `YYYY-MM-DD` date.
    pub async fn create_event_on(
        &self,
        user: &TestUser,
        organization: Uuid,
        building: Option<Uuid>,
        date: &str,
    ) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            &format!("/events/organization/{organization}"),
            Some(&user.token),
            Some(json!({
                "name": "Blitz Tournament",
                "date": date,
                "time": "18:30:00",
                "building_id": building,
                "attendance": 12
            })),
        )
        .await
    }
}

pub fn uuid_at(body: &Value, key: &str) -> Uuid {
    let Some(id) = body
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
    else {
        panic!("no uuid at {key} in {body}");
    };
    id
}

pub fn total(body: &Value) -> i64 {
    body.get("total").and_then(Value::as_i64).unwrap_or(-1)
}

pub fn len(body: &Value, key: &str) -> usize {
    body.get(key)
        .and_then(Value::as_array)
        .map_or(usize::MAX, Vec::len)
}

pub fn error(body: &Value) -> &str {
    body.get("error").and_then(Value::as_str).unwrap_or_default()
}
