#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use lotr_favorites_api::auth::{generate_jwt, Claims, TokenVerifier};
use lotr_favorites_api::config::AppConfig;
use lotr_favorites_api::database::{DatabaseError, Favorite, FavoritesRepository, NewFavorite};
use lotr_favorites_api::upstream::OneApiClient;
use lotr_favorites_api::{router, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const UPSTREAM_KEY: &str = "test-upstream-key";

/// Character id whose quote endpoint always fails
pub const BROKEN_CHARACTER_ID: &str = "c-broken";

// ---------------------------------------------------------------------------
// Stub upstream: a small axum server standing in for The One API
// ---------------------------------------------------------------------------

pub struct StubUpstream {
    pub base_url: String,
    state: Arc<StubState>,
}

#[derive(Default)]
struct StubState {
    hits: AtomicUsize,
    paths: Mutex<Vec<String>>,
    auth_headers: Mutex<Vec<String>>,
}

impl StubState {
    fn record(&self, path: String, headers: &HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().unwrap().push(path);
        if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            self.auth_headers.lock().unwrap().push(value.to_string());
        }
    }
}

fn characters() -> Vec<Value> {
    vec![
        json!({ "_id": "c1", "name": "Frodo", "race": "Hobbit" }),
        json!({ "_id": "c2", "name": "Sam", "race": "Hobbit" }),
        json!({ "_id": BROKEN_CHARACTER_ID, "name": "Broken", "race": "Unknown" }),
    ]
}

fn quotes() -> Vec<Value> {
    vec![
        json!({ "_id": "q1", "dialog": "I will take it!", "movie": "m1", "character": "c1" }),
        json!({ "_id": "q2", "dialog": "Po-tay-toes", "movie": "m2", "character": "c2" }),
        json!({ "_id": "q3", "dialog": "I wish the Ring had never come to me.", "movie": "m1", "character": "c1" }),
        json!({ "_id": "q4", "dialog": "It's gone!", "movie": "m3", "character": "c1" }),
    ]
}

fn page(docs: Vec<Value>) -> Value {
    let total = docs.len();
    json!({ "docs": docs, "total": total, "limit": 1000, "offset": 0, "page": 1, "pages": 1 })
}

async fn stub_characters(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.record("/v2/character".to_string(), &headers);
    let docs = characters()
        .into_iter()
        .filter(|c| match params.get("name") {
            Some(name) => c["name"] == json!(name),
            None => true,
        })
        .collect();
    Json(page(docs))
}

async fn stub_character_quotes(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    state.record(format!("/v2/character/{}/quote", id), &headers);
    if id == BROKEN_CHARACTER_ID {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "boom" })));
    }
    let docs = quotes().into_iter().filter(|q| q["character"] == json!(id)).collect();
    (StatusCode::OK, Json(page(docs)))
}

async fn stub_quotes(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Json<Value> {
    state.record("/v2/quote".to_string(), &headers);
    Json(page(quotes()))
}

impl StubUpstream {
    pub async fn spawn() -> Result<Self> {
        let state = Arc::new(StubState::default());
        let app = Router::new()
            .route("/v2/character", get(stub_characters))
            .route("/v2/character/:id/quote", get(stub_character_quotes))
            .route("/v2/quote", get(stub_quotes))
            .with_state(state.clone());

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}/v2", port),
            state,
        })
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.state.paths.lock().unwrap().clone()
    }

    pub fn auth_headers(&self) -> Vec<String> {
        self.state.auth_headers.lock().unwrap().clone()
    }
}

// ---------------------------------------------------------------------------
// In-memory favorites store with the same owner scoping as the Postgres one
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryFavorites {
    rows: Mutex<Vec<Favorite>>,
    next_id: AtomicI64,
    pub calls: AtomicUsize,
}

impl MemoryFavorites {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn all_rows(&self) -> Vec<Favorite> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl FavoritesRepository for MemoryFavorites {
    async fn list(&self, owner: &str) -> Result<Vec<Favorite>, DatabaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().iter().filter(|f| f.owner_id == owner).cloned().collect())
    }

    async fn create(&self, owner: &str, favorite: NewFavorite) -> Result<Favorite, DatabaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let row = Favorite {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            quote_ref: favorite.quote_ref,
            dialog: favorite.dialog,
            character_ref: favorite.character_ref,
            owner_id: owner.to_string(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn delete(&self, owner: &str, id: i64) -> Result<u64, DatabaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|f| !(f.id == id && f.owner_id == owner));
        Ok((before - rows.len()) as u64)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// The application under test, driven in-process
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub upstream: StubUpstream,
    pub favorites: Arc<MemoryFavorites>,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let upstream = StubUpstream::spawn().await?;

        let mut config = AppConfig::development();
        config.security.jwt_secret = JWT_SECRET.to_string();
        config.upstream.base_url = upstream.base_url.clone();
        config.upstream.api_key = UPSTREAM_KEY.to_string();
        config.upstream.timeout_secs = Some(5);

        let favorites = Arc::new(MemoryFavorites::default());
        let client = OneApiClient::new(&config.upstream)?;
        let verifier = TokenVerifier::from_config(&config.security)?;

        let state = AppState::new(verifier, Arc::new(client), favorites.clone());

        Ok(Self {
            router: router(state, &config),
            upstream,
            favorites,
        })
    }

    pub fn token(user: &str) -> String {
        generate_jwt(JWT_SECRET, &Claims::new(user, 1).expect("claims")).expect("token")
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?
        };
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, user: Option<&str>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::get(path);
        if let Some(user) = user {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", Self::token(user)));
        }
        self.send(builder.body(Body::empty())?).await
    }

    pub async fn get_with_header(&self, path: &str, authorization: &str) -> Result<(StatusCode, Value)> {
        let request = Request::get(path).header(AUTHORIZATION, authorization).body(Body::empty())?;
        self.send(request).await
    }

    pub async fn post_json(&self, path: &str, user: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.post_raw(path, user, body.to_string()).await
    }

    pub async fn post_raw(&self, path: &str, user: &str, body: String) -> Result<(StatusCode, Value)> {
        let request = Request::post(path)
            .header(AUTHORIZATION, format!("Bearer {}", Self::token(user)))
            .header("content-type", "application/json")
            .body(Body::from(body))?;
        self.send(request).await
    }

    pub async fn delete(&self, path: &str, user: &str) -> Result<(StatusCode, Value)> {
        let request = Request::delete(path)
            .header(AUTHORIZATION, format!("Bearer {}", Self::token(user)))
            .body(Body::empty())?;
        self.send(request).await
    }
}
