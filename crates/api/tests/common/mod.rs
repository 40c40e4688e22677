//! Shared helpers for HTTP-level integration tests.
//!
//! `build_test_app` mirrors the router construction in `main.rs` so tests
//! exercise the same middleware stack (CORS, request ID, timeout, tracing,
//! panic recovery) that production uses. Seed helpers go through the
//! repositories directly; requests go through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use geolab_api::auth::jwt::{generate_access_token, JwtConfig};
use geolab_api::auth::password::hash_password;
use geolab_api::config::ServerConfig;
use geolab_api::routes;
use geolab_api::state::AppState;
use geolab_db::models::client::{Client, CreateClient};
use geolab_db::models::echantillon::{CreateEchantillon, Echantillon};
use geolab_db::models::user::{CreateUser, User};
use geolab_db::repositories::{ClientRepo, EchantillonRepo, UserRepo};

/// Password shared by all seeded test accounts.
pub const TEST_PASSWORD: &str = "Motdepasse!2026";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// No event persistence task is spawned; events published during tests go
/// to subscribers only.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let event_bus = Arc::new(geolab_events::EventBus::default());

    let state = AppState {
        pool,
        config: Arc::new(config),
        event_bus,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Create an active user with the given role and mint an access token for it.
pub async fn seed_user(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let password_hash = hash_password(TEST_PASSWORD).expect("password hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@snertp.test"),
            password_hash,
            full_name: username.to_string(),
            role: role.to_string(),
            telephone: String::new(),
        },
    )
    .await
    .expect("user creation should succeed");

    let token = generate_access_token(user.id, role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Register a client and one sample for it, returning both rows.
pub async fn seed_echantillon(pool: &PgPool) -> (Client, Echantillon) {
    let client = ClientRepo::create(
        pool,
        &CreateClient {
            nom: "Laborex BTP".to_string(),
            projet: "Campagne géotechnique zone portuaire".to_string(),
            contact: "A. Kouassi".to_string(),
            telephone: "+225 0102030405".to_string(),
            email: "contact@laborex.test".to_string(),
        },
        None,
    )
    .await
    .expect("client creation should succeed");

    let echantillon = EchantillonRepo::create(
        pool,
        &CreateEchantillon {
            client_id: client.id,
            nature: "Sol".to_string(),
            profondeur_debut: 1.5,
            profondeur_fin: 3.0,
            sondage: "carotte".to_string(),
            numero_sondage: Some("SC-01".to_string()),
            nappe: String::new(),
            priorite: None,
            chef_projet: "K. Diabaté".to_string(),
            date_reception: None,
        },
        None,
    )
    .await
    .expect("sample creation should succeed");

    (client, echantillon)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("request should not fail")
}

/// GET with a Bearer token.
pub async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

/// GET without authentication (health check, negative auth tests).
pub async fn get_public(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

/// POST a JSON body with a Bearer token.
pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST a JSON body without authentication (login).
pub async fn post_json_public(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

/// POST with an empty body and a Bearer token (mark-read endpoints).
pub async fn post_empty(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
