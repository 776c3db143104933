//! api-server — HTTP API for the Testimonial Store.
//!
//! Exposes the four testimonial operations over a REST-ish JSON surface:
//! - GET    /api/testimonials      list, newest first
//! - POST   /api/testimonials      create (validated)
//! - PUT    /api/testimonials/:id  update review/rating (admin only)
//! - DELETE /api/testimonials/:id  delete (admin only)
//!
//! Storage: MongoDB (default) or in-memory via STORAGE_PROVIDER=memory.
//! CORS: Configurable via CORS_ALLOW_ORIGIN (origin string), `*` by default.
//!
//! Run:
//! ```bash
//! # pretty logs (default); PORT optional
//! ADMIN_EMAIL=admin@example.com cargo run -p api-server
//!
//! # against a local MongoDB
//! ADMIN_EMAIL=admin@example.com \
//! MONGODB_URI=mongodb://127.0.0.1:27017 \
//!   cargo run -p api-server
//! ```
//!
//! Configuration: See `config.rs` for all environment variables.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use axum::http::HeaderValue;
use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use domain::adapters::memory_repo::InMemoryRepo;
use domain::service::TestimonialService;
use domain::{
    Clock, CoreError, NewTestimonial, Testimonial, TestimonialPatch, TestimonialRepository,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Localized client-facing messages, kept byte-identical to the original API.
const MSG_INCOMPLETE: &str = "Mohon lengkapi data.";
const MSG_DELETED: &str = "Testimoni berhasil dihapus.";
const MSG_FORBIDDEN_DELETE: &str = "Akses ditolak. Hanya admin yang dapat menghapus.";
const MSG_FORBIDDEN_UPDATE: &str = "Akses ditolak. Hanya admin yang dapat mengubah.";

// Local repo abstraction supporting memory or mongo (feature-gated).
enum RepoKind {
    Memory(InMemoryRepo),
    #[cfg(feature = "mongo")]
    Mongo(mongo_adapter::MongoRepo),
    #[cfg(test)]
    Failing(tests::FailingRepo),
}

struct AnyRepo {
    kind: Arc<RepoKind>,
}

impl AnyRepo {
    fn memory() -> Self {
        Self {
            kind: Arc::new(RepoKind::Memory(InMemoryRepo::new())),
        }
    }

    #[cfg(feature = "mongo")]
    async fn mongo_from_env() -> Result<Self, CoreError> {
        Ok(Self {
            kind: Arc::new(RepoKind::Mongo(mongo_adapter::MongoRepo::from_env().await?)),
        })
    }

    #[cfg(test)]
    fn failing() -> Self {
        Self {
            kind: Arc::new(RepoKind::Failing(tests::FailingRepo)),
        }
    }
}

#[async_trait]
impl TestimonialRepository for AnyRepo {
    async fn list(&self) -> Result<Vec<Testimonial>, CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => r.list().await,
            #[cfg(feature = "mongo")]
            RepoKind::Mongo(r) => r.list().await,
            #[cfg(test)]
            RepoKind::Failing(r) => r.list().await,
        }
    }

    async fn create(
        &self,
        new: NewTestimonial,
        created_at: SystemTime,
    ) -> Result<Testimonial, CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => r.create(new, created_at).await,
            #[cfg(feature = "mongo")]
            RepoKind::Mongo(r) => r.create(new, created_at).await,
            #[cfg(test)]
            RepoKind::Failing(r) => r.create(new, created_at).await,
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => r.delete_by_id(id).await,
            #[cfg(feature = "mongo")]
            RepoKind::Mongo(r) => r.delete_by_id(id).await,
            #[cfg(test)]
            RepoKind::Failing(r) => r.delete_by_id(id).await,
        }
    }

    async fn update_by_id(
        &self,
        id: &str,
        patch: TestimonialPatch,
    ) -> Result<Option<Testimonial>, CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => r.update_by_id(id, patch).await,
            #[cfg(feature = "mongo")]
            RepoKind::Mongo(r) => r.update_by_id(id, patch).await,
            #[cfg(test)]
            RepoKind::Failing(r) => r.update_by_id(id, patch).await,
        }
    }
}

#[derive(Clone)]
struct AppState {
    service: Arc<TestimonialService<AnyRepo, StdClock>>,
}

#[derive(Clone)]
struct StdClock;
impl Clock for StdClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[tokio::main]
async fn main() {
    // Load and validate config first (fail fast on misconfiguration)
    let cfg = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&cfg);
    cfg.warn_if_insecure();

    let repo = build_repo(&cfg).await;
    let state = AppState {
        service: Arc::new(TestimonialService::new(
            repo,
            StdClock,
            cfg.admin_email.clone(),
        )),
    };

    // Request ID header name
    let x_request_id = axum::http::HeaderName::from_static("x-request-id");

    let mut app = Router::new()
        .route(
            "/api/testimonials",
            get(list_testimonials)
                .post(create_testimonial)
                .options(preflight),
        )
        .route(
            "/api/testimonials/:id",
            axum::routing::put(update_testimonial)
                .delete(delete_testimonial)
                .options(preflight),
        )
        .layer(DefaultBodyLimit::max(cfg.body_limit_bytes))
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
        .with_state(state);

    // CORS - already validated in Config::from_env()
    let cors = if cfg.cors_allow_origin == HeaderValue::from_static("*") {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list([cfg.cors_allow_origin]))
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    };
    app = app.layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    info!(%addr, "api-server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind port");
    axum::serve(listener, app).await.expect("server error");
}

fn init_tracing(cfg: &config::Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
        config::LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
    }
}

// Construct a repository instance based on config and feature flags.
async fn build_repo(cfg: &config::Config) -> AnyRepo {
    match cfg.storage_provider {
        #[cfg(feature = "mongo")]
        config::StorageProvider::Mongo => match AnyRepo::mongo_from_env().await {
            Ok(r) => r,
            Err(e) => {
                eprintln!("failed to init MongoRepo from env: {e}");
                AnyRepo::memory()
            }
        },
        _ => AnyRepo::memory(),
    }
}

#[derive(Deserialize)]
struct CreateTestimonialReq {
    #[serde(rename = "userName")]
    user_name: Option<String>,
    #[serde(rename = "userEmail", default)]
    user_email: Option<String>,
    #[serde(rename = "userEmailMasked", default)]
    user_email_masked: Option<String>,
    #[serde(default)]
    photo: Option<String>,
    rating: Option<f64>,
    review: Option<String>,
}

#[derive(Deserialize)]
struct DeleteTestimonialReq {
    #[serde(rename = "adminEmail", default)]
    admin_email: String,
}

#[derive(Deserialize)]
struct UpdateTestimonialReq {
    #[serde(rename = "adminEmail", default)]
    admin_email: String,
    review: String,
    rating: f64,
}

#[derive(Serialize)]
struct TestimonialOut {
    id: String,
    #[serde(rename = "userName")]
    user_name: String,
    #[serde(rename = "userEmail", skip_serializing_if = "Option::is_none")]
    user_email: Option<String>,
    #[serde(rename = "userEmailMasked", skip_serializing_if = "Option::is_none")]
    user_email_masked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo: Option<String>,
    rating: f64,
    review: String,
    #[serde(rename = "createdAt")]
    created_at: String,
}

fn testimonial_to_out(t: Testimonial) -> TestimonialOut {
    TestimonialOut {
        id: t.id,
        user_name: t.user_name,
        user_email: t.user_email,
        user_email_masked: t.user_email_masked,
        photo: t.photo,
        rating: t.rating,
        review: t.review,
        created_at: http_common::system_time_to_rfc3339(t.created_at),
    }
}

async fn list_testimonials(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.list().await {
        Ok(items) => {
            let out: Vec<TestimonialOut> = items.into_iter().map(testimonial_to_out).collect();
            (StatusCode::OK, Json(out)).into_response()
        }
        Err(e) => {
            error!(err = %e, "list error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(http_common::json_message(&e.to_string())),
            )
                .into_response()
        }
    }
}

async fn create_testimonial(
    State(state): State<AppState>,
    Json(body): Json<CreateTestimonialReq>,
) -> impl IntoResponse {
    // Presence of the required fields; emptiness is checked by the service.
    let (Some(user_name), Some(rating), Some(review)) = (body.user_name, body.rating, body.review)
    else {
        warn!("create rejected: incomplete input");
        return (
            StatusCode::BAD_REQUEST,
            Json(http_common::json_message(MSG_INCOMPLETE)),
        )
            .into_response();
    };

    let input = NewTestimonial {
        user_name,
        user_email: body.user_email,
        user_email_masked: body.user_email_masked,
        photo: body.photo,
        rating,
        review,
    };

    match state.service.create(input).await {
        Ok(t) => {
            info!(id = %t.id, "create ok");
            (StatusCode::CREATED, Json(testimonial_to_out(t))).into_response()
        }
        Err(CoreError::MissingFields) => {
            warn!("create rejected: incomplete input");
            (
                StatusCode::BAD_REQUEST,
                Json(http_common::json_message(MSG_INCOMPLETE)),
            )
                .into_response()
        }
        // A failed write on create surfaces as a 400 with the storage
        // message, matching the original API's contract.
        Err(e) => {
            error!(err = %e, "create error");
            (
                StatusCode::BAD_REQUEST,
                Json(http_common::json_message(&e.to_string())),
            )
                .into_response()
        }
    }
}

async fn preflight() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn update_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTestimonialReq>,
) -> impl IntoResponse {
    let patch = TestimonialPatch {
        review: body.review,
        rating: body.rating,
    };
    match state.service.update(&id, &body.admin_email, patch).await {
        Ok(Some(t)) => {
            info!(id = %id, "update ok");
            (StatusCode::OK, Json(testimonial_to_out(t))).into_response()
        }
        // Missing target is not an error: the caller gets an empty result.
        Ok(None) => {
            warn!(id = %id, "update target not found");
            (StatusCode::OK, Json(serde_json::Value::Null)).into_response()
        }
        Err(CoreError::AccessDenied) => {
            warn!(id = %id, "update forbidden");
            (
                StatusCode::FORBIDDEN,
                Json(http_common::json_message(MSG_FORBIDDEN_UPDATE)),
            )
                .into_response()
        }
        Err(e) => {
            error!(err = %e, "update error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(http_common::json_message(&e.to_string())),
            )
                .into_response()
        }
    }
}

async fn delete_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<DeleteTestimonialReq>,
) -> impl IntoResponse {
    match state.service.delete(&id, &body.admin_email).await {
        Ok(()) => {
            info!(id = %id, "delete ok");
            (
                StatusCode::OK,
                Json(http_common::json_message(MSG_DELETED)),
            )
                .into_response()
        }
        Err(CoreError::AccessDenied) => {
            warn!(id = %id, "delete forbidden");
            (
                StatusCode::FORBIDDEN,
                Json(http_common::json_message(MSG_FORBIDDEN_DELETE)),
            )
                .into_response()
        }
        Err(e) => {
            error!(err = %e, "delete error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(http_common::json_message(&e.to_string())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    const ADMIN: &str = "admin@example.com";
    const STORAGE_ERR: &str = "connection refused";

    /// Repository double whose every operation fails with a fixed storage
    /// message, for exercising the error-passthrough arms.
    pub(crate) struct FailingRepo;

    #[async_trait]
    impl TestimonialRepository for FailingRepo {
        async fn list(&self) -> Result<Vec<Testimonial>, CoreError> {
            Err(CoreError::Repository(STORAGE_ERR.into()))
        }

        async fn create(
            &self,
            _new: NewTestimonial,
            _created_at: SystemTime,
        ) -> Result<Testimonial, CoreError> {
            Err(CoreError::Repository(STORAGE_ERR.into()))
        }

        async fn delete_by_id(&self, _id: &str) -> Result<(), CoreError> {
            Err(CoreError::Repository(STORAGE_ERR.into()))
        }

        async fn update_by_id(
            &self,
            _id: &str,
            _patch: TestimonialPatch,
        ) -> Result<Option<Testimonial>, CoreError> {
            Err(CoreError::Repository(STORAGE_ERR.into()))
        }
    }

    fn app() -> Router {
        app_with(AnyRepo::memory())
    }

    fn failing_app() -> Router {
        app_with(AnyRepo::failing())
    }

    fn app_with(repo: AnyRepo) -> Router {
        let state = AppState {
            service: Arc::new(TestimonialService::new(repo, StdClock, ADMIN)),
        };
        Router::new()
            .route(
                "/api/testimonials",
                get(list_testimonials)
                    .post(create_testimonial)
                    .options(preflight),
            )
            .route(
                "/api/testimonials/:id",
                axum::routing::put(update_testimonial)
                    .delete(delete_testimonial)
                    .options(preflight),
            )
            .with_state(state)
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_create(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/testimonials")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_list() -> Request<Body> {
        Request::builder()
            .uri("/api/testimonials")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn full_moderation_flow() {
        let router = app();

        // Create
        let resp = router
            .clone()
            .oneshot(post_create(
                r#"{"userName":"Ana","userEmail":"ana@example.com","rating":5,"review":"Great"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = body_json(resp).await;
        let id = created["id"].as_str().expect("generated id").to_string();
        assert!(!id.is_empty());
        assert!(created["createdAt"].is_string());
        assert_eq!(created["rating"], serde_json::json!(5.0));
        assert_eq!(created["userName"], "Ana");

        // List: newest first, our record on top
        let resp = router.clone().oneshot(get_list()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let listed = body_json(resp).await;
        assert_eq!(listed[0]["id"], id.as_str());

        // Update with wrong admin: 403 and the record is unchanged
        let resp = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/testimonials/{}", id))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"adminEmail":"intruder@example.com","review":"Hacked","rating":1}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let resp = router.clone().oneshot(get_list()).await.unwrap();
        let listed = body_json(resp).await;
        assert_eq!(listed[0]["review"], "Great");
        assert_eq!(listed[0]["rating"], serde_json::json!(5.0));

        // Update with the configured admin
        let resp = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/testimonials/{}", id))
                    .header("content-type", "application/json")
                    .body(Body::from(format!(
                        r#"{{"adminEmail":"{}","review":"Updated","rating":4}}"#,
                        ADMIN
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let updated = body_json(resp).await;
        assert_eq!(updated["review"], "Updated");
        assert_eq!(updated["rating"], serde_json::json!(4.0));
        assert_eq!(updated["userName"], "Ana");
        assert_eq!(updated["createdAt"], created["createdAt"]);

        // Delete with the configured admin, then the list no longer has it
        let resp = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/testimonials/{}", id))
                    .header("content-type", "application/json")
                    .body(Body::from(format!(r#"{{"adminEmail":"{}"}}"#, ADMIN)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let deleted = body_json(resp).await;
        assert_eq!(deleted["message"], MSG_DELETED);

        let resp = router.clone().oneshot(get_list()).await.unwrap();
        let listed = body_json(resp).await;
        assert_eq!(listed, serde_json::json!([]));
    }

    #[tokio::test]
    async fn create_missing_fields_is_rejected_without_write() {
        let router = app();

        let resp = router
            .clone()
            .oneshot(post_create(r#"{"userName":"Ana","rating":5}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["message"], MSG_INCOMPLETE);

        let resp = router.clone().oneshot(get_list()).await.unwrap();
        assert_eq!(body_json(resp).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn create_empty_review_is_rejected() {
        let router = app();
        let resp = router
            .oneshot(post_create(r#"{"userName":"Ana","rating":5,"review":""}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["message"], MSG_INCOMPLETE);
    }

    #[tokio::test]
    async fn create_whitespace_fields_are_accepted() {
        // Presence check only: whitespace is non-empty and stored verbatim.
        let router = app();
        let resp = router
            .clone()
            .oneshot(post_create(
                r#"{"userName":"  ","rating":5,"review":"ok"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_json(resp).await["userName"], "  ");
    }

    #[tokio::test]
    async fn delete_wrong_admin_is_forbidden() {
        let router = app();
        let resp = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/testimonials/000000000000000000000001")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"adminEmail":"intruder@example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(resp).await["message"], MSG_FORBIDDEN_DELETE);
    }

    #[tokio::test]
    async fn delete_unknown_id_still_succeeds() {
        let router = app();
        let resp = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/testimonials/ffffffffffffffffffffffff")
                    .header("content-type", "application/json")
                    .body(Body::from(format!(r#"{{"adminEmail":"{}"}}"#, ADMIN)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["message"], MSG_DELETED);
    }

    #[tokio::test]
    async fn update_unknown_id_returns_null_body() {
        let router = app();
        let resp = router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/testimonials/ffffffffffffffffffffffff")
                    .header("content-type", "application/json")
                    .body(Body::from(format!(
                        r#"{{"adminEmail":"{}","review":"x","rating":1}}"#,
                        ADMIN
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::Value::Null);
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let router = app();
        for name in ["first", "second", "third"] {
            let resp = router
                .clone()
                .oneshot(post_create(&format!(
                    r#"{{"userName":"{}","rating":5,"review":"ok"}}"#,
                    name
                )))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
        }
        let resp = router.clone().oneshot(get_list()).await.unwrap();
        let listed = body_json(resp).await;
        let times: Vec<std::time::SystemTime> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|t| {
                http_common::rfc3339_to_system_time(t["createdAt"].as_str().unwrap()).unwrap()
            })
            .collect();
        assert_eq!(times.len(), 3);
        assert!(times.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn list_storage_error_is_500_with_verbatim_message() {
        let router = failing_app();
        let resp = router.oneshot(get_list()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["message"], STORAGE_ERR);
    }

    #[tokio::test]
    async fn create_storage_error_is_400_with_verbatim_message() {
        let router = failing_app();
        let resp = router
            .oneshot(post_create(
                r#"{"userName":"Ana","rating":5,"review":"Great"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["message"], STORAGE_ERR);
    }

    #[tokio::test]
    async fn delete_storage_error_is_500_with_verbatim_message() {
        let router = failing_app();
        let resp = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/testimonials/000000000000000000000001")
                    .header("content-type", "application/json")
                    .body(Body::from(format!(r#"{{"adminEmail":"{}"}}"#, ADMIN)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["message"], STORAGE_ERR);
    }

    #[tokio::test]
    async fn update_storage_error_is_500_with_verbatim_message() {
        let router = failing_app();
        let resp = router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/testimonials/000000000000000000000001")
                    .header("content-type", "application/json")
                    .body(Body::from(format!(
                        r#"{{"adminEmail":"{}","review":"x","rating":1}}"#,
                        ADMIN
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["message"], STORAGE_ERR);
    }

    #[tokio::test]
    async fn preflight_returns_no_content() {
        let router = app();
        let resp = router
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/testimonials")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
}
