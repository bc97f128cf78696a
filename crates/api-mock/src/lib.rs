//! # API Mock
//!
//! In-memory stand-in for the HMS REST backend.
//!
//! Handles:
//! - generic CRUD for every resource collection under `/api/{collection}`
//! - dashboard counts under `/api/dashboard/{metric}`, computed from the stored records
//! - switchable response envelopes, to exercise the client's normalizers
//! - OpenAPI/Swagger documentation
//!
//! Seed data comes from the same fixtures the client falls back on.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod envelope;
pub mod store;

pub use config::MockConfig;
pub use envelope::{envelope_from_env_value, EnvelopeShape};
pub use store::{MockStore, StoreError, COLLECTIONS};

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use hms_core::DashboardMetric;
use hms_wire::RecordId;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<MockStore>>,
    envelope: EnvelopeShape,
}

impl AppState {
    pub fn new(store: MockStore, envelope: EnvelopeShape) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            envelope,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, dashboard_count, list_records, create_record, get_record, update_record, delete_record),
    components(schemas(HealthRes))
)]
struct ApiDoc;

type HandlerError = (StatusCode, &'static str);

/// Builds the mock backend router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/dashboard/:metric", get(dashboard_count))
        .route("/:collection", get(list_records).post(create_record))
        .route(
            "/:collection/:id",
            get(get_record).put(update_record).delete(delete_record),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn store_error(e: StoreError) -> HandlerError {
    match e {
        StoreError::UnknownCollection(_) | StoreError::NotFound { .. } => {
            (StatusCode::NOT_FOUND, "Not found")
        }
        StoreError::Conflict { .. } => (StatusCode::CONFLICT, "Record already exists"),
        StoreError::NotAnObject => (StatusCode::BAD_REQUEST, "Body must be a JSON object"),
    }
}

fn parse_id(raw: &str) -> Result<RecordId, HandlerError> {
    RecordId::parse(raw).map_err(|_| (StatusCode::BAD_REQUEST, "Invalid id"))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for load balancers and the CLI.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "HMS mock API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/dashboard/{metric}",
    params(("metric" = String, Path, description = "total-patients, total-staff, total-doctors, total-nurses, emergency-admissions or available-beds")),
    responses(
        (status = 200, description = "Count in the configured envelope"),
        (status = 404, description = "Unknown metric")
    )
)]
#[axum::debug_handler]
async fn dashboard_count(
    State(state): State<AppState>,
    Path(metric): Path<String>,
) -> Result<Json<Value>, HandlerError> {
    let Some(metric) = DashboardMetric::from_key(&metric) else {
        return Err((StatusCode::NOT_FOUND, "Unknown metric"));
    };
    let count = state.store.read().await.count(metric);
    Ok(Json(state.envelope.wrap_count(count)))
}

#[utoipa::path(
    get,
    path = "/api/{collection}",
    params(("collection" = String, Path, description = "Collection path, e.g. patients or emergency-beds")),
    responses(
        (status = 200, description = "Records in the configured envelope"),
        (status = 404, description = "Unknown collection")
    )
)]
/// List every record in a collection.
///
/// # Errors
/// Returns `404 Not Found` if the collection is not served.
#[axum::debug_handler]
async fn list_records(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<Value>, HandlerError> {
    let store = state.store.read().await;
    let spec = store.spec(&collection).map_err(store_error)?;
    let records = store.list(&collection).map_err(store_error)?;
    Ok(Json(state.envelope.wrap_list(spec.name, records)))
}

#[utoipa::path(
    post,
    path = "/api/{collection}",
    params(("collection" = String, Path, description = "Collection path")),
    responses(
        (status = 201, description = "Stored record"),
        (status = 400, description = "Body is not a JSON object"),
        (status = 404, description = "Unknown collection"),
        (status = 409, description = "A record with this id already exists")
    )
)]
/// Store a new record. An integer id is assigned when the body has none.
#[axum::debug_handler]
async fn create_record(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), HandlerError> {
    let record = state
        .store
        .write()
        .await
        .insert(&collection, body)
        .map_err(store_error)?;
    tracing::info!(%collection, "created record");
    Ok((StatusCode::CREATED, Json(state.envelope.wrap_one(record))))
}

#[utoipa::path(
    get,
    path = "/api/{collection}/{id}",
    params(
        ("collection" = String, Path, description = "Collection path"),
        ("id" = String, Path, description = "Integer or UUID record id")
    ),
    responses(
        (status = 200, description = "Record in the configured envelope"),
        (status = 404, description = "Unknown collection or record")
    )
)]
#[axum::debug_handler]
async fn get_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, HandlerError> {
    let id = parse_id(&id)?;
    let record = state
        .store
        .read()
        .await
        .get(&collection, id)
        .map_err(store_error)?;
    Ok(Json(state.envelope.wrap_one(record)))
}

#[utoipa::path(
    put,
    path = "/api/{collection}/{id}",
    params(
        ("collection" = String, Path, description = "Collection path"),
        ("id" = String, Path, description = "Integer or UUID record id")
    ),
    responses(
        (status = 200, description = "Updated record"),
        (status = 400, description = "Body is not a JSON object"),
        (status = 404, description = "Unknown collection or record")
    )
)]
/// Merge the body's fields into an existing record.
#[axum::debug_handler]
async fn update_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, HandlerError> {
    let id = parse_id(&id)?;
    let record = state
        .store
        .write()
        .await
        .update(&collection, id, body)
        .map_err(store_error)?;
    tracing::info!(%collection, %id, "updated record");
    Ok(Json(state.envelope.wrap_one(record)))
}

#[utoipa::path(
    delete,
    path = "/api/{collection}/{id}",
    params(
        ("collection" = String, Path, description = "Collection path"),
        ("id" = String, Path, description = "Integer or UUID record id")
    ),
    responses(
        (status = 204, description = "Record removed"),
        (status = 404, description = "Unknown collection or record")
    )
)]
#[axum::debug_handler]
async fn delete_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode, HandlerError> {
    let id = parse_id(&id)?;
    state
        .store
        .write()
        .await
        .remove(&collection, id)
        .map_err(|e| {
            tracing::error!("delete failed: {e}");
            store_error(e)
        })?;
    tracing::info!(%collection, %id, "deleted record");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use hms_core::StubStore;
    use serde_json::json;
    use tower::ServiceExt;

    fn app(envelope: EnvelopeShape) -> Router {
        let stubs = StubStore::embedded().expect("fixtures");
        router(AppState::new(MockStore::seeded(&stubs), envelope))
    }

    async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .expect("request");

        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        // Error responses are plain text.
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = call(app(EnvelopeShape::Data), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], json!(true));
    }

    #[tokio::test]
    async fn lists_in_configured_envelope() {
        let (status, body) = call(app(EnvelopeShape::Named), Method::GET, "/api/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["staff"].as_array().expect("array").len(), 5);

        let (_, body) = call(app(EnvelopeShape::Bare), Method::GET, "/api/ot", None).await;
        assert!(body.is_array());
    }

    #[tokio::test]
    async fn unknown_paths_and_bad_ids() {
        let (status, _) = call(app(EnvelopeShape::Data), Method::GET, "/api/visitors", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(app(EnvelopeShape::Data), Method::GET, "/api/patients/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(app(EnvelopeShape::Data), Method::GET, "/api/dashboard/total-visitors", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let app = app(EnvelopeShape::Data);

        let (status, created) = call(
            app.clone(),
            Method::POST,
            "/api/room-beds",
            Some(json!({"RoomNo": "301", "BedNo": "301-A"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["RoomBedsId"], json!(4));

        let (status, updated) = call(
            app.clone(),
            Method::PUT,
            "/api/room-beds/4",
            Some(json!({"RoomCategory": "ICU Step-down"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["RoomCategory"], json!("ICU Step-down"));

        let (status, _) = call(app.clone(), Method::DELETE, "/api/room-beds/4", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(app, Method::GET, "/api/room-beds/4", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn posting_a_taken_id_conflicts() {
        let app = app(EnvelopeShape::Data);

        let (status, body) = call(
            app.clone(),
            Method::POST,
            "/api/patients",
            Some(json!({"PatientId": 1, "PatientName": "Impostor"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!("Record already exists"));

        let (_, body) = call(app.clone(), Method::GET, "/api/patients/1", None).await;
        assert_eq!(body["data"]["PatientName"], json!("Asha Rao"));

        let (_, body) = call(app, Method::GET, "/api/dashboard/total-patients", None).await;
        assert_eq!(body, json!({"data": {"count": 3}}));
    }

    #[tokio::test]
    async fn dashboard_counts_come_from_the_store() {
        let (status, body) = call(
            app(EnvelopeShape::Data),
            Method::GET,
            "/api/dashboard/total-doctors",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": {"count": 2}}));
    }
}
