//! HTTP surface for the student registry.
//!
//! The router exposes the registry through a compact Axum application:
//!
//! - `POST /students` – Validate and store a new student; the body's `id`, if any, is ignored.
//! - `GET /students` – List every student in insertion order.
//! - `GET /students/{id}` – Fetch one student.
//! - `PUT /students/{id}` – Replace every field of a student except its identifier.
//! - `DELETE /students/{id}` – Remove a student.
//! - `GET /students/{id}/summary` – Ask the configured Ollama model for a one-sentence summary.
//! - `GET /metrics` – Registry counters.
//!
//! Successful responses use the `{ "message": ..., "data": ... }` envelope; failures return
//! `{ "error": ... }` with a short message. `{id}` must be a decimal digit string; anything else
//! falls through to the same 404 the router returns for unknown paths.

use crate::students::{StudentApi, StudentDraft, StudentError, StudentId};
use async_trait::async_trait;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the registry.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: StudentApi + 'static,
{
    Router::new()
        .route(
            "/students",
            get(list_students::<S>).post(create_student::<S>),
        )
        .route(
            "/students/:id",
            get(get_student::<S>)
                .put(update_student::<S>)
                .delete(delete_student::<S>),
        )
        .route("/students/:id/summary", get(summarize_student::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .fallback(route_not_found)
        .with_state(service)
}

/// Success envelope shared by every endpoint.
#[derive(Serialize)]
struct Envelope<T> {
    message: &'static str,
    data: Option<T>,
}

fn success<T: Serialize>(message: &'static str, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        message,
        data: Some(data),
    })
}

/// Store and return a new student.
async fn create_student<S>(
    State(service): State<Arc<S>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError>
where
    S: StudentApi,
{
    let draft = decode_draft(&body)?;
    let student = service
        .create_student(draft)
        .map_err(write_error("Failed to create student"))?;
    tracing::info!(id = student.id, "Student created");
    Ok(success("Student created successfully", student))
}

async fn list_students<S>(State(service): State<Arc<S>>) -> Result<impl IntoResponse, AppError>
where
    S: StudentApi,
{
    let students = service
        .list_students()
        .map_err(write_error("Failed to fetch students"))?;
    Ok(success("Students fetched successfully", students))
}

async fn get_student<S>(
    State(service): State<Arc<S>>,
    StudentIdParam(id): StudentIdParam,
) -> Result<impl IntoResponse, AppError>
where
    S: StudentApi,
{
    let student = service
        .get_student(id)
        .map_err(read_error("Failed to fetch student"))?;
    Ok(success("Student fetched successfully", student))
}

/// Replace a student wholesale; absent fields overwrite existing values with empty ones and are
/// then rejected by validation.
async fn update_student<S>(
    State(service): State<Arc<S>>,
    StudentIdParam(id): StudentIdParam,
    body: Bytes,
) -> Result<impl IntoResponse, AppError>
where
    S: StudentApi,
{
    let draft = decode_draft(&body)?;
    let student = service
        .update_student(id, draft)
        .map_err(write_error("Failed to update student"))?;
    tracing::info!(id, "Student updated");
    Ok(success("Student updated successfully", student))
}

async fn delete_student<S>(
    State(service): State<Arc<S>>,
    StudentIdParam(id): StudentIdParam,
) -> Result<impl IntoResponse, AppError>
where
    S: StudentApi,
{
    service
        .delete_student(id)
        .map_err(write_error("Failed to delete student"))?;
    tracing::info!(id, "Student deleted");
    Ok(Json(Envelope::<()> {
        message: "Student deleted successfully",
        data: None,
    }))
}

/// Relay the provider's summary for one student.
///
/// The provider call blocks this request until it answers or the connection fails.
async fn summarize_student<S>(
    State(service): State<Arc<S>>,
    StudentIdParam(id): StudentIdParam,
) -> Result<impl IntoResponse, AppError>
where
    S: StudentApi,
{
    let summary = service
        .summarize_student(id)
        .await
        .map_err(read_error("Failed to generate summary"))?;
    Ok(success("Summary generated successfully", summary))
}

async fn get_metrics<S>(State(service): State<Arc<S>>) -> Result<impl IntoResponse, AppError>
where
    S: StudentApi,
{
    let snapshot = service
        .metrics_snapshot()
        .map_err(write_error("Failed to fetch metrics"))?;
    Ok(success("Metrics fetched successfully", snapshot))
}

async fn route_not_found() -> AppError {
    AppError::route_not_found()
}

/// `{id}` path segment restricted to `[0-9]+` that fits in a [`StudentId`].
struct StudentIdParam(StudentId);

#[async_trait]
impl<St> FromRequestParts<St> for StudentIdParam
where
    St: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::route_not_found())?;
        parse_student_id(&raw)
            .map(Self)
            .ok_or_else(AppError::route_not_found)
    }
}

/// Decode a write payload from the raw body. The `Content-Type` header is not consulted.
fn decode_draft(body: &[u8]) -> Result<StudentDraft, AppError> {
    serde_json::from_slice(body).map_err(AppError::invalid_input)
}

fn parse_student_id(raw: &str) -> Option<StudentId> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Map errors from write-style handlers: validation is the caller's fault, anything else is ours.
fn write_error(failure: &'static str) -> impl FnOnce(StudentError) -> AppError {
    move |error| match error {
        StudentError::Validation(rule) => AppError::new(StatusCode::BAD_REQUEST, rule.to_string()),
        other => {
            tracing::warn!(error = %other, "{failure}");
            AppError::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
        }
    }
}

/// Map errors from read-style handlers, where a missing record is a 404.
fn read_error(failure: &'static str) -> impl FnOnce(StudentError) -> AppError {
    move |error| {
        if error.is_not_found() {
            return AppError::new(StatusCode::NOT_FOUND, "Student not found");
        }
        tracing::error!(error = %error, "{failure}");
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
    }
}

/// Error response rendered as `{ "error": message }`.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn invalid_input(error: serde_json::Error) -> Self {
        tracing::debug!(error = %error, "Rejected request body");
        Self::new(StatusCode::BAD_REQUEST, "Invalid input")
    }

    fn route_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::{create_router, parse_student_id};
    use crate::metrics::MetricsSnapshot;
    use crate::students::{
        StoreError, Student, StudentApi, StudentDraft, StudentError, StudentId, StudentStore,
        ValidationError, validate_draft,
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[test]
    fn student_id_accepts_digits_only() {
        assert_eq!(parse_student_id("42"), Some(42));
        assert_eq!(parse_student_id("007"), Some(7));
        assert_eq!(parse_student_id(""), None);
        assert_eq!(parse_student_id("-1"), None);
        assert_eq!(parse_student_id("+1"), None);
        assert_eq!(parse_student_id("1a"), None);
        assert_eq!(parse_student_id("99999999999999999999999"), None);
    }

    /// Registry stub recording which ids reached the service and returning canned summaries.
    struct StubRegistry {
        store: StudentStore,
        seen_ids: Mutex<Vec<StudentId>>,
        summary: Result<String, StoreError>,
    }

    impl StubRegistry {
        fn new(summary: Result<String, StoreError>) -> Self {
            Self {
                store: StudentStore::seeded(),
                seen_ids: Mutex::new(Vec::new()),
                summary,
            }
        }

        fn record(&self, id: StudentId) {
            self.seen_ids.lock().expect("seen ids").push(id);
        }
    }

    #[async_trait]
    impl StudentApi for StubRegistry {
        fn create_student(&self, draft: StudentDraft) -> Result<Student, StudentError> {
            validate_draft(&draft)?;
            Ok(self.store.create(draft)?)
        }

        fn list_students(&self) -> Result<Vec<Student>, StudentError> {
            Ok(self.store.list()?)
        }

        fn get_student(&self, id: StudentId) -> Result<Student, StudentError> {
            self.record(id);
            Ok(self.store.get(id)?)
        }

        fn update_student(
            &self,
            id: StudentId,
            draft: StudentDraft,
        ) -> Result<Student, StudentError> {
            self.record(id);
            validate_draft(&draft)?;
            Ok(self.store.update(id, draft)?)
        }

        fn delete_student(&self, id: StudentId) -> Result<(), StudentError> {
            self.record(id);
            Ok(self.store.delete(id)?)
        }

        async fn summarize_student(&self, id: StudentId) -> Result<String, StudentError> {
            self.record(id);
            Ok(self.summary.clone()?)
        }

        fn metrics_snapshot(&self) -> Result<MetricsSnapshot, StudentError> {
            Err(StoreError::Poisoned.into())
        }
    }

    async fn send(
        registry: Arc<StubRegistry>,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .expect("request");
        let response = create_router(registry)
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn non_numeric_ids_never_reach_handlers() {
        let registry = Arc::new(StubRegistry::new(Ok("unused".into())));
        for (method, uri) in [
            (Method::GET, "/students/abc"),
            (Method::GET, "/students/-1"),
            (Method::PUT, "/students/1.5"),
            (Method::DELETE, "/students/%201"),
            (Method::GET, "/students/x/summary"),
        ] {
            let (status, body) = send(registry.clone(), method, uri, Some("{}")).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, json!({ "error": "Not found" }));
        }
        assert!(registry.seen_ids.lock().expect("seen ids").is_empty());
    }

    #[tokio::test]
    async fn unknown_paths_use_error_envelope() {
        let registry = Arc::new(StubRegistry::new(Ok("unused".into())));
        let (status, body) = send(registry, Method::GET, "/courses", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn malformed_bodies_are_invalid_input() {
        let registry = Arc::new(StubRegistry::new(Ok("unused".into())));
        for body in ["{not json", r#"{"name":"Ann","age":"ten","email":"a@b.co"}"#, "42"] {
            let (status, json) =
                send(registry.clone(), Method::POST, "/students", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json, json!({ "error": "Invalid input" }));
        }

        let (status, json) = send(registry.clone(), Method::POST, "/students", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid input");
        assert_eq!(registry.store.count().expect("count"), 2);
    }

    #[tokio::test]
    async fn write_bodies_decode_regardless_of_content_type() {
        let registry = Arc::new(StubRegistry::new(Ok("unused".into())));
        let body = r#"{"name":"Carl","age":19,"email":"carl@example.com"}"#;
        for (expected_id, content_type) in [
            (3, None),
            (4, Some("application/x-www-form-urlencoded")),
            (5, Some("text/plain")),
        ] {
            let mut builder = Request::builder().method(Method::POST).uri("/students");
            if let Some(content_type) = content_type {
                builder = builder.header("content-type", content_type);
            }
            let response = create_router(registry.clone())
                .oneshot(builder.body(Body::from(body)).expect("request"))
                .await
                .expect("router response");
            assert_eq!(response.status(), StatusCode::OK, "{content_type:?}");
            let bytes = to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("body bytes");
            let json: Value = serde_json::from_slice(&bytes).expect("json body");
            assert_eq!(json["data"]["id"], expected_id);
        }

        let response = create_router(registry.clone())
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/students/1")
                    .body(Body::from(
                        r#"{"name":"Alicia","age":21,"email":"alicia@example.com"}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(registry.store.get(1).expect("get").name, "Alicia");
    }

    #[tokio::test]
    async fn validation_messages_are_returned_verbatim() {
        let registry = Arc::new(StubRegistry::new(Ok("unused".into())));
        let (status, json) = send(
            registry,
            Method::PUT,
            "/students/1",
            Some(r#"{"name":"Alice","age":20,"email":"Alice@Example.com"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], ValidationError::InvalidEmail.to_string());
    }

    #[tokio::test]
    async fn summary_maps_missing_student_and_store_failure() {
        let registry = Arc::new(StubRegistry::new(Err(StoreError::NotFound(5))));
        let (status, json) = send(registry, Method::GET, "/students/5/summary", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Student not found");

        let registry = Arc::new(StubRegistry::new(Err(StoreError::Poisoned)));
        let (status, json) = send(registry, Method::GET, "/students/1/summary", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Failed to generate summary");
    }

    #[tokio::test]
    async fn store_failures_do_not_leak_detail() {
        let registry = Arc::new(StubRegistry::new(Ok("unused".into())));
        let (status, json) = send(registry, Method::GET, "/metrics", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({ "error": "Failed to fetch metrics" }));
    }
}
