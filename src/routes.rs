//! Admin HTTP surface.
//!
//! Everything except the health check and the client-facing message drop is
//! gated by the `X-Api-Key` header, compared in constant time. Handlers
//! return explicit error responses; a failed commit leaves the edit buffer
//! untouched so the admin can retry without retyping.

use axum::extract::{DefaultBodyLimit, Multipart, Path as UrlPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::content::keywords::JOINED_LIST_KEYWORDS;
use crate::content::{form, keywords, path as content_path, template, ContentError, Node, Path};
use crate::db::{Party, ThreadKind};
use crate::media;
use crate::notify::{self, EmailRequest};
use crate::security;
use crate::state::AppState;
use crate::store;

// ==================== Errors ====================

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    BadRequest(String),
    NotFound(String),
    /// A load/commit failure; the message comes from the adapter and is
    /// shown to the admin as a banner.
    Persistence(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "invalid API key".to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Persistence(message) => (StatusCode::BAD_GATEWAY, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ==================== Router ====================

pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/api/content", get(get_content))
        .route("/api/content/form", get(get_form))
        .route("/api/content/value", put(put_value))
        .route("/api/content/items", post(add_item).delete(delete_item))
        .route("/api/content/commit", post(commit_content))
        .route("/api/content/reload", post(reload_content))
        .route("/api/content/parity", get(content_parity))
        .route("/api/threads", get(list_threads))
        .route("/api/threads/snapshot", get(thread_snapshot))
        .route("/api/threads/:id/messages", get(thread_messages))
        .route("/api/threads/:id/reply", post(admin_reply))
        .route("/api/threads/:id/read", post(mark_read))
        .route("/api/media", get(list_media).post(upload_media))
        .route("/api/media/dangling", get(media_dangling))
        .route("/api/media/:id", delete(remove_media))
        .route("/api/notify/email", post(notify_email))
        .route("/api/notify/sms", post(notify_sms))
        .route("/api/comm-log", get(comm_log))
        .route("/api/comm-log/:id", delete(delete_comm_log))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/api/threads/messages", post(client_message))
        .merge(admin)
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn require_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    let presented = headers.get("x-api-key").and_then(|value| value.to_str().ok());
    if security::is_admin(presented, &state.config.admin_api_key) {
        next.run(request).await
    } else {
        ApiError::Unauthorized.into_response()
    }
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "contentBackend": state.store.name() }))
}

// ==================== Content ====================

async fn get_content(State(state): State<AppState>) -> Json<crate::content::ContentTree> {
    Json(state.buffer.read().await.clone())
}

#[derive(Deserialize)]
struct FormQuery {
    path: String,
}

async fn get_form(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> ApiResult<Json<form::FieldDescriptor>> {
    let path = parse_path(&query.path)?;
    let buffer = state.buffer.read().await;
    let node = content_path::get(&buffer, &path)
        .ok_or_else(|| ApiError::NotFound(format!("nothing at '{}'", path)))?;
    form::project(&node, &path)
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest(format!("'{}' is not an editable field", path)))
}

#[derive(Deserialize)]
struct SetValueRequest {
    path: String,
    value: serde_json::Value,
}

async fn put_value(
    State(state): State<AppState>,
    Json(request): Json<SetValueRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let path = parse_path(&request.path)?;
    let mut buffer = state.buffer.write().await;
    let node = decode_value(&path, request.value, &buffer)?;
    *buffer = content_path::set(&buffer, &path, node);
    Ok(Json(json!({ "updated": true, "path": path.to_string() })))
}

/// Interpret an incoming JSON value for a path. A plain string aimed at a
/// joined scalar list (tags) is split back into its elements; everything
/// else deserializes straight into the untagged node shape.
fn decode_value(
    path: &Path,
    value: serde_json::Value,
    current: &crate::content::ContentTree,
) -> Result<Node, ApiError> {
    let joined_target = path
        .field_name()
        .map(|name| keywords::matches_keyword(name, JOINED_LIST_KEYWORDS))
        .unwrap_or(false);
    if joined_target {
        if let serde_json::Value::String(text) = &value {
            let is_list_now = matches!(
                content_path::get(current, path),
                Some(Node::TextList(_)) | None
            );
            if is_list_now {
                let items = form::split_joined(text).map_err(ApiError::from)?;
                return Ok(Node::TextList(items));
            }
        }
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError::BadRequest(format!("value does not fit any content shape: {}", e)))
}

#[derive(Deserialize)]
struct AddItemRequest {
    path: String,
}

async fn add_item(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let path = parse_path(&request.path)?;
    let mut buffer = state.buffer.write().await;
    let outcome = template::add_list_item(&buffer, &path);
    *buffer = outcome.tree;
    Ok(Json(json!({
        "added": outcome.added,
        "dualWrite": outcome.dual_write,
        "warning": outcome.warning,
    })))
}

#[derive(Deserialize)]
struct DeleteItemRequest {
    path: String,
    index: usize,
}

async fn delete_item(
    State(state): State<AppState>,
    Json(request): Json<DeleteItemRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let path = parse_path(&request.path)?;
    let mut buffer = state.buffer.write().await;
    let next = content_path::delete_list_item(&buffer, &path, request.index);
    let removed = next != *buffer;
    *buffer = next;
    Ok(Json(json!({ "removed": removed })))
}

async fn commit_content(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let tree = state.buffer.read().await.clone();
    match state.store.commit(&tree).await {
        Ok(()) => Ok(Json(json!({ "committed": true, "backend": state.store.name() }))),
        Err(err) => {
            // Buffer stays as it was; the admin retries after the banner.
            warn!(backend = state.store.name(), error = %err, "Content commit failed");
            Err(ApiError::Persistence(err.to_string()))
        }
    }
}

async fn reload_content(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let fresh = store::load_or_default(state.store.as_ref(), &state.default_tree).await;
    *state.buffer.write().await = fresh;
    Ok(Json(json!({ "reloaded": true })))
}

async fn content_parity(State(state): State<AppState>) -> Json<serde_json::Value> {
    let report = state.buffer.read().await.parity_report();
    Json(json!({ "mismatches": report }))
}

// ==================== Threads ====================

async fn list_threads(State(state): State<AppState>) -> ApiResult<Json<Vec<crate::db::MessageThread>>> {
    Ok(Json(state.db.list_threads()?))
}

/// The admin session's converged view: refreshed here on demand and by the
/// background poll, always replaced wholesale from the canonical store.
async fn thread_snapshot(State(state): State<AppState>) -> ApiResult<Json<crate::sync::RefreshOutcome>> {
    let watcher = Arc::clone(&state.watcher);
    let outcome = tokio::task::spawn_blocking(move || watcher.refresh())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(Json(outcome))
}

#[derive(Deserialize)]
struct ClientMessageRequest {
    participant: String,
    #[serde(default)]
    subject: String,
    kind: String,
    body: String,
}

async fn client_message(
    State(state): State<AppState>,
    Json(request): Json<ClientMessageRequest>,
) -> ApiResult<Json<crate::db::MessageThread>> {
    if request.participant.trim().is_empty() || request.body.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "participant and body are required".to_string(),
        ));
    }
    let kind = ThreadKind::parse(&request.kind).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let thread =
        state
            .db
            .append_client_message(&request.participant, &request.subject, kind, &request.body)?;
    Ok(Json(thread))
}

async fn thread_messages(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> ApiResult<Json<Vec<crate::db::ThreadMessage>>> {
    if state.db.get_thread(&id)?.is_none() {
        return Err(ApiError::NotFound(format!("no thread {}", id)));
    }
    Ok(Json(state.db.thread_messages(&id)?))
}

#[derive(Deserialize)]
struct ReplyRequest {
    body: String,
}

async fn admin_reply(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
    Json(request): Json<ReplyRequest>,
) -> ApiResult<Json<crate::db::MessageThread>> {
    if state.db.get_thread(&id)?.is_none() {
        return Err(ApiError::NotFound(format!("no thread {}", id)));
    }
    Ok(Json(state.db.append_admin_reply(&id, &request.body)?))
}

#[derive(Deserialize)]
struct MarkReadRequest {
    party: String,
}

async fn mark_read(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
    Json(request): Json<MarkReadRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let party = Party::parse(&request.party).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if !state.db.mark_read(&id, party)? {
        return Err(ApiError::NotFound(format!("no thread {}", id)));
    }
    Ok(Json(json!({ "read": true })))
}

// ==================== Media ====================

async fn list_media(State(state): State<AppState>) -> ApiResult<Json<Vec<crate::db::MediaItem>>> {
    Ok(Json(state.db.list_media()?))
}

async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<crate::db::MediaItem>> {
    let blob = state
        .blob
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("blob storage is not configured".to_string()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("bad multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .unwrap_or("upload.bin")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {}", e)))?;
        let item = media::upload_media(blob, &state.db, &file_name, bytes.to_vec())
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;
        return Ok(Json(item));
    }

    Err(ApiError::BadRequest("no 'file' part in upload".to_string()))
}

async fn remove_media(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let blob = state
        .blob
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("blob storage is not configured".to_string()))?;
    let removed = media::delete_media(blob, &state.db, &id).await?;
    if !removed {
        return Err(ApiError::NotFound(format!("no media item {}", id)));
    }
    Ok(Json(json!({ "deleted": true })))
}

async fn media_dangling(State(state): State<AppState>) -> ApiResult<Json<Vec<media::DanglingReference>>> {
    let items = state.db.list_media()?;
    let buffer = state.buffer.read().await;
    Ok(Json(media::dangling_references(&buffer, &items)))
}

// ==================== Notifications ====================

#[derive(Deserialize)]
struct EmailBody {
    to: String,
    subject: String,
    html: String,
}

async fn notify_email(
    State(state): State<AppState>,
    Json(body): Json<EmailBody>,
) -> ApiResult<Json<notify::DispatchOutcome>> {
    let outcome = notify::send_email(
        &state.config,
        &state.db,
        &EmailRequest {
            to: body.to,
            subject: body.subject,
            html: body.html,
        },
    )
    .await?;
    Ok(Json(outcome))
}

#[derive(Deserialize)]
struct SmsBody {
    to: String,
    text: String,
}

async fn notify_sms(
    State(state): State<AppState>,
    Json(body): Json<SmsBody>,
) -> ApiResult<Json<notify::DispatchOutcome>> {
    let outcome = notify::send_sms(&state.config, &state.db, &body.to, &body.text).await?;
    Ok(Json(outcome))
}

async fn comm_log(State(state): State<AppState>) -> ApiResult<Json<Vec<crate::db::CommLogEntry>>> {
    Ok(Json(state.db.list_comm_log()?))
}

async fn delete_comm_log(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> ApiResult<Json<serde_json::Value>> {
    if !state.db.delete_comm_log(&id)? {
        return Err(ApiError::NotFound(format!("no log entry {}", id)));
    }
    Ok(Json(json!({ "deleted": true })))
}

fn parse_path(text: &str) -> Result<Path, ApiError> {
    Path::parse(text).map_err(|e| ApiError::BadRequest(e.to_string()))
}
