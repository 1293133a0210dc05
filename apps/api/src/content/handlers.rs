//! HTTP handlers for the content collections. The five CRUD verbs are
//! generic over the entity kind; everything kind-specific (project reorder,
//! skills grouping, contact intake, the personal-info singleton) gets its own
//! handler.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::contact::CreateContactSubmission;
use crate::models::{
    ContactSubmission, PersonalInfo, PersonalInfoInput, Project, Skill, PERSONAL_FILE,
};
use crate::state::AppState;
use crate::store::repository::{Entity, Repository};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// Maps a malformed/mis-shaped JSON body onto the uniform `{error}` response
/// instead of axum's default rejection body.
fn require_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AppError::Validation(rejection.body_text())),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generic collection handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/<collection>
pub async fn list_entities<E: Entity>(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<E>>, AppError> {
    let items = Repository::<E>::new(&state.store)
        .list(query.status.as_deref())
        .await?;
    Ok(Json(items))
}

/// GET /api/<collection>/:id
pub async fn get_entity<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<E>, AppError> {
    let entity = Repository::<E>::new(&state.store).get(&id).await?;
    Ok(Json(entity))
}

/// POST /api/<collection>
pub async fn create_entity<E: Entity>(
    State(state): State<AppState>,
    payload: Result<Json<E::Create>, JsonRejection>,
) -> Result<(StatusCode, Json<E>), AppError> {
    let input = require_json(payload)?;
    let entity = Repository::<E>::new(&state.store).create(input).await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

/// PUT /api/<collection>/:id — merge semantics, not a full replace.
pub async fn update_entity<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<E::Update>, JsonRejection>,
) -> Result<Json<E>, AppError> {
    let patch = require_json(payload)?;
    let entity = Repository::<E>::new(&state.store).update(&id, patch).await?;
    Ok(Json(entity))
}

/// DELETE /api/<collection>/:id
pub async fn delete_entity<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    Repository::<E>::new(&state.store).remove(&id).await?;
    Ok(Json(MessageResponse::new(format!(
        "{} deleted successfully",
        E::LABEL
    ))))
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReorderRequest {
    #[serde(rename = "projectIds")]
    pub project_ids: Vec<String>,
}

/// PATCH /api/projects/reorder
pub async fn reorder_projects(
    State(state): State<AppState>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let request = require_json(payload)?;
    Repository::<Project>::new(&state.store)
        .reorder(&request.project_ids)
        .await?;
    Ok(Json(MessageResponse::new(
        "Projects reordered successfully",
    )))
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/skills/by-category — map of category to its skills, each group
/// sorted by display rank.
pub async fn skills_by_category(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, Vec<Skill>>>, AppError> {
    let skills = Repository::<Skill>::new(&state.store).list(None).await?;

    // Skills arrive already rank-sorted; grouping preserves that per bucket.
    let mut grouped: BTreeMap<String, Vec<Skill>> = BTreeMap::new();
    for skill in skills {
        grouped.entry(skill.category.clone()).or_default().push(skill);
    }
    Ok(Json(grouped))
}

// ────────────────────────────────────────────────────────────────────────────
// Contact
// ────────────────────────────────────────────────────────────────────────────

/// Public contact form body. Request metadata (ip, user agent) is recorded
/// server-side, never trusted from the payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
}

/// POST /api/contact
pub async fn create_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactSubmission>), AppError> {
    let form = require_json(payload)?;

    let input = CreateContactSubmission {
        name: form.name,
        email: form.email,
        subject: form.subject,
        message: form.message,
        ip_address: client_ip(&headers),
        user_agent: header_value(&headers, header::USER_AGENT.as_str()),
    };
    let submission = Repository::<ContactSubmission>::new(&state.store)
        .create(input)
        .await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// First hop of X-Forwarded-For, the client as seen by the reverse proxy.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Personal info (singleton)
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/personal
pub async fn get_personal(State(state): State<AppState>) -> Result<Json<PersonalInfo>, AppError> {
    match state.store.read_object::<PersonalInfo>(PERSONAL_FILE).await? {
        Some(info) => Ok(Json(info)),
        None => Err(AppError::NotFound("Personal info not found".to_string())),
    }
}

/// PUT /api/personal — full replace, no merge.
pub async fn put_personal(
    State(state): State<AppState>,
    payload: Result<Json<PersonalInfoInput>, JsonRejection>,
) -> Result<Json<PersonalInfo>, AppError> {
    let input = require_json(payload)?;

    let _guard = state.store.lock(PERSONAL_FILE).await;
    let record = input.into_record(Utc::now());
    state.store.write_object(PERSONAL_FILE, &record).await?;
    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn client_ip_takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.2"),
        );
        assert_eq!(client_ip(&headers), Some("203.0.113.9".to_string()));
    }

    #[test]
    fn client_ip_is_none_without_header() {
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn contact_form_rejects_unknown_fields() {
        let err = serde_json::from_value::<ContactForm>(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "hi",
            "status": "replied"
        }));
        assert!(err.is_err());
    }
}
