//! Subscriber endpoints for the subscription form and the admin dashboard.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::content::UpdateKind;
use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::subscriber::{
    NewSubscriber, PreferencesPatch, Subscriber, SubscriberFilter, SubscriberStats,
    SubscriberStatus,
};

#[derive(Debug, Deserialize)]
pub struct SubscriberQuery {
    pub search: Option<String>,
    /// "active", "unsubscribed", "bounced" or "all"
    pub status: Option<String>,
}

impl SubscriberQuery {
    fn into_filter(self) -> Result<SubscriberFilter> {
        let status = match self.status.as_deref() {
            None | Some("") | Some("all") => None,
            Some(s) => Some(s.parse::<SubscriberStatus>().map_err(AppError::Validation)?),
        };
        Ok(SubscriberFilter {
            search: self.search,
            status,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RelevantQuery {
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct SubscriberListResponse {
    pub subscribers: Vec<Subscriber>,
    pub total: usize,
}

/// POST /api/v1/subscribers - Subscribe from the website form
#[tracing::instrument(name = "http.add_subscriber", skip(state, request))]
pub async fn add_subscriber(
    State(state): State<AppState>,
    Json(request): Json<NewSubscriber>,
) -> Result<(StatusCode, Json<SubscribeResponse>)> {
    if !request.email.contains('@') {
        return Err(AppError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    if request.preferences.categories.is_empty() {
        return Err(AppError::Validation(
            "Please select at least one category".to_string(),
        ));
    }

    let id = state.subscribers.add(request).await?;
    Ok((StatusCode::CREATED, Json(SubscribeResponse { id })))
}

/// GET /api/v1/subscribers?search=&status=
pub async fn list_subscribers(
    State(state): State<AppState>,
    Query(query): Query<SubscriberQuery>,
) -> Result<Json<SubscriberListResponse>> {
    let subscribers = state.subscribers.list(&query.into_filter()?).await?;
    let total = subscribers.len();
    Ok(Json(SubscriberListResponse { subscribers, total }))
}

/// GET /api/v1/subscribers/stats
pub async fn subscriber_stats(State(state): State<AppState>) -> Result<Json<SubscriberStats>> {
    Ok(Json(state.subscribers.stats().await?))
}

/// GET /api/v1/subscribers/export?search=&status= - CSV download
pub async fn export_subscribers(
    State(state): State<AppState>,
    Query(query): Query<SubscriberQuery>,
) -> Result<impl IntoResponse> {
    let csv = state.subscribers.export_csv(&query.into_filter()?).await?;
    let disposition = format!(
        "attachment; filename=\"email-subscribers-{}.csv\"",
        Utc::now().format("%Y-%m-%d")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

/// GET /api/v1/subscribers/relevant?type=&category= - Who would get an update
pub async fn relevant_subscribers(
    State(state): State<AppState>,
    Query(query): Query<RelevantQuery>,
) -> Result<Json<SubscriberListResponse>> {
    let kind: UpdateKind = query.kind.parse().map_err(AppError::Validation)?;
    let subscribers = state.subscribers.relevant(kind, &query.category).await?;
    let total = subscribers.len();
    Ok(Json(SubscriberListResponse { subscribers, total }))
}

/// GET /api/v1/subscribers/{id}
pub async fn get_subscriber(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Subscriber>> {
    state
        .subscribers
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

/// PATCH /api/v1/subscribers/{id}/preferences - Merge preference fields
#[tracing::instrument(name = "http.update_preferences", skip(state, patch))]
pub async fn update_subscriber_preferences(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<PreferencesPatch>,
) -> Result<Json<Subscriber>> {
    if patch.categories.as_ref().is_some_and(|c| c.is_empty()) {
        return Err(AppError::Validation(
            "Please select at least one category".to_string(),
        ));
    }

    if !state.subscribers.update_preferences(&id, patch).await? {
        return Err(not_found(&id));
    }
    get_subscriber(State(state), Path(id)).await
}

/// POST /api/v1/subscribers/{id}/unsubscribe
#[tracing::instrument(name = "http.unsubscribe", skip(state))]
pub async fn unsubscribe_subscriber(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Subscriber>> {
    if !state.subscribers.unsubscribe(&id).await? {
        return Err(not_found(&id));
    }
    get_subscriber(State(state), Path(id)).await
}

pub(super) fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Subscriber '{}' not found", id))
}
