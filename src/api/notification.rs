//! Notification log and dispatch endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::content::ContentUpdate;
use crate::error::{AppError, Result};
use crate::notification::{
    DispatchOutcome, Notification, NotificationFilter, NotificationStats, NotificationStatus,
};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    pub update_id: Option<String>,
    pub subscriber_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub total: usize,
}

fn parse_status(status: Option<&str>) -> Result<Option<NotificationStatus>> {
    let status = match status {
        None | Some("") | Some("all") => None,
        Some("pending") => Some(NotificationStatus::Pending),
        Some("sent") => Some(NotificationStatus::Sent),
        Some("failed") => Some(NotificationStatus::Failed),
        Some("bounced") => Some(NotificationStatus::Bounced),
        Some(other) => {
            return Err(AppError::Validation(format!(
                "unknown notification status '{}'",
                other
            )))
        }
    };
    Ok(status)
}

/// GET /api/v1/notifications?updateId=&subscriberId=&status=
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<NotificationListResponse>> {
    let filter = NotificationFilter {
        status: parse_status(query.status.as_deref())?,
        update_id: query.update_id,
        subscriber_id: query.subscriber_id,
    };

    let notifications = state.notifications.list(&filter).await?;
    let total = notifications.len();
    Ok(Json(NotificationListResponse {
        notifications,
        total,
    }))
}

/// GET /api/v1/notifications/stats
pub async fn notification_stats(State(state): State<AppState>) -> Result<Json<NotificationStats>> {
    Ok(Json(state.notifications.stats().await?))
}

/// POST /api/v1/updates/notify - Email every relevant subscriber about an update
///
/// The run executes on its own task, so it completes even when the client
/// goes away before the response is written.
#[tracing::instrument(
    name = "http.notify_update",
    skip(state, update),
    fields(update_id = %update.id)
)]
pub async fn notify_update(
    State(state): State<AppState>,
    Json(update): Json<ContentUpdate>,
) -> Result<Json<DispatchOutcome>> {
    if update.id.trim().is_empty() {
        return Err(AppError::Validation("Update id must not be empty".to_string()));
    }

    let dispatcher = state.dispatcher.clone();
    let run = tokio::spawn(
        async move { dispatcher.dispatch(&update).await }.in_current_span(),
    );

    let outcome = run
        .await
        .map_err(|e| AppError::Internal(format!("Dispatch task failed: {}", e)))??;
    Ok(Json(outcome))
}
