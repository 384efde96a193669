//! Targets of the unsubscribe and preference links embedded in emails.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::subscriber::{NotificationPreferences, PreferencesPatch, SubscriberStatus};

use super::subscriber::not_found;

#[derive(Debug, Deserialize)]
pub struct LinkQuery {
    pub id: Option<String>,
}

impl LinkQuery {
    fn subscriber_id(self) -> Result<String> {
        self.id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Validation("Missing subscriber id".to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeResponse {
    pub subscriber_id: String,
    pub status: SubscriberStatus,
}

#[derive(Debug, Serialize)]
pub struct EmailPreferencesResponse {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub status: SubscriberStatus,
    pub preferences: NotificationPreferences,
}

/// GET /unsubscribe?id={subscriberId}
#[tracing::instrument(name = "http.unsubscribe_link", skip(state, query))]
pub async fn unsubscribe_link(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
) -> Result<Json<UnsubscribeResponse>> {
    let id = query.subscriber_id()?;
    if !state.subscribers.unsubscribe(&id).await? {
        return Err(not_found(&id));
    }

    Ok(Json(UnsubscribeResponse {
        subscriber_id: id,
        status: SubscriberStatus::Unsubscribed,
    }))
}

/// GET /email-preferences?id={subscriberId}
pub async fn get_email_preferences(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
) -> Result<Json<EmailPreferencesResponse>> {
    let id = query.subscriber_id()?;
    preferences_response(&state, &id).await
}

/// POST /email-preferences?id={subscriberId}
pub async fn update_email_preferences(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
    Json(patch): Json<PreferencesPatch>,
) -> Result<Json<EmailPreferencesResponse>> {
    let id = query.subscriber_id()?;
    if !state.subscribers.update_preferences(&id, patch).await? {
        return Err(not_found(&id));
    }
    preferences_response(&state, &id).await
}

async fn preferences_response(state: &AppState, id: &str) -> Result<Json<EmailPreferencesResponse>> {
    let subscriber = state
        .subscribers
        .get(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(EmailPreferencesResponse {
        id: subscriber.id,
        email: subscriber.email,
        name: subscriber.name,
        status: subscriber.status,
        preferences: subscriber.preferences,
    }))
}
