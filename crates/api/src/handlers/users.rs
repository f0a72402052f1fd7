//! Handlers for a user's notification profile.

use axum::extract::{Path, State};
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::recipient::Recipient;
use helpdesk_core::types::DbId;
use helpdesk_core::validation::{validate_gateway_url, validate_optional_email};
use helpdesk_db::models::user::{NotificationProfile, UpdateNotificationProfile};
use helpdesk_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

/// GET /api/v1/users/{id}/notifications
///
/// Credentials (push keys, gateway URL) are not serialized.
pub async fn get_notification_profile(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<NotificationProfile>>> {
    let profile = UserRepo::find_notification_profile(&state.pool, user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/users/{id}/notifications
///
/// Replace the profile, then send a confirmation through every channel
/// that is now enabled and configured.
pub async fn update_notification_profile(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<UpdateNotificationProfile>,
) -> AppResult<Json<DataResponse<NotificationProfile>>> {
    validate_optional_email("email", &input.email)?;
    validate_gateway_url(&input.gateway_url)?;

    let profile = UserRepo::update_notification_profile(&state.pool, user_id, &input)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;
    tracing::info!(
        user_id,
        notify_email = profile.notify_email,
        notify_push = profile.notify_push,
        notify_gateway = profile.notify_gateway,
        "Notification profile updated"
    );

    state
        .dispatcher
        .send_settings_confirmation(&Recipient::from(profile.clone()));

    Ok(Json(DataResponse { data: profile }))
}
