use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::models::{SignupRequest, SIGNUP_SUBJECT};
use crate::services::EmailMessage;
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    pub message: String,
}

/// Relay one signup approval request to the administrator. Exactly one
/// delivery attempt per invocation; nothing is queued or retried.
#[tracing::instrument(skip(state, body))]
pub async fn notify_signup(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<NotifyResponse>), AppError> {
    let request: SignupRequest = serde_json::from_str(&body)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid signup payload: {}", e)))?;

    let email = EmailMessage {
        to: state.config.admin.email.clone(),
        subject: SIGNUP_SUBJECT.to_string(),
        html: request.to_html(),
    };

    match state.email_provider.send(&email).await {
        Ok(response) => {
            tracing::info!(
                to = %email.to,
                provider_id = ?response.provider_id,
                "Signup notification sent"
            );

            Ok((
                StatusCode::OK,
                Json(NotifyResponse {
                    message: "Notification sent.".to_string(),
                }),
            ))
        }
        Err(e) => {
            let error_msg = e.to_string();
            tracing::error!(
                to = %email.to,
                error = %error_msg,
                "Failed to send signup notification"
            );

            Err(AppError::EmailError(error_msg))
        }
    }
}

/// Answers CORS preflight probes on the notification route.
pub async fn preflight() -> impl IntoResponse {
    (
        [(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            "authorization, x-client-info, apikey, content-type",
        )],
        "ok",
    )
}
