use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub email: String,
}

pub async fn join(
    req: web::Json<JoinRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = super::validate_email(&req.email)?.to_string();

    // Pre-check for the friendly 409; the storage layer still enforces
    // uniqueness underneath.
    if state
        .storage
        .waitlist_entry_by_email(&email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "This email is already on the waitlist".to_string(),
        ));
    }

    let entry = state.storage.add_to_waitlist(&email).await?;
    info!("added {} to waitlist (id {})", entry.email, entry.id);

    // Delivery must not hold up the 201; failures only get logged.
    let email_service = state.email.clone();
    tokio::spawn(async move {
        if let Err(e) = email_service.send_welcome_email(&email).await {
            error!("failed to send welcome email to {email}: {e}");
        }
    });

    Ok(HttpResponse::Created().json(json!({
        "message": "Successfully added to waitlist",
        "entry": entry,
    })))
}
