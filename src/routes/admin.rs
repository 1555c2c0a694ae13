use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::email::BatchOutcome;
use crate::error::AppError;
use crate::session::{self, AdminSession};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let admin = &state.config.admin;
    if req.username != admin.username || req.password != admin.password {
        warn!("failed admin login attempt for username {:?}", req.username);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state.sessions.create_admin().await;
    info!("admin session issued");

    let cookie = session::build_cookie(
        token,
        state.sessions.lifetime(),
        state.config.is_production(),
    );
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "success": true })))
}

pub async fn logout(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if let Some(cookie) = req.cookie(session::SESSION_COOKIE) {
        if state.sessions.remove(cookie.value()).await {
            info!("admin session ended");
        }
    }

    Ok(HttpResponse::Ok()
        .cookie(session::removal_cookie())
        .json(json!({ "success": true })))
}

pub async fn check(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let is_authenticated = session::current_session(&req, &state.sessions)
        .await
        .map(|session| session.is_admin)
        .unwrap_or(false);

    Ok(HttpResponse::Ok().json(json!({ "isAuthenticated": is_authenticated })))
}

pub async fn list_entries(
    _admin: AdminSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let entries = state.storage.all_waitlist_entries().await?;
    Ok(HttpResponse::Ok().json(entries))
}

pub async fn delete_entry(
    _admin: AdminSession,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id: i32 = path
        .parse()
        .map_err(|_| AppError::Validation("Invalid ID format".to_string()))?;

    if !state.storage.delete_waitlist_entry(id).await? {
        return Err(AppError::NotFound("Entry not found".to_string()));
    }

    info!("deleted waitlist entry {id}");
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[derive(Debug, Default, Deserialize)]
pub struct PromotionalRequest {
    pub message: Option<String>,
}

pub async fn send_promotional(
    _admin: AdminSession,
    body: Option<web::Json<PromotionalRequest>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let custom_message = body.and_then(|b| b.into_inner().message);

    let recipients = recipient_emails(&state).await?;
    let outcome = state
        .email
        .send_promotional_to_all(&recipients, custom_message.as_deref())
        .await;

    Ok(batch_response("promotional email", outcome))
}

pub async fn send_launch(
    _admin: AdminSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let recipients = recipient_emails(&state).await?;
    let outcome = state.email.send_launch_to_all(&recipients).await;

    Ok(batch_response("launch announcement", outcome))
}

async fn recipient_emails(state: &AppState) -> Result<Vec<String>, AppError> {
    let entries = state.storage.all_waitlist_entries().await?;
    if entries.is_empty() {
        return Err(AppError::NotFound("No waitlist entries found".to_string()));
    }
    Ok(entries.into_iter().map(|entry| entry.email).collect())
}

fn batch_response(what: &str, outcome: BatchOutcome) -> HttpResponse {
    info!(
        "{what} batch finished: {} of {} delivered",
        outcome.delivered, outcome.attempted
    );

    let mut body = json!({
        "message": format!(
            "Sent {what} to {} of {} waitlist members",
            outcome.delivered, outcome.attempted
        ),
    });
    if !outcome.failed.is_empty() {
        body["failedEmails"] = json!(outcome.failed);
    }

    HttpResponse::Ok().json(body)
}
