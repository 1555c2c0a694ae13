pub mod config;
pub mod email;
pub mod error;
pub mod routes;
pub mod session;
pub mod storage;

use std::sync::Arc;

use actix_web::HttpResponse;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use email::EmailService;
pub use session::SessionStore;
pub use storage::Storage;

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all handlers. Storage and the email
/// dispatcher are constructed once here and injected, never reached through
/// globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub storage: Arc<dyn Storage>,
    pub email: Arc<EmailService>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let storage = storage::connect(&config).await?;
        let email = Arc::new(EmailService::new(config.email.clone()));
        let sessions = Arc::new(SessionStore::new(config.session.lifetime_hours));

        Ok(Self {
            config: Arc::new(config),
            storage,
            email,
            sessions,
        })
    }
}
