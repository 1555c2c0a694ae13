//! Cookie-backed admin sessions.
//!
//! Sessions live in process memory keyed by an opaque token; each carries an
//! admin flag and an expiry 24 hours (configurable) from issuance. A
//! background task in `main` purges expired entries periodically. Nothing
//! survives a restart.

use std::collections::HashMap;

use actix_web::cookie::{time as cookie_time, Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{DateTime, Duration, Utc};
use futures::future::LocalBoxFuture;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

pub const SESSION_COOKIE: &str = "waitlist_session";

#[derive(Debug, Clone)]
pub struct Session {
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    lifetime: Duration,
}

impl SessionStore {
    pub fn new(lifetime_hours: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            lifetime: Duration::hours(lifetime_hours),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a fresh admin session and return its cookie token.
    pub async fn create_admin(&self) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            is_admin: true,
            expires_at: Utc::now() + self.lifetime,
        };
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// Expired sessions read as absent; the reaper removes them for real.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.read().await.get(token).cloned()?;
        if session.is_expired() {
            None
        } else {
            Some(session)
        }
    }

    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        before - sessions.len()
    }
}

/// Session attached to the inbound request, if any.
pub async fn current_session(req: &HttpRequest, store: &SessionStore) -> Option<Session> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    store.get(cookie.value()).await
}

pub fn build_cookie(token: String, lifetime: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(cookie_time::Duration::seconds(lifetime.num_seconds()))
        .finish()
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// Gate for admin-only routes: extracting this from a request fails with
/// 401 unless the session cookie maps to a live admin session.
pub struct AdminSession;

impl FromRequest for AdminSession {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("application state not configured".into()))?;

            let cookie = req
                .cookie(SESSION_COOKIE)
                .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))?;

            match state.sessions.get(cookie.value()).await {
                Some(session) if session.is_admin => Ok(AdminSession),
                _ => Err(AppError::Unauthorized("Unauthorized".into())),
            }
        })
    }
}
