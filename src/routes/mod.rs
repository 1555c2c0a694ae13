//! HTTP surface: public waitlist signup plus the admin management routes.

pub mod admin;
pub mod waitlist;

use actix_web::web;

use crate::error::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(err.to_string()).into()
    }));

    cfg.service(
        web::scope("/api")
            .route("/waitlist", web::post().to(waitlist::join))
            .service(
                web::scope("/admin")
                    .route("/login", web::post().to(admin::login))
                    .route("/logout", web::post().to(admin::logout))
                    .route("/check", web::get().to(admin::check))
                    .route("/waitlist", web::get().to(admin::list_entries))
                    .route("/waitlist/{id}", web::delete().to(admin::delete_entry))
                    .route("/send-promotional", web::post().to(admin::send_promotional))
                    .route(
                        "/send-launch-announcement",
                        web::post().to(admin::send_launch),
                    ),
            ),
    );
}

/// Practical email shape check: one `@`, non-empty local part, dotted
/// domain, no whitespace. Returns the trimmed address.
pub(crate) fn validate_email(raw: &str) -> Result<&str, AppError> {
    let email = raw.trim();

    let valid = email.len() <= 254
        && !email.contains(char::is_whitespace)
        && email
            .split_once('@')
            .map(|(local, domain)| {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && domain.contains('.')
                    && !domain.contains('@')
            })
            .unwrap_or(false);

    if valid {
        Ok(email)
    } else {
        Err(AppError::Validation(
            "Please enter a valid email address".to_string(),
        ))
    }
}
