use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use std::net::TcpListener;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use waitlist_server::{routes, AppError, AppState, Settings};

#[actix_web::main]
async fn main() -> waitlist_server::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    // Load configuration
    let config = Settings::new()?;
    info!("Configuration loaded successfully ({})", config.environment);

    // Initialize application state
    let state = AppState::new(config.clone()).await?;
    let state = web::Data::new(state);

    // Reap expired sessions on the same cadence as their lifetime
    let reaper_state = state.clone();
    let reap_interval = Duration::from_secs(config.session.lifetime_hours.max(1) as u64 * 3600);
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(reap_interval).await;
            let purged = reaper_state.sessions.purge_expired().await;
            if purged > 0 {
                info!("purged {purged} expired sessions");
            }
        }
    });

    // Create and bind TCP listener
    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;
    info!(
        "Starting server at {}:{}",
        config.server.host, config.server.port
    );

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .route("/health", web::get().to(waitlist_server::health_check))
            .configure(routes::configure)
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(())
}
