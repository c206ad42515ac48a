//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;

use quill_core::ports::{Mailer, PasswordService, TokenService};
use quill_infra::{Argon2PasswordService, JwtTokenService, LogMailer};
use quill_shared::ErrorResponse;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    tracing::info!(
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    // Build application state
    let state = AppState::new(&config.database, config.app_url.clone())
        .await
        .map_err(std::io::Error::other)?;

    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new());

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(password_service.clone()))
            .app_data(web::Data::new(mailer.clone()))
            // Malformed bodies and query strings get the standard error body.
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                actix_web::error::InternalError::from_response(
                    err.to_string(),
                    HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string())),
                )
                .into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                actix_web::error::InternalError::from_response(
                    err.to_string(),
                    HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string())),
                )
                .into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                actix_web::error::InternalError::from_response(
                    err.to_string(),
                    HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string())),
                )
                .into()
            }))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,api_server=debug,quill_infra=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}
