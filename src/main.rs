mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use crate::config::Settings;
use crate::core::Matcher;
use crate::models::ScoringWeights;
use crate::routes::AppState;
use crate::services::{
    GeocoderClient, Mailer, MatchRunner, MediaClient, ProfileRepository, ReportDispatcher,
    ResponseCache,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Herzmatch service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Connect to PostgreSQL and run migrations
    let repository = Arc::new(
        ProfileRepository::from_settings(&settings.database)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                panic!("PostgreSQL connection error: {}", e);
            }),
    );

    info!("Profile repository initialized");

    // Listing cache
    let cache = Arc::new(ResponseCache::from_settings(&settings.cache));

    // Mail relay (optional - the dispatcher logs reports without it)
    let mailer = Mailer::from_settings(&settings.mail);
    if mailer.is_none() {
        warn!("Mail relay not configured, match reports will be logged only");
    }
    let admin_email = settings.mail.admin_email.clone();
    if admin_email.is_none() {
        warn!("Admin email not configured");
    }

    // Media CDN (optional - image uploads are refused without it)
    let media = MediaClient::from_settings(&settings.media).map(Arc::new);
    if media.is_none() {
        warn!("Media CDN not configured, image uploads disabled");
    }

    // City suggestion upstream
    let geocoder = Arc::new(GeocoderClient::from_settings(&settings.geocoder));

    // Matcher with configured weights and threshold
    let weights = ScoringWeights {
        age: settings.scoring.weights.age,
        state_distance: settings.scoring.weights.state_distance,
        interests: settings.scoring.weights.interests,
        same_city_bonus: settings.scoring.weights.same_city_bonus,
    };

    let matcher = Matcher::new(weights, settings.matching.min_score);

    info!(
        "Matcher initialized with weights: {:?}, min score {}",
        weights, settings.matching.min_score
    );

    // Matching run coordinator, shared by the HTTP trigger and the schedule
    let dispatcher = ReportDispatcher::new(mailer, admin_email);
    let runner = Arc::new(MatchRunner::new(repository.clone(), dispatcher, matcher));

    if settings.matching.schedule_enabled {
        services::scheduler::spawn(runner.clone(), settings.matching.schedule_interval_secs);
        info!(
            "Matching job scheduled every {}s",
            settings.matching.schedule_interval_secs
        );
    } else {
        info!("Scheduled matching disabled, runs on demand only");
    }

    // Build application state
    let app_state = AppState {
        repository,
        cache,
        media,
        geocoder,
        runner,
        api_key: settings.server.api_key.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
