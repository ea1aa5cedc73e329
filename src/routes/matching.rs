use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::models::{ErrorResponse, HealthResponse, RunMatchingResponse};
use crate::routes::AppState;

/// Configure the matching trigger and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matching/run", web::post().to(run_matching));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.repository.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run matching now and email the report
///
/// POST /api/v1/matching/run
///
/// Guarded by the X-Api-Key header when a key is configured. Returns
/// the number of qualifying matches once the run completes.
async fn run_matching(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Some(expected) = &state.api_key {
        let provided = req
            .headers()
            .get("X-Api-Key")
            .and_then(|value| value.to_str().ok());

        if provided != Some(expected.as_str()) {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Unauthorized".to_string(),
                message: "Missing or invalid API key".to_string(),
                status_code: 401,
            });
        }
    }

    match state.runner.run().await {
        Ok(summary) => {
            tracing::info!(
                "Matching run {} finished with {} matches",
                summary.run_id,
                summary.match_count
            );
            HttpResponse::Ok().json(RunMatchingResponse {
                message: "Matching completed and report sent".to_string(),
                match_count: summary.match_count,
            })
        }
        Err(e) => {
            tracing::error!("Matching run failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to run matching".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
