use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};

use crate::models::ErrorResponse;
use crate::routes::AppState;

/// Configure the city suggestion route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/cities", web::get().to(suggest_cities));
}

/// City-name suggestions for the signup form
///
/// GET /api/v1/cities?q={query}
async fn suggest_cities(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let q = match query.get("q") {
        Some(q) if !q.is_empty() => q,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing query".to_string(),
                message: "Query parameter 'q' is required".to_string(),
                status_code: 400,
            });
        }
    };

    match state.geocoder.suggest_cities(q).await {
        Ok(suggestions) => HttpResponse::Ok().json(suggestions),
        Err(e) => {
            tracing::error!("City suggestion lookup failed: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Suggestion lookup failed".to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}
