// Route exports
pub mod cities;
pub mod images;
pub mod matching;
pub mod profiles;

use std::sync::Arc;

use actix_web::web;

use crate::services::{GeocoderClient, MatchRunner, MediaClient, ProfileRepository, ResponseCache};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<ProfileRepository>,
    pub cache: Arc<ResponseCache>,
    pub media: Option<Arc<MediaClient>>,
    pub geocoder: Arc<GeocoderClient>,
    pub runner: Arc<MatchRunner>,
    /// Expected X-Api-Key value for the matching trigger, when set.
    pub api_key: Option<String>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(profiles::configure)
            .configure(images::configure)
            .configure(matching::configure)
            .configure(cities::configure),
    );
}
