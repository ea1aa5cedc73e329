use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    CreateProfileRequest, ErrorResponse, ProfileDetailResponse, ProfileImage, ProfileListItem,
};
use crate::routes::AppState;
use crate::services::{CacheKey, PostgresError};

/// Configure all profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profiles", web::post().to(create_profile))
        .route("/profiles", web::get().to(list_profiles))
        .route("/profiles/{id}", web::get().to(get_profile));
}

/// Create a profile
///
/// POST /api/v1/profiles
async fn create_profile(
    state: web::Data<AppState>,
    req: web::Json<CreateProfileRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_profile request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if req.looking_for_age_min > req.looking_for_age_max {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "Minimum age must be less than or equal to maximum age".to_string(),
            status_code: 400,
        });
    }

    let new_profile = req.into_inner().into_new_profile();

    match state.repository.create_profile(&new_profile).await {
        Ok(profile) => {
            state.cache.invalidate(&CacheKey::profile_listing()).await;
            tracing::info!("Created profile {} ({})", profile.id, profile.display_name);
            HttpResponse::Created().json(profile)
        }
        Err(PostgresError::EmailExists) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Email already exists".to_string(),
            message: "A profile with this email address already exists".to_string(),
            status_code: 400,
        }),
        Err(e) => {
            tracing::error!("Failed to create profile: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to create profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// List profiles with their images, contact details redacted
///
/// GET /api/v1/profiles
async fn list_profiles(state: web::Data<AppState>) -> impl Responder {
    let cache_key = CacheKey::profile_listing();

    match state.cache.get::<Vec<ProfileListItem>>(&cache_key).await {
        Ok(Some(listing)) => return HttpResponse::Ok().json(listing),
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache read failed for profile listing: {}", e),
    }

    let profiles = match state.repository.fetch_all_profiles().await {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::error!("Failed to fetch profiles: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch profiles".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let profile_ids: Vec<i32> = profiles.iter().map(|p| p.id).collect();
    let images = match state.repository.list_images_for(&profile_ids).await {
        Ok(images) => images,
        Err(e) => {
            tracing::error!("Failed to fetch profile images: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch profiles".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let mut images_by_profile: HashMap<i32, Vec<ProfileImage>> = HashMap::new();
    for image in images {
        images_by_profile
            .entry(image.profile_id)
            .or_default()
            .push(image);
    }

    let listing: Vec<ProfileListItem> = profiles
        .into_iter()
        .map(|profile| {
            let images = images_by_profile.remove(&profile.id).unwrap_or_default();
            ProfileListItem::from_profile(profile, images)
        })
        .collect();

    if let Err(e) = state.cache.set(&cache_key, &listing).await {
        tracing::warn!("Failed to cache profile listing: {}", e);
    }

    HttpResponse::Ok().json(listing)
}

/// One profile with all fields and images
///
/// GET /api/v1/profiles/{id}
async fn get_profile(state: web::Data<AppState>, path: web::Path<i32>) -> impl Responder {
    let profile_id = path.into_inner();

    let profile = match state.repository.get_profile(profile_id).await {
        Ok(profile) => profile,
        Err(PostgresError::NotFound(_)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Profile not found".to_string(),
                message: format!("No profile with id {profile_id}"),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch profile {}: {}", profile_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let images = match state.repository.list_images(profile_id).await {
        Ok(images) => images,
        Err(e) => {
            tracing::error!("Failed to fetch images for profile {}: {}", profile_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    HttpResponse::Ok().json(ProfileDetailResponse { profile, images })
}
