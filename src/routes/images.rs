use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{AddImageRequest, ErrorResponse, NewProfileImage};
use crate::routes::AppState;
use crate::services::{CacheKey, PostgresError};

/// Profiles carry at most this many images.
const MAX_IMAGES_PER_PROFILE: i64 = 6;

/// Configure all image routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profiles/{id}/images", web::post().to(add_image))
        .route("/profiles/{id}/images", web::get().to(list_images))
        .route(
            "/profiles/{id}/images/{image_id}",
            web::delete().to(delete_image),
        );
}

/// Register a remote image with the media CDN and attach it
///
/// POST /api/v1/profiles/{id}/images
async fn add_image(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    req: web::Json<AddImageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let media = match &state.media {
        Some(media) => media,
        None => {
            return HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "Media storage not configured".to_string(),
                message: "Image uploads are disabled on this instance".to_string(),
                status_code: 503,
            });
        }
    };

    let profile_id = path.into_inner();

    if let Err(e) = state.repository.get_profile(profile_id).await {
        return match e {
            PostgresError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
                error: "Profile not found".to_string(),
                message: format!("No profile with id {profile_id}"),
                status_code: 404,
            }),
            _ => {
                tracing::error!("Failed to fetch profile {}: {}", profile_id, e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to add image".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                })
            }
        };
    }

    let existing = match state.repository.count_images(profile_id).await {
        Ok(count) => count,
        Err(e) => {
            tracing::error!("Failed to count images for {}: {}", profile_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to add image".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if existing >= MAX_IMAGES_PER_PROFILE {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Too many images".to_string(),
            message: format!(
                "Maximum {MAX_IMAGES_PER_PROFILE} images allowed. This profile already has {existing}."
            ),
            status_code: 400,
        });
    }

    let hosted = match media.ingest(&req.image_url).await {
        Ok(hosted) => hosted,
        Err(e) => {
            tracing::error!("CDN ingest failed for profile {}: {}", profile_id, e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to store image".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    let new_image = NewProfileImage {
        profile_id,
        thumbnail_url: media.thumbnail_url(&hosted.public_id),
        public_id: hosted.public_id,
        image_url: hosted.secure_url,
        width: hosted.width,
        height: hosted.height,
        format: hosted.format,
        bytes: hosted.bytes,
        is_primary: existing == 0,
        position: existing as i32,
    };

    match state.repository.add_image(&new_image).await {
        Ok(image) => {
            state.cache.invalidate(&CacheKey::profile_listing()).await;
            HttpResponse::Created().json(image)
        }
        Err(e) => {
            tracing::error!("Failed to store image row: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to add image".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Images for one profile, primary first
///
/// GET /api/v1/profiles/{id}/images
async fn list_images(state: web::Data<AppState>, path: web::Path<i32>) -> impl Responder {
    let profile_id = path.into_inner();

    match state.repository.list_images(profile_id).await {
        Ok(images) => HttpResponse::Ok().json(images),
        Err(e) => {
            tracing::error!("Failed to fetch images for {}: {}", profile_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch images".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Remove an image from the CDN and the store
///
/// DELETE /api/v1/profiles/{id}/images/{image_id}
async fn delete_image(state: web::Data<AppState>, path: web::Path<(i32, i32)>) -> impl Responder {
    let (profile_id, image_id) = path.into_inner();

    let image = match state.repository.get_image(image_id).await {
        Ok(image) if image.profile_id == profile_id => image,
        Ok(_) | Err(PostgresError::NotFound(_)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Image not found".to_string(),
                message: format!("No image {image_id} on profile {profile_id}"),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch image {}: {}", image_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to delete image".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    match &state.media {
        Some(media) => {
            if let Err(e) = media.delete(&image.public_id).await {
                tracing::error!("CDN delete failed for {}: {}", image.public_id, e);
                return HttpResponse::BadGateway().json(ErrorResponse {
                    error: "Failed to delete image".to_string(),
                    message: e.to_string(),
                    status_code: 502,
                });
            }
        }
        None => tracing::warn!(
            "Media storage not configured, removing {} from the store only",
            image.public_id
        ),
    }

    match state.repository.delete_image(image_id).await {
        Ok(_) => {
            state.cache.invalidate(&CacheKey::profile_listing()).await;
            HttpResponse::Ok().json(serde_json::json!({ "success": true }))
        }
        Err(e) => {
            tracing::error!("Failed to delete image row {}: {}", image_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to delete image".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
