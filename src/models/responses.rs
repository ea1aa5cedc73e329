use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{FederalState, Gender, LookingFor, Profile, ProfileImage};

/// A profile as shown in the public listing: contact details redacted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileListItem {
    pub id: i32,
    pub display_name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    pub looking_for: LookingFor,
    pub looking_for_age_min: i32,
    pub looking_for_age_max: i32,
    pub city: String,
    pub federal_state: FederalState,
    pub facebook_profile: Option<String>,
    pub interests: Vec<String>,
    pub bio: Option<String>,
    pub images: Vec<ProfileImage>,
    pub created_at: DateTime<Utc>,
}

impl ProfileListItem {
    pub fn from_profile(profile: Profile, images: Vec<ProfileImage>) -> Self {
        Self {
            id: profile.id,
            display_name: profile.display_name,
            birthdate: profile.birthdate,
            gender: profile.gender,
            looking_for: profile.looking_for,
            looking_for_age_min: profile.looking_for_age_min,
            looking_for_age_max: profile.looking_for_age_max,
            city: profile.city,
            federal_state: profile.federal_state,
            facebook_profile: profile.facebook_profile,
            interests: profile.interests,
            bio: profile.bio,
            images,
            created_at: profile.created_at,
        }
    }
}

/// A single profile with all fields and its images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDetailResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub images: Vec<ProfileImage>,
}

/// Response for the matching-run trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMatchingResponse {
    pub message: String,
    pub match_count: usize,
}

/// A city suggestion proxied from the geocoding upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    pub state: String,
    pub country: String,
    pub osm_id: i64,
    pub coordinates: [f64; 2],
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
