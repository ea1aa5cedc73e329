use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseSettings;
use crate::models::domain::{NewProfile, NewProfileImage, Profile, ProfileImage};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Email already registered")]
    EmailExists,
}

/// PostgreSQL-backed profile store.
///
/// The single source of truth for profiles and their images. Matching
/// runs read through `fetch_all_profiles`, which returns profiles in id
/// order so pair enumeration is deterministic across a run.
pub struct ProfileRepository {
    pool: PgPool,
}

const PROFILE_COLUMNS: &str = "id, display_name, birthdate, gender, looking_for, \
     looking_for_age_min, looking_for_age_max, city, federal_state, phone_number, \
     facebook_profile, interests, bio, email, created_at, updated_at";

const IMAGE_COLUMNS: &str = "id, profile_id, public_id, image_url, thumbnail_url, \
     width, height, format, bytes, is_primary, position, created_at";

impl ProfileRepository {
    /// Create a new repository from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new repository from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
        )
        .await
    }

    /// Insert a validated profile. A duplicate email maps to
    /// `EmailExists` so the handler can answer 400 instead of 500.
    pub async fn create_profile(&self, profile: &NewProfile) -> Result<Profile, PostgresError> {
        let query = format!(
            r#"
            INSERT INTO profiles
                (display_name, birthdate, gender, looking_for, looking_for_age_min,
                 looking_for_age_max, city, federal_state, phone_number,
                 facebook_profile, interests, bio, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(&profile.display_name)
            .bind(profile.birthdate)
            .bind(profile.gender)
            .bind(profile.looking_for)
            .bind(profile.looking_for_age_min)
            .bind(profile.looking_for_age_max)
            .bind(&profile.city)
            .bind(profile.federal_state)
            .bind(&profile.phone_number)
            .bind(&profile.facebook_profile)
            .bind(&profile.interests)
            .bind(&profile.bio)
            .bind(&profile.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => PostgresError::EmailExists,
                e => PostgresError::SqlxError(e),
            })?;

        let created = profile_from_row(&row);
        tracing::debug!("Created profile {} ({})", created.id, created.display_name);

        Ok(created)
    }

    /// All profiles, ordered by id.
    ///
    /// The stable order matters: the matcher breaks score ties by pair
    /// enumeration order, which must not change between runs.
    pub async fn fetch_all_profiles(&self) -> Result<Vec<Profile>, PostgresError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY id");

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let profiles = rows.iter().map(profile_from_row).collect::<Vec<_>>();

        tracing::debug!("Fetched {} profiles", profiles.len());

        Ok(profiles)
    }

    /// One profile by id.
    pub async fn get_profile(&self, id: i32) -> Result<Profile, PostgresError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("profile {id}")))?;

        Ok(profile_from_row(&row))
    }

    /// Attach a CDN-hosted image to a profile.
    pub async fn add_image(&self, image: &NewProfileImage) -> Result<ProfileImage, PostgresError> {
        let query = format!(
            r#"
            INSERT INTO profile_images
                (profile_id, public_id, image_url, thumbnail_url, width, height,
                 format, bytes, is_primary, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {IMAGE_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(image.profile_id)
            .bind(&image.public_id)
            .bind(&image.image_url)
            .bind(&image.thumbnail_url)
            .bind(image.width)
            .bind(image.height)
            .bind(&image.format)
            .bind(image.bytes)
            .bind(image.is_primary)
            .bind(image.position)
            .fetch_one(&self.pool)
            .await?;

        Ok(image_from_row(&row))
    }

    /// Number of images currently attached to a profile.
    pub async fn count_images(&self, profile_id: i32) -> Result<i64, PostgresError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM profile_images WHERE profile_id = $1")
            .bind(profile_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    /// Images for a profile, primary first, then by position.
    pub async fn list_images(&self, profile_id: i32) -> Result<Vec<ProfileImage>, PostgresError> {
        let query = format!(
            "SELECT {IMAGE_COLUMNS} FROM profile_images \
             WHERE profile_id = $1 ORDER BY is_primary DESC, position ASC"
        );

        let rows = sqlx::query(&query)
            .bind(profile_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(image_from_row).collect())
    }

    /// Images for a set of profiles, for the listing endpoint.
    pub async fn list_images_for(
        &self,
        profile_ids: &[i32],
    ) -> Result<Vec<ProfileImage>, PostgresError> {
        let query = format!(
            "SELECT {IMAGE_COLUMNS} FROM profile_images \
             WHERE profile_id = ANY($1) ORDER BY profile_id, is_primary DESC, position ASC"
        );

        let rows = sqlx::query(&query)
            .bind(profile_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(image_from_row).collect())
    }

    /// One image by id.
    pub async fn get_image(&self, image_id: i32) -> Result<ProfileImage, PostgresError> {
        let query = format!("SELECT {IMAGE_COLUMNS} FROM profile_images WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(image_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("image {image_id}")))?;

        Ok(image_from_row(&row))
    }

    /// Delete an image row. Returns whether anything was deleted.
    pub async fn delete_image(&self, image_id: i32) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM profile_images WHERE id = $1")
            .bind(image_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn profile_from_row(row: &PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        display_name: row.get("display_name"),
        birthdate: row.get("birthdate"),
        gender: row.get("gender"),
        looking_for: row.get("looking_for"),
        looking_for_age_min: row.get("looking_for_age_min"),
        looking_for_age_max: row.get("looking_for_age_max"),
        city: row.get("city"),
        federal_state: row.get("federal_state"),
        phone_number: row.get("phone_number"),
        facebook_profile: row.get("facebook_profile"),
        interests: row.get("interests"),
        bio: row.get("bio"),
        email: row.get("email"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn image_from_row(row: &PgRow) -> ProfileImage {
    ProfileImage {
        id: row.get("id"),
        profile_id: row.get("profile_id"),
        public_id: row.get("public_id"),
        image_url: row.get("image_url"),
        thumbnail_url: row.get("thumbnail_url"),
        width: row.get("width"),
        height: row.get("height"),
        format: row.get("format"),
        bytes: row.get("bytes"),
        is_primary: row.get("is_primary"),
        position: row.get("position"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_conflict_has_a_stable_message() {
        let err = PostgresError::EmailExists;
        assert_eq!(err.to_string(), "Email already registered");
    }
}
