use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Gender declared on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Genders a profile is willing to match with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "looking_for", rename_all = "lowercase")]
pub enum LookingFor {
    Male,
    Female,
    Both,
}

/// The 16 German federal states, in their kebab-case wire form
/// (e.g. "baden-wuerttemberg"). Profile validation guarantees that only
/// these codes reach the core, so proximity lookups are total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "federal_state", rename_all = "kebab-case")]
pub enum FederalState {
    BadenWuerttemberg,
    Bayern,
    Berlin,
    Brandenburg,
    Bremen,
    Hamburg,
    Hessen,
    MecklenburgVorpommern,
    Niedersachsen,
    NordrheinWestfalen,
    RheinlandPfalz,
    Saarland,
    Sachsen,
    SachsenAnhalt,
    SchleswigHolstein,
    Thueringen,
}

impl FederalState {
    /// All states, in enum declaration order.
    pub const ALL: [FederalState; 16] = [
        FederalState::BadenWuerttemberg,
        FederalState::Bayern,
        FederalState::Berlin,
        FederalState::Brandenburg,
        FederalState::Bremen,
        FederalState::Hamburg,
        FederalState::Hessen,
        FederalState::MecklenburgVorpommern,
        FederalState::Niedersachsen,
        FederalState::NordrheinWestfalen,
        FederalState::RheinlandPfalz,
        FederalState::Saarland,
        FederalState::Sachsen,
        FederalState::SachsenAnhalt,
        FederalState::SchleswigHolstein,
        FederalState::Thueringen,
    ];

    /// Human-readable name, as shown in match reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            FederalState::BadenWuerttemberg => "Baden-Württemberg",
            FederalState::Bayern => "Bayern",
            FederalState::Berlin => "Berlin",
            FederalState::Brandenburg => "Brandenburg",
            FederalState::Bremen => "Bremen",
            FederalState::Hamburg => "Hamburg",
            FederalState::Hessen => "Hessen",
            FederalState::MecklenburgVorpommern => "Mecklenburg-Vorpommern",
            FederalState::Niedersachsen => "Niedersachsen",
            FederalState::NordrheinWestfalen => "Nordrhein-Westfalen",
            FederalState::RheinlandPfalz => "Rheinland-Pfalz",
            FederalState::Saarland => "Saarland",
            FederalState::Sachsen => "Sachsen",
            FederalState::SachsenAnhalt => "Sachsen-Anhalt",
            FederalState::SchleswigHolstein => "Schleswig-Holstein",
            FederalState::Thueringen => "Thüringen",
        }
    }
}

/// A stored dating profile.
///
/// Email and phone number are carried for the admin match report and are
/// stripped from the public listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i32,
    pub display_name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    pub looking_for: LookingFor,
    pub looking_for_age_min: i32,
    pub looking_for_age_max: i32,
    pub city: String,
    pub federal_state: FederalState,
    pub phone_number: String,
    #[serde(default)]
    pub facebook_profile: Option<String>,
    pub interests: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Whether this profile's age preference accepts the given age.
    pub fn accepts_age(&self, age: i32) -> bool {
        (self.looking_for_age_min..=self.looking_for_age_max).contains(&age)
    }
}

/// Profile data ready for insertion (validated and normalized).
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub display_name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    pub looking_for: LookingFor,
    pub looking_for_age_min: i32,
    pub looking_for_age_max: i32,
    pub city: String,
    pub federal_state: FederalState,
    pub phone_number: String,
    pub facebook_profile: Option<String>,
    pub interests: Vec<String>,
    pub bio: Option<String>,
    pub email: String,
}

/// An image hosted on the media CDN and attached to a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImage {
    pub id: i32,
    pub profile_id: i32,
    pub public_id: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub width: i32,
    pub height: i32,
    pub format: String,
    pub bytes: i32,
    pub is_primary: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Image metadata ready for insertion, produced after the media CDN
/// has accepted the asset.
#[derive(Debug, Clone)]
pub struct NewProfileImage {
    pub profile_id: i32,
    pub public_id: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub width: i32,
    pub height: i32,
    pub format: String,
    pub bytes: i32,
    pub is_primary: bool,
    pub position: i32,
}

/// Weights for the final compatibility score.
///
/// The three fractional weights apply to the 0-100 sub-scores; the
/// same-city bonus is an absolute number of points added when the
/// location score is a perfect 100.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub age: f64,
    pub state_distance: f64,
    pub interests: f64,
    pub same_city_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            age: 0.25,
            state_distance: 0.35,
            interests: 0.30,
            same_city_bonus: 10.0,
        }
    }
}
