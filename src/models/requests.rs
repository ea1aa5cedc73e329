use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{FederalState, Gender, LookingFor, NewProfile};

/// Request to create a profile.
///
/// Field-level rules mirror the signup form; the cross-field rule
/// (age minimum not above age maximum) is checked in the handler.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    #[validate(length(min = 2, max = 50))]
    pub display_name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    pub looking_for: LookingFor,
    #[validate(range(min = 18, max = 99))]
    pub looking_for_age_min: i32,
    #[validate(range(min = 18, max = 99))]
    pub looking_for_age_max: i32,
    #[validate(length(min = 2, max = 100))]
    pub city: String,
    pub federal_state: FederalState,
    #[validate(custom(function = validate_german_phone))]
    pub phone_number: String,
    #[serde(default)]
    #[validate(custom(function = validate_facebook_url))]
    pub facebook_profile: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub interests: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(email)]
    pub email: String,
}

impl CreateProfileRequest {
    /// Convert into insertable profile data, normalizing the phone number
    /// and dropping an empty Facebook link.
    pub fn into_new_profile(self) -> NewProfile {
        let facebook_profile = self.facebook_profile.filter(|url| !url.is_empty());

        NewProfile {
            display_name: self.display_name,
            birthdate: self.birthdate,
            gender: self.gender,
            looking_for: self.looking_for,
            looking_for_age_min: self.looking_for_age_min,
            looking_for_age_max: self.looking_for_age_max,
            city: self.city,
            federal_state: self.federal_state,
            phone_number: normalize_german_phone(&self.phone_number),
            facebook_profile,
            interests: self.interests,
            bio: self.bio,
            email: self.email,
        }
    }
}

/// Request to attach a remote image to a profile. The media CDN fetches
/// the source URL itself.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddImageRequest {
    #[validate(url)]
    pub image_url: String,
}

/// Accepts +49, 0049 and 0 prefixed numbers; the subscriber part must
/// start with a nonzero digit.
fn validate_german_phone(phone: &str) -> Result<(), ValidationError> {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();

    let digits = compact
        .strip_prefix("+49")
        .or_else(|| compact.strip_prefix("0049"))
        .or_else(|| compact.strip_prefix('0'))
        .unwrap_or(&compact);

    let valid = (2..=15).contains(&digits.len())
        && digits.starts_with(|c: char| ('1'..='9').contains(&c))
        && digits.chars().all(|c| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("german_phone"))
    }
}

/// Empty strings are allowed (the form submits "" when the field is left
/// blank); anything else must be a facebook.com profile link.
fn validate_facebook_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Ok(());
    }

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));

    let valid = match rest {
        Some(host) => {
            let host = host.strip_prefix("www.").unwrap_or(host);
            host.strip_prefix("facebook.com/")
                .is_some_and(|path| !path.is_empty())
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("facebook_url"))
    }
}

/// Normalize a German phone number to international form:
/// strip whitespace, then "00…" becomes "+…" and a leading "0" becomes "+49…".
pub fn normalize_german_phone(phone: &str) -> String {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(rest) = compact.strip_prefix("00") {
        format!("+{rest}")
    } else if compact.starts_with('0') {
        format!("+49{}", &compact[1..])
    } else {
        compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_phone_formats() {
        assert!(validate_german_phone("+49 151 12345678").is_ok());
        assert!(validate_german_phone("004915112345678").is_ok());
        assert!(validate_german_phone("015112345678").is_ok());
    }

    #[test]
    fn rejects_malformed_phones() {
        assert!(validate_german_phone("+49 051 123").is_err()); // leading zero after prefix
        assert!(validate_german_phone("12ab34").is_err());
        assert!(validate_german_phone("+49").is_err());
    }

    #[test]
    fn normalizes_to_international_form() {
        assert_eq!(normalize_german_phone("0151 1234 5678"), "+4915112345678");
        assert_eq!(normalize_german_phone("004915112345678"), "+4915112345678");
        assert_eq!(normalize_german_phone("+4915112345678"), "+4915112345678");
    }

    #[test]
    fn facebook_url_rules() {
        assert!(validate_facebook_url("https://www.facebook.com/anna.m").is_ok());
        assert!(validate_facebook_url("http://facebook.com/anna.m").is_ok());
        assert!(validate_facebook_url("").is_ok());
        assert!(validate_facebook_url("https://example.com/anna").is_err());
        assert!(validate_facebook_url("https://facebook.com/").is_err());
    }
}
