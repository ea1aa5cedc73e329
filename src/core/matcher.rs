use chrono::NaiveDate;

use crate::core::scoring::{score_pair, MatchScore};
use crate::models::{Profile, ScoringWeights};

/// A scored pairing of two profiles, valid for one matching run.
///
/// Borrows its profiles from the run's input slice; matches are consumed
/// by the report dispatcher and discarded, never persisted.
#[derive(Debug, Clone)]
pub struct Match<'a> {
    pub profile_a: &'a Profile,
    pub profile_b: &'a Profile,
    pub score: u8,
    pub age_compatibility: u8,
    pub location_score: u8,
    pub state_distance: u8,
    pub shared_interests: Vec<String>,
    pub age_preference_match: bool,
}

impl<'a> Match<'a> {
    fn new(profile_a: &'a Profile, profile_b: &'a Profile, score: MatchScore) -> Self {
        Self {
            profile_a,
            profile_b,
            score: score.score,
            age_compatibility: score.age_compatibility,
            location_score: score.location_score,
            state_distance: score.state_distance,
            shared_interests: score.shared_interests,
            age_preference_match: score.age_preference_match,
        }
    }
}

/// Result of one matching run.
#[derive(Debug)]
pub struct MatchRun<'a> {
    pub matches: Vec<Match<'a>>,
    pub profile_count: usize,
    pub pairs_evaluated: usize,
}

/// Pairwise matching over the full profile set.
///
/// Enumerates every unordered pair exactly once, scores it, keeps the
/// pairs at or above the minimum score and ranks them descending.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    min_score: u8,
}

/// Matches below this score are not worth reporting.
pub const DEFAULT_MIN_SCORE: u8 = 40;

impl Matcher {
    pub fn new(weights: ScoringWeights, min_score: u8) -> Self {
        Self { weights, min_score }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    /// Score all unordered profile pairs against each other.
    ///
    /// `profiles` must be in a stable order (the repository returns them
    /// ordered by id): equal scores keep their first-encountered pair
    /// order, because the sort is stable and pairs are enumerated
    /// `i < j` over the input. Profiles are never mutated.
    pub fn collect_matches<'a>(&self, profiles: &'a [Profile], today: NaiveDate) -> MatchRun<'a> {
        let mut matches = Vec::new();
        let mut pairs_evaluated = 0;

        for i in 0..profiles.len() {
            for j in (i + 1)..profiles.len() {
                pairs_evaluated += 1;

                if let Some(score) = score_pair(&profiles[i], &profiles[j], today, &self.weights) {
                    if score.score >= self.min_score {
                        matches.push(Match::new(&profiles[i], &profiles[j], score));
                    }
                }
            }
        }

        // Stable: ties stay in pair-enumeration order
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        MatchRun {
            matches,
            profile_count: profiles.len(),
            pairs_evaluated,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FederalState, Gender, LookingFor};
    use chrono::{NaiveDate, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    fn profile(id: i32, age: i32, gender: Gender, looking_for: LookingFor) -> Profile {
        Profile {
            id,
            display_name: format!("Profile {id}"),
            birthdate: NaiveDate::from_ymd_opt(2026 - age, 1, 15).unwrap(),
            gender,
            looking_for,
            looking_for_age_min: 18,
            looking_for_age_max: 99,
            city: "Berlin".to_string(),
            federal_state: FederalState::Berlin,
            phone_number: "+4915112345678".to_string(),
            facebook_profile: None,
            interests: vec!["hiking".to_string(), "cooking".to_string()],
            bio: None,
            email: format!("p{id}@example.com"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn pairs_are_enumerated_once() {
        let profiles: Vec<Profile> = (1..=4)
            .map(|id| {
                profile(
                    id,
                    25 + id,
                    if id % 2 == 0 { Gender::Male } else { Gender::Female },
                    LookingFor::Both,
                )
            })
            .collect();

        let run = Matcher::with_default_weights().collect_matches(&profiles, today());

        assert_eq!(run.profile_count, 4);
        assert_eq!(run.pairs_evaluated, 6); // 4 * 3 / 2
        assert!(run.matches.len() <= 6);
    }

    #[test]
    fn incompatible_orientations_produce_no_match() {
        let profiles = vec![
            profile(1, 28, Gender::Male, LookingFor::Male),
            profile(2, 29, Gender::Female, LookingFor::Female),
        ];

        let run = Matcher::with_default_weights().collect_matches(&profiles, today());
        assert!(run.matches.is_empty());
        assert_eq!(run.pairs_evaluated, 1);
    }

    #[test]
    fn matches_are_sorted_descending() {
        let mut far = profile(3, 28, Gender::Female, LookingFor::Both);
        far.city = "München".to_string();
        far.federal_state = FederalState::Bayern;
        far.interests = vec!["reading".to_string()];

        let profiles = vec![
            profile(1, 28, Gender::Male, LookingFor::Both),
            profile(2, 28, Gender::Female, LookingFor::Both),
            far,
        ];

        let run = Matcher::with_default_weights().collect_matches(&profiles, today());

        for pair in run.matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        // Three identical profiles: all pairs score the same, so the
        // result must keep (1,2), (1,3), (2,3) enumeration order.
        let profiles = vec![
            profile(1, 28, Gender::Female, LookingFor::Both),
            profile(2, 28, Gender::Female, LookingFor::Both),
            profile(3, 28, Gender::Female, LookingFor::Both),
        ];

        let run = Matcher::with_default_weights().collect_matches(&profiles, today());

        let pairs: Vec<(i32, i32)> = run
            .matches
            .iter()
            .map(|m| (m.profile_a.id, m.profile_b.id))
            .collect();
        assert_eq!(pairs, vec![(1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn low_scores_are_filtered() {
        let mut weak_a = profile(1, 28, Gender::Male, LookingFor::Female);
        weak_a.city = "Saarbrücken".to_string();
        weak_a.federal_state = FederalState::Saarland;
        weak_a.interests = vec!["golf".to_string()];
        weak_a.looking_for_age_min = 18;
        weak_a.looking_for_age_max = 99;

        let mut weak_b = profile(2, 58, Gender::Female, LookingFor::Male);
        weak_b.city = "Rostock".to_string();
        weak_b.federal_state = FederalState::MecklenburgVorpommern;
        weak_b.interests = vec!["opera".to_string()];

        let binding = [weak_a, weak_b];
        let run = Matcher::with_default_weights().collect_matches(&binding, today());

        // Distant states, no shared interests, 30-year age gap: under 40
        assert!(run.matches.is_empty());
    }

    #[test]
    fn custom_threshold_is_respected() {
        let profiles = vec![
            profile(1, 28, Gender::Male, LookingFor::Both),
            profile(2, 28, Gender::Female, LookingFor::Both),
        ];

        let strict = Matcher::new(ScoringWeights::default(), 100);
        let run = strict.collect_matches(&profiles, today());

        for m in &run.matches {
            assert_eq!(m.score, 100);
        }
    }
}
