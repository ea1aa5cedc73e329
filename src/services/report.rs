use chrono::NaiveDate;

use crate::core::matcher::Match;
use crate::core::scoring::calculate_age;
use crate::models::Profile;
use crate::services::mailer::Mailer;

/// Formats a match list and hands it to the mail relay.
///
/// The dispatcher never fails its caller: with no mailer or admin
/// address configured, or when the relay rejects the message, it logs
/// the report and returns.
pub struct ReportDispatcher {
    mailer: Option<Mailer>,
    admin_email: Option<String>,
}

impl ReportDispatcher {
    pub fn new(mailer: Option<Mailer>, admin_email: Option<String>) -> Self {
        Self {
            mailer,
            admin_email,
        }
    }

    /// Deliver the report for one matching run.
    pub async fn dispatch(&self, matches: &[Match<'_>], today: NaiveDate) {
        let (mailer, admin_email) = match (&self.mailer, &self.admin_email) {
            (Some(mailer), Some(admin_email)) => (mailer, admin_email),
            _ => {
                tracing::warn!("Mail relay not configured, logging match report instead");
                self.log_report(matches, today);
                return;
            }
        };

        let subject = format!("Herzmatch - Daily Match Report ({today})");
        let text = render_text(matches, today);
        let html = render_html(matches, today);

        match mailer.send(admin_email, &subject, &text, &html).await {
            Ok(()) => tracing::info!("Match report sent to {}", admin_email),
            Err(e) => {
                tracing::error!("Failed to send match report: {}", e);
                self.log_report(matches, today);
            }
        }
    }

    fn log_report(&self, matches: &[Match<'_>], today: NaiveDate) {
        tracing::info!("Match report: {} matches", matches.len());
        for (index, m) in matches.iter().enumerate() {
            tracing::info!(
                "Match #{}: {} & {} - Score: {}",
                index + 1,
                m.profile_a.display_name,
                m.profile_b.display_name,
                m.score
            );
        }
        tracing::debug!("\n{}", render_text(matches, today));
    }
}

/// Plain-text rendering of the report. Deterministic for a fixed match
/// list and date.
pub fn render_text(matches: &[Match<'_>], today: NaiveDate) -> String {
    if matches.is_empty() {
        return "No matches found today.".to_string();
    }

    let mut text = String::from("DAILY MATCH REPORT\n");
    text.push_str(&format!("Found {} potential matches\n", matches.len()));
    text.push_str(&"=".repeat(50));
    text.push_str("\n\n");

    for (index, m) in matches.iter().enumerate() {
        text.push_str(&format!("Match #{} - Score: {}/100\n", index + 1, m.score));
        text.push_str(&"-".repeat(30));
        text.push('\n');

        for (label, profile) in [("Profile 1", m.profile_a), ("Profile 2", m.profile_b)] {
            text.push_str(&format!("\n{label}: {}\n", profile.display_name));
            text.push_str(&format!(
                "Age: {} (Looking for: {}-{})\n",
                calculate_age(profile.birthdate, today),
                profile.looking_for_age_min,
                profile.looking_for_age_max
            ));
            text.push_str(&format!(
                "Location: {}, {}\n",
                profile.city,
                profile.federal_state.display_name()
            ));
            text.push_str(&format!("Email: {}\n", profile.email));
            text.push_str(&format!("Phone: {}\n", profile.phone_number));
        }

        text.push_str("\nMatch Details:\n");
        text.push_str(&format!("Age Compatibility: {}/100\n", m.age_compatibility));
        text.push_str(&format!("Location Score: {}/100\n", m.location_score));
        text.push_str(&format!(
            "Federal State Distance: {}/100\n",
            m.state_distance
        ));
        text.push_str(&format!(
            "Shared Interests: {}\n",
            join_or_none(&m.shared_interests)
        ));
        text.push('\n');
        text.push_str(&"=".repeat(50));
        text.push_str("\n\n");
    }

    text
}

/// HTML rendering of the report for mail clients.
pub fn render_html(matches: &[Match<'_>], today: NaiveDate) -> String {
    if matches.is_empty() {
        return "<p>No matches found today.</p>".to_string();
    }

    let mut html = String::from("<h1>Daily Match Report</h1>\n");
    html.push_str(&format!(
        "<p>Found {} potential matches</p>\n<hr>\n",
        matches.len()
    ));

    for (index, m) in matches.iter().enumerate() {
        html.push_str(&format!(
            "<div style=\"margin: 20px 0; padding: 15px; border: 1px solid #ddd; border-radius: 5px;\">\n\
             <h2>Match #{} - Score: {}/100</h2>\n\
             <table style=\"width: 100%; border-collapse: collapse;\"><tr>\n",
            index + 1,
            m.score
        ));

        for profile in [m.profile_a, m.profile_b] {
            html.push_str(&render_profile_cell(profile, today));
        }

        html.push_str(&format!(
            "</tr></table>\n\
             <div style=\"margin-top: 15px; padding-top: 15px; border-top: 1px solid #eee;\">\n\
             <p><strong>Match Details:</strong></p>\n\
             <p>Age Compatibility: {}/100</p>\n\
             <p>Location Score: {}/100</p>\n\
             <p>Federal State Distance: {}/100</p>\n\
             <p>Shared Interests: {}</p>\n\
             </div>\n</div>\n",
            m.age_compatibility,
            m.location_score,
            m.state_distance,
            join_or_none(&m.shared_interests)
        ));
    }

    html
}

fn render_profile_cell(profile: &Profile, today: NaiveDate) -> String {
    let mut cell = format!(
        "<td style=\"width: 50%; padding: 10px; vertical-align: top;\">\n\
         <h3>{}</h3>\n\
         <p>Age: {} (Looking for: {}-{})</p>\n\
         <p>Location: {}, {}</p>\n\
         <p>Contact: {}</p>\n\
         <p>Phone: {}</p>\n",
        profile.display_name,
        calculate_age(profile.birthdate, today),
        profile.looking_for_age_min,
        profile.looking_for_age_max,
        profile.city,
        profile.federal_state.display_name(),
        profile.email,
        profile.phone_number
    );

    if let Some(facebook) = &profile.facebook_profile {
        cell.push_str(&format!(
            "<p>Facebook: <a href=\"{facebook}\">{facebook}</a></p>\n"
        ));
    }

    cell.push_str("</td>\n");
    cell
}

fn join_or_none(interests: &[String]) -> String {
    if interests.is_empty() {
        "None".to_string()
    } else {
        interests.join(", ")
    }
}
