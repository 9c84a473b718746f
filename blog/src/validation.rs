use std::{collections::BTreeMap, sync::LazyLock};

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Format accepted by the `published_at` field, e.g. `2024-03-01 09:30`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([\.-]?\w+)*@\w+([\.-]?\w+)*(\.\w{2,3})+$").expect("email pattern is valid")
});

/// Field-keyed validation messages together with the submitted input, so a
/// form can be re-displayed with the user's values.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub messages: BTreeMap<String, String>,
    pub input: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn add(&mut self, field: &str, message: &str) {
        self.messages.insert(field.to_string(), message.to_string());
    }

    /// Returns `Ok(())` when no message was recorded, otherwise the report
    /// with `input` echoed back. Password fields are never echoed.
    pub fn finish<T: Serialize>(mut self, input: &T) -> Result<(), ValidationReport> {
        if self.messages.is_empty() {
            return Ok(());
        }

        if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(input) {
            self.input = fields
                .into_iter()
                .filter(|(field, _)| !field.contains("password"))
                .filter_map(|(field, value)| match value {
                    serde_json::Value::String(s) => Some((field, s)),
                    _ => None,
                })
                .collect();
        }

        Err(self)
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.messages.get(field).map(String::as_str)
    }

    pub fn input(&self, field: &str) -> Option<&str> {
        self.input.get(field).map(String::as_str)
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Submission {
        email: String,
        password: String,
        password_confirm: String,
        remember: Option<String>,
    }

    #[test]
    fn blank_detection_trims_whitespace() {
        assert!(is_blank(""));
        assert!(is_blank("  \t\n"));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("jsmith@example.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(is_valid_email("a-b@c-d.io"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("jsmith"));
        assert!(!is_valid_email("jsmith@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jsmith@example.comcom"));
    }

    #[test]
    fn timestamps_use_minute_precision() {
        let parsed = parse_timestamp("2024-03-01 09:30").unwrap();
        assert_eq!(parsed.to_string(), "2024-03-01 09:30:00");

        assert!(parse_timestamp("2024-03-01").is_none());
        assert!(parse_timestamp("2024-13-01 09:30").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn empty_report_is_ok() {
        let submission = Submission {
            email: "a@b.com".into(),
            password: "hunter22".into(),
            password_confirm: "hunter22".into(),
            remember: None,
        };
        assert!(ValidationReport::default().finish(&submission).is_ok());
    }

    #[test]
    fn failed_report_echoes_input_without_passwords() {
        let submission = Submission {
            email: "not-an-email".into(),
            password: "secret".into(),
            password_confirm: "secret".into(),
            remember: None,
        };
        let mut report = ValidationReport::default();
        report.add("email", "A valid email address is required.");

        let report = report.finish(&submission).unwrap_err();

        assert_eq!(
            report.message("email"),
            Some("A valid email address is required.")
        );
        assert_eq!(report.input("email"), Some("not-an-email"));
        assert_eq!(report.input("password"), None);
        assert_eq!(report.input("password_confirm"), None);
        assert_eq!(report.input("remember"), None);
    }

    #[test]
    fn later_message_for_a_field_wins() {
        let mut report = ValidationReport::default();
        report.add("password_confirm", "Password confirmation is a required field.");
        report.add("password_confirm", "Passwords do not match.");
        assert_eq!(
            report.message("password_confirm"),
            Some("Passwords do not match.")
        );
    }
}
