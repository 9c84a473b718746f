use serde::{Deserialize, Serialize};

use crate::validation::ValidationReport;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Danger,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Success => "success",
            AlertLevel::Danger => "danger",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

/// Values shown on the next page the visitor loads, then discarded.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Flash {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationReport>,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Flash {
            alert: Some(Alert {
                level: AlertLevel::Success,
                message: message.into(),
            }),
            errors: None,
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Flash {
            alert: Some(Alert {
                level: AlertLevel::Danger,
                message: message.into(),
            }),
            errors: None,
        }
    }

    pub fn errors(report: ValidationReport) -> Self {
        Flash {
            alert: None,
            errors: Some(report),
        }
    }

    /// Folds a later flash into this one; later values replace earlier ones.
    pub fn merge(&mut self, later: Flash) {
        if later.alert.is_some() {
            self.alert = later.alert;
        }
        if later.errors.is_some() {
            self.errors = later.errors;
        }
    }
}
