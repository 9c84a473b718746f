//! Server-rendered pages. Every function returns a complete [`maud::Markup`]
//! document or a fragment of one; handlers pass the result to
//! [`CurrentSession::render`](crate::identity::CurrentSession::render).

use maud::{Markup, html};

use crate::validation::ValidationReport;

pub mod auth;
pub mod categories;
pub mod error;
pub mod home;
pub mod layout;
pub mod posts;

/// One step of the breadcrumb trail. The last crumb is the current page.
#[derive(Debug, Clone)]
pub struct Crumb {
    pub title: String,
    pub url: String,
}

pub fn crumb(title: impl Into<String>, url: impl Into<String>) -> Crumb {
    Crumb {
        title: title.into(),
        url: url.into(),
    }
}

/// The value to show in a form field: what the user submitted last time if
/// the submission failed, otherwise `stored`.
fn field_value<'a>(errors: Option<&'a ValidationReport>, field: &str, stored: &'a str) -> &'a str {
    errors.and_then(|e| e.input(field)).unwrap_or(stored)
}

fn field_error(errors: Option<&ValidationReport>, field: &str) -> Markup {
    html! {
        @if let Some(message) = errors.and_then(|e| e.message(field)) {
            div.invalid-feedback { (message) }
        }
    }
}

fn input_class(errors: Option<&ValidationReport>, field: &str) -> &'static str {
    match errors.and_then(|e| e.message(field)) {
        Some(_) => "form-control is-invalid",
        None => "form-control",
    }
}

fn text_input(
    label: &str,
    name: &str,
    kind: &str,
    value: &str,
    errors: Option<&ValidationReport>,
) -> Markup {
    html! {
        div.form-group {
            label for=(name) { (label) }
            input class=(input_class(errors, name)) id=(name) name=(name) type=(kind) value=(value);
            (field_error(errors, name))
        }
    }
}

fn text_area(
    label: &str,
    name: &str,
    rows: u32,
    value: &str,
    errors: Option<&ValidationReport>,
) -> Markup {
    html! {
        div.form-group {
            label for=(name) { (label) }
            textarea class=(input_class(errors, name)) id=(name) name=(name) rows=(rows) { (value) }
            (field_error(errors, name))
        }
    }
}
