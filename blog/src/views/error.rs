use axum::http::StatusCode;
use maud::{Markup, html};

use super::layout::{Chrome, page as layout};

pub fn page(status: StatusCode, message: &str) -> Markup {
    let title = status.canonical_reason().unwrap_or("Error");
    let crumbs = [super::crumb("Home", "/")];
    let chrome = Chrome::new(None, None, &crumbs);

    layout(
        title,
        &chrome,
        html! {
            h1 { (status.as_u16()) " " (title) }
            p { (message) }
            a href="/" { "Back to the home page" }
        },
    )
}
