use maud::{DOCTYPE, Markup, html};

use crate::identity::{flash::Alert, models::user::User};

use super::Crumb;

/// What every page shows around its body: the signed in user, the flashed
/// alert and the breadcrumb trail.
pub struct Chrome<'a> {
    pub user: Option<&'a User>,
    pub alert: Option<&'a Alert>,
    pub breadcrumbs: &'a [Crumb],
}

impl<'a> Chrome<'a> {
    pub fn new(user: Option<&'a User>, alert: Option<&'a Alert>, breadcrumbs: &'a [Crumb]) -> Self {
        Chrome {
            user,
            alert,
            breadcrumbs,
        }
    }
}

pub fn page(title: &str, chrome: &Chrome, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | Blog" }
            }
            body {
                nav.navbar {
                    a.navbar-brand href="/" { "Blog" }
                    @if let Some(user) = chrome.user {
                        span.navbar-text { "Signed in as " (user.full_name()) }
                        a.nav-link href="/dashboard" { "Dashboard" }
                        a.nav-link href="/logout" { "Logout" }
                    } @else {
                        a.nav-link href="/login" { "Login" }
                        a.nav-link href="/register" { "Register" }
                    }
                }
                main.container {
                    (breadcrumbs(chrome.breadcrumbs))
                    @if let Some(alert) = chrome.alert {
                        div class=(format!("alert alert-{}", alert.level.as_str())) role="alert" {
                            (alert.message)
                        }
                    }
                    (body)
                }
            }
        }
    }
}

fn breadcrumbs(crumbs: &[Crumb]) -> Markup {
    html! {
        @if let Some((current, parents)) = crumbs.split_last() {
            nav aria-label="breadcrumb" {
                ol.breadcrumb {
                    @for crumb in parents {
                        li.breadcrumb-item { a href=(crumb.url) { (crumb.title) } }
                    }
                    li.breadcrumb-item.active aria-current="page" { (current.title) }
                }
            }
        }
    }
}
