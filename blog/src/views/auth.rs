use maud::{Markup, html};

use crate::validation::ValidationReport;

use super::{
    field_value,
    layout::{Chrome, page},
    text_input,
};

pub fn register(chrome: &Chrome, errors: Option<&ValidationReport>) -> Markup {
    page(
        "Register",
        chrome,
        html! {
            h1 { "Register" }
            form method="post" action="/register" {
                (text_input("First name", "first_name", "text", field_value(errors, "first_name", ""), errors))
                (text_input("Last name", "last_name", "text", field_value(errors, "last_name", ""), errors))
                (text_input("Email", "email", "email", field_value(errors, "email", ""), errors))
                (text_input("Password", "password", "password", "", errors))
                (text_input("Confirm password", "password_confirm", "password", "", errors))
                button.btn.btn-primary type="submit" { "Register" }
            }
            p { "Already have an account? " a href="/login" { "Log in" } }
        },
    )
}

pub fn login(chrome: &Chrome) -> Markup {
    page(
        "Login",
        chrome,
        html! {
            h1 { "Login" }
            form method="post" action="/login" {
                (text_input("Email", "email", "email", "", None))
                (text_input("Password", "password", "password", "", None))
                button.btn.btn-primary type="submit" { "Log in" }
            }
            p { "No account yet? " a href="/register" { "Register" } }
        },
    )
}
