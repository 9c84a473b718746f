use axum::{Router, response::Response, routing::get};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{
    App,
    db::Connection,
    error::AppError,
    form::Form,
    schema::users,
    validation::{ValidationReport, is_blank, is_valid_email},
    views::{self, layout::Chrome},
};

use super::{
    CurrentSession,
    flash::Flash,
    models::user::{NewUser, User},
    password,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn route() -> Router<App> {
    Router::<App>::new()
        .route("/register", get(get_register).post(post_register))
        .route("/login", get(get_login).post(post_login))
        .route("/logout", get(logout))
}

#[derive(Deserialize, Serialize, Default, Debug)]
#[serde(default)]
pub struct RegisterSubmission {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    password_confirm: String,
}

impl RegisterSubmission {
    async fn validate(&self, conn: &mut Connection) -> Result<ValidationReport, AppError> {
        let mut report = ValidationReport::default();

        if is_blank(&self.first_name) {
            report.add("first_name", "First name is a required field.");
        }

        if is_blank(&self.last_name) {
            report.add("last_name", "Last name is a required field.");
        }

        let email = normalize_email(&self.email);
        if !is_valid_email(&email) {
            report.add("email", "A valid email address is required.");
        } else {
            let taken = users::table
                .filter(users::email.eq(&email))
                .count()
                .get_result::<i64>(conn)
                .await?;

            if taken > 0 {
                report.add("email", "An account with this email address already exists.");
            }
        }

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            report.add("password", "Password must be at least 8 characters long.");
        }

        if is_blank(&self.password_confirm) {
            report.add("password_confirm", "Password confirmation is a required field.");
        }
        if self.password_confirm != self.password {
            report.add("password_confirm", "Passwords do not match.");
        }

        Ok(report)
    }
}

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
pub struct LoginSubmission {
    email: String,
    password: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn get_register(mut session: CurrentSession) -> Result<Response, AppError> {
    if session.is_authenticated() {
        return Ok(session.redirect("/dashboard"));
    }

    let flash = session.take_flash().await?;
    let crumbs = [views::crumb("Home", "/"), views::crumb("Register", "/register")];
    let chrome = Chrome::new(session.user(), flash.alert.as_ref(), &crumbs);

    let page = views::auth::register(&chrome, flash.errors.as_ref());
    Ok(session.render(page))
}

async fn post_register(
    mut session: CurrentSession,
    Form(form): Form<RegisterSubmission>,
) -> Result<Response, AppError> {
    if session.is_authenticated() {
        return Ok(session.redirect("/dashboard"));
    }

    let report = form.validate(session.db.conn().await?).await?;
    if let Err(errors) = report.finish(&form) {
        session.flash(Flash::errors(errors)).await?;
        return Ok(session.redirect("/register"));
    }

    let password_hash = password::hash(&form.password).await?;
    let email = normalize_email(&form.email);

    let user: User = diesel::insert_into(users::table)
        .values(NewUser {
            first_name: form.first_name.trim(),
            last_name: form.last_name.trim(),
            email: &email,
            password_hash: &password_hash,
            created_at: chrono::Utc::now().naive_utc(),
        })
        .returning(User::as_returning())
        .get_result(session.db.conn().await?)
        .await?;

    tracing::info!(user_id = user.id, "user registered");

    session.sign_in(user).await?;
    session.flash(Flash::success("Successfully registered!")).await?;

    Ok(session.redirect("/dashboard"))
}

async fn get_login(mut session: CurrentSession) -> Result<Response, AppError> {
    if session.is_authenticated() {
        return Ok(session.redirect("/dashboard"));
    }

    let flash = session.take_flash().await?;
    let crumbs = [views::crumb("Home", "/"), views::crumb("Login", "/login")];
    let chrome = Chrome::new(session.user(), flash.alert.as_ref(), &crumbs);

    let page = views::auth::login(&chrome);
    Ok(session.render(page))
}

async fn post_login(
    mut session: CurrentSession,
    Form(form): Form<LoginSubmission>,
) -> Result<Response, AppError> {
    if session.is_authenticated() {
        return Ok(session.redirect("/dashboard"));
    }

    let user = users::table
        .filter(users::email.eq(normalize_email(&form.email)))
        .select(User::as_select())
        .first(session.db.conn().await?)
        .await
        .optional()?;

    let verified = match user {
        Some(user) => password::verify(&user.password_hash, &form.password)
            .await?
            .then_some(user),
        None => None,
    };

    match verified {
        Some(user) => {
            tracing::info!(user_id = user.id, "user logged in");
            session.sign_in(user).await?;
            session.flash(Flash::success("Successfully logged in!")).await?;
            Ok(session.redirect("/dashboard"))
        }
        None => {
            tracing::warn!("login attempt with invalid credentials");
            session
                .flash(Flash::danger(
                    "Could not validate the provided credentials. Please try again!",
                ))
                .await?;
            Ok(session.redirect("/login"))
        }
    }
}

async fn logout(mut session: CurrentSession) -> Result<Response, AppError> {
    if let Some(user) = session.user() {
        tracing::info!(user_id = user.id, "user logged out");
    }

    session.sign_out().await?;
    Ok(session.redirect("/"))
}
