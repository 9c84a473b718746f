use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    SignedCookieJar,
    cookie::{Cookie, SameSite},
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use maud::Markup;

use crate::{
    App,
    db::{Connection, Db},
    error::AppError,
    schema::{session_flashes, sessions, users},
};

use self::{
    flash::Flash,
    models::{
        session::{NewSessionFlash, Session},
        user::User,
    },
};

pub mod flash;
pub mod models;
pub mod password;
pub mod routes;

pub const COOKIE_NAME: &str = "blog_session";

/// Deletes sessions past their expiry, along with their flashes.
pub async fn sweep_expired_sessions(conn: &mut Connection) -> Result<usize, diesel::result::Error> {
    diesel::delete(sessions::table.filter(sessions::expires_at.le(chrono::Utc::now().naive_utc())))
        .execute(conn)
        .await
}

/// The visitor's server-side session, resolved from the signed session
/// cookie, together with the request's store handle.
///
/// Handlers that change the session must respond through [`redirect`] or
/// [`render`] so the updated cookie reaches the browser.
///
/// [`redirect`]: CurrentSession::redirect
/// [`render`]: CurrentSession::render
pub struct CurrentSession {
    pub db: Db,
    jar: SignedCookieJar,
    record: Option<Session>,
    user: Option<User>,
    ttl: chrono::Duration,
    secure: bool,
}

impl FromRequestParts<App> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &App) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_headers(&parts.headers, state.config.session_key.clone());
        let mut db = Db::new(state.database_url());

        let mut record = None;
        let mut user = None;

        // a tampered or foreign cookie fails signature verification and
        // reads as absent
        if let Some(token) = jar.get(COOKIE_NAME).map(|c| c.value().to_owned()) {
            let conn = db.conn().await?;

            record = sessions::table
                .filter(sessions::token.eq(&token))
                .filter(sessions::expires_at.gt(chrono::Utc::now().naive_utc()))
                .select(Session::as_select())
                .first(conn)
                .await
                .optional()?;

            if let Some(user_id) = record.as_ref().and_then(|s| s.user_id) {
                user = users::table
                    .find(user_id)
                    .select(User::as_select())
                    .first(conn)
                    .await
                    .optional()?;
            }
        }

        Ok(CurrentSession {
            db,
            jar,
            record,
            user,
            ttl: state.config.session_ttl,
            secure: state.config.secure_cookies(),
        })
    }
}

impl CurrentSession {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Starts a fresh authenticated session for `user`, discarding the
    /// previous one so a pre-login token never gains privileges.
    pub async fn sign_in(&mut self, user: User) -> Result<(), AppError> {
        self.end().await?;
        self.start(Some(user.id)).await?;
        tracing::debug!(user_id = user.id, "session started");
        self.user = Some(user);
        Ok(())
    }

    pub async fn sign_out(&mut self) -> Result<(), AppError> {
        self.end().await?;
        self.jar = self
            .jar
            .clone()
            .remove(Cookie::build(COOKIE_NAME).path("/"));
        Ok(())
    }

    /// Stores `flash` for the next request. Anonymous visitors get a session
    /// on demand.
    pub async fn flash(&mut self, flash: Flash) -> Result<(), AppError> {
        let session_id = match &self.record {
            Some(session) => session.id,
            None => self.start(None).await?,
        };

        let payload = serde_json::to_string(&flash)?;
        let conn = self.db.conn().await?;

        diesel::insert_into(session_flashes::table)
            .values(NewSessionFlash {
                session_id,
                payload,
                created_at: chrono::Utc::now().naive_utc(),
            })
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Reads and clears the pending flash values in one statement, so a
    /// flash is shown exactly once.
    pub async fn take_flash(&mut self) -> Result<Flash, AppError> {
        let Some(session_id) = self.record.as_ref().map(|s| s.id) else {
            return Ok(Flash::default());
        };

        let conn = self.db.conn().await?;

        let mut pending: Vec<(i32, String)> = diesel::delete(
            session_flashes::table.filter(session_flashes::session_id.eq(session_id)),
        )
        .returning((session_flashes::id, session_flashes::payload))
        .get_results(conn)
        .await?;
        pending.sort_by_key(|(id, _)| *id);

        let mut flash = Flash::default();
        for (_, payload) in pending {
            flash.merge(serde_json::from_str(&payload)?);
        }

        Ok(flash)
    }

    pub fn redirect(self, to: &str) -> Response {
        (self.jar, Redirect::to(to)).into_response()
    }

    pub fn render(self, page: Markup) -> Response {
        (self.jar, Html(page.into_string())).into_response()
    }

    async fn start(&mut self, user_id: Option<i32>) -> Result<i32, AppError> {
        let new_session = Session::new_with_user_id(user_id, self.ttl);
        let conn = self.db.conn().await?;

        let swept = sweep_expired_sessions(conn).await?;
        if swept > 0 {
            tracing::debug!(count = swept, "removed expired sessions");
        }

        let session = diesel::insert_into(sessions::table)
            .values(&new_session)
            .returning(Session::as_returning())
            .get_result(conn)
            .await?;

        let max_age = time::Duration::seconds(self.ttl.num_seconds());
        let cookie = Cookie::build((COOKIE_NAME, new_session.token))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(max_age)
            .path("/");

        self.jar = self.jar.clone().add(cookie);

        let id = session.id;
        self.record = Some(session);
        Ok(id)
    }

    async fn end(&mut self) -> Result<(), AppError> {
        if let Some(session) = self.record.take() {
            let conn = self.db.conn().await?;
            diesel::delete(sessions::table.find(session.id))
                .execute(conn)
                .await?;
        }
        self.user = None;
        Ok(())
    }
}

/// A session that belongs to a signed in user. Rejects with a redirect to
/// the login page otherwise.
pub struct Authenticated {
    pub session: CurrentSession,
    pub user: User,
}

impl FromRequestParts<App> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &App) -> Result<Self, Self::Rejection> {
        let session = CurrentSession::from_request_parts(parts, state).await?;

        match session.user.clone() {
            Some(user) => Ok(Authenticated { session, user }),
            None => Err(AppError::Unauthenticated),
        }
    }
}
