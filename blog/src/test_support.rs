use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{
    App, bootstrap,
    config::ServerConfig,
    db::{self, Connection},
    identity::COOKIE_NAME,
    router,
};

/// A router over a freshly bootstrapped store with fixtures loaded.
pub struct TestApp {
    router: Router,
    database_url: String,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let database_url = dir.path().join("blog.db").to_str().unwrap().to_owned();

        let vars = HashMap::from([("DATABASE_URL".to_owned(), database_url.clone())]);
        let config = ServerConfig::from_lookup(|key| Ok(vars.get(key).cloned())).unwrap();

        let mut conn = db::establish(&database_url).await.unwrap();
        bootstrap::run(&mut conn, true).await.unwrap();

        TestApp {
            router: router(App::new(config)),
            database_url,
            _dir: dir,
        }
    }

    /// A visitor with an empty cookie store.
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
        }
    }

    pub async fn conn(&self) -> Connection {
        db::establish(&self.database_url).await.unwrap()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    #[track_caller]
    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(to));
    }
}

/// Sends requests through the router, keeping the session cookie between
/// them like a browser would.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri);
        self.send(request, Body::empty()).await
    }

    pub async fn post(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(body)).await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.post("/login", &[("email", email), ("password", password)])
            .await
    }

    /// A second client holding the same cookie, e.g. a copy kept by an
    /// attacker.
    pub fn fork(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: self.cookie.clone(),
        }
    }

    pub fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    async fn send(&mut self, mut request: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            let set_cookie = set_cookie.to_str().unwrap();
            let pair = set_cookie.split(';').next().unwrap_or_default();
            match pair.split_once('=') {
                Some((name, "")) if name == COOKIE_NAME => self.cookie = None,
                Some((name, _)) if name == COOKIE_NAME => self.cookie = Some(pair.to_owned()),
                _ => {}
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|l| l.to_str().unwrap().to_owned());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}
