use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::views;

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("could not connect to the database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("password hashing failed: {0}")]
    Password(#[from] argon2::Error),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("malformed session data: {0}")]
    SessionData(#[from] serde_json::Error),
}

#[derive(Debug)]
pub enum AppError {
    ServerError {
        error: ServerError,

        #[cfg(debug_assertions)]
        backtrace: Option<backtrace::Backtrace>,
    },
    NotFound,
    /// The route requires a signed in user.
    Unauthenticated,
    Unhandled(String, StatusCode),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            AppError::ServerError {
                error,
                #[cfg(debug_assertions)]
                backtrace,
            } => {
                #[cfg(debug_assertions)]
                {
                    let frames = backtrace.as_ref().map(filter_backtrace).unwrap_or_default();
                    tracing::error!(%error, ?frames, "request failed");
                }
                #[cfg(not(debug_assertions))]
                tracing::error!(%error, "request failed");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong on our end. Please try again later.".to_string(),
                )
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "The page you were looking for could not be found.".to_string(),
            ),
            AppError::Unauthenticated => return Redirect::to("/login").into_response(),
            AppError::Unhandled(msg, status_code) => {
                tracing::warn!(%status_code, %msg, "unhandled error");
                (status_code, msg)
            }
        };

        (
            status_code,
            Html(views::error::page(status_code, &message).into_string()),
        )
            .into_response()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::ServerError { error, .. } => write!(f, "{error}"),
            AppError::NotFound => f.write_str("not found"),
            AppError::Unauthenticated => f.write_str("authentication required"),
            AppError::Unhandled(msg, status_code) => write!(f, "{status_code}: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ServerError> for AppError {
    fn from(error: ServerError) -> Self {
        AppError::ServerError {
            error,

            #[cfg(debug_assertions)]
            backtrace: Some(backtrace::Backtrace::new()),
        }
    }
}

macro_rules! server_error_from {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for AppError {
                fn from(e: $source) -> Self {
                    ServerError::from(e).into()
                }
            }
        )+
    };
}

server_error_from!(
    diesel::result::Error,
    diesel::ConnectionError,
    argon2::Error,
    tokio::task::JoinError,
    serde_json::Error,
);

impl From<(String, StatusCode)> for AppError {
    fn from((msg, status_code): (String, StatusCode)) -> Self {
        AppError::Unhandled(msg, status_code)
    }
}

#[cfg(debug_assertions)]
#[derive(Debug)]
#[allow(dead_code)]
struct FrameInfo {
    name: String,
    loc: String,
}

#[cfg(debug_assertions)]
fn filter_backtrace(backtrace: &backtrace::Backtrace) -> Vec<FrameInfo> {
    const MODULE_PREFIX: &str = concat!(env!("CARGO_PKG_NAME"), "::");
    let mut frames_info: Vec<FrameInfo> = Vec::new();

    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            if let (Some(name), Some(filename), Some(lineno)) = (
                symbol.name().map(|n| n.to_string()),
                symbol.filename().map(|f| f.to_owned()),
                symbol.lineno(),
            ) {
                if name.contains(MODULE_PREFIX) {
                    frames_info.push(FrameInfo {
                        name,
                        loc: format!("{}:{}", filename.display(), lineno),
                    });
                }
            }
        }
    }

    frames_info
}
