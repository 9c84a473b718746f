use axum::{
    extract::{FromRequest, Request, rejection::FormRejection},
    http::StatusCode,
};

use crate::error::AppError;

// Our own `Form` extractor so malformed submissions render the HTML error
// page instead of axum's plain text rejection
pub struct Form<T>(pub T);

impl<S, T> FromRequest<S> for Form<T>
where
    axum::Form<T>: FromRequest<S, Rejection = FormRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Form::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err((rejection.body_text(), StatusCode::UNPROCESSABLE_ENTITY).into()),
        }
    }
}
