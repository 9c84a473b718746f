use axum::{extract::Path, response::Response};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{
    error::AppError,
    identity::{Authenticated, flash::Flash},
    schema::posts,
};

pub async fn delete_post(
    Authenticated { mut session, user }: Authenticated,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let id: i32 = key.parse().map_err(|_| AppError::NotFound)?;

    let deleted = diesel::delete(
        posts::table
            .filter(posts::id.eq(id))
            .filter(posts::author_id.eq(user.id)),
    )
    .execute(session.db.conn().await?)
    .await?;

    if deleted == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(post_id = id, author_id = user.id, "post deleted");

    session.flash(Flash::success("Deleted post successfully.")).await?;
    Ok(session.redirect("/dashboard"))
}
