use axum::{extract::Path, response::Response};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{
    error::AppError,
    identity::{Authenticated, flash::Flash},
    schema::{categories, posts},
};

pub async fn delete_category(
    Authenticated { mut session, user }: Authenticated,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let id: i32 = key.parse().map_err(|_| AppError::NotFound)?;
    let conn = session.db.conn().await?;

    let exists = categories::table
        .find(id)
        .select(categories::id)
        .first::<i32>(conn)
        .await
        .optional()?;
    if exists.is_none() {
        return Err(AppError::NotFound);
    }

    let post_count = posts::table
        .filter(posts::category_id.eq(id))
        .count()
        .get_result::<i64>(conn)
        .await?;

    if post_count > 0 {
        tracing::info!(category_id = id, post_count, "refused to delete a category in use");
        session
            .flash(Flash::danger(format!(
                "Category could not be deleted, there are {post_count} posts in the category. \
                 Update the post(s) categories first."
            )))
            .await?;
        return Ok(session.redirect("/dashboard"));
    }

    diesel::delete(categories::table.find(id))
        .execute(conn)
        .await?;

    tracing::info!(category_id = id, user_id = user.id, "category deleted");

    session.flash(Flash::success("Deleted category successfully.")).await?;
    Ok(session.redirect("/dashboard"))
}
