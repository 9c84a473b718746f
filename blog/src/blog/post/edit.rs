use axum::{extract::Path, response::Response};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{
    blog::{
        all_categories,
        models::post::{Post, UpdatePost},
        post_by_key,
    },
    db::Connection,
    error::AppError,
    form::Form,
    identity::{Authenticated, flash::Flash},
    schema::posts,
    views::{self, layout::Chrome},
};

use super::PostSubmission;

/// Looks a post up by id or slug, among the posts written by `author_id`.
async fn own_post(conn: &mut Connection, key: &str, author_id: i32) -> Result<Post, AppError> {
    post_by_key(key)
        .filter(posts::author_id.eq(author_id))
        .first::<Post>(conn)
        .await
        .optional()?
        .ok_or(AppError::NotFound)
}

pub async fn get_edit_post(
    Authenticated { mut session, user }: Authenticated,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let conn = session.db.conn().await?;
    let post = own_post(conn, &key, user.id).await?;
    let categories = all_categories(conn).await?;

    let flash = session.take_flash().await?;
    let crumbs = [
        views::crumb("Home", "/"),
        views::crumb("Dashboard", "/dashboard"),
        views::crumb(&post.title, format!("/post/{}", post.slug)),
        views::crumb("Edit Post", format!("/post/{}/edit", post.slug)),
    ];
    let chrome = Chrome::new(session.user(), flash.alert.as_ref(), &crumbs);

    let page = views::posts::edit(&chrome, &categories, &post, flash.errors.as_ref());
    Ok(session.render(page))
}

pub async fn post_edit_post(
    Authenticated { mut session, user }: Authenticated,
    Path(key): Path<String>,
    Form(form): Form<PostSubmission>,
) -> Result<Response, AppError> {
    let conn = session.db.conn().await?;
    let post = own_post(conn, &key, user.id).await?;

    let checked = match form.validate(conn).await? {
        Ok(checked) => checked,
        Err(errors) => {
            session.flash(Flash::errors(errors)).await?;
            return Ok(session.redirect(&format!("/post/{}/edit", post.slug)));
        }
    };

    let is_published = if form.wants_publish() {
        true
    } else if form.wants_unpublish() {
        false
    } else {
        post.is_published
    };

    diesel::update(posts::table.find(post.id))
        .set(UpdatePost {
            category_id: checked.category_id,
            title: form.title.trim(),
            short_content: form.short_content.trim(),
            content: &form.content,
            is_published,
            published_at: checked.published_at.unwrap_or(post.published_at),
            updated_at: chrono::Utc::now().naive_utc(),
        })
        .execute(session.db.conn().await?)
        .await?;

    tracing::info!(post_id = post.id, is_published, "post updated");

    session.flash(Flash::success("Post updated successfully!")).await?;
    Ok(session.redirect(&format!("/post/{}", post.slug)))
}
