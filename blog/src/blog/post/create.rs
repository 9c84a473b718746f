use axum::response::Response;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{
    blog::{
        all_categories,
        models::post::{NewPost, Post},
        slug::unique_post_slug,
    },
    error::AppError,
    form::Form,
    identity::{Authenticated, flash::Flash},
    schema::posts,
    views::{self, layout::Chrome},
};

use super::PostSubmission;

pub async fn get_add_post(
    Authenticated { mut session, .. }: Authenticated,
) -> Result<Response, AppError> {
    let flash = session.take_flash().await?;
    let categories = all_categories(session.db.conn().await?).await?;

    let crumbs = [
        views::crumb("Home", "/"),
        views::crumb("Dashboard", "/dashboard"),
        views::crumb("Add Post", "/post/add"),
    ];
    let chrome = Chrome::new(session.user(), flash.alert.as_ref(), &crumbs);

    let page = views::posts::add(&chrome, &categories, flash.errors.as_ref());
    Ok(session.render(page))
}

pub async fn post_add_post(
    Authenticated { mut session, user }: Authenticated,
    Form(form): Form<PostSubmission>,
) -> Result<Response, AppError> {
    let checked = match form.validate(session.db.conn().await?).await? {
        Ok(checked) => checked,
        Err(errors) => {
            session.flash(Flash::errors(errors)).await?;
            return Ok(session.redirect("/post/add"));
        }
    };

    let conn = session.db.conn().await?;
    let slug = unique_post_slug(conn, &form.slug, &form.title).await?;
    let now = chrono::Utc::now().naive_utc();

    let post: Post = diesel::insert_into(posts::table)
        .values(NewPost {
            author_id: user.id,
            category_id: checked.category_id,
            title: form.title.trim(),
            slug: &slug,
            short_content: form.short_content.trim(),
            content: &form.content,
            // "save" keeps the post as a draft
            is_published: form.save.is_none(),
            published_at: checked.published_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
        })
        .returning(Post::as_returning())
        .get_result(conn)
        .await?;

    tracing::info!(post_id = post.id, slug = %post.slug, author_id = user.id, "post created");

    session.flash(Flash::success("Post added successfully!")).await?;
    Ok(session.redirect(&format!("/post/{}", post.slug)))
}
