use axum::{extract::Path, response::Response};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{
    blog::{
        models::{
            category::Category,
            post::{Post, PostListing},
        },
        post_by_key,
    },
    error::AppError,
    identity::{CurrentSession, models::user::Author},
    schema::{categories, users},
    views::{self, layout::Chrome},
};

pub async fn get_post(
    mut session: CurrentSession,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let viewer_id = session.user().map(|u| u.id);
    let conn = session.db.conn().await?;

    let post = post_by_key(&key)
        .first::<Post>(conn)
        .await
        .optional()?
        .ok_or(AppError::NotFound)?;

    // drafts and scheduled posts only exist for their author
    let is_author = viewer_id == Some(post.author_id);
    if !is_author && !post.is_visible_at(chrono::Utc::now().naive_utc()) {
        return Err(AppError::NotFound);
    }

    let category = categories::table
        .find(post.category_id)
        .select(Category::as_select())
        .first(conn)
        .await?;

    let author = users::table
        .find(post.author_id)
        .select(Author::as_select())
        .first(conn)
        .await?;

    let listing = PostListing {
        post,
        category,
        author,
    };

    let flash = session.take_flash().await?;
    let crumbs = [
        views::crumb("Home", "/"),
        views::crumb(
            &listing.category.category_display_name,
            format!("/category/{}", listing.category.category_name),
        ),
        views::crumb(&listing.post.title, format!("/post/{}", listing.post.slug)),
    ];
    let chrome = Chrome::new(session.user(), flash.alert.as_ref(), &crumbs);

    let page = views::posts::detail(&chrome, &listing, is_author);
    Ok(session.render(page))
}
