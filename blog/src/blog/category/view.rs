use axum::{extract::Path, response::Response};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{
    blog::{
        ListingFilter, all_categories, category_by_key, load_listings, models::category::Category,
    },
    error::AppError,
    identity::CurrentSession,
    views::{self, layout::Chrome},
};

pub async fn get_category(
    mut session: CurrentSession,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let conn = session.db.conn().await?;

    let category = category_by_key(&key)
        .first::<Category>(conn)
        .await
        .optional()?
        .ok_or(AppError::NotFound)?;

    let filter = ListingFilter::Published {
        now: chrono::Utc::now().naive_utc(),
        category_id: Some(category.id),
    };
    let listings = load_listings(conn, filter).await?;
    let categories = all_categories(conn).await?;

    let flash = session.take_flash().await?;
    let crumbs = [
        views::crumb("Home", "/"),
        views::crumb(
            &category.category_display_name,
            format!("/category/{}", category.category_name),
        ),
    ];
    let chrome = Chrome::new(session.user(), flash.alert.as_ref(), &crumbs);

    let page = views::categories::detail(&chrome, &category, &listings, &categories);
    Ok(session.render(page))
}
