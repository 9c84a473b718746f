use axum::response::Response;

use crate::{
    error::AppError,
    identity::{Authenticated, CurrentSession},
    views::{self, layout::Chrome},
};

use super::{ListingFilter, all_categories, load_listings};

pub async fn index(mut session: CurrentSession) -> Result<Response, AppError> {
    let conn = session.db.conn().await?;

    let filter = ListingFilter::Published {
        now: chrono::Utc::now().naive_utc(),
        category_id: None,
    };
    let listings = load_listings(conn, filter).await?;
    let categories = all_categories(conn).await?;

    let flash = session.take_flash().await?;
    let crumbs = [views::crumb("Home", "/")];
    let chrome = Chrome::new(session.user(), flash.alert.as_ref(), &crumbs);

    let page = views::home::index(&chrome, &listings, &categories);
    Ok(session.render(page))
}

pub async fn dashboard(
    Authenticated { mut session, user }: Authenticated,
) -> Result<Response, AppError> {
    let conn = session.db.conn().await?;
    let listings = load_listings(conn, ListingFilter::Author(user.id)).await?;
    let categories = all_categories(conn).await?;

    let flash = session.take_flash().await?;
    let crumbs = [
        views::crumb("Home", "/"),
        views::crumb("Dashboard", "/dashboard"),
    ];
    let chrome = Chrome::new(session.user(), flash.alert.as_ref(), &crumbs);

    let page = views::home::dashboard(&chrome, &listings, &categories);
    Ok(session.render(page))
}
