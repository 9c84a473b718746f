use chrono::NaiveDateTime;
use diesel::{prelude::*, sqlite::Sqlite};
use diesel_async::RunQueryDsl;

use crate::{
    db::Connection,
    error::AppError,
    identity::models::user::Author,
    schema::{categories, posts, users},
};

use self::models::{
    category::Category,
    post::{Post, PostListing},
};

pub mod category;
pub mod home;
pub mod models;
pub mod post;
pub mod routes;
pub mod slug;

pub enum ListingFilter {
    /// Posts anyone may read at `now`, optionally within one category.
    Published {
        now: NaiveDateTime,
        category_id: Option<i32>,
    },
    /// Everything written by one author, drafts included.
    Author(i32),
}

pub async fn load_listings(
    conn: &mut Connection,
    filter: ListingFilter,
) -> Result<Vec<PostListing>, AppError> {
    let mut query = posts::table
        .inner_join(categories::table)
        .inner_join(users::table)
        .select((Post::as_select(), Category::as_select(), Author::as_select()))
        .order((posts::updated_at.desc(), posts::published_at.desc()))
        .into_boxed();

    match filter {
        ListingFilter::Published { now, category_id } => {
            query = query
                .filter(posts::is_published.eq(true))
                .filter(posts::published_at.le(now));

            if let Some(category_id) = category_id {
                query = query.filter(posts::category_id.eq(category_id));
            }
        }
        ListingFilter::Author(author_id) => {
            query = query.filter(posts::author_id.eq(author_id));
        }
    }

    let rows: Vec<(Post, Category, Author)> = query.load(conn).await?;
    Ok(rows.into_iter().map(PostListing::from).collect())
}

pub async fn all_categories(conn: &mut Connection) -> Result<Vec<Category>, AppError> {
    Ok(categories::table
        .order(categories::category_display_name.asc())
        .select(Category::as_select())
        .load(conn)
        .await?)
}

/// Matches a post by slug or numeric id. A post whose slug equals the key
/// wins over the post with that id.
pub fn post_by_key(key: &str) -> posts::BoxedQuery<'_, Sqlite> {
    let query = posts::table.into_boxed();
    match key.parse::<i32>() {
        Ok(id) => query
            .filter(posts::id.eq(id).or(posts::slug.eq(key)))
            .order(posts::slug.eq(key).desc()),
        Err(_) => query.filter(posts::slug.eq(key)),
    }
}

/// Matches a category by name or numeric id, preferring the name.
pub fn category_by_key(key: &str) -> categories::BoxedQuery<'_, Sqlite> {
    let query = categories::table.into_boxed();
    match key.parse::<i32>() {
        Ok(id) => query
            .filter(
                categories::id
                    .eq(id)
                    .or(categories::category_name.eq(key)),
            )
            .order(categories::category_name.eq(key).desc()),
        Err(_) => query.filter(categories::category_name.eq(key)),
    }
}
