use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::identity::models::user::Author;

use super::category::Category;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub category_id: i32,
    pub title: String,
    pub slug: String,
    pub short_content: String,
    pub content: String,
    pub is_published: bool,
    pub published_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost<'a> {
    pub author_id: i32,
    pub category_id: i32,
    pub title: &'a str,
    pub slug: &'a str,
    pub short_content: &'a str,
    pub content: &'a str,
    pub is_published: bool,
    pub published_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::posts)]
pub struct UpdatePost<'a> {
    pub category_id: i32,
    pub title: &'a str,
    pub short_content: &'a str,
    pub content: &'a str,
    pub is_published: bool,
    pub published_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A post joined with its category and author, as listed on pages.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub post: Post,
    pub category: Category,
    pub author: Author,
}

impl From<(Post, Category, Author)> for PostListing {
    fn from((post, category, author): (Post, Category, Author)) -> Self {
        PostListing {
            post,
            category,
            author,
        }
    }
}

impl Post {
    /// Whether anonymous visitors may see the post at `now`.
    pub fn is_visible_at(&self, now: NaiveDateTime) -> bool {
        self.is_published && self.published_at <= now
    }
}
