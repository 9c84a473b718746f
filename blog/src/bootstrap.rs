use std::collections::HashMap;

use diesel::prelude::*;
use diesel_async::{RunQueryDsl, SimpleAsyncConnection};
use eyre::WrapErr;

use crate::{
    blog::models::{category::NewCategory, post::NewPost},
    db::Connection,
    identity::{models::user::NewUser, password, sweep_expired_sessions},
    schema::{categories, posts, users},
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_name TEXT NOT NULL UNIQUE,
    category_display_name TEXT NOT NULL,
    category_description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    author_id INTEGER NOT NULL REFERENCES users (id),
    category_id INTEGER NOT NULL REFERENCES categories (id),
    title TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    short_content TEXT NOT NULL DEFAULT '',
    content TEXT NOT NULL,
    is_published BOOLEAN NOT NULL DEFAULT 0,
    published_at TIMESTAMP NOT NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);

CREATE INDEX IF NOT EXISTS posts_author_id_idx ON posts (author_id);
CREATE INDEX IF NOT EXISTS posts_category_id_idx ON posts (category_id);

CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    token TEXT NOT NULL UNIQUE,
    user_id INTEGER REFERENCES users (id) ON DELETE CASCADE,
    created_at TIMESTAMP NOT NULL,
    expires_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS session_flashes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL REFERENCES sessions (id) ON DELETE CASCADE,
    payload TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL
);
"#;

pub const FIXTURE_PASSWORD: &str = "password";

const FIXTURE_USERS: [(&str, &str, &str); 3] = [
    ("John", "Smith", "jsmith@example.com"),
    ("Jane", "Doe", "jdoe@example.com"),
    ("Amy", "Apple", "aapple@example.com"),
];

const FIXTURE_CATEGORIES: [(&str, &str, &str); 2] = [
    (
        "python-basics",
        "Python Basics",
        "Posts about basic Python programming skills.",
    ),
    (
        "advanced-python",
        "Advanced Python",
        "Posts about advanced Python programming skills.",
    ),
];

// author email, category name, title, slug, published
const FIXTURE_POSTS: [(&str, &str, &str, &str, bool); 9] = [
    ("jsmith@example.com", "python-basics", "Lorem Ipsum", "lorem-ipsum", true),
    ("jsmith@example.com", "advanced-python", "Lorem Doplor", "lorem-doplor", true),
    ("jdoe@example.com", "python-basics", "Lorem Consectetur", "lorem-consectetur", true),
    ("jdoe@example.com", "advanced-python", "Lorem Ipsum", "lorem-ipsum-1", true),
    ("aapple@example.com", "python-basics", "Lorem Doplor", "lorem-doplor-1", true),
    ("aapple@example.com", "advanced-python", "Lorem Consectetur", "lorem-consectetur-1", true),
    ("jsmith@example.com", "python-basics", "Lorem Ipsum Dolor", "lorem-ipsum-dolor", false),
    ("jdoe@example.com", "advanced-python", "Lorem Ipsum Consectetur", "lorem-ipsum-consectetur", false),
    ("aapple@example.com", "python-basics", "Lorem Ipsum Ipsum", "lorem-ipsum-ipsum", false),
];

const FIXTURE_SUMMARY: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
    eiusmod tempor incididunt ut labore et dolore magna aliqua. Vitae auctor eu augue ut lectus \
    arcu bibendum at varius.";

const FIXTURE_CONTENT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
    eiusmod tempor incididunt ut labore et dolore magna aliqua. Vitae auctor eu augue ut lectus \
    arcu bibendum at varius. Arcu non sodales neque sodales ut etiam sit amet. Eget nunc lobortis \
    mattis aliquam.\n\n\
    Non consectetur a erat nam. Urna molestie at elementum eu facilisis sed odio morbi quis. Orci \
    dapibus ultrices in iaculis nunc. Ac feugiat sed lectus vestibulum. Feugiat sed lectus \
    vestibulum mattis ullamcorper velit.\n\n\
    Ut lectus arcu bibendum at varius vel pharetra. Posuere urna nec tincidunt praesent semper. \
    Sit amet facilisis magna etiam tempor orci eu. Sapien eget mi proin sed libero enim.";

/// Creates the schema, drops expired sessions and, when `seed_fixtures` is
/// set, fills empty tables with sample data. Safe to run on every start.
pub async fn run(conn: &mut Connection, seed_fixtures: bool) -> eyre::Result<()> {
    conn.batch_execute(SCHEMA)
        .await
        .wrap_err("could not create the schema")?;

    let swept = sweep_expired_sessions(conn).await?;
    if swept > 0 {
        tracing::info!(count = swept, "removed expired sessions");
    }

    if seed_fixtures {
        seed(conn).await.wrap_err("could not load fixtures")?;
    }

    Ok(())
}

async fn seed(conn: &mut Connection) -> eyre::Result<()> {
    let now = chrono::Utc::now().naive_utc();

    if users::table.count().get_result::<i64>(conn).await? == 0 {
        let mut hashes = Vec::with_capacity(FIXTURE_USERS.len());
        for _ in FIXTURE_USERS {
            hashes.push(password::hash(FIXTURE_PASSWORD).await?);
        }

        // SQLite has no DEFAULT keyword, so rows go in one statement each.
        for (&(first_name, last_name, email), password_hash) in FIXTURE_USERS.iter().zip(&hashes) {
            diesel::insert_into(users::table)
                .values(&NewUser {
                    first_name,
                    last_name,
                    email,
                    password_hash,
                    created_at: now,
                })
                .execute(conn)
                .await?;
        }
        tracing::info!(count = FIXTURE_USERS.len(), "loaded fixture users");
    }

    if categories::table.count().get_result::<i64>(conn).await? == 0 {
        for &(category_name, category_display_name, category_description) in &FIXTURE_CATEGORIES {
            diesel::insert_into(categories::table)
                .values(&NewCategory {
                    category_name,
                    category_display_name,
                    category_description,
                })
                .execute(conn)
                .await?;
        }
        tracing::info!(count = FIXTURE_CATEGORIES.len(), "loaded fixture categories");
    }

    if posts::table.count().get_result::<i64>(conn).await? == 0 {
        let author_ids: HashMap<String, i32> = users::table
            .select((users::email, users::id))
            .load::<(String, i32)>(conn)
            .await?
            .into_iter()
            .collect();
        let category_ids: HashMap<String, i32> = categories::table
            .select((categories::category_name, categories::id))
            .load::<(String, i32)>(conn)
            .await?
            .into_iter()
            .collect();

        let mut rows = Vec::with_capacity(FIXTURE_POSTS.len());
        for (email, category, title, slug, is_published) in FIXTURE_POSTS {
            let (Some(&author_id), Some(&category_id)) = (author_ids.get(email), category_ids.get(category))
            else {
                tracing::warn!(slug, "fixture author or category is missing, skipping fixture posts");
                return Ok(());
            };

            rows.push(NewPost {
                author_id,
                category_id,
                title,
                slug,
                short_content: FIXTURE_SUMMARY,
                content: FIXTURE_CONTENT,
                is_published,
                published_at: now,
                created_at: now,
                updated_at: now,
            });
        }

        for row in &rows {
            diesel::insert_into(posts::table)
                .values(row)
                .execute(conn)
                .await?;
        }
        tracing::info!(count = rows.len(), "loaded fixture posts");
    }

    Ok(())
}
