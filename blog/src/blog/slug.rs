use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{db::Connection, error::AppError, schema::posts, validation::is_blank};

const FALLBACK_SLUG: &str = "post";

/// Lowercases `text` and joins its words with `-`, dropping anything that is
/// not an ASCII letter, digit, `-` or `_`. May return an empty string.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.trim().chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = !slug.is_empty();
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.push(c.to_ascii_lowercase());
        }
    }

    slug
}

/// Picks `base` if no existing slug equals it, otherwise `base-N` where N is
/// one more than the highest numeric suffix already in use. A suffix of
/// `u64::MAX` or more cannot be followed and is skipped.
pub fn next_available(base: &str, existing: &[String]) -> String {
    let mut base_taken = false;
    let mut max_suffix: u64 = 0;

    for slug in existing {
        if slug == base {
            base_taken = true;
            continue;
        }

        let suffix = slug
            .strip_prefix(base)
            .and_then(|rest| rest.strip_prefix('-'))
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u64>().ok())
            .filter(|&n| n < u64::MAX);

        if let Some(n) = suffix {
            max_suffix = max_suffix.max(n);
        }
    }

    if base_taken {
        format!("{base}-{}", max_suffix + 1)
    } else {
        base.to_string()
    }
}

/// Derives the slug for a new post from the explicit slug, or the title when
/// that is blank, and disambiguates it against the stored posts.
///
/// The check and the later insert are not atomic; the unique index on
/// `posts.slug` rejects a concurrent duplicate.
pub async fn unique_post_slug(
    conn: &mut Connection,
    explicit: &str,
    title: &str,
) -> Result<String, AppError> {
    let mut base = slugify(if is_blank(explicit) { title } else { explicit });
    if base.is_empty() {
        base = FALLBACK_SLUG.to_string();
    }

    let existing: Vec<String> = posts::table
        .filter(
            posts::slug
                .eq(&base)
                .or(posts::slug.like(format!("{base}-%"))),
        )
        .select(posts::slug)
        .load(conn)
        .await?;

    Ok(next_available(&base, &existing))
}
