use chrono::NaiveDateTime;
use maud::{Markup, html};

use crate::{
    blog::models::{
        category::Category,
        post::{Post, PostListing},
    },
    validation::{TIMESTAMP_FORMAT, ValidationReport},
};

use super::{
    field_error, field_value, input_class,
    layout::{Chrome, page},
    text_area, text_input,
};

const DATE_FORMAT: &str = "%B %-d, %Y";

pub fn status(post: &Post, now: NaiveDateTime) -> &'static str {
    if !post.is_published {
        "Draft"
    } else if post.published_at > now {
        "Scheduled"
    } else {
        "Published"
    }
}

/// Post bodies are plain text; blank lines separate paragraphs.
fn paragraphs(content: &str) -> Markup {
    html! {
        @for paragraph in content.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            p { (paragraph) }
        }
    }
}

pub fn summaries(listings: &[PostListing]) -> Markup {
    html! {
        @if listings.is_empty() {
            p.text-muted { "No posts yet." }
        }
        @for listing in listings {
            article.post-summary {
                h2 { a href={ "/post/" (listing.post.slug) } { (listing.post.title) } }
                p.text-muted {
                    (listing.post.published_at.format(DATE_FORMAT))
                    " by " (listing.author.full_name())
                    " in "
                    a href={ "/category/" (listing.category.category_name) } {
                        (listing.category.category_display_name)
                    }
                }
                p { (listing.post.short_content) }
            }
        }
    }
}

pub fn detail(chrome: &Chrome, listing: &PostListing, can_edit: bool) -> Markup {
    let post = &listing.post;
    let now = chrono::Utc::now().naive_utc();

    page(
        &post.title,
        chrome,
        html! {
            article {
                h1 { (post.title) }
                p.text-muted {
                    (post.published_at.format(DATE_FORMAT))
                    " by " (listing.author.full_name())
                    " in "
                    a href={ "/category/" (listing.category.category_name) } {
                        (listing.category.category_display_name)
                    }
                    @if can_edit {
                        " · " span.badge { (status(post, now)) }
                    }
                }
                @if !post.short_content.is_empty() {
                    p.lead { (post.short_content) }
                }
                (paragraphs(&post.content))
            }
            @if can_edit {
                a.btn.btn-secondary href={ "/post/" (post.slug) "/edit" } { "Edit" }
                " "
                a.btn.btn-danger href={ "/post/" (post.id) "/delete" } { "Delete" }
            }
        },
    )
}

fn category_select(categories: &[Category], selected: &str, errors: Option<&ValidationReport>) -> Markup {
    html! {
        div.form-group {
            label for="category_id" { "Category" }
            select class=(input_class(errors, "category_id")) id="category_id" name="category_id" {
                option value="" { "Select a category" }
                @for category in categories {
                    @let id = category.id.to_string();
                    option value=(id) selected[id == selected] { (category.category_display_name) }
                }
            }
            (field_error(errors, "category_id"))
        }
    }
}

pub fn add(chrome: &Chrome, categories: &[Category], errors: Option<&ValidationReport>) -> Markup {
    page(
        "Add Post",
        chrome,
        html! {
            h1 { "Add Post" }
            form method="post" action="/post/add" {
                (category_select(categories, field_value(errors, "category_id", ""), errors))
                (text_input("Title", "title", "text", field_value(errors, "title", ""), errors))
                (text_input("Slug (optional)", "slug", "text", field_value(errors, "slug", ""), errors))
                (text_area("Summary", "short_content", 3, field_value(errors, "short_content", ""), errors))
                (text_area("Content", "content", 12, field_value(errors, "content", ""), errors))
                (text_input(
                    "Publish at (YYYY-MM-DD HH:MM, blank for now)",
                    "published_at",
                    "text",
                    field_value(errors, "published_at", ""),
                    errors,
                ))
                button.btn.btn-primary type="submit" name="publish" value="1" { "Publish" }
                " "
                button.btn.btn-secondary type="submit" name="save" value="1" { "Save draft" }
            }
        },
    )
}

pub fn edit(
    chrome: &Chrome,
    categories: &[Category],
    post: &Post,
    errors: Option<&ValidationReport>,
) -> Markup {
    let category_id = post.category_id.to_string();
    let published_at = post.published_at.format(TIMESTAMP_FORMAT).to_string();

    page(
        "Edit Post",
        chrome,
        html! {
            h1 { "Edit Post" }
            form method="post" action={ "/post/" (post.slug) "/edit" } {
                (category_select(categories, field_value(errors, "category_id", &category_id), errors))
                (text_input("Title", "title", "text", field_value(errors, "title", &post.title), errors))
                div.form-group {
                    label for="slug" { "Slug" }
                    input.form-control id="slug" type="text" value=(post.slug) readonly;
                }
                (text_area("Summary", "short_content", 3, field_value(errors, "short_content", &post.short_content), errors))
                (text_area("Content", "content", 12, field_value(errors, "content", &post.content), errors))
                (text_input("Publish at (YYYY-MM-DD HH:MM)", "published_at", "text", field_value(errors, "published_at", &published_at), errors))
                button.btn.btn-primary type="submit" name="save" value="1" { "Save" }
                " "
                @if post.is_published {
                    button.btn.btn-secondary type="submit" name="unpublish" value="1" { "Unpublish" }
                } @else {
                    button.btn.btn-success type="submit" name="publish" value="1" { "Publish" }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn post(is_published: bool, published_at: NaiveDateTime) -> Post {
        Post {
            id: 1,
            author_id: 1,
            category_id: 1,
            title: "Lorem Ipsum".into(),
            slug: "lorem-ipsum".into(),
            short_content: String::new(),
            content: "First.\n\nSecond <b>.".into(),
            is_published,
            published_at,
            created_at: published_at,
            updated_at: published_at,
        }
    }

    #[test]
    fn status_labels() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let earlier = now - chrono::Duration::days(1);
        let later = now + chrono::Duration::days(1);

        assert_eq!(status(&post(false, earlier), now), "Draft");
        assert_eq!(status(&post(true, later), now), "Scheduled");
        assert_eq!(status(&post(true, earlier), now), "Published");
    }

    #[test]
    fn content_is_split_into_escaped_paragraphs() {
        let html = paragraphs(&post(true, NaiveDateTime::default()).content).into_string();
        assert_eq!(html, "<p>First.</p><p>Second &lt;b&gt;.</p>");
    }
}
