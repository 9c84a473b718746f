use maud::{Markup, html};

use crate::{
    blog::models::{category::Category, post::PostListing},
    validation::TIMESTAMP_FORMAT,
};

use super::{
    categories::sidebar,
    layout::{Chrome, page},
    posts,
};

pub fn index(chrome: &Chrome, listings: &[PostListing], categories: &[Category]) -> Markup {
    page(
        "Home",
        chrome,
        html! {
            h1 { "Latest posts" }
            (posts::summaries(listings))
            (sidebar(categories))
        },
    )
}

pub fn dashboard(chrome: &Chrome, listings: &[PostListing], categories: &[Category]) -> Markup {
    let now = chrono::Utc::now().naive_utc();

    page(
        "Dashboard",
        chrome,
        html! {
            h1 { "Dashboard" }

            section.posts {
                h2 { "Your posts" }
                a.btn.btn-primary href="/post/add" { "Add Post" }
                table.table {
                    thead { tr { th { "Title" } th { "Category" } th { "Status" } th { "Updated" } th {} } }
                    tbody {
                        @for listing in listings {
                            tr {
                                td { a href={ "/post/" (listing.post.slug) } { (listing.post.title) } }
                                td { (listing.category.category_display_name) }
                                td { (posts::status(&listing.post, now)) }
                                td { (listing.post.updated_at.format(TIMESTAMP_FORMAT)) }
                                td {
                                    a href={ "/post/" (listing.post.slug) "/edit" } { "Edit" }
                                    " "
                                    a href={ "/post/" (listing.post.id) "/delete" } { "Delete" }
                                }
                            }
                        }
                    }
                }
            }

            section.categories {
                h2 { "Categories" }
                a.btn.btn-primary href="/category/add" { "Add Category" }
                table.table {
                    thead { tr { th { "Name" } th { "Display name" } th {} } }
                    tbody {
                        @for category in categories {
                            tr {
                                td { a href={ "/category/" (category.category_name) } { (category.category_name) } }
                                td { (category.category_display_name) }
                                td {
                                    a href={ "/category/" (category.id) "/edit" } { "Edit" }
                                    " "
                                    a href={ "/category/" (category.id) "/delete" } { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
