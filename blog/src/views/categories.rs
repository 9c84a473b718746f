use maud::{Markup, html};

use crate::{
    blog::models::{category::Category, post::PostListing},
    validation::ValidationReport,
};

use super::{
    field_value,
    layout::{Chrome, page},
    posts, text_area, text_input,
};

pub fn sidebar(categories: &[Category]) -> Markup {
    html! {
        aside.categories {
            h3 { "Categories" }
            ul {
                @for category in categories {
                    li { a href={ "/category/" (category.category_name) } { (category.category_display_name) } }
                }
            }
        }
    }
}

pub fn detail(
    chrome: &Chrome,
    category: &Category,
    listings: &[PostListing],
    categories: &[Category],
) -> Markup {
    page(
        &category.category_display_name,
        chrome,
        html! {
            h1 { (category.category_display_name) }
            @if !category.category_description.is_empty() {
                p.lead { (category.category_description) }
            }
            (posts::summaries(listings))
            (sidebar(categories))
        },
    )
}

fn fields(
    errors: Option<&ValidationReport>,
    name: &str,
    display_name: &str,
    description: &str,
) -> Markup {
    html! {
        (text_input("Name (used in URLs)", "category_name", "text", field_value(errors, "category_name", name), errors))
        (text_input("Display name", "category_display_name", "text", field_value(errors, "category_display_name", display_name), errors))
        (text_area("Description", "category_description", 3, field_value(errors, "category_description", description), errors))
    }
}

pub fn add(chrome: &Chrome, errors: Option<&ValidationReport>) -> Markup {
    page(
        "Add Category",
        chrome,
        html! {
            h1 { "Add Category" }
            form method="post" action="/category/add" {
                (fields(errors, "", "", ""))
                button.btn.btn-primary type="submit" { "Add" }
            }
        },
    )
}

pub fn edit(chrome: &Chrome, category: &Category, errors: Option<&ValidationReport>) -> Markup {
    page(
        "Edit Category",
        chrome,
        html! {
            h1 { "Edit Category" }
            form method="post" action={ "/category/" (category.id) "/edit" } {
                (fields(
                    errors,
                    &category.category_name,
                    &category.category_display_name,
                    &category.category_description,
                ))
                button.btn.btn-primary type="submit" { "Save" }
            }
        },
    )
}
