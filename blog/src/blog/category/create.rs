use axum::response::Response;
use diesel_async::RunQueryDsl;

use crate::{
    blog::models::category::NewCategory,
    error::AppError,
    form::Form,
    identity::{Authenticated, flash::Flash},
    schema::categories,
    views::{self, layout::Chrome},
};

use super::CategorySubmission;

pub async fn get_add_category(
    Authenticated { mut session, .. }: Authenticated,
) -> Result<Response, AppError> {
    let flash = session.take_flash().await?;

    let crumbs = [
        views::crumb("Home", "/"),
        views::crumb("Dashboard", "/dashboard"),
        views::crumb("Add Category", "/category/add"),
    ];
    let chrome = Chrome::new(session.user(), flash.alert.as_ref(), &crumbs);

    let page = views::categories::add(&chrome, flash.errors.as_ref());
    Ok(session.render(page))
}

pub async fn post_add_category(
    Authenticated { mut session, user }: Authenticated,
    Form(form): Form<CategorySubmission>,
) -> Result<Response, AppError> {
    let name = match form.validate(session.db.conn().await?, None).await? {
        Ok(name) => name,
        Err(errors) => {
            session.flash(Flash::errors(errors)).await?;
            return Ok(session.redirect("/category/add"));
        }
    };

    diesel::insert_into(categories::table)
        .values(NewCategory {
            category_name: &name,
            category_display_name: form.category_display_name.trim(),
            category_description: form.category_description.trim(),
        })
        .execute(session.db.conn().await?)
        .await?;

    tracing::info!(category = %name, user_id = user.id, "category created");

    session.flash(Flash::success("Category added successfully!")).await?;
    Ok(session.redirect(&format!("/category/{name}")))
}
