use axum::{extract::Path, response::Response};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{
    blog::{
        category_by_key,
        models::category::{Category, NewCategory},
    },
    error::AppError,
    form::Form,
    identity::{Authenticated, flash::Flash},
    schema::categories,
    views::{self, layout::Chrome},
};

use super::CategorySubmission;

pub async fn get_edit_category(
    Authenticated { mut session, .. }: Authenticated,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let category = category_by_key(&key)
        .first::<Category>(session.db.conn().await?)
        .await
        .optional()?
        .ok_or(AppError::NotFound)?;

    let flash = session.take_flash().await?;
    let crumbs = [
        views::crumb("Home", "/"),
        views::crumb("Dashboard", "/dashboard"),
        views::crumb(
            &category.category_display_name,
            format!("/category/{}", category.category_name),
        ),
        views::crumb(
            "Edit Category",
            format!("/category/{}/edit", category.category_name),
        ),
    ];
    let chrome = Chrome::new(session.user(), flash.alert.as_ref(), &crumbs);

    let page = views::categories::edit(&chrome, &category, flash.errors.as_ref());
    Ok(session.render(page))
}

pub async fn post_edit_category(
    Authenticated { mut session, user }: Authenticated,
    Path(key): Path<String>,
    Form(form): Form<CategorySubmission>,
) -> Result<Response, AppError> {
    let conn = session.db.conn().await?;
    let category = category_by_key(&key)
        .first::<Category>(conn)
        .await
        .optional()?
        .ok_or(AppError::NotFound)?;

    let name = match form.validate(conn, Some(category.id)).await? {
        Ok(name) => name,
        Err(errors) => {
            session.flash(Flash::errors(errors)).await?;
            let back = format!("/category/{}/edit", category.category_name);
            return Ok(session.redirect(&back));
        }
    };

    diesel::update(categories::table.find(category.id))
        .set(NewCategory {
            category_name: &name,
            category_display_name: form.category_display_name.trim(),
            category_description: form.category_description.trim(),
        })
        .execute(session.db.conn().await?)
        .await?;

    tracing::info!(category_id = category.id, category = %name, user_id = user.id, "category updated");

    session.flash(Flash::success("Category updated successfully!")).await?;
    Ok(session.redirect(&format!("/category/{name}")))
}
