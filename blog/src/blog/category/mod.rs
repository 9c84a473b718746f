use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{
    blog::slug::slugify,
    db::Connection,
    error::AppError,
    schema::categories,
    validation::{ValidationReport, is_blank},
};

pub mod create;
pub mod delete;
pub mod edit;
pub mod view;

#[derive(Deserialize, Serialize, Default, Debug)]
#[serde(default)]
pub struct CategorySubmission {
    pub category_name: String,
    pub category_display_name: String,
    pub category_description: String,
}

impl CategorySubmission {
    /// Checks the submission and returns the normalized category name.
    /// `current` is the id of the category being edited, which may keep
    /// its own name.
    pub async fn validate(
        &self,
        conn: &mut Connection,
        current: Option<i32>,
    ) -> Result<Result<String, ValidationReport>, AppError> {
        let mut report = ValidationReport::default();
        let name = slugify(&self.category_name);

        if name.is_empty() {
            report.add("category_name", "Category name is required.");
        } else {
            let mut query = categories::table
                .filter(categories::category_name.eq(&name))
                .into_boxed();
            if let Some(id) = current {
                query = query.filter(categories::id.ne(id));
            }

            let taken = query.count().get_result::<i64>(conn).await?;
            if taken > 0 {
                report.add("category_name", "Category name already exists.");
            }
        }

        if is_blank(&self.category_display_name) {
            report.add(
                "category_display_name",
                "Category display name is a required field.",
            );
        }

        Ok(report.finish(self).map(|()| name))
    }
}
