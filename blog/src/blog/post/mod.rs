use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{
    db::Connection,
    error::AppError,
    schema::categories,
    validation::{ValidationReport, is_blank, parse_timestamp},
};

pub mod create;
pub mod delete;
pub mod edit;
pub mod view;

/// The add and edit post forms. Exactly one of the button fields is sent,
/// depending on which button was pressed.
#[derive(Deserialize, Serialize, Default, Debug)]
#[serde(default)]
pub struct PostSubmission {
    pub category_id: String,
    pub title: String,
    pub slug: String,
    pub short_content: String,
    pub content: String,
    pub published_at: String,

    #[serde(skip_serializing)]
    pub save: Option<String>,
    #[serde(skip_serializing)]
    pub publish: Option<String>,
    #[serde(skip_serializing)]
    pub unpublish: Option<String>,
}

#[derive(Debug)]
pub struct CheckedPost {
    pub category_id: i32,
    /// `None` when the field was left blank.
    pub published_at: Option<NaiveDateTime>,
}

impl PostSubmission {
    pub async fn validate(
        &self,
        conn: &mut Connection,
    ) -> Result<Result<CheckedPost, ValidationReport>, AppError> {
        let mut report = ValidationReport::default();

        let mut category_id = None;
        if is_blank(&self.category_id) {
            report.add("category_id", "Category is required.");
        } else {
            if let Ok(id) = self.category_id.trim().parse::<i32>() {
                category_id = categories::table
                    .find(id)
                    .select(categories::id)
                    .first::<i32>(conn)
                    .await
                    .optional()?;
            }
            if category_id.is_none() {
                report.add("category_id", "Please select a category from the list.");
            }
        }

        if is_blank(&self.title) {
            report.add("title", "Title is a required field.");
        }

        if is_blank(&self.content) {
            report.add("content", "Post content is required.");
        }

        let mut published_at = None;
        if !is_blank(&self.published_at) {
            published_at = parse_timestamp(&self.published_at);
            if published_at.is_none() {
                report.add("published_at", "A valid date is required.");
            }
        }

        // a missing category always leaves a message, so finish() fails
        Ok(match category_id {
            Some(category_id) => report.finish(self).map(|()| CheckedPost {
                category_id,
                published_at,
            }),
            None => Err(report.finish(self).err().unwrap_or_default()),
        })
    }

    pub fn wants_publish(&self) -> bool {
        self.publish.is_some()
    }

    pub fn wants_unpublish(&self) -> bool {
        self.unpublish.is_some()
    }
}
