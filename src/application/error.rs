use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::CategoryId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Invalid category id: {0}")]
    UnknownCategoryId(CategoryId),

    #[error("Date out of range: {0} (years must be between 1 and 9999)")]
    DateOutOfRange(NaiveDate),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
