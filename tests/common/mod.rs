// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use expense_ledger::application::LedgerService;
use expense_ledger::domain::{CategoryId, Cents, ExpenseId};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::init(&db_path(&temp_dir)).await?;
    Ok((service, temp_dir))
}

/// Path of the ledger file inside a temp dir
pub fn db_path(temp_dir: &TempDir) -> String {
    temp_dir.path().join("test.db").to_string_lossy().into_owned()
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: one expense per default category, dated 2024-10-11
/// through 2024-10-16.
pub struct SampleExpenses;

impl SampleExpenses {
    pub const ROWS: [(&'static str, CategoryId, Cents); 6] = [
        ("2024-10-11", 1, 2550),
        ("2024-10-12", 2, 1575),
        ("2024-10-13", 3, 4500),
        ("2024-10-14", 4, 6000),
        ("2024-10-15", 5, 8050),
        ("2024-10-16", 6, 1200),
    ];

    /// Record the sample rows and return their ids in order
    pub async fn record(service: &LedgerService) -> Result<Vec<ExpenseId>> {
        let mut ids = Vec::with_capacity(Self::ROWS.len());
        for (date, category_id, amount) in Self::ROWS {
            let id = service
                .record_expense(parse_date(date), Some(category_id), amount)
                .await?;
            ids.push(id);
        }
        Ok(ids)
    }
}
