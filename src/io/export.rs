use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Category, CategoryId, Expense, format_cents};

/// Ledger snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub categories: Vec<Category>,
    pub expenses: Vec<Expense>,
}

/// Exporter for writing ledger data as CSV or JSON
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    async fn expenses(&self, range: Option<(NaiveDate, NaiveDate)>) -> Result<Vec<Expense>> {
        let expenses = match range {
            Some((from, to)) => self.service.get_expenses_by_date_range(from, to).await?,
            None => self.service.list_expenses().await?,
        };
        Ok(expenses)
    }

    /// Export expenses to CSV, optionally restricted to a closed date range.
    /// Amounts are written as decimals ("25.50"), category as its name.
    pub async fn export_expenses_csv<W: Write>(
        &self,
        writer: W,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<usize> {
        let expenses = self.expenses(range).await?;
        let names: HashMap<CategoryId, String> = self
            .service
            .list_categories()
            .await?
            .into_iter()
            .map(|c| (c.category_id, c.category_name))
            .collect();

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["expense_id", "date", "category", "amount"])?;

        for expense in &expenses {
            let category = expense
                .category_id
                .and_then(|id| names.get(&id).cloned())
                .unwrap_or_default();
            let amount = expense.amount.map(format_cents).unwrap_or_default();

            csv_writer.write_record([
                expense.expense_id.to_string(),
                expense.date.to_string(),
                category,
                amount,
            ])?;
        }

        csv_writer.flush()?;
        Ok(expenses.len())
    }

    /// Export the spending summary to CSV.
    pub async fn export_summary_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let totals = self.service.get_spending_summary().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["category", "total_amount", "count"])?;
        for total in &totals {
            csv_writer.write_record([
                total.category_name.clone(),
                format_cents(total.total_amount),
                total.expense_count.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(totals.len())
    }

    /// Export categories and expenses as a pretty-printed JSON snapshot.
    pub async fn export_json<W: Write>(
        &self,
        mut writer: W,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            categories: self.service.list_categories().await?,
            expenses: self.expenses(range).await?,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
