use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Expense};

/// Spending for one category, as produced by the inner-join summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_name: String,
    pub total_amount: Cents,
    pub expense_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub categories: Vec<CategoryTotal>,
    pub total: Cents,
}

impl SpendingSummary {
    pub fn new(categories: Vec<CategoryTotal>) -> Self {
        let total = categories.iter().map(|c| c.total_amount).sum();
        Self { categories, total }
    }

    /// Total for a category by exact name, if it had any expenses.
    pub fn total_for(&self, category_name: &str) -> Option<Cents> {
        self.categories
            .iter()
            .find(|c| c.category_name == category_name)
            .map(|c| c.total_amount)
    }
}

/// Expenses within a closed date interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRangeReport {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub expenses: Vec<Expense>,
    pub total: Cents,
}

impl DateRangeReport {
    pub fn new(from_date: NaiveDate, to_date: NaiveDate, expenses: Vec<Expense>) -> Self {
        let total = expenses.iter().filter_map(|e| e.amount).sum();
        Self {
            from_date,
            to_date,
            expenses,
            total,
        }
    }
}
