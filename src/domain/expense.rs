use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Cents, CategoryId};

pub type ExpenseId = i64;

/// Dates are stored as ISO text so that string order equals calendar order.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years that format as exactly four digits. Outside this range chrono
/// writes a sign or extra digits and text order stops matching date order.
pub const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

pub fn is_storable_date(date: NaiveDate) -> bool {
    STORABLE_YEARS.contains(&date.year())
}

/// 0001-01-01, the first date that can be stored.
pub fn earliest_storable_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(*STORABLE_YEARS.start(), 1, 1).unwrap_or(NaiveDate::MIN)
}

/// 9999-12-31, the last date that can be stored.
pub fn latest_storable_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(*STORABLE_YEARS.end(), 12, 31).unwrap_or(NaiveDate::MAX)
}

/// One dated transaction, optionally tied to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub expense_id: ExpenseId,
    pub date: NaiveDate,
    pub category_id: Option<CategoryId>,
    /// Amount in cents. Rows written by this crate always carry one, but the
    /// column is nullable.
    pub amount: Option<Cents>,
}

/// Partial update of an expense. Only `Some` fields are written.
///
/// A supplied zero amount is still a change: `amount: Some(0)` zeroes the row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseUpdate {
    pub date: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
    pub amount: Option<Cents>,
}

impl ExpenseUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_amount(mut self, amount: Cents) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// The column assignments this update performs, in column order.
    pub fn assignments(&self) -> Vec<ColumnValue> {
        let mut values = Vec::with_capacity(3);
        if let Some(date) = self.date {
            values.push(ColumnValue::Date(date));
        }
        if let Some(category_id) = self.category_id {
            values.push(ColumnValue::CategoryId(category_id));
        }
        if let Some(amount) = self.amount {
            values.push(ColumnValue::Amount(amount));
        }
        values
    }
}

/// The writable columns of the `expenses` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseColumn {
    Date,
    CategoryId,
    Amount,
}

impl ExpenseColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseColumn::Date => "date",
            ExpenseColumn::CategoryId => "category_id",
            ExpenseColumn::Amount => "amount",
        }
    }
}

/// A typed value destined for one expense column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnValue {
    Date(NaiveDate),
    CategoryId(CategoryId),
    Amount(Cents),
}

impl ColumnValue {
    pub fn column(&self) -> ExpenseColumn {
        match self {
            ColumnValue::Date(_) => ExpenseColumn::Date,
            ColumnValue::CategoryId(_) => ExpenseColumn::CategoryId,
            ColumnValue::Amount(_) => ExpenseColumn::Amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_storable_dates_format_as_four_digit_years() {
        assert!(is_storable_date(date("2024-10-11")));
        assert!(is_storable_date(earliest_storable_date()));
        assert!(is_storable_date(latest_storable_date()));
        assert_eq!(earliest_storable_date().format(DATE_FORMAT).to_string(), "0001-01-01");
        assert_eq!(latest_storable_date().format(DATE_FORMAT).to_string(), "9999-12-31");

        let far_future = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        assert!(!is_storable_date(far_future));
        assert!(!is_storable_date(NaiveDate::from_ymd_opt(0, 12, 31).unwrap()));
    }

    #[test]
    fn test_empty_update_has_no_assignments() {
        let update = ExpenseUpdate::new();
        assert!(update.is_empty());
        assert!(update.assignments().is_empty());
    }

    #[test]
    fn test_zero_amount_counts_as_supplied() {
        let update = ExpenseUpdate::new().with_amount(0);
        assert!(!update.is_empty());
        assert_eq!(update.assignments(), vec![ColumnValue::Amount(0)]);
    }

    #[test]
    fn test_assignments_follow_column_order() {
        let update = ExpenseUpdate::new()
            .with_amount(5000)
            .with_date(date("2024-10-20"));

        let columns: Vec<_> = update
            .assignments()
            .iter()
            .map(|value| value.column().as_str())
            .collect();
        assert_eq!(columns, vec!["date", "amount"]);
    }
}
