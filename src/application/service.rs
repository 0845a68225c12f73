use chrono::NaiveDate;

use crate::domain::{
    Category, CategoryId, Cents, Expense, ExpenseId, ExpenseUpdate, earliest_storable_date,
    is_storable_date, latest_storable_date,
};
use crate::storage::Repository;

use super::{AppError, CategoryTotal, DateRangeReport, SpendingSummary};

/// The ledger store: owns the database handle and exposes the expense
/// operations. This is the primary interface for any client.
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the ledger at the given path, creating the file, tables and
    /// default categories as needed. Running it on an initialized ledger
    /// changes nothing.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let repo = Repository::init(database_path).await?;
        tracing::debug!(database_path, "ledger initialized");
        Ok(Self::new(repo))
    }

    /// Connect to an existing ledger without creating it.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let repo = Repository::connect(database_path, false).await?;
        Ok(Self::new(repo))
    }

    /// Release the database handle.
    pub async fn close(self) {
        self.repo.close().await;
    }

    // ========================
    // Category operations
    // ========================

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.repo.list_categories().await?)
    }

    /// Look up a category by name, ignoring case.
    pub async fn get_category_by_name(&self, name: &str) -> Result<Category, AppError> {
        self.repo
            .list_categories()
            .await?
            .into_iter()
            .find(|c| c.matches_name(name))
            .ok_or_else(|| AppError::CategoryNotFound(name.to_string()))
    }

    fn ensure_storable_date(date: NaiveDate) -> Result<(), AppError> {
        if is_storable_date(date) {
            Ok(())
        } else {
            Err(AppError::DateOutOfRange(date))
        }
    }

    async fn ensure_category_exists(&self, id: CategoryId) -> Result<(), AppError> {
        match self.repo.get_category(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::UnknownCategoryId(id)),
        }
    }

    // ========================
    // Expense operations
    // ========================

    /// Record a new expense and return its id. The row is committed before
    /// this returns.
    pub async fn record_expense(
        &self,
        date: NaiveDate,
        category_id: Option<CategoryId>,
        amount: Cents,
    ) -> Result<ExpenseId, AppError> {
        Self::ensure_storable_date(date)?;
        if let Some(id) = category_id {
            self.ensure_category_exists(id).await?;
        }

        let expense_id = self.repo.insert_expense(date, category_id, amount).await?;
        tracing::info!(expense_id, %date, ?category_id, amount, "recorded expense");
        Ok(expense_id)
    }

    /// Apply a partial update. Returns the number of rows changed: zero when
    /// no expense has this id or when nothing was supplied.
    pub async fn update_expense(
        &self,
        expense_id: ExpenseId,
        update: ExpenseUpdate,
    ) -> Result<u64, AppError> {
        if update.is_empty() {
            tracing::debug!(expense_id, "empty update, nothing to do");
            return Ok(0);
        }
        if let Some(date) = update.date {
            Self::ensure_storable_date(date)?;
        }
        if let Some(id) = update.category_id {
            self.ensure_category_exists(id).await?;
        }

        let updated = self.repo.update_expense(expense_id, &update).await?;
        if updated == 0 {
            tracing::debug!(expense_id, "update matched no expense");
        } else {
            tracing::info!(expense_id, ?update, "updated expense");
        }
        Ok(updated)
    }

    /// Delete an expense. Deleting an unknown id is not an error; it returns 0.
    pub async fn delete_expense(&self, expense_id: ExpenseId) -> Result<u64, AppError> {
        let deleted = self.repo.delete_expense(expense_id).await?;
        if deleted == 0 {
            tracing::debug!(expense_id, "delete matched no expense");
        } else {
            tracing::info!(expense_id, "deleted expense");
        }
        Ok(deleted)
    }

    pub async fn get_expense(&self, expense_id: ExpenseId) -> Result<Option<Expense>, AppError> {
        Ok(self.repo.get_expense(expense_id).await?)
    }

    pub async fn list_expenses(&self) -> Result<Vec<Expense>, AppError> {
        Ok(self.repo.list_expenses().await?)
    }

    // ========================
    // Reporting
    // ========================

    /// Per-category totals. Only categories with at least one expense appear,
    /// and callers needing a particular order should sort the result.
    pub async fn get_spending_summary(&self) -> Result<Vec<CategoryTotal>, AppError> {
        Ok(self.repo.sum_by_category().await?)
    }

    /// Expenses dated between `start_date` and `end_date`, both inclusive.
    /// An inverted range yields no rows. Bounds beyond the storable years are
    /// clamped, since no stored row can lie outside them.
    pub async fn get_expenses_by_date_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Expense>, AppError> {
        let start = start_date.max(earliest_storable_date());
        let end = end_date.min(latest_storable_date());
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self.repo.list_expenses_between(start, end).await?)
    }

    /// Spending summary with a grand total.
    pub async fn get_summary_report(&self) -> Result<SpendingSummary, AppError> {
        Ok(SpendingSummary::new(self.get_spending_summary().await?))
    }

    /// Date range query with a total, for display and export.
    pub async fn get_date_range_report(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<DateRangeReport, AppError> {
        let expenses = self.get_expenses_by_date_range(start_date, end_date).await?;
        Ok(DateRangeReport::new(start_date, end_date, expenses))
    }
}
