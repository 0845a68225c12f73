use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::application::CategoryTotal;
use crate::domain::{
    Category, CategoryId, Cents, ColumnValue, DATE_FORMAT, DEFAULT_CATEGORIES, Expense, ExpenseId,
    ExpenseUpdate,
};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying categories and expenses.
///
/// Holds a single-connection pool: the ledger is a single-writer file and
/// every statement autocommits.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the SQLite database file at `path`. The path is used as a
    /// file name as-is, never parsed as a URL.
    ///
    /// With `create_if_missing` the file is created on first use; otherwise a
    /// missing file is an error. Foreign keys are always enforced.
    pub async fn connect(path: impl AsRef<Path>, create_if_missing: bool) -> Result<Self> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(create_if_missing)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {}", path.display()))?;

        tracing::debug!(path = %path.display(), "connected to ledger database");
        Ok(Self::new(pool))
    }

    /// Create the tables if needed and seed the default categories.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        self.seed_categories().await
    }

    /// Initialize a database (connect, creating the file, then migrate).
    pub async fn init(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Self::connect(path, true).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Close the underlying pool, releasing the database file.
    pub async fn close(self) {
        self.pool.close().await;
    }

    // ========================
    // Category operations
    // ========================

    /// Insert the default categories, ignoring any that already exist.
    async fn seed_categories(&self) -> Result<()> {
        let mut inserted = 0;
        for name in DEFAULT_CATEGORIES {
            inserted += sqlx::query("INSERT OR IGNORE INTO categories (category_name) VALUES (?)")
                .bind(name)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to seed category {}", name))?
                .rows_affected();
        }

        tracing::debug!(inserted, "seeded default categories");
        Ok(())
    }

    /// List all categories, ordered by id.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT category_id, category_name FROM categories ORDER BY category_id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories")?;

        rows.iter().map(Self::row_to_category).collect()
    }

    /// Get a category by ID.
    pub async fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let row = sqlx::query(
            "SELECT category_id, category_name FROM categories WHERE category_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch category")?;

        row.as_ref().map(Self::row_to_category).transpose()
    }

    fn row_to_category(row: &SqliteRow) -> Result<Category> {
        Ok(Category {
            category_id: row.try_get("category_id")?,
            category_name: row.try_get("category_name")?,
        })
    }

    // ========================
    // Expense operations
    // ========================

    /// Insert a new expense and return its assigned id.
    pub async fn insert_expense(
        &self,
        date: NaiveDate,
        category_id: Option<CategoryId>,
        amount: Cents,
    ) -> Result<ExpenseId> {
        let result = sqlx::query(
            r#"
            INSERT INTO expenses (date, category_id, amount)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(date.format(DATE_FORMAT).to_string())
        .bind(category_id)
        .bind(amount)
        .execute(&self.pool)
        .await
        .context("Failed to save expense")?;

        Ok(result.last_insert_rowid())
    }

    /// Write the supplied fields of `update` to the matching expense.
    /// Returns the number of rows changed; zero when the id is unknown or the
    /// update is empty.
    pub async fn update_expense(&self, id: ExpenseId, update: &ExpenseUpdate) -> Result<u64> {
        let assignments = update.assignments();
        if assignments.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE expenses SET ");
        {
            let mut set = builder.separated(", ");
            for value in assignments {
                set.push(value.column().as_str());
                set.push_unseparated(" = ");
                match value {
                    ColumnValue::Date(date) => {
                        set.push_bind_unseparated(date.format(DATE_FORMAT).to_string())
                    }
                    ColumnValue::CategoryId(category_id) => set.push_bind_unseparated(category_id),
                    ColumnValue::Amount(amount) => set.push_bind_unseparated(amount),
                };
            }
        }
        builder.push(" WHERE expense_id = ").push_bind(id);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .context("Failed to update expense")?;

        Ok(result.rows_affected())
    }

    /// Delete an expense. Returns the number of rows removed.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM expenses WHERE expense_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete expense")?;

        Ok(result.rows_affected())
    }

    /// Get an expense by ID.
    pub async fn get_expense(&self, id: ExpenseId) -> Result<Option<Expense>> {
        let row = sqlx::query(
            r#"
            SELECT expense_id, date, category_id, amount
            FROM expenses
            WHERE expense_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch expense")?;

        row.as_ref().map(Self::row_to_expense).transpose()
    }

    /// List every expense, ordered by id.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT expense_id, date, category_id, amount
            FROM expenses
            ORDER BY expense_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    /// List expenses dated within `[start, end]`, both ends inclusive.
    pub async fn list_expenses_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT expense_id, date, category_id, amount
            FROM expenses
            WHERE date BETWEEN ? AND ?
            ORDER BY expense_id
            "#,
        )
        .bind(start.format(DATE_FORMAT).to_string())
        .bind(end.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses by date range")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    /// Sum expense amounts per category. Categories with no expenses, and
    /// expenses with no category, do not appear.
    pub async fn sum_by_category(&self) -> Result<Vec<CategoryTotal>> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.category_name AS category_name,
                COALESCE(SUM(e.amount), 0) AS total_amount,
                COUNT(e.expense_id) AS expense_count
            FROM expenses e
            JOIN categories c ON e.category_id = c.category_id
            GROUP BY c.category_name
            ORDER BY c.category_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to compute spending summary")?;

        rows.iter()
            .map(|row| {
                Ok(CategoryTotal {
                    category_name: row.try_get("category_name")?,
                    total_amount: row.try_get("total_amount")?,
                    expense_count: row.try_get("expense_count")?,
                })
            })
            .collect()
    }

    fn row_to_expense(row: &SqliteRow) -> Result<Expense> {
        let date_str: String = row.try_get("date")?;

        Ok(Expense {
            expense_id: row.try_get("expense_id")?,
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Invalid expense date: {}", date_str))?,
            category_id: row.try_get("category_id")?,
            amount: row.try_get("amount")?,
        })
    }
}
