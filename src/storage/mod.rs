mod repository;

pub use repository::*;

/// Schema for the categories and expenses tables. Safe to run repeatedly.
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");
