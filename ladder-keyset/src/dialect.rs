//! SQL dialect implementations for Postgres and `SQLite`.
//!
//! Keyset SQL only differs between the two in placeholder syntax; both accept
//! row-value comparisons such as `(a, b) > ($1, $2)`.
//!
//! Both dialects are unit values:
//!
//! ```
//! use ladder_keyset::{Dialect, Postgres, Sqlite};
//!
//! assert_eq!(Postgres.param(2), "$2");
//! assert_eq!(Sqlite.param(2), "?2");
//! ```

/// SQL dialect trait for database-specific syntax.
pub trait Dialect: Clone + Copy {
    /// Format a parameter placeholder (e.g., `$1` for Postgres, `?1` for `SQLite`).
    fn param(&self, idx: usize) -> String;
}

/// Postgres dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("${idx}")
    }
}

/// `SQLite` dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("?{idx}")
    }
}
