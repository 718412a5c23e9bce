//! Conditional WHERE clause assembly.
//!
//! Filters are appended through [`Conditions`], which writes the SQL fragment
//! and its bound value into the same [`QueryBuilder`] call chain. Placeholder
//! positions therefore always line up with the bound values, however many
//! optional filters end up present.

use sqlx::{QueryBuilder, Sqlite};

/// Conjunction of conditions appended to a query under construction.
pub struct Conditions<'q, 'args> {
    builder: &'q mut QueryBuilder<'args, Sqlite>,
    count: usize,
}

impl<'q, 'args> Conditions<'q, 'args> {
    pub fn new(builder: &'q mut QueryBuilder<'args, Sqlite>) -> Self {
        Self { builder, count: 0 }
    }

    /// Open the next condition and hand back the builder so the caller can
    /// push its SQL and bindings.
    pub fn next(&mut self) -> &mut QueryBuilder<'args, Sqlite> {
        self.builder
            .push(if self.count == 0 { " WHERE " } else { " AND " });
        self.count += 1;
        &mut *self.builder
    }

    /// `column = value`
    pub fn eq(&mut self, column: &str, value: i64) -> &mut Self {
        self.next().push(column).push(" = ").push_bind(value);
        self
    }

    /// `column = value`, only when a value is present.
    pub fn eq_opt(&mut self, column: &str, value: Option<i64>) -> &mut Self {
        if let Some(value) = value {
            self.eq(column, value);
        }
        self
    }

    /// `column REGEXP pattern`
    pub fn matches(&mut self, column: &str, pattern: String) -> &mut Self {
        self.next().push(column).push(" REGEXP ").push_bind(pattern);
        self
    }

    /// Number of conditions appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Build a `REGEXP` pattern matching `query` as a literal substring,
/// ignoring case.
///
/// The `(?i)` flag folds case with Unicode rules, which SQLite's own `LIKE`
/// and `lower()` only do for ASCII.
#[must_use]
pub fn match_pattern(query: &str) -> String {
    format!("(?i){}", regex::escape(query))
}
