//! Keyset definitions and predicate generation.

use crate::dialect::Dialect;
use crate::sort::SortParameter;
use crate::types::{NavigationDirection, Operator, QueryResult, SortingOrder, Value};
use crate::validate::{assert_valid_sql_identifier, is_valid_sql_identifier};

use super::error::KeysetError;

/// One column of a keyset sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortColumn {
    name: String,
    order: SortingOrder,
    unique: bool,
}

impl SortColumn {
    /// Create a sort column.
    pub fn new(name: impl Into<String>, order: SortingOrder) -> Self {
        Self {
            name: name.into(),
            order,
            unique: false,
        }
    }

    /// Ascending column.
    pub fn asc(name: impl Into<String>) -> Self {
        Self::new(name, SortingOrder::Asc)
    }

    /// Descending column.
    pub fn desc(name: impl Into<String>) -> Self {
        Self::new(name, SortingOrder::Desc)
    }

    /// Mark the column as holding unique values (a primary key, say).
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Column name as rendered into SQL.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display sort order.
    #[inline]
    #[must_use]
    pub const fn order(&self) -> SortingOrder {
        self.order
    }

    /// Whether the column is a unique tie-breaker.
    #[inline]
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    fn with_order(&self, order: SortingOrder) -> Self {
        Self {
            name: self.name.clone(),
            order,
            unique: self.unique,
        }
    }
}

/// Rows that can report their value for a sort column.
///
/// The pager reads anchor values off the first and last row of a page with
/// this trait to build the previous/next cursors.
pub trait KeysetRow {
    /// Value of `column` in this row.
    fn anchor_value(&self, column: &str) -> Value;
}

/// A validated, totally ordered list of sort columns.
///
/// The last column must be unique so that no two rows compare equal; without
/// it, rows tying on every column could be skipped or repeated at a page
/// boundary.
///
/// Every column must also be `NOT NULL` in the store. `NULL` never compares
/// greater or less than an anchor, so the pager refuses pages holding one
/// (see [`PageError::NullSortValue`](crate::PageError::NullSortValue)).
///
/// # Example
///
/// ```
/// use ladder_keyset::{Keyset, KeysetError, SortColumn};
///
/// let keyset = Keyset::new(vec![
///     SortColumn::desc("rating"),
///     SortColumn::desc("id").unique(),
/// ])
/// .unwrap();
/// assert_eq!(keyset.len(), 2);
///
/// let err = Keyset::new(vec![SortColumn::desc("rating")]).unwrap_err();
/// assert_eq!(err, KeysetError::MissingTieBreaker("rating".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyset {
    columns: Vec<SortColumn>,
}

impl Keyset {
    /// Validate and build a keyset.
    pub fn new(columns: Vec<SortColumn>) -> Result<Self, KeysetError> {
        let Some(last) = columns.last() else {
            return Err(KeysetError::Empty);
        };
        for (i, column) in columns.iter().enumerate() {
            if !is_valid_sql_identifier(&column.name) {
                return Err(KeysetError::InvalidColumn(column.name.clone()));
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(KeysetError::DuplicateColumn(column.name.clone()));
            }
        }
        if !last.unique {
            return Err(KeysetError::MissingTieBreaker(last.name.clone()));
        }
        Ok(Self { columns })
    }

    /// Build a keyset from parsed sort parameters plus a unique tie-breaker.
    ///
    /// The tie-breaker always ends up last. If the parameters already sort by
    /// it, that entry is moved to the end and keeps the requested order.
    pub fn with_tie_breaker(
        params: &[SortParameter],
        tie_breaker: SortColumn,
    ) -> Result<Self, KeysetError> {
        let mut tie_breaker = tie_breaker;
        let mut columns = Vec::with_capacity(params.len() + 1);
        for param in params {
            if param.field() == tie_breaker.name {
                tie_breaker.order = param.order();
            } else {
                columns.push(SortColumn::new(param.field(), param.order()));
            }
        }
        columns.push(tie_breaker);
        Self::new(columns)
    }

    /// Columns in display order.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[SortColumn] {
        &self.columns
    }

    /// Number of sort columns, which is also the anchor arity.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always `false`; an empty keyset cannot be built.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// ORDER BY columns the store is queried with for `direction`.
    ///
    /// Backward traversal reverses every column.
    #[must_use]
    pub fn query_order(&self, direction: NavigationDirection) -> Vec<SortColumn> {
        self.columns
            .iter()
            .map(|c| c.with_order(direction.query_order(c.order)))
            .collect()
    }

    /// Predicate selecting rows strictly past `anchor` in `direction`.
    ///
    /// # Panics
    ///
    /// Panics if `anchor` does not have one value per column. Anchors coming
    /// through [`CursorCodec`](crate::CursorCodec) are already checked.
    #[must_use]
    pub fn predicate(&self, direction: NavigationDirection, anchor: &[Value]) -> KeysetPredicate {
        assert_eq!(
            anchor.len(),
            self.columns.len(),
            "keyset anchor arity mismatch"
        );
        KeysetPredicate {
            terms: self
                .columns
                .iter()
                .map(|c| (c.name.clone(), direction.operator(c.order)))
                .collect(),
            anchor: anchor.to_vec(),
        }
    }

    /// Anchor values of `row`, in column order.
    pub fn anchor_of<R: KeysetRow + ?Sized>(&self, row: &R) -> Vec<Value> {
        self.columns
            .iter()
            .map(|c| row.anchor_value(&c.name))
            .collect()
    }
}

/// Keyset WHERE condition: "the sort key is strictly past the anchor".
///
/// Each column carries its own operator, so mixed ASC/DESC keysets compare
/// correctly.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetPredicate {
    terms: Vec<(String, Operator)>,
    anchor: Vec<Value>,
}

impl KeysetPredicate {
    /// Columns with their comparison operators, in sort order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, Operator)> {
        self.terms.iter().map(|(name, op)| (name.as_str(), *op))
    }

    /// Anchor values, one per term.
    #[inline]
    #[must_use]
    pub fn anchor(&self) -> &[Value] {
        &self.anchor
    }

    /// The shared operator, if every column compares the same way.
    #[must_use]
    pub fn uniform_operator(&self) -> Option<Operator> {
        let (_, first) = self.terms.first()?;
        self.terms
            .iter()
            .all(|(_, op)| op == first)
            .then_some(*first)
    }

    /// Render the predicate with placeholders starting at `start_idx`.
    ///
    /// Returns the SQL fragment, the bound values, and the next free
    /// placeholder index.
    ///
    /// - single column: `a > $1`
    /// - same operator on every column: `(a, b) > ($1, $2)`
    /// - mixed operators: `(a > $1) OR (a = $2 AND b < $3)`
    ///
    /// The expanded form is the lexicographic definition of the row-value
    /// comparison; see <https://use-the-index-luke.com/no-offset>.
    pub fn to_sql<D: Dialect>(&self, dialect: &D, start_idx: usize) -> (String, Vec<Value>, usize) {
        let mut idx = start_idx;
        let mut params = Vec::new();

        if let Some(op) = self.uniform_operator() {
            let names: Vec<&str> = self.terms.iter().map(|(name, _)| name.as_str()).collect();
            let placeholders: Vec<String> = self
                .anchor
                .iter()
                .map(|value| {
                    params.push(value.clone());
                    let p = dialect.param(idx);
                    idx += 1;
                    p
                })
                .collect();

            let sql = if names.len() == 1 {
                format!("{} {} {}", names[0], op.as_sql(), placeholders[0])
            } else {
                format!(
                    "({}) {} ({})",
                    names.join(", "),
                    op.as_sql(),
                    placeholders.join(", ")
                )
            };
            return (sql, params, idx);
        }

        let mut or_parts = Vec::with_capacity(self.terms.len());
        for level in 0..self.terms.len() {
            let mut and_parts = Vec::with_capacity(level + 1);
            for (i, (name, op)) in self.terms[..=level].iter().enumerate() {
                let op = if i < level { Operator::Eq } else { *op };
                and_parts.push(format!("{name} {} {}", op.as_sql(), dialect.param(idx)));
                params.push(self.anchor[i].clone());
                idx += 1;
            }
            or_parts.push(format!("({})", and_parts.join(" AND ")));
        }
        (or_parts.join(" OR "), params, idx)
    }
}

/// One page query as handed to a [`QueryExecutor`](crate::QueryExecutor).
///
/// `order_by` is already reversed for backward traversal and `limit` already
/// includes the look-ahead row; executors run it as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetQuery {
    order_by: Vec<SortColumn>,
    predicate: Option<KeysetPredicate>,
    limit: usize,
}

impl KeysetQuery {
    pub(crate) const fn new(
        order_by: Vec<SortColumn>,
        predicate: Option<KeysetPredicate>,
        limit: usize,
    ) -> Self {
        Self {
            order_by,
            predicate,
            limit,
        }
    }

    /// ORDER BY columns with the order the store must return rows in.
    #[inline]
    #[must_use]
    pub fn order_by(&self) -> &[SortColumn] {
        &self.order_by
    }

    /// Keyset predicate, absent for the first or last page.
    #[inline]
    #[must_use]
    pub const fn predicate(&self) -> Option<&KeysetPredicate> {
        self.predicate.as_ref()
    }

    /// Maximum number of rows to return.
    #[inline]
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Render the ORDER BY list, e.g. `rating DESC, id DESC`.
    #[must_use]
    pub fn order_by_sql(&self) -> String {
        self.order_by
            .iter()
            .map(|c| format!("{} {}", c.name, c.order.as_sql()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render a complete `SELECT` for this page.
    ///
    /// # Panics
    ///
    /// Panics if `table` or any field is not a valid SQL identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use ladder_keyset::{Keyset, PageRequest, Pager, PagerConfig, SortColumn, Sqlite};
    ///
    /// let keyset = Keyset::new(vec![SortColumn::asc("id").unique()]).unwrap();
    /// let pager = Pager::new(keyset, &PagerConfig::default());
    /// let query = pager.query(&PageRequest::first(3)).unwrap();
    ///
    /// let result = query.to_sql(Sqlite, "team", &["id", "rating"]);
    /// assert_eq!(result.sql, "SELECT id, rating FROM team ORDER BY id ASC LIMIT 4");
    /// assert!(result.params.is_empty());
    /// ```
    pub fn to_sql<D: Dialect>(&self, dialect: D, table: &str, fields: &[&str]) -> QueryResult {
        assert_valid_sql_identifier(table, "table");
        for field in fields {
            assert_valid_sql_identifier(field, "field");
        }

        let select = if fields.is_empty() {
            "*".to_string()
        } else {
            fields.join(", ")
        };
        let mut sql = format!("SELECT {select} FROM {table}");
        let mut params = Vec::new();

        if let Some(predicate) = &self.predicate {
            let (condition, values, _next_idx) = predicate.to_sql(&dialect, 1);
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
            params = values;
        }

        sql.push_str(&format!(
            " ORDER BY {} LIMIT {}",
            self.order_by_sql(),
            self.limit
        ));

        QueryResult { sql, params }
    }
}
