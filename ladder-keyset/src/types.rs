//! Core types shared by the cursor codec, the predicate builder and the pager.

use std::fmt;

/// Sort order of a single keyset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortingOrder {
    /// Ascending: `ASC`
    Asc,
    /// Descending: `DESC`
    Desc,
}

impl SortingOrder {
    /// Return the opposite order.
    #[inline]
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// SQL keyword for an ORDER BY clause.
    #[inline]
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Direction of travel relative to a cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavigationDirection {
    /// Rows after the anchor, in display order.
    #[default]
    Forward,
    /// Rows before the anchor, in display order.
    Backward,
}

impl NavigationDirection {
    /// Comparison operator that selects rows strictly past the anchor.
    ///
    /// | direction | `Asc` | `Desc` |
    /// |-----------|-------|--------|
    /// | Forward   | `>`   | `<`    |
    /// | Backward  | `<`   | `>`    |
    #[inline]
    #[must_use]
    pub const fn operator(self, order: SortingOrder) -> Operator {
        match (self, order) {
            (Self::Forward, SortingOrder::Asc) | (Self::Backward, SortingOrder::Desc) => {
                Operator::Gt
            },
            (Self::Forward, SortingOrder::Desc) | (Self::Backward, SortingOrder::Asc) => {
                Operator::Lt
            },
        }
    }

    /// Return the opposite direction.
    #[inline]
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// ORDER BY direction the store is queried with.
    ///
    /// Backward pages are fetched in reverse display order so the same index
    /// serves both directions; the pager flips the rows back afterwards.
    #[inline]
    #[must_use]
    pub const fn query_order(self, display: SortingOrder) -> SortingOrder {
        match self {
            Self::Forward => display,
            Self::Backward => display.reverse(),
        }
    }

    /// Parse the wire form (`forward` / `backward`, case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("forward") {
            Some(Self::Forward)
        } else if s.eq_ignore_ascii_case("backward") {
            Some(Self::Backward)
        } else {
            None
        }
    }

    /// Wire form of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

impl fmt::Display for NavigationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL comparison operators used in keyset predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal: `=`
    Eq,
    /// Greater than: `>`
    Gt,
    /// Less than: `<`
    Lt,
}

impl Operator {
    /// SQL text of the operator.
    #[inline]
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Scalar SQL parameter value.
///
/// Anchor values are always bound as parameters, never rendered into SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`. Never valid as a keyset anchor.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// Float; must be finite to survive a cursor round trip.
    Float(f64),
    /// Text.
    String(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Query result with SQL string and parameters.
#[derive(Debug)]
#[must_use = "QueryResult must be used to execute the query"]
pub struct QueryResult {
    /// SQL text with dialect placeholders.
    pub sql: String,
    /// Values bound to the placeholders, in order.
    pub params: Vec<Value>,
}
