//! Sort parameter parsing.
//!
//! Clients send sort orders either prefixed (`-rating,id`) or suffixed
//! (`rating:desc,id:asc`); both forms may be mixed in one list. Every field
//! must appear in the endpoint's allowlist.
//!
//! ```
//! use ladder_keyset::{SortingOrder, parse_sort};
//!
//! let params = parse_sort("-rating, region:asc", &["rating", "region", "id"]).unwrap();
//! assert_eq!(params[0].field(), "rating");
//! assert_eq!(params[0].order(), SortingOrder::Desc);
//! assert_eq!(params[1].to_prefixed(), "region");
//! ```

use std::fmt;

use thiserror::Error;

use crate::types::SortingOrder;

/// Rejected sort input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SortParseError {
    /// A list entry has no field name (`-`, `:asc`).
    #[error("empty sort field")]
    EmptyField,
    /// Field is not in the allowlist.
    #[error("sort field '{field}' not allowed. Allowed: {allowed:?}")]
    UnknownField {
        /// Requested field.
        field: String,
        /// Fields the endpoint accepts.
        allowed: Vec<String>,
    },
    /// Suffix is neither `asc` nor `desc`.
    #[error("unknown sort order '{order}' for field '{field}'")]
    UnknownOrder {
        /// Field the suffix was attached to.
        field: String,
        /// Offending suffix.
        order: String,
    },
    /// Entry uses both `-` and a `:suffix`.
    #[error("sort entry '{0}' mixes prefix and suffix forms")]
    Conflicting(String),
    /// The same field appears twice.
    #[error("sort field '{0}' given more than once")]
    DuplicateField(String),
}

impl SortParseError {
    /// HTTP status for this error.
    #[inline]
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        400
    }
}

/// One parsed sort entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortParameter {
    field: String,
    order: SortingOrder,
}

impl SortParameter {
    /// Create a sort parameter.
    pub fn new(field: impl Into<String>, order: SortingOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// Field name.
    #[inline]
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Requested order.
    #[inline]
    #[must_use]
    pub const fn order(&self) -> SortingOrder {
        self.order
    }

    /// `-field` for DESC, `field` for ASC.
    #[must_use]
    pub fn to_prefixed(&self) -> String {
        match self.order {
            SortingOrder::Asc => self.field.clone(),
            SortingOrder::Desc => format!("-{}", self.field),
        }
    }

    /// `field:asc` or `field:desc`.
    #[must_use]
    pub fn to_suffixed(&self) -> String {
        match self.order {
            SortingOrder::Asc => format!("{}:asc", self.field),
            SortingOrder::Desc => format!("{}:desc", self.field),
        }
    }

    fn parse(part: &str) -> Result<Self, SortParseError> {
        let (field, order) = match (part.strip_prefix('-'), part.split_once(':')) {
            (Some(_), Some(_)) => return Err(SortParseError::Conflicting(part.to_string())),
            (Some(stripped), None) => (stripped, SortingOrder::Desc),
            (None, Some((field, suffix))) => {
                let order = match suffix.trim().to_ascii_lowercase().as_str() {
                    "asc" => SortingOrder::Asc,
                    "desc" => SortingOrder::Desc,
                    _ => {
                        return Err(SortParseError::UnknownOrder {
                            field: field.trim().to_string(),
                            order: suffix.trim().to_string(),
                        });
                    },
                };
                (field, order)
            },
            (None, None) => (part, SortingOrder::Asc),
        };

        let field = field.trim();
        if field.is_empty() {
            return Err(SortParseError::EmptyField);
        }
        Ok(Self::new(field, order))
    }
}

impl fmt::Display for SortParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_prefixed())
    }
}

/// Parse a comma-separated sort list against an allowlist.
///
/// Blank entries are skipped, so `""` yields an empty list.
pub fn parse_sort(sort: &str, allowed: &[&str]) -> Result<Vec<SortParameter>, SortParseError> {
    let mut result: Vec<SortParameter> = Vec::new();

    for part in sort.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let param = SortParameter::parse(part)?;
        if !allowed.contains(&param.field()) {
            return Err(SortParseError::UnknownField {
                field: param.field,
                allowed: allowed.iter().map(|s| (*s).to_string()).collect(),
            });
        }
        if result.iter().any(|p| p.field == param.field) {
            return Err(SortParseError::DuplicateField(param.field));
        }

        result.push(param);
    }

    Ok(result)
}
