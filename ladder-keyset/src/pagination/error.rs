//! Pagination error types.

use thiserror::Error;

/// Message shown to clients for every cursor failure.
const INVALID_CURSOR_MESSAGE: &str = "invalid cursor";

/// A client-supplied cursor token could not be used.
///
/// Every variant is the same failure as far as a client can tell:
/// [`client_message`](Self::client_message) and
/// [`http_status`](Self::http_status) do not depend on the variant. The
/// variant and its `Display` text keep the actual reason for server logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CursorError {
    /// The token exceeds the configured maximum length.
    #[error("cursor token exceeds maximum length ({max} bytes, got {len})")]
    TooLarge {
        /// Configured limit.
        max: usize,
        /// Length of the rejected token.
        len: usize,
    },
    /// The token is not valid base64url.
    #[error("invalid base64 encoding in cursor")]
    InvalidBase64,
    /// The decoded payload is not a `{"v": int, "a": [scalar, ...]}` object.
    #[error("malformed cursor payload: {0}")]
    Malformed(&'static str),
    /// The anchor length does not match the configured sort columns.
    #[error("cursor anchor has {found} values, expected {expected}")]
    ArityMismatch {
        /// Number of configured sort columns.
        expected: usize,
        /// Number of values in the token.
        found: usize,
    },
    /// The token was issued under a different pagination schema version.
    #[error("cursor version {found} does not match current version {expected}")]
    VersionMismatch {
        /// Current schema version.
        expected: i64,
        /// Version in the token.
        found: i64,
    },
}

impl CursorError {
    /// Short name of the failure reason, for structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TooLarge { .. } => "too_large",
            Self::InvalidBase64 => "invalid_base64",
            Self::Malformed(_) => "malformed",
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::VersionMismatch { .. } => "version_mismatch",
        }
    }

    /// Returns `true` if the token could never have been issued by this server.
    ///
    /// Includes `TooLarge`, `InvalidBase64` and `Malformed`.
    #[inline]
    #[must_use]
    pub const fn is_tampering(&self) -> bool {
        matches!(
            self,
            Self::TooLarge { .. } | Self::InvalidBase64 | Self::Malformed(_)
        )
    }

    /// Returns `true` if the token is well-formed but was issued for another
    /// sort-column set or schema version.
    ///
    /// Includes `ArityMismatch` and `VersionMismatch`.
    #[inline]
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(
            self,
            Self::ArityMismatch { .. } | Self::VersionMismatch { .. }
        )
    }

    /// Message safe to return to clients.
    #[inline]
    #[must_use]
    pub const fn client_message(&self) -> &'static str {
        INVALID_CURSOR_MESSAGE
    }

    /// HTTP status for this error (always 400).
    #[inline]
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        400
    }
}

/// Failure of a page fetch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PageError<E> {
    /// The request's cursor was rejected before any query ran.
    #[error(transparent)]
    InvalidCursor(#[from] CursorError),
    /// The query executor failed; the error is passed through unchanged.
    #[error("query execution failed: {0}")]
    QueryExecution(#[source] E),
    /// A fetched row holds `NULL` in a sort column.
    ///
    /// Keyset predicates cannot step past `NULL`, so sort columns must be
    /// `NOT NULL`. The page is refused rather than returned with cursors that
    /// would end traversal early.
    #[error("sort column '{column}' is NULL in a fetched row")]
    NullSortValue {
        /// Offending column.
        column: String,
    },
}

impl<E> PageError<E> {
    /// Returns `true` if the client sent a bad cursor.
    #[inline]
    #[must_use]
    pub const fn is_invalid_cursor(&self) -> bool {
        matches!(self, Self::InvalidCursor(_))
    }

    /// HTTP status for this error: 400 for cursors, 500 for the store.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidCursor(e) => e.http_status(),
            Self::QueryExecution(_) | Self::NullSortValue { .. } => 500,
        }
    }

    /// Message safe to return to clients.
    #[must_use]
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::InvalidCursor(e) => e.client_message(),
            Self::QueryExecution(_) | Self::NullSortValue { .. } => "internal error",
        }
    }
}

/// Invalid keyset definition.
///
/// Raised while building a [`Keyset`](crate::Keyset), which happens at startup
/// from code or configuration, never from client input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum KeysetError {
    /// No sort columns were given.
    #[error("keyset must have at least one sort column")]
    Empty,
    /// A column name is not a valid SQL identifier.
    #[error("invalid sort column name '{0}'")]
    InvalidColumn(String),
    /// A column appears more than once.
    #[error("sort column '{0}' appears more than once")]
    DuplicateColumn(String),
    /// The last column is not a unique tie-breaker.
    #[error("last sort column '{0}' must be unique to break ties")]
    MissingTieBreaker(String),
}
