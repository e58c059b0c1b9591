// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs
#![allow(clippy::missing_errors_doc)] // Error enums document their variants
#![allow(clippy::module_name_repetitions)] // KeysetQuery in keyset, PageError in pagination
#![allow(clippy::return_self_not_must_use)] // Builder methods return Self
#![allow(clippy::must_use_candidate)] // Accessors on small value types
#![allow(clippy::format_push_string)] // SQL string building style preference
// Predicate rendering indexes anchors by column position after the arity check
#![allow(clippy::indexing_slicing)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! # ladder-keyset - Keyset Pagination for Ladder Listings
//!
//! Cursor-based pagination over large, frequently changing leaderboards.
//! A page is located by the sort-key values of a boundary row rather than an
//! offset, so inserts and deletes outside the page never shift what the
//! client sees next.
//!
//! ## Quick Start
//!
//! ```
//! # use ladder_keyset::prelude::*;
//! // Ladder sorted by rating, ties broken by id
//! let params = parse_sort("-rating", &["rating", "region"]).unwrap();
//! let keyset = Keyset::with_tie_breaker(&params, SortColumn::desc("id").unique()).unwrap();
//! let pager = Pager::new(keyset, &PagerConfig::default());
//!
//! // First page: no cursor
//! let query = pager.query(&PageRequest::first(25)).unwrap();
//! let sql = query.to_sql(Postgres, "team", &["id", "name", "rating"]);
//! assert_eq!(
//!     sql.sql,
//!     "SELECT id, name, rating FROM team ORDER BY rating DESC, id DESC LIMIT 26"
//! );
//!
//! // Later pages: anchor on the last row seen
//! let anchor = pager.codec().position(vec![Value::Int(2400), Value::Int(17)]);
//! let token = pager.codec().encode(Some(&anchor)).unwrap();
//!
//! let request = pager.request(Some(&token), NavigationDirection::Forward, 25).unwrap();
//! let sql = pager.query(&request).unwrap().to_sql(Postgres, "team", &["id", "rating"]);
//! assert_eq!(
//!     sql.sql,
//!     "SELECT id, rating FROM team WHERE (rating, id) < ($1, $2) \
//!      ORDER BY rating DESC, id DESC LIMIT 26"
//! );
//! ```
//!
//! ## Operator Table
//!
//! | Direction  | `ASC` column | `DESC` column |
//! |------------|--------------|---------------|
//! | `Forward`  | `>`          | `<`           |
//! | `Backward` | `<`          | `>`           |
//!
//! Backward pages are queried with the ORDER BY reversed and flipped back in
//! memory.
//!
//! ## Cursor Tokens
//!
//! A token is unpadded URL-safe base64 over `{"v":<version>,"a":[...]}`.
//! Decoding fails closed: bad base64, bad JSON, the wrong number of anchor
//! values, or a stale version all yield [`CursorError`], which clients see as
//! a plain `400 invalid cursor`.
//!
//! ```
//! # use ladder_keyset::prelude::*;
//! let codec = CursorCodec::new(2, 2);
//! let stale = CursorCodec::new(1, 2)
//!     .encode(Some(&CursorCodec::new(1, 2).position(vec![Value::Int(1), Value::Int(2)])))
//!     .unwrap();
//!
//! let err = codec.decode(Some(&stale)).unwrap_err();
//! assert!(err.is_stale());
//! assert_eq!(err.client_message(), "invalid cursor");
//! ```

mod api;
mod config;
mod dialect;
mod pagination;
mod sort;
mod types;
mod validate;

pub use api::{CURSOR_PARAM, DIRECTION_PARAM, LIMIT_PARAM, ListQuery, ListResponse, RequestError};
pub use config::{ConfigError, PagerConfig};
pub use dialect::{Dialect, Postgres, Sqlite};
pub use pagination::{
    Cursor, CursorCodec, CursorError, DEFAULT_MAX_TOKEN_LEN, Keyset, KeysetError, KeysetPredicate,
    KeysetQuery, KeysetRow, Page, PageError, PageRequest, Pager, Position, QueryExecutor,
    SortColumn, build_predicate_args, format_query,
};
pub use sort::{SortParameter, SortParseError, parse_sort};
pub use types::{NavigationDirection, Operator, QueryResult, SortingOrder, Value};
pub use validate::{assert_valid_sql_identifier, is_valid_sql_identifier};

/// Prelude module for convenient imports.
///
/// ```
/// use ladder_keyset::prelude::*;
///
/// let keyset = Keyset::new(vec![SortColumn::asc("id").unique()]).unwrap();
/// let pager = Pager::new(keyset, &PagerConfig::default());
/// assert_eq!(pager.codec().arity(), 1);
/// ```
pub mod prelude {
    pub use crate::{
        Cursor, CursorCodec, CursorError, Dialect, Keyset, KeysetQuery, KeysetRow, ListQuery,
        ListResponse, NavigationDirection, Page, PageError, PageRequest, Pager, PagerConfig,
        Position, Postgres, QueryExecutor, SortColumn, SortParameter, SortingOrder, Sqlite, Value,
        parse_sort,
    };
}
