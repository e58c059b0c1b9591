//! Keyset pagination over a totally ordered sort key.
//!
//! | Piece         | Role                                                    |
//! |---------------|---------------------------------------------------------|
//! | `Keyset`      | Validated sort columns ending in a unique tie-breaker   |
//! | `CursorCodec` | Opaque token <-> `Position`, with version/arity guards  |
//! | `Pager`       | Builds the page query, trims the look-ahead, sets links |
//! | `Page`        | Rows in display order plus next/previous tokens         |
//!
//! Backward pages are fetched with the ORDER BY reversed and the rows
//! flipped back in memory, so callers always see display order.
//!
//! Tokens never carry SQL. They hold a schema version and the anchor values
//! of a boundary row; anything that fails to decode, has the wrong number of
//! values, or was issued under another version is rejected before any query
//! runs.

mod codec;
mod error;
mod keyset;
mod page;
mod pager;
mod position;
mod template;

pub use codec::{CursorCodec, DEFAULT_MAX_TOKEN_LEN};
pub use error::{CursorError, KeysetError, PageError};
pub use keyset::{Keyset, KeysetPredicate, KeysetQuery, KeysetRow, SortColumn};
pub use page::Page;
pub use pager::{PageRequest, Pager, QueryExecutor};
pub use position::{Cursor, Position};
pub use template::{build_predicate_args, format_query};
