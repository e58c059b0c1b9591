//! List-endpoint request parsing and response bodies.
//!
//! ```
//! use ladder_keyset::{ListQuery, ListResponse, NavigationDirection, Page, PagerConfig};
//!
//! let pairs = vec![
//!     ("direction".to_string(), "backward".to_string()),
//!     ("limit".to_string(), "10".to_string()),
//! ];
//! let query = ListQuery::from_pairs(&pairs, &PagerConfig::default()).unwrap();
//! assert_eq!(query.direction(), NavigationDirection::Backward);
//! assert_eq!(query.page_size(), 10);
//!
//! let page = Page::new(vec![1, 2]).with_next_cursor(Some("eyJ2IjoxfQ".to_string()));
//! assert_eq!(
//!     ListResponse::from_page(page).to_json(),
//!     r#"{"items":[1,2],"next":"eyJ2IjoxfQ"}"#
//! );
//! ```

use miniserde::{Serialize, json};
use thiserror::Error;

use crate::config::PagerConfig;
use crate::pagination::{CursorError, Page, PageRequest, Pager};
use crate::types::NavigationDirection;

/// Query parameter carrying the cursor token.
pub const CURSOR_PARAM: &str = "cursor";
/// Query parameter carrying the direction.
pub const DIRECTION_PARAM: &str = "direction";
/// Query parameter carrying the page size.
pub const LIMIT_PARAM: &str = "limit";

/// Invalid list-endpoint query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RequestError {
    /// `direction` is not `forward` or `backward`.
    #[error("invalid direction '{0}', expected 'forward' or 'backward'")]
    InvalidDirection(String),
    /// `limit` is not a non-negative integer.
    #[error("invalid limit '{0}'")]
    InvalidLimit(String),
}

impl RequestError {
    /// HTTP status for this error.
    #[inline]
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        400
    }
}

/// Pagination parameters of a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    cursor: Option<String>,
    direction: NavigationDirection,
    page_size: usize,
}

impl ListQuery {
    /// Read `cursor`, `direction` and `limit` from decoded query pairs.
    ///
    /// Other keys are ignored. The last occurrence of a repeated key wins.
    /// An empty `cursor` counts as absent.
    pub fn from_pairs(pairs: &[(String, String)], config: &PagerConfig) -> Result<Self, RequestError> {
        let param = |name: &str| {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.trim())
        };

        let direction = match param(DIRECTION_PARAM) {
            None | Some("") => NavigationDirection::default(),
            Some(raw) => NavigationDirection::parse(raw)
                .ok_or_else(|| RequestError::InvalidDirection(raw.to_string()))?,
        };

        let limit = match param(LIMIT_PARAM) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<usize>()
                    .map_err(|_| RequestError::InvalidLimit(raw.to_string()))?,
            ),
        };

        let cursor = param(CURSOR_PARAM)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        Ok(Self {
            cursor,
            direction,
            page_size: config.page_size(limit),
        })
    }

    /// Raw cursor token.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Requested direction.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> NavigationDirection {
        self.direction
    }

    /// Resolved page size.
    #[inline]
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Decode the cursor with `pager` and build the page request.
    pub fn to_request(&self, pager: &Pager) -> Result<PageRequest, CursorError> {
        pager.request(self.cursor(), self.direction, self.page_size)
    }
}

/// JSON body for one page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse<T> {
    items: Vec<T>,
    next: Option<String>,
    previous: Option<String>,
}

impl<T> ListResponse<T> {
    /// Wrap a fetched page.
    pub fn from_page(page: Page<T>) -> Self {
        Self {
            items: page.rows,
            next: page.next_cursor,
            previous: page.previous_cursor,
        }
    }

    /// Items on the page.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T: Serialize> ListResponse<T> {
    /// Serialize as `{"items":[...],"next":"...","previous":"..."}`.
    ///
    /// Absent cursors are left out rather than sent as `null`.
    #[must_use]
    pub fn to_json(&self) -> String {
        let mut out = String::from("{\"items\":");
        out.push_str(&json::to_string(&self.items));
        if let Some(next) = &self.next {
            out.push_str(",\"next\":");
            out.push_str(&json::to_string(next));
        }
        if let Some(previous) = &self.previous {
            out.push_str(",\"previous\":");
            out.push_str(&json::to_string(previous));
        }
        out.push('}');
        out
    }
}
