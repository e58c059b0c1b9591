//! Page fetching: cursor in, rows plus neighbour cursors out.

use crate::config::PagerConfig;
use crate::types::NavigationDirection;

use super::codec::CursorCodec;
use super::error::{CursorError, PageError};
use super::keyset::{Keyset, KeysetQuery, KeysetRow, SortColumn};
use super::page::Page;
use super::position::{Cursor, Position};

/// Runs keyset queries against the backing store.
///
/// Implementations must return rows in exactly the order of
/// [`KeysetQuery::order_by`], apply [`KeysetQuery::predicate`] as a
/// lexicographic comparison over the sort columns, and return at most
/// [`KeysetQuery::limit`] rows. Errors are passed back to the caller
/// unchanged; timeouts and retries belong to the executor.
pub trait QueryExecutor {
    /// Row type produced by the query.
    type Row;
    /// Error raised by the store.
    type Error;

    /// Execute one page query.
    fn execute(&self, query: &KeysetQuery) -> Result<Vec<Self::Row>, Self::Error>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    type Row = T::Row;
    type Error = T::Error;

    fn execute(&self, query: &KeysetQuery) -> Result<Vec<Self::Row>, Self::Error> {
        (**self).execute(query)
    }
}

/// What page to fetch.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct PageRequest {
    position: Option<Position>,
    direction: NavigationDirection,
    page_size: usize,
}

impl PageRequest {
    /// Request with an optional position.
    pub const fn new(
        position: Option<Position>,
        direction: NavigationDirection,
        page_size: usize,
    ) -> Self {
        Self {
            position,
            direction,
            page_size,
        }
    }

    /// The first page in display order.
    pub const fn first(page_size: usize) -> Self {
        Self::new(None, NavigationDirection::Forward, page_size)
    }

    /// The last page in display order.
    pub const fn last(page_size: usize) -> Self {
        Self::new(None, NavigationDirection::Backward, page_size)
    }

    /// The page next to a cursor, in the cursor's direction.
    pub fn from_cursor(cursor: Cursor, page_size: usize) -> Self {
        let (position, direction) = cursor.into_parts();
        Self::new(Some(position), direction, page_size)
    }

    /// Anchor position, absent for the first/last page.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    /// Direction of travel.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> NavigationDirection {
        self.direction
    }

    /// Requested number of rows.
    #[inline]
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }
}

/// Keyset pager for one sort order.
///
/// Holds only immutable configuration, so one pager can serve any number of
/// concurrent requests. Each call decodes its own cursor and issues its own
/// query; nothing is cached between requests.
///
/// # Example
///
/// ```
/// use ladder_keyset::{
///     Keyset, KeysetQuery, KeysetRow, NavigationDirection, PageRequest, Pager, PagerConfig,
///     QueryExecutor, SortColumn, Value,
/// };
///
/// struct Team {
///     id: i64,
/// }
///
/// impl KeysetRow for Team {
///     fn anchor_value(&self, _column: &str) -> Value {
///         Value::Int(self.id)
///     }
/// }
///
/// // Ascending ids, forward only
/// struct Teams(Vec<i64>);
///
/// impl QueryExecutor for Teams {
///     type Row = Team;
///     type Error = std::convert::Infallible;
///
///     fn execute(&self, query: &KeysetQuery) -> Result<Vec<Team>, Self::Error> {
///         let after = match query.predicate().map(|p| &p.anchor()[0]) {
///             Some(Value::Int(id)) => *id,
///             _ => i64::MIN,
///         };
///         Ok(self
///             .0
///             .iter()
///             .filter(|id| **id > after)
///             .take(query.limit())
///             .map(|id| Team { id: *id })
///             .collect())
///     }
/// }
///
/// let keyset = Keyset::new(vec![SortColumn::asc("id").unique()]).unwrap();
/// let pager = Pager::new(keyset, &PagerConfig::default());
/// let store = Teams((1..=10).collect());
///
/// let page = pager.fetch_page(&store, &PageRequest::first(3)).unwrap();
/// assert_eq!(page.rows.iter().map(|t| t.id).collect::<Vec<_>>(), [1, 2, 3]);
/// assert!(page.previous_cursor.is_none());
///
/// let next = pager
///     .fetch_page_from_token(
///         &store,
///         page.next_cursor.as_deref(),
///         NavigationDirection::Forward,
///         3,
///     )
///     .unwrap();
/// assert_eq!(next.rows.iter().map(|t| t.id).collect::<Vec<_>>(), [4, 5, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct Pager {
    keyset: Keyset,
    codec: CursorCodec,
    max_page_size: usize,
}

impl Pager {
    /// Create a pager for `keyset` with the shared settings.
    #[must_use]
    pub fn new(keyset: Keyset, config: &PagerConfig) -> Self {
        let codec = CursorCodec::new(config.cursor_version, keyset.len())
            .max_token_len(config.max_cursor_len);
        Self {
            keyset,
            codec,
            max_page_size: config.max_page_size,
        }
    }

    /// The sort order this pager walks.
    #[inline]
    #[must_use]
    pub const fn keyset(&self) -> &Keyset {
        &self.keyset
    }

    /// Codec used for this pager's tokens.
    #[inline]
    #[must_use]
    pub const fn codec(&self) -> &CursorCodec {
        &self.codec
    }

    /// Decode a client token into a cursor heading in `direction`.
    pub fn decode_cursor(
        &self,
        token: Option<&str>,
        direction: NavigationDirection,
    ) -> Result<Option<Cursor>, CursorError> {
        Ok(self
            .codec
            .decode(token)?
            .map(|position| Cursor::new(position, direction)))
    }

    /// Build a request from a client token.
    ///
    /// Without a token, `Forward` asks for the first page and `Backward` for
    /// the last one.
    pub fn request(
        &self,
        token: Option<&str>,
        direction: NavigationDirection,
        page_size: usize,
    ) -> Result<PageRequest, CursorError> {
        let position = self.codec.decode(token)?;
        Ok(PageRequest::new(position, direction, page_size))
    }

    /// Build the store query for a request.
    ///
    /// The ORDER BY is reversed for backward requests and the limit asks for
    /// one row beyond the page to detect whether more rows follow.
    pub fn query(&self, request: &PageRequest) -> Result<KeysetQuery, CursorError> {
        let direction = request.direction();
        let predicate = match request.position() {
            Some(position) => {
                self.codec.check(position)?;
                Some(self.keyset.predicate(direction, position.anchor()))
            },
            None => None,
        };
        Ok(KeysetQuery::new(
            self.keyset.query_order(direction),
            predicate,
            self.clamp_page_size(request.page_size()).saturating_add(1),
        ))
    }

    /// Fetch one page.
    ///
    /// Rows come back in display order. `next_cursor` points past the last
    /// row and `previous_cursor` before the first; each is `None` when there
    /// is nothing further that way.
    ///
    /// Any fetched row with `NULL` in a sort column fails the page with
    /// [`PageError::NullSortValue`].
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(direction = %request.direction(), anchored = request.position().is_some())
    )]
    pub fn fetch_page<E>(
        &self,
        executor: &E,
        request: &PageRequest,
    ) -> Result<Page<E::Row>, PageError<E::Error>>
    where
        E: QueryExecutor + ?Sized,
        E::Row: KeysetRow,
    {
        let page_size = self.clamp_page_size(request.page_size());
        let query = self.query(request)?;

        let mut rows = executor
            .execute(&query)
            .map_err(PageError::QueryExecution)?;

        if let Some(column) = rows.iter().find_map(|row| self.null_sort_column(row)) {
            tracing::error!(column, "NULL in keyset sort column");
            return Err(PageError::NullSortValue {
                column: column.to_string(),
            });
        }

        let has_more = rows.len() > page_size;
        rows.truncate(page_size);

        let direction = request.direction();
        if direction == NavigationDirection::Backward {
            rows.reverse();
        }

        // Rows exist on the far side of the anchor we came from
        let anchored = request.position().is_some();
        let (more_after, more_before) = match direction {
            NavigationDirection::Forward => (has_more, anchored),
            NavigationDirection::Backward => (anchored, has_more),
        };

        let next = more_after
            .then(|| rows.last())
            .flatten()
            .map(|row| self.codec.position(self.keyset.anchor_of(row)));
        let previous = more_before
            .then(|| rows.first())
            .flatten()
            .map(|row| self.codec.position(self.keyset.anchor_of(row)));

        tracing::debug!(page_size, rows = rows.len(), has_more, "fetched keyset page");

        Ok(Page::new(rows)
            .with_next_cursor(self.codec.encode(next.as_ref()))
            .with_previous_cursor(self.codec.encode(previous.as_ref())))
    }

    /// Decode a client token and fetch the page it points to.
    ///
    /// An invalid token fails before the executor is called.
    pub fn fetch_page_from_token<E>(
        &self,
        executor: &E,
        token: Option<&str>,
        direction: NavigationDirection,
        page_size: usize,
    ) -> Result<Page<E::Row>, PageError<E::Error>>
    where
        E: QueryExecutor + ?Sized,
        E::Row: KeysetRow,
    {
        let request = self.request(token, direction, page_size)?;
        self.fetch_page(executor, &request)
    }

    fn null_sort_column<R: KeysetRow + ?Sized>(&self, row: &R) -> Option<&str> {
        self.keyset
            .columns()
            .iter()
            .map(SortColumn::name)
            .find(|name| row.anchor_value(name).is_null())
    }

    fn clamp_page_size(&self, page_size: usize) -> usize {
        page_size.min(self.max_page_size).max(1)
    }
}
