//! Page results.

/// One page of rows plus the tokens to reach its neighbours.
///
/// `rows` are always in display order, whichever direction the page was
/// fetched in. A cursor is `None` when there is nothing further that way.
///
/// # Example
///
/// ```
/// use ladder_keyset::Page;
///
/// let page = Page::new(vec![1, 2, 3]).with_next_cursor(Some("abc".to_string()));
/// assert!(page.has_next());
/// assert!(!page.has_previous());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Page<T> {
    /// Rows in display order.
    pub rows: Vec<T>,
    /// Token for the page after this one.
    pub next_cursor: Option<String>,
    /// Token for the page before this one.
    pub previous_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Page with rows and no neighbours.
    pub const fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            next_cursor: None,
            previous_cursor: None,
        }
    }

    /// Set the next cursor.
    pub fn with_next_cursor(mut self, cursor: Option<String>) -> Self {
        self.next_cursor = cursor;
        self
    }

    /// Set the previous cursor.
    pub fn with_previous_cursor(mut self, cursor: Option<String>) -> Self {
        self.previous_cursor = cursor;
        self
    }

    /// Whether a page exists after this one.
    #[inline]
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Whether a page exists before this one.
    #[inline]
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.previous_cursor.is_some()
    }

    /// Number of rows on the page.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the page has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert the rows, keeping the cursors (e.g. entity to DTO).
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            previous_cursor: self.previous_cursor,
        }
    }
}
