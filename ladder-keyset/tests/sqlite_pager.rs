//! End-to-end paging against an in-memory SQLite database.
//!
//! Queries are rendered with the `Sqlite` dialect and run through rusqlite,
//! so these tests exercise the generated SQL, not just the in-memory logic.

use ladder_keyset::prelude::*;
use ladder_keyset::{CursorError, ListQuery, ListResponse};
use rusqlite::{Connection, params_from_iter, types::Value as SqlValue};

// =============================================================================
// Fixture
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, miniserde::Serialize)]
struct Team {
    id: i64,
    region: String,
    rating: i64,
}

impl KeysetRow for Team {
    fn anchor_value(&self, column: &str) -> Value {
        match column {
            "id" => Value::Int(self.id),
            "region" => Value::from(self.region.as_str()),
            "rating" => Value::Int(self.rating),
            other => panic!("unexpected sort column {other}"),
        }
    }
}

struct Ladder {
    conn: Connection,
}

impl Ladder {
    fn new() -> Self {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE team (
                id INTEGER PRIMARY KEY,
                region TEXT NOT NULL,
                rating INTEGER NOT NULL
            )",
        )
        .unwrap();
        Self { conn }
    }

    /// Ten teams with ids 1..=10, ratings tying in groups.
    fn seeded() -> Self {
        let ladder = Self::new();
        for id in 1..=10 {
            let region = if id % 2 == 0 { "eu" } else { "na" };
            ladder.insert(id, region, 2000 + (id % 3) * 100);
        }
        ladder
    }

    fn insert(&self, id: i64, region: &str, rating: i64) {
        self.conn
            .execute(
                "INSERT INTO team (id, region, rating) VALUES (?1, ?2, ?3)",
                (id, region, rating),
            )
            .unwrap();
    }

    fn delete(&self, id: i64) {
        self.conn
            .execute("DELETE FROM team WHERE id = ?1", [id])
            .unwrap();
    }

    fn all_ordered(&self, order_by: &str) -> Vec<i64> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id FROM team ORDER BY {order_by}"))
            .unwrap();
        let ids = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<i64>, _>>()
            .unwrap();
        ids
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
    }
}

impl QueryExecutor for Ladder {
    type Row = Team;
    type Error = rusqlite::Error;

    fn execute(&self, query: &KeysetQuery) -> Result<Vec<Team>, Self::Error> {
        let rendered = query.to_sql(Sqlite, "team", &["id", "region", "rating"]);
        let mut stmt = self.conn.prepare(&rendered.sql)?;
        let rows = stmt.query_map(
            params_from_iter(rendered.params.iter().map(to_sql_value)),
            |row| {
                Ok(Team {
                    id: row.get(0)?,
                    region: row.get(1)?,
                    rating: row.get(2)?,
                })
            },
        )?;
        rows.collect()
    }
}

fn ids(page: &Page<Team>) -> Vec<i64> {
    page.rows.iter().map(|t| t.id).collect()
}

fn pager(columns: Vec<SortColumn>) -> Pager {
    Pager::new(Keyset::new(columns).unwrap(), &PagerConfig::default())
}

fn follow(
    pager: &Pager,
    ladder: &Ladder,
    token: Option<&String>,
    direction: NavigationDirection,
    size: usize,
) -> Page<Team> {
    pager
        .fetch_page_from_token(ladder, Some(token.unwrap().as_str()), direction, size)
        .unwrap()
}

// =============================================================================
// Single-column traversal
// =============================================================================

#[test]
fn ascending_ids_page_forward() {
    let ladder = Ladder::seeded();
    let pager = pager(vec![SortColumn::asc("id").unique()]);

    let first = pager.fetch_page(&ladder, &PageRequest::first(3)).unwrap();
    assert_eq!(ids(&first), [1, 2, 3]);
    assert!(first.previous_cursor.is_none());

    let second = follow(&pager, &ladder, first.next_cursor.as_ref(), NavigationDirection::Forward, 3);
    assert_eq!(ids(&second), [4, 5, 6]);
    assert!(second.has_previous());
}

#[test]
fn descending_ids_page_forward() {
    let ladder = Ladder::seeded();
    let pager = pager(vec![SortColumn::desc("id").unique()]);

    let first = pager.fetch_page(&ladder, &PageRequest::first(3)).unwrap();
    assert_eq!(ids(&first), [10, 9, 8]);

    let second = follow(&pager, &ladder, first.next_cursor.as_ref(), NavigationDirection::Forward, 3);
    assert_eq!(ids(&second), [7, 6, 5]);
}

#[test]
fn full_walk_yields_every_row_once() {
    let ladder = Ladder::seeded();
    let pager = pager(vec![SortColumn::asc("id").unique()]);

    let mut sizes = Vec::new();
    let mut seen = Vec::new();
    let mut page = pager.fetch_page(&ladder, &PageRequest::first(3)).unwrap();
    loop {
        sizes.push(page.len());
        seen.extend(ids(&page));
        if !page.has_next() {
            break;
        }
        page = follow(&pager, &ladder, page.next_cursor.as_ref(), NavigationDirection::Forward, 3);
    }

    assert_eq!(sizes, [3, 3, 3, 1]);
    assert_eq!(seen, (1..=10).collect::<Vec<_>>());
}

#[test]
fn backward_returns_the_page_before() {
    let ladder = Ladder::seeded();
    let pager = pager(vec![SortColumn::asc("id").unique()]);

    let first = pager.fetch_page(&ladder, &PageRequest::first(3)).unwrap();
    let second = follow(&pager, &ladder, first.next_cursor.as_ref(), NavigationDirection::Forward, 3);
    let third = follow(&pager, &ladder, second.next_cursor.as_ref(), NavigationDirection::Forward, 3);
    assert_eq!(ids(&third), [7, 8, 9]);

    let back = follow(&pager, &ladder, third.previous_cursor.as_ref(), NavigationDirection::Backward, 3);
    assert_eq!(back, second);

    let back = follow(&pager, &ladder, back.previous_cursor.as_ref(), NavigationDirection::Backward, 3);
    assert_eq!(ids(&back), [1, 2, 3]);
    assert!(back.previous_cursor.is_none());
    assert!(back.has_next());
}

#[test]
fn last_page_then_walk_back_to_start() {
    let ladder = Ladder::seeded();
    let pager = pager(vec![SortColumn::asc("id").unique()]);

    let mut page = pager.fetch_page(&ladder, &PageRequest::last(3)).unwrap();
    assert_eq!(ids(&page), [8, 9, 10]);
    assert!(page.next_cursor.is_none());

    let mut pages = vec![ids(&page)];
    while page.has_previous() {
        page = follow(&pager, &ladder, page.previous_cursor.as_ref(), NavigationDirection::Backward, 3);
        pages.push(ids(&page));
    }

    assert_eq!(pages, [vec![8, 9, 10], vec![5, 6, 7], vec![2, 3, 4], vec![1]]);
}

// =============================================================================
// Concurrent modification
// =============================================================================

#[test]
fn changes_behind_the_cursor_do_not_shift_the_next_page() {
    let ladder = Ladder::seeded();
    let pager = pager(vec![SortColumn::asc("id").unique()]);

    let first = pager.fetch_page(&ladder, &PageRequest::first(3)).unwrap();
    assert_eq!(ids(&first), [1, 2, 3]);

    // An offset-based pager would now skip id 4
    ladder.delete(2);
    ladder.delete(1);
    // and this one would make it repeat id 3
    ladder.insert(0, "eu", 2000);

    let second = follow(&pager, &ladder, first.next_cursor.as_ref(), NavigationDirection::Forward, 3);
    assert_eq!(ids(&second), [4, 5, 6]);
}

#[test]
fn rows_inserted_ahead_are_picked_up() {
    let ladder = Ladder::seeded();
    let pager = pager(vec![SortColumn::asc("id").unique()]);

    let first = pager.fetch_page(&ladder, &PageRequest::first(9)).unwrap();
    ladder.insert(11, "na", 2100);

    let second = follow(&pager, &ladder, first.next_cursor.as_ref(), NavigationDirection::Forward, 9);
    assert_eq!(ids(&second), [10, 11]);
}

// =============================================================================
// Multi-column keysets
// =============================================================================

#[test]
fn tied_ratings_paginate_without_gaps_or_repeats() {
    let ladder = Ladder::seeded();
    let pager = pager(vec![
        SortColumn::desc("rating"),
        SortColumn::desc("id").unique(),
    ]);

    let mut seen = Vec::new();
    let mut page = pager.fetch_page(&ladder, &PageRequest::first(4)).unwrap();
    seen.extend(ids(&page));
    while let Some(token) = page.next_cursor.as_ref() {
        page = follow(&pager, &ladder, Some(token), NavigationDirection::Forward, 4);
        seen.extend(ids(&page));
    }

    assert_eq!(seen, ladder.all_ordered("rating DESC, id DESC"));
}

#[test]
fn mixed_directions_walk_both_ways() {
    let ladder = Ladder::seeded();
    let pager = pager(vec![
        SortColumn::asc("region"),
        SortColumn::desc("rating"),
        SortColumn::asc("id").unique(),
    ]);
    let expected = ladder.all_ordered("region ASC, rating DESC, id ASC");

    let mut forward = Vec::new();
    let mut page = pager.fetch_page(&ladder, &PageRequest::first(3)).unwrap();
    forward.extend(ids(&page));
    while let Some(token) = page.next_cursor.as_ref() {
        page = follow(&pager, &ladder, Some(token), NavigationDirection::Forward, 3);
        forward.extend(ids(&page));
    }
    assert_eq!(forward, expected);

    let mut backward = Vec::new();
    let mut page = pager.fetch_page(&ladder, &PageRequest::last(3)).unwrap();
    backward = [ids(&page), backward].concat();
    while let Some(token) = page.previous_cursor.as_ref() {
        page = follow(&pager, &ladder, Some(token), NavigationDirection::Backward, 3);
        backward = [ids(&page), backward].concat();
    }
    assert_eq!(backward, expected);
}

#[test]
fn sort_parameters_build_the_keyset() {
    let ladder = Ladder::seeded();
    let params = parse_sort("region:desc,-rating", &["region", "rating"]).unwrap();
    let keyset = Keyset::with_tie_breaker(&params, SortColumn::asc("id").unique()).unwrap();
    let pager = Pager::new(keyset, &PagerConfig::default());

    let page = pager.fetch_page(&ladder, &PageRequest::first(10)).unwrap();
    assert_eq!(ids(&page), ladder.all_ordered("region DESC, rating DESC, id ASC"));
    assert!(!page.has_next());
}

// =============================================================================
// Request/response surface
// =============================================================================

#[test]
fn list_endpoint_round_trip() {
    let ladder = Ladder::seeded();
    let pager = pager(vec![SortColumn::asc("id").unique()]);
    let config = PagerConfig::default();

    let query = ListQuery::from_pairs(&[("limit".to_string(), "2".to_string())], &config).unwrap();
    let page = pager.fetch_page(&ladder, &query.to_request(&pager).unwrap()).unwrap();
    let next = page.next_cursor.clone().unwrap();

    let body = ListResponse::from_page(page).to_json();
    assert!(body.starts_with(r#"{"items":[{"id":1,"region":"na","rating":2100},"#));
    assert!(body.contains(&format!(r#""next":"{next}""#)));
    assert!(!body.contains("previous"));

    let query = ListQuery::from_pairs(
        &[
            ("cursor".to_string(), next),
            ("limit".to_string(), "2".to_string()),
        ],
        &config,
    )
    .unwrap();
    let page = pager.fetch_page(&ladder, &query.to_request(&pager).unwrap()).unwrap();
    assert_eq!(ids(&page), [3, 4]);
}

#[test]
fn tampered_token_is_a_client_error() {
    let ladder = Ladder::seeded();
    let pager = pager(vec![SortColumn::asc("id").unique()]);

    let first = pager.fetch_page(&ladder, &PageRequest::first(3)).unwrap();
    let mut token = first.next_cursor.unwrap();
    token.push_str("AA");

    let err = pager
        .fetch_page_from_token(&ladder, Some(&token), NavigationDirection::Forward, 3)
        .unwrap_err();
    assert!(err.is_invalid_cursor());
    assert_eq!(err.http_status(), 400);
    assert_eq!(err.client_message(), "invalid cursor");

    // A token for a two-column keyset does not fit a one-column one
    let other = CursorCodec::new(1, 2);
    let foreign = other
        .encode(Some(&other.position(vec![Value::Int(2100), Value::Int(3)])))
        .unwrap();
    let err = pager
        .fetch_page_from_token(&ladder, Some(&foreign), NavigationDirection::Forward, 3)
        .unwrap_err();
    assert!(matches!(
        err,
        PageError::InvalidCursor(CursorError::ArityMismatch {
            expected: 1,
            found: 2
        })
    ));
}

// =============================================================================
// Nullable sort columns
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct Score {
    id: i64,
    rating: Option<i64>,
}

impl KeysetRow for Score {
    fn anchor_value(&self, column: &str) -> Value {
        match column {
            "id" => Value::Int(self.id),
            "rating" => self.rating.map_or(Value::Null, Value::Int),
            other => panic!("unexpected sort column {other}"),
        }
    }
}

/// Six scores; ids 1..=3 have never been rated.
struct Unrated {
    conn: Connection,
}

impl Unrated {
    fn seeded() -> Self {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE score (id INTEGER PRIMARY KEY, rating INTEGER)")
            .unwrap();
        for id in 1..=6_i64 {
            let rating = (id > 3).then_some(2000 + id);
            conn.execute("INSERT INTO score (id, rating) VALUES (?1, ?2)", (id, rating))
                .unwrap();
        }
        Self { conn }
    }
}

impl QueryExecutor for Unrated {
    type Row = Score;
    type Error = rusqlite::Error;

    fn execute(&self, query: &KeysetQuery) -> Result<Vec<Score>, Self::Error> {
        let rendered = query.to_sql(Sqlite, "score", &["id", "rating"]);
        let mut stmt = self.conn.prepare(&rendered.sql)?;
        let rows = stmt.query_map(
            params_from_iter(rendered.params.iter().map(to_sql_value)),
            |row| {
                Ok(Score {
                    id: row.get(0)?,
                    rating: row.get(1)?,
                })
            },
        )?;
        rows.collect()
    }
}

#[test]
fn null_sort_values_fail_the_page_instead_of_truncating() {
    let store = Unrated::seeded();
    let pager = pager(vec![SortColumn::asc("rating"), SortColumn::asc("id").unique()]);

    // SQLite sorts NULL first, so the opening page already holds one
    let err = pager.fetch_page(&store, &PageRequest::first(2)).unwrap_err();
    assert!(matches!(&err, PageError::NullSortValue { column } if column == "rating"));
    assert_eq!(err.http_status(), 500);
    assert_eq!(err.client_message(), "internal error");

    // Walking back from the end reaches the NULLs through the look-ahead row
    let err = pager.fetch_page(&store, &PageRequest::last(3)).unwrap_err();
    assert!(matches!(err, PageError::NullSortValue { .. }));
}

#[test]
fn null_anchor_token_is_a_client_error() {
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let store = Unrated::seeded();
    let pager = pager(vec![SortColumn::asc("rating"), SortColumn::asc("id").unique()]);

    let token = URL_SAFE_NO_PAD.encode(r#"{"v":1,"a":[null,null]}"#);
    let err = pager
        .fetch_page_from_token(&store, Some(&token), NavigationDirection::Forward, 2)
        .unwrap_err();
    assert!(matches!(
        err,
        PageError::InvalidCursor(CursorError::Malformed(_))
    ));
    assert_eq!(err.http_status(), 400);
}

#[test]
fn store_errors_surface_as_query_execution() {
    let ladder = Ladder::seeded();
    ladder.conn.execute_batch("DROP TABLE team").unwrap();
    let pager = pager(vec![SortColumn::asc("id").unique()]);

    let err = pager.fetch_page(&ladder, &PageRequest::first(3)).unwrap_err();
    assert!(matches!(err, PageError::QueryExecution(rusqlite::Error::SqliteFailure(..))));
    assert_eq!(err.http_status(), 500);
}
