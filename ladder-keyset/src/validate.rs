//! Column-name validation for keyset definitions.
//!
//! Sort columns are rendered into ORDER BY and WHERE text, so every name that
//! reaches a [`Keyset`](crate::Keyset) must pass [`is_valid_sql_identifier`].
//! Values never go through here; they are always bound parameters.

/// Maximum length of one identifier segment (`PostgreSQL` limit is 63).
const MAX_SEGMENT_LENGTH: usize = 63;

/// Validate a column name, optionally qualified by a table alias.
///
/// Accepts `column` or `alias.column`, where each segment starts with an
/// ASCII letter or underscore, continues with ASCII alphanumerics or
/// underscores, and is at most 63 bytes long.
///
/// # Examples
///
/// ```
/// use ladder_keyset::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("rating"));
/// assert!(is_valid_sql_identifier("team.rating"));
///
/// assert!(!is_valid_sql_identifier("team..rating"));
/// assert!(!is_valid_sql_identifier("a.b.c"));
/// assert!(!is_valid_sql_identifier("rating; DROP TABLE team"));
/// ```
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    let mut segments = s.split('.');
    let valid = segments.next().is_some_and(is_valid_segment)
        && segments.next().is_none_or(is_valid_segment);
    valid && segments.next().is_none()
}

fn is_valid_segment(segment: &str) -> bool {
    if segment.is_empty() || segment.len() > MAX_SEGMENT_LENGTH {
        return false;
    }
    let mut bytes = segment.bytes();
    bytes
        .next()
        .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Assert that a name is a valid column identifier.
///
/// # Panics
///
/// Panics if the identifier is invalid. Use only for names that come from
/// code, never for client input.
#[inline]
pub fn assert_valid_sql_identifier(s: &str, context: &str) {
    assert!(
        is_valid_sql_identifier(s),
        "Invalid SQL {context} name '{s}': expected `column` or `alias.column` \
         made of ASCII alphanumerics/underscores (1-63 chars per segment)"
    );
}
