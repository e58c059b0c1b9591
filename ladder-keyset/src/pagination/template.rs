//! Hand-written query templates with keyset placeholders.
//!
//! Some ladder queries are too specific for [`KeysetQuery::to_sql`]
//! (window functions, CTEs, joins). Those are kept as static templates with
//! indexed placeholders, and only the ORDER BY keyword and the comparison
//! operator are substituted in:
//!
//! ```
//! use ladder_keyset::{NavigationDirection, SortingOrder, format_query};
//!
//! const TEMPLATE: &str = "SELECT id, rating FROM team \
//!     WHERE (rating, id) {1} ($1, $2) \
//!     ORDER BY rating {0}, id {0} LIMIT $3";
//!
//! let sql = format_query(
//!     TEMPLATE,
//!     SortingOrder::Desc,
//!     NavigationDirection::Backward,
//!     true,
//!     &[],
//! );
//! assert_eq!(
//!     sql,
//!     "SELECT id, rating FROM team WHERE (rating, id) > ($1, $2) \
//!      ORDER BY rating ASC, id ASC LIMIT $3"
//! );
//! ```
//!
//! Anchor values stay bound parameters (`$1`, `$2` above); only enum-derived
//! keywords and the caller's own static strings are ever substituted.
//!
//! [`KeysetQuery::to_sql`]: crate::KeysetQuery::to_sql

use crate::types::{NavigationDirection, SortingOrder};

/// Template arguments for a keyset query.
///
/// Yields the effective ORDER BY keyword (reversed for backward traversal)
/// and the comparison operator for `direction` on the display `order`,
/// followed by `extra_args`. With `order_first` the keyword comes first,
/// otherwise the operator does.
#[must_use]
pub fn build_predicate_args<'a>(
    order: SortingOrder,
    direction: NavigationDirection,
    order_first: bool,
    extra_args: &[&'a str],
) -> Vec<&'a str> {
    let keyword = direction.query_order(order).as_sql();
    let operator = direction.operator(order).as_sql();

    let mut args = Vec::with_capacity(extra_args.len() + 2);
    if order_first {
        args.extend([keyword, operator]);
    } else {
        args.extend([operator, keyword]);
    }
    args.extend_from_slice(extra_args);
    args
}

/// Substitute keyset arguments into a template.
///
/// Placeholders are `{0}`, `{1}`, ... indexing into the list produced by
/// [`build_predicate_args`]. `{{` and `}}` produce literal braces.
///
/// # Panics
///
/// Panics if the template references a missing argument or contains an
/// unterminated placeholder. Templates are static code, so this is a
/// programming error.
#[must_use]
pub fn format_query(
    template: &str,
    order: SortingOrder,
    direction: NavigationDirection,
    order_first: bool,
    extra_args: &[&str],
) -> String {
    let args = build_predicate_args(order, direction, order_first, extra_args);
    substitute(template, &args)
}

fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            },
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            },
            '{' => {
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(d) if d.is_ascii_digit() => digits.push(d),
                        _ => panic!("malformed placeholder in query template: {template}"),
                    }
                }
                let arg = digits
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| args.get(i))
                    .unwrap_or_else(|| {
                        panic!(
                            "query template placeholder {{{digits}}} has no argument \
                             ({} available)",
                            args.len()
                        )
                    });
                out.push_str(arg);
            },
            c => out.push(c),
        }
    }
    out
}
