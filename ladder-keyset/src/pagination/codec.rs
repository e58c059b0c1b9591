//! Opaque cursor token encoding.
//!
//! A token is the base64url (no padding) encoding of a compact JSON payload:
//!
//! ```text
//! {"v":<schema version>,"a":[<anchor value>, ...]}
//! ```
//!
//! Tokens are opaque to clients. They are **not** encrypted or signed; the
//! decoder simply refuses anything it would not have produced for the current
//! keyset, so a stale or edited token restarts traversal instead of returning
//! a misordered page.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use miniserde::json::{self, Number, Value as JsonValue};
use miniserde::{Deserialize, Serialize};

use crate::types::Value;

use super::error::CursorError;
use super::position::Position;

/// Default maximum token length in bytes (4KB).
pub const DEFAULT_MAX_TOKEN_LEN: usize = 4 * 1024;

const NULL_ANCHOR: &str = "anchor values must not be null";

/// Wire form of a [`Position`]. Field order is the canonical order.
#[derive(Serialize, Deserialize)]
struct Payload {
    v: i64,
    a: Vec<JsonValue>,
}

/// Encodes positions into tokens and decodes them back for one keyset.
///
/// The codec knows the current schema version and the number of sort
/// columns, and rejects tokens that disagree with either.
///
/// # Example
///
/// ```
/// use ladder_keyset::{CursorCodec, Position, Value};
///
/// let codec = CursorCodec::new(1, 2);
/// let position = Position::new(1, vec![Value::Int(2400), Value::Int(17)]);
///
/// let token = codec.encode(Some(&position)).unwrap();
/// assert_eq!(codec.decode(Some(&token)).unwrap(), Some(position));
///
/// // No position, no token; no token, no position.
/// assert_eq!(codec.encode(None), None);
/// assert_eq!(codec.decode(None).unwrap(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorCodec {
    version: i64,
    arity: usize,
    max_token_len: usize,
}

impl CursorCodec {
    /// Create a codec for the given schema version and sort-column count.
    #[must_use]
    pub const fn new(version: i64, arity: usize) -> Self {
        Self {
            version,
            arity,
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }

    /// Set the maximum accepted token length in bytes.
    #[must_use]
    pub const fn max_token_len(mut self, max: usize) -> Self {
        self.max_token_len = max;
        self
    }

    /// Current schema version.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    /// Number of anchor values a token must carry.
    #[inline]
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Build a position for this codec's schema version.
    pub const fn position(&self, anchor: Vec<Value>) -> Position {
        Position::new(self.version, anchor)
    }

    /// Check a position against this codec's arity and schema version.
    ///
    /// A `NULL` anchor value is rejected too: `col > NULL` matches no row, so
    /// such a position could only ever produce an empty page.
    pub fn check(&self, position: &Position) -> Result<(), CursorError> {
        if position.arity() != self.arity {
            return Err(CursorError::ArityMismatch {
                expected: self.arity,
                found: position.arity(),
            });
        }
        if position.version() != self.version {
            return Err(CursorError::VersionMismatch {
                expected: self.version,
                found: position.version(),
            });
        }
        if position.anchor().iter().any(Value::is_null) {
            return Err(CursorError::Malformed(NULL_ANCHOR));
        }
        Ok(())
    }

    /// Encode a position; `None` means there is no page to point at.
    #[must_use]
    pub fn encode(&self, position: Option<&Position>) -> Option<String> {
        position.map(encode_position)
    }

    /// Decode a client token.
    ///
    /// A missing or empty token is not an error: it means "start from the
    /// first (or last) page". Anything else either decodes completely or
    /// fails with [`CursorError`].
    pub fn decode(&self, token: Option<&str>) -> Result<Option<Position>, CursorError> {
        match token {
            None | Some("") => Ok(None),
            Some(token) => self.decode_token(token).map(Some).inspect_err(|err| {
                tracing::warn!(
                    reason = err.kind(),
                    tampering = err.is_tampering(),
                    error = %err,
                    "rejected pagination cursor"
                );
            }),
        }
    }

    fn decode_token(&self, token: &str) -> Result<Position, CursorError> {
        // Size check before any decoding work
        if token.len() > self.max_token_len {
            return Err(CursorError::TooLarge {
                max: self.max_token_len,
                len: token.len(),
            });
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| CursorError::InvalidBase64)?;
        let text =
            String::from_utf8(bytes).map_err(|_| CursorError::Malformed("payload is not UTF-8"))?;
        let payload: Payload = json::from_str(&text)
            .map_err(|_| CursorError::Malformed("expected {\"v\": int, \"a\": [...]}"))?;

        let anchor = payload
            .a
            .into_iter()
            .map(value_from_json)
            .collect::<Result<Vec<_>, _>>()?;
        let position = Position::new(payload.v, anchor);
        self.check(&position)?;
        Ok(position)
    }
}

fn encode_position(position: &Position) -> String {
    let payload = Payload {
        v: position.version(),
        a: position.anchor().iter().map(value_to_json).collect(),
    };
    URL_SAFE_NO_PAD.encode(json::to_string(&payload))
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::Number(Number::I64(*i)),
        Value::Float(f) => JsonValue::Number(Number::F64(*f)),
        Value::String(s) => JsonValue::String(s.clone()),
    }
}

fn value_from_json(value: JsonValue) -> Result<Value, CursorError> {
    Ok(match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(Number::I64(i)) => Value::Int(i),
        JsonValue::Number(Number::U64(u)) => Value::Int(
            i64::try_from(u).map_err(|_| CursorError::Malformed("integer out of range"))?,
        ),
        JsonValue::Number(Number::F64(f)) => Value::Float(f),
        JsonValue::String(s) => Value::String(s),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            return Err(CursorError::Malformed("anchor values must be scalars"));
        },
    })
}
