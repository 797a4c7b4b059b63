//! Opaque continuation tokens for offset-based pagination.
//!
//! A cursor is the URL-safe base64 encoding (without padding) of the
//! JSON object `{"offset":n}`. Offsets shift if rows are inserted or
//! deleted between two page requests, i.e. clients may then see an
//! item twice or miss one.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CursorPayload {
    offset: u64,
}

pub fn encode_cursor(offset: u64) -> String {
    let payload = serde_json::json!({ "offset": offset }).to_string();
    URL_SAFE_NO_PAD.encode(payload)
}

/// Decodes the offset of a cursor.
///
/// Missing, malformed or otherwise unparsable cursors start over
/// from the beginning, i.e. they decode to 0.
pub fn decode_cursor(cursor: Option<&str>) -> u64 {
    let Some(cursor) = cursor.map(str::trim).filter(|c| !c.is_empty()) else {
        return 0;
    };
    match try_decode_cursor(cursor) {
        Some(offset) => offset,
        None => {
            log::warn!("Ignoring invalid pagination cursor: {cursor}");
            0
        }
    }
}

fn try_decode_cursor(cursor: &str) -> Option<u64> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice::<CursorPayload>(&bytes)
        .ok()
        .map(|CursorPayload { offset }| offset)
}

/// Splits off a single page from rows that have been loaded
/// with a look-ahead of one row, i.e. with a limit of `limit + 1`.
///
/// Returns the cursor of the next page if the look-ahead row exists.
pub fn split_page<T>(mut rows: Vec<T>, offset: u64, limit: u64) -> (Vec<T>, Option<String>) {
    let limit_usize = usize::try_from(limit).unwrap_or(usize::MAX);
    if rows.len() > limit_usize {
        rows.truncate(limit_usize);
        (rows, Some(encode_cursor(offset.saturating_add(limit))))
    } else {
        (rows, None)
    }
}
