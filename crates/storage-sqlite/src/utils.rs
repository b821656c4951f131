//! Helpers for working with SQLite.

use log::warn;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Maximum number of ids bound into a single `IN (...)` clause.
///
/// SQLite caps the number of parameters per statement (SQLITE_MAX_VARIABLE_NUMBER,
/// historically 999). 500 leaves room for the query's other binds.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits a slice into chunks of at most `SQLITE_MAX_PARAMS_CHUNK` items.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Parses a decimal stored as TEXT.
///
/// Unparseable values are logged and read as `None`; `column` names the
/// source in the warning.
pub fn parse_stored_decimal(raw: Option<&str>, column: &str, row_id: &str) -> Option<Decimal> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match Decimal::from_str(raw) {
        Ok(value) => Some(value),
        Err(_) => match Decimal::from_scientific(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    "Ignoring unparseable {} '{}' on row {}: {}",
                    column, raw, row_id, e
                );
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_chunk_for_sqlite_empty() {
        let items: Vec<i32> = vec![];
        assert_eq!(chunk_for_sqlite(&items).count(), 0);
    }

    #[test]
    fn test_chunk_for_sqlite_over_limit() {
        let items: Vec<i32> = (0..1200).collect();
        let chunks: Vec<_> = chunk_for_sqlite(&items).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), SQLITE_MAX_PARAMS_CHUNK);
        assert_eq!(chunks[2].len(), 200);
    }

    #[test]
    fn test_parse_stored_decimal() {
        assert_eq!(parse_stored_decimal(Some("1250.50"), "v", "r"), Some(dec!(1250.50)));
        assert_eq!(parse_stored_decimal(Some(" 7 "), "v", "r"), Some(dec!(7)));
        assert_eq!(parse_stored_decimal(Some("1e3"), "v", "r"), Some(dec!(1000)));
        assert_eq!(parse_stored_decimal(Some("n/a"), "v", "r"), None);
        assert_eq!(parse_stored_decimal(Some(""), "v", "r"), None);
        assert_eq!(parse_stored_decimal(None, "v", "r"), None);
    }
}
