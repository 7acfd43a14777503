//! Helpers for SQLite statements.

/// Rows or ids handled per statement when a list is bound as parameters.
///
/// Keeps `IN (...)` lists and multi-row inserts well below SQLite's
/// bound-parameter limit.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits `items` into slices of at most [`SQLITE_MAX_PARAMS_CHUNK`] entries.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        let ids: Vec<i32> = vec![];
        assert_eq!(chunk_for_sqlite(&ids).count(), 0);
    }

    #[test]
    fn splits_long_lists() {
        let ids: Vec<i32> = (0..1200).collect();
        let sizes: Vec<usize> = chunk_for_sqlite(&ids).map(<[i32]>::len).collect();
        assert_eq!(sizes, vec![500, 500, 200]);
    }
}
