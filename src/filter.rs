//! Name search over a category's entries.
//!
//! The query is trimmed and lower-cased; an entry matches when its
//! lower-cased name contains the query. An empty query matches everything.
//! Order is preserved.

use crate::types::Entry;

/// Normalized form of a user query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Entries whose name contains `query`, case-insensitively.
pub fn filter_entries<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return entries.iter().collect();
    }
    entries
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .collect()
}
