//! Helper functions shared by the mock domain modules

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a store, recovering the data if a previous test thread panicked while holding it
pub(crate) fn lock<T>(store: &Mutex<T>) -> MutexGuard<'_, T> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Current time in the format ProVision uses for `modified`
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Slug derived from a display name
pub(crate) fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// Whether `value` satisfies the filter `key`, treating unknown keys as pass-through
pub(crate) fn matches(filters: &BTreeMap<String, String>, key: &str, value: Option<&str>) -> bool {
    match filters.get(key) {
        Some(wanted) => value == Some(wanted.as_str()),
        None => true,
    }
}
