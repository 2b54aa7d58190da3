//! Stylesheet warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Backs the `console` parse-error destination: a stylesheet that is parsed
//! for every node of a tree would otherwise print the same error per node.

use std::collections::HashSet;

use owo_colors::OwoColorize;
use parking_lot::Mutex;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a stylesheet problem (prints once per unique message).
///
/// Returns `true` when the message was printed, `false` when it had already
/// been reported.
///
/// # Example
/// ```ignore
/// warn_once("parser", "theme.css:3:7: expected '{' after selector");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_print = WARNED.lock().get_or_insert_with(HashSet::new).insert(key);

    if should_print {
        eprintln!("{}", format!("[tessel {component}] ⚠ {message}").yellow());
    }
    should_print
}

/// Clear all recorded warnings (call after a stylesheet reload).
pub fn clear_warnings() {
    if let Some(set) = WARNED.lock().as_mut() {
        set.clear();
    }
}
