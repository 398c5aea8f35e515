//! Store filename escaping for file-pattern queries.
//!
//! Mercurial keeps one revlog per tracked file under `.hg/store/data`, with
//! the filename escaped so it survives case-insensitive filesystems: `_`
//! becomes `__` and every uppercase letter becomes `_` plus its lowercase
//! form. Escaping a query the same way lets an extension query be answered by
//! listing one directory.

use crate::config::QueryConfig;

/// Escape `query` the way the store escapes filenames.
///
/// `|`, `*` and `.` are pattern syntax and pass through untouched.
///
/// # Examples
///
/// ```
/// use repohub_core::query::mangle;
///
/// assert_eq!(mangle("*.lift|*.CustomProperties"), "*.lift|*._custom_properties");
/// assert_eq!(mangle("a_b"), "a__b");
/// ```
pub fn mangle(query: &str) -> String {
    let mut out = String::with_capacity(query.len() * 2);
    for ch in query.chars() {
        match ch {
            QueryConfig::OR_CHAR | '*' | '.' => out.push(ch),
            '_' => out.push_str("__"),
            c if c.is_uppercase() => {
                out.push('_');
                out.extend(c.to_lowercase());
            }
            c => out.push(c),
        }
    }
    out
}

/// Mangle `query` and split it into individual filter patterns.
///
/// Empty alternatives (`"*.a||*.b"`) are dropped.
pub fn filter_patterns(query: &str) -> Vec<String> {
    mangle(query)
        .split(QueryConfig::OR_CHAR)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
