//! Lenient multi-segment version comparison
//!
//! Unlike semver parsing, this never fails: a leading `v` is ignored, and any
//! segment that is missing or not a non-negative integer compares as `0`.

use std::cmp::Ordering;

/// Returns true when `remote` is strictly newer than `current`.
///
/// Segments are compared left to right up to the longer operand's length.
/// Equal versions are not newer.
///
/// Examples:
/// - `is_newer("1.0.5", "1.0.4")` -> true
/// - `is_newer("1.0", "1.0.0")` -> false
/// - `is_newer("v2.0.0", "1.9.9")` -> true
/// - `is_newer("abc", "1.0.0")` -> false
pub fn is_newer(remote: &str, current: &str) -> bool {
    compare(remote, current) == Ordering::Greater
}

/// Orders two version strings segment by segment.
pub fn compare(a: &str, b: &str) -> Ordering {
    let a = segments(a);
    let b = segments(b);
    let len = a.len().max(b.len());

    (0..len)
        .map(|i| {
            let left = a.get(i).copied().unwrap_or(0);
            let right = b.get(i).copied().unwrap_or(0);
            left.cmp(&right)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn segments(version: &str) -> Vec<u64> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);
    version
        .split('.')
        .map(|segment| segment.parse::<u64>().unwrap_or(0))
        .collect()
}
