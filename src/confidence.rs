//! Confidence normalization.
//!
//! Each registry reports gene confidence in its own shape: integers, float
//! strings, or color/label words. Everything is folded onto the 4-level
//! ordinal scale before aggregation. Unrecognized input normalizes to 0
//! rather than erroring; the table favors inclusion over rejection, and a
//! gene with an unreadable rating still surfaces as unrated.

pub const GREEN: u8 = 3;
pub const AMBER: u8 = 2;
pub const RED: u8 = 1;
pub const UNRATED: u8 = 0;

/// Map a raw confidence value onto {0,1,2,3}. Total: never fails.
pub fn normalize(raw: &str) -> u8 {
    match raw.trim().to_lowercase().as_str() {
        "3" | "3.0" | "green" | "high" => GREEN,
        "2" | "2.0" | "amber" | "orange" | "medium" => AMBER,
        "1" | "1.0" | "red" | "low" => RED,
        _ => UNRATED,
    }
}

/// Normalize an optional raw column value (missing column → unrated).
pub fn normalize_opt(raw: Option<&str>) -> u8 {
    raw.map(normalize).unwrap_or(UNRATED)
}
