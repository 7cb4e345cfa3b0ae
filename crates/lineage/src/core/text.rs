//! Shared text utilities for node labels
//!
//! Truncation works on display columns rather than bytes or chars so wide
//! glyphs do not overflow a node box.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Suffix appended to truncated labels
pub const ELLIPSIS: &str = "...";

/// Truncate `text` to at most `max_width` display columns, appending
/// [`ELLIPSIS`] when anything was cut.
///
/// The ellipsis is not counted against `max_width`.
///
/// # Example
/// ```
/// use lineage::core::truncate_label;
///
/// assert_eq!(truncate_label("Margaret Eleanor Thompson", 18), "Margaret Eleanor T...");
/// assert_eq!(truncate_label("Ada", 18), "Ada");
/// ```
pub fn truncate_label(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push_str(ELLIPSIS);
    out
}

/// Extract the year from a date string such as `1921-04-03` or `1921`.
///
/// Returns `None` when the leading component is not a number.
pub fn year_of(date: &str) -> Option<i32> {
    let head = date.trim().split(['-', '/', '.']).next()?;
    head.parse().ok()
}

/// Format a birth–death range for display.
///
/// Unparseable dates are shown verbatim.
pub fn year_range(birth: Option<&str>, death: Option<&str>) -> String {
    let show = |d: &str| match year_of(d) {
        Some(y) => y.to_string(),
        None => d.trim().to_string(),
    };
    match (birth, death) {
        (Some(b), Some(d)) => format!("{} – {}", show(b), show(d)),
        (Some(b), None) => format!("b. {}", show(b)),
        (None, Some(d)) => format!("d. {}", show(d)),
        (None, None) => String::new(),
    }
}

/// First visible character of a name, uppercased, for avatar glyphs
pub fn initial(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}
