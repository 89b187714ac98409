//! Text normalization for values read out of APT and VSR documents.
//!
//! Proposal exports use `"X"` as a "not applicable" placeholder and often pad
//! values with whitespace. Every text accessor in the crate funnels through
//! [`normalize_text`] so that these all collapse to `None`.

/// Placeholder written by the proposal tool for "no value".
pub const PLACEHOLDER: &str = "X";

/// Trims `raw`, returning `None` for missing, blank or placeholder text.
///
/// # Examples
///
/// ```
/// use trexolists::parsing::text::normalize_text;
///
/// assert_eq!(normalize_text(Some("  SUB80 ")), Some("SUB80".to_string()));
/// assert_eq!(normalize_text(Some(" x ")), None);
/// assert_eq!(normalize_text(Some("")), None);
/// assert_eq!(normalize_text(None), None);
/// ```
pub fn normalize_text(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(PLACEHOLDER) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalizes identifier-like values such as target names.
///
/// All whitespace is removed and letters are upper-cased, so `"WASP 96"` and
/// `"wasp96"` both become `"WASP96"`.
pub fn normalize_identifier(raw: Option<&str>) -> Option<String> {
    let text = normalize_text(raw)?;
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();
    if compact.is_empty() || compact == PLACEHOLDER {
        None
    } else {
        Some(compact)
    }
}
