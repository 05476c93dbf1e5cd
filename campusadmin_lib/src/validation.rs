//! Input validation for values typed by an operator (CLI flags, query
//! overrides) before they reach a controller.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::AdminError;
use crate::state::ItemsPerPage;

pub const MAX_SEARCH_LENGTH: usize = 100;
pub const MAX_FILTER_VALUE_LENGTH: usize = 80;
pub const MAX_ITEMS_PER_PAGE: u64 = 500;

fn filter_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]{0,63}$").expect("static regex"))
}

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, AdminError> {
    if input.len() > max_len {
        return Err(AdminError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(AdminError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a search string: enforce length, strip control chars, trim.
pub fn validate_search(input: &str) -> Result<String, AdminError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Parse a `key=value` filter. The key must look like a field name; the value
/// is sanitized like free text. `all` and an empty value are accepted and
/// mean "no filter".
pub fn parse_filter(input: &str) -> Result<(String, String), AdminError> {
    let (key, value) = input.split_once('=').ok_or_else(|| {
        AdminError::InvalidInput(format!("filter '{}' must look like key=value", input))
    })?;
    let key = key.trim();
    if !filter_key_re().is_match(key) {
        return Err(AdminError::InvalidInput(format!(
            "invalid filter key '{}'",
            key
        )));
    }
    let value = value.trim();
    let value = if value.is_empty() {
        String::new()
    } else {
        sanitize_text(value, MAX_FILTER_VALUE_LENGTH)?
    };
    Ok((key.to_string(), value))
}

/// Validate page number (must be >= 1).
pub fn validate_page(page: u64) -> Result<u64, AdminError> {
    if page < 1 {
        return Err(AdminError::InvalidInput(
            "page must be >= 1".to_string(),
        ));
    }
    Ok(page)
}

/// Parse a page size: `all` or a count in `1..=500`.
pub fn parse_items_per_page(input: &str) -> Result<ItemsPerPage, AdminError> {
    let parsed: ItemsPerPage = input.parse().map_err(|_| {
        AdminError::InvalidInput(format!(
            "items per page must be 'all' or a number between 1 and {}",
            MAX_ITEMS_PER_PAGE
        ))
    })?;
    match parsed {
        ItemsPerPage::Count(n) if n > MAX_ITEMS_PER_PAGE => Err(AdminError::InvalidInput(
            format!("items per page must be at most {}", MAX_ITEMS_PER_PAGE),
        )),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_is_trimmed_and_stripped() {
        assert_eq!(validate_search("  calc\u{7}ulus ").unwrap(), "calculus");
    }

    #[test]
    fn search_rejects_blank_and_long() {
        assert!(validate_search("   ").is_err());
        assert!(validate_search(&"x".repeat(MAX_SEARCH_LENGTH + 1)).is_err());
    }

    #[test]
    fn filter_parsing() {
        assert_eq!(
            parse_filter("category._id = c1").unwrap(),
            ("category._id".to_string(), "c1".to_string())
        );
        assert_eq!(
            parse_filter("status=").unwrap(),
            ("status".to_string(), String::new())
        );
        assert!(parse_filter("no-equals").is_err());
        assert!(parse_filter("1bad=x").is_err());
        assert!(parse_filter("sp ace=x").is_err());
    }

    #[test]
    fn page_validation() {
        assert!(validate_page(0).is_err());
        assert_eq!(validate_page(4).unwrap(), 4);
    }

    #[test]
    fn items_per_page_validation() {
        assert_eq!(parse_items_per_page("all").unwrap(), ItemsPerPage::All);
        assert_eq!(parse_items_per_page("50").unwrap(), ItemsPerPage::Count(50));
        assert!(parse_items_per_page("0").is_err());
        assert!(parse_items_per_page("501").is_err());
    }
}
