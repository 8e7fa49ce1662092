//! Free-text query parsing.

use once_cell::sync::Lazy;
use posterdeck_common::{Error, Result};
use regex::Regex;

static TRAILING_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s+(\d{4})$").expect("trailing year pattern is valid"));

/// A search request parsed from user text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub title: String,
    pub year: Option<u16>,
}

/// Split user text into a title and an optional trailing four-digit year.
///
/// Whitespace is trimmed and collapsed. A lone number is a title, not a year
/// (`"1917"` stays a title search).
pub fn parse_query(text: &str) -> Result<ParsedQuery> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(Error::invalid_input("query is empty"));
    }

    if let Some(caps) = TRAILING_YEAR.captures(&normalized) {
        let title = caps[1].trim();
        if let (false, Ok(year)) = (title.is_empty(), caps[2].parse::<u16>()) {
            return Ok(ParsedQuery {
                title: title.to_string(),
                year: Some(year),
            });
        }
    }

    Ok(ParsedQuery {
        title: normalized,
        year: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn splits_trailing_year() {
        let parsed = parse_query("  iron   man 2008 ").unwrap();
        assert_eq!(parsed.title, "iron man");
        assert_eq!(parsed.year, Some(2008));
    }

    #[test]
    fn no_year_keeps_title() {
        let parsed = parse_query("naruto").unwrap();
        assert_eq!(parsed.title, "naruto");
        assert_eq!(parsed.year, None);
    }

    #[test]
    fn only_trailing_number_counts() {
        assert_eq!(parse_query("2001 a space odyssey").unwrap().year, None);
        assert_eq!(parse_query("blade runner 20499").unwrap().year, None);
        assert_eq!(parse_query("1917").unwrap().title, "1917");
    }

    #[test]
    fn empty_input_is_invalid() {
        assert_matches!(parse_query("   "), Err(Error::InvalidInput(_)));
    }
}
