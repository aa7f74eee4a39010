use once_cell::sync::Lazy;
use regex::Regex;

static YEAR_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").expect("year pattern is valid"));

/// First run of four ASCII digits in a free-text year field.
///
/// `"c. 1874"` gives 1874, `"1890-1892"` gives 1890, `"circa unknown"` gives
/// `None`.
pub fn year_token(year: &str) -> Option<u16> {
    YEAR_TOKEN.find(year).and_then(|m| m.as_str().parse().ok())
}
