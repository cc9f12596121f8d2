use std::ops::Range;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

// Compile the scheme regex once for all uses
static SCHEME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").unwrap());

/// First letter of each word, uppercased: "John Doe" -> "JD".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn strip_scheme(url: &str) -> &str {
    match SCHEME_REGEX.find(url) {
        Some(m) => &url[m.end()..],
        None => url,
    }
}

/// "Dec 10, 2023"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Byte ranges of case-insensitive occurrences of `query` in `text`.
pub fn match_ranges(text: &str, query: &str) -> Vec<Range<usize>> {
    if query.is_empty() {
        return Vec::new();
    }
    match RegexBuilder::new(&regex::escape(query)).case_insensitive(true).build() {
        Ok(re) => re.find_iter(text).map(|m| m.range()).collect(),
        Err(err) => {
            tracing::debug!(%err, "Could not build highlight pattern");
            Vec::new()
        }
    }
}

pub fn calculate_max_scroll(content: &str, view_height: u16) -> u16 {
    let content_lines = content.lines().count() as u16;
    let visible_lines = view_height.saturating_sub(2);
    content_lines.saturating_sub(visible_lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn initials_take_first_letter_of_each_word() {
        assert_eq!(initials("John Doe"), "JD");
        assert_eq!(initials("ada  lovelace byron"), "ALB");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn strip_scheme_only_touches_the_prefix() {
        assert_eq!(strip_scheme("https://johndoe.dev"), "johndoe.dev");
        assert_eq!(strip_scheme("http://x.io/https://y"), "x.io/https://y");
        assert_eq!(strip_scheme("johndoe.dev"), "johndoe.dev");
    }

    #[test]
    fn format_date_is_short_month_day_year() {
        let date = Utc.with_ymd_and_hms(2023, 12, 5, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date), "Dec 5, 2023");
    }

    #[test]
    fn match_ranges_ignore_case_and_escape_query() {
        assert_eq!(match_ranges("React Hooks Collection", "hooks"), vec![6..11]);
        assert_eq!(match_ranges("Next.js API Routes", ".js"), vec![4..7]);
        assert_eq!(match_ranges("Nextxjs", ".js"), Vec::<Range<usize>>::new());
        assert!(match_ranges("anything", "").is_empty());
    }

    #[test]
    fn max_scroll_accounts_for_borders() {
        assert_eq!(calculate_max_scroll("a\nb\nc", 10), 0);
        let long = vec!["line"; 30].join("\n");
        assert_eq!(calculate_max_scroll(&long, 12), 20);
    }
}
