//! Text and number formatting shared by the report builders.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const ELLIPSIS: &str = "...";

/// Cuts `text` to its first `limit` characters and appends `...`.
///
/// Text of at most `limit` characters is returned unchanged.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => format!("{}{}", &text[..end], ELLIPSIS),
        None => text.to_owned(),
    }
}

/// Keeps the last `keep` characters of text longer than `limit` behind a
/// leading `...`.
pub fn truncate_head(text: &str, limit: usize, keep: usize) -> String {
    let count = text.chars().count();
    if count <= limit {
        return text.to_owned();
    }
    let tail: String = text.chars().skip(count.saturating_sub(keep)).collect();
    format!("{}{}", ELLIPSIS, tail)
}

/// Formats a number without a fractional part when it is whole.
pub fn number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}

pub fn percent(value: f64) -> String {
    format!("{}%", number(value))
}

/// Signed percentage-point change: `+3.5%p`, `-2%p` or `0%p`.
pub fn change(value: f64) -> String {
    if value > 0.0 {
        format!("+{}%p", number(value))
    } else {
        format!("{}%p", number(value))
    }
}

/// `score / max` as shown in the category tables.
pub fn ratio(score: f64, max: f64) -> String {
    format!("{} / {}", number(score), number(max))
}

/// Shortens a timestamp to its calendar date.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` and plain dates; anything
/// else is returned as given.
pub fn date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return parsed.format("%Y-%m-%d").to_string();
        }
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%Y-%m-%d").to_string();
    }
    raw.to_owned()
}

/// Timestamp printed in report footers.
pub fn timestamp(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Audit document identifier derived from the generation time.
pub fn document_id(at: &DateTime<Local>) -> String {
    format!("GEO-{}", at.format("%Y%m%d%H%M%S"))
}

/// Upper-case label of a score category key.
pub fn category_label(key: &str) -> String {
    match key {
        "structure" => "STRUCTURE".to_owned(),
        "schema" => "SCHEMA".to_owned(),
        "url" => "URL".to_owned(),
        "meta" => "META".to_owned(),
        "content" => "CONTENT".to_owned(),
        other => other.to_uppercase(),
    }
}

/// Capitalised priority label: `High`, `Medium`, `Low`, or the input.
pub fn priority_label(priority: &str) -> String {
    match priority.to_ascii_lowercase().as_str() {
        "high" => "High".to_owned(),
        "medium" => "Medium".to_owned(),
        "low" => "Low".to_owned(),
        _ => priority.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn truncate_keeps_short_text_verbatim() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn truncate_cuts_to_limit_plus_marker() {
        let text = "a".repeat(50);
        let cut = truncate(&text, 35);
        assert_eq!(cut.chars().count(), 38);
        assert!(cut.ends_with("..."));
        assert_eq!(&cut[..35], &text[..35]);
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("검색엔진최적화", 3), "검색엔...");
        assert_eq!(truncate("é".repeat(4).as_str(), 4), "éééé");
    }

    #[test]
    fn truncate_head_keeps_the_tail() {
        assert_eq!(truncate_head("/short", 20, 17), "/short");
        let long = "/blog/2024/a-very-long-article-slug";
        let cut = truncate_head(long, 20, 17);
        assert!(cut.starts_with("..."));
        assert_eq!(cut.chars().count(), 20);
        assert!(long.ends_with(&cut[3..]));
    }

    #[test]
    fn numbers_drop_whole_fractions() {
        assert_eq!(number(82.0), "82");
        assert_eq!(number(3.25), "3.25");
        assert_eq!(number(5.2), "5.2");
        assert_eq!(percent(45.0), "45%");
    }

    #[test]
    fn change_is_signed() {
        assert_eq!(change(3.5), "+3.5%p");
        assert_eq!(change(-2.0), "-2%p");
        assert_eq!(change(0.0), "0%p");
    }

    #[test]
    fn dates_shorten_known_formats() {
        assert_eq!(date("2024-05-01T09:30:00Z"), "2024-05-01");
        assert_eq!(date("2024-05-01T09:30:00.123"), "2024-05-01");
        assert_eq!(date("2024-05-01"), "2024-05-01");
        assert_eq!(date("last week"), "last week");
    }

    #[test]
    fn document_id_uses_generation_time() {
        let at = Local
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 5)
            .single()
            .expect("unambiguous local time");
        assert_eq!(document_id(&at), "GEO-20240501093005");
        assert_eq!(timestamp(&at), "2024-05-01 09:30");
    }

    #[test]
    fn labels() {
        assert_eq!(category_label("schema"), "SCHEMA");
        assert_eq!(category_label("performance"), "PERFORMANCE");
        assert_eq!(priority_label("MEDIUM"), "Medium");
        assert_eq!(priority_label("someday"), "someday");
    }
}
