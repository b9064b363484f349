//! Display formatting for durations, dates and episode notes

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format a second count as `MM:SS`.
///
/// Minutes are not wrapped into hours, so `3661` renders as `61:01`.
pub fn duration_to_string(seconds: u64) -> String {
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Parse an ISO-8601 timestamp and render it as `d MMM yy` (`8 Jan 21`).
///
/// Accepts RFC 3339 with an offset, naive date-times separated by either
/// `T` or a space, and bare dates.
pub fn format_published_at(iso: &str) -> Result<String> {
    let iso = iso.trim();
    let date = if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        dt.date_naive()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f") {
        dt.date()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(iso, "%Y-%m-%d %H:%M:%S%.f") {
        dt.date()
    } else {
        NaiveDate::parse_from_str(iso, "%Y-%m-%d")
            .with_context(|| format!("invalid published_at timestamp: {iso:?}"))?
    };

    Ok(date.format("%-d %b %y").to_string())
}

/// Header date in the `EEE, d MMMM` shape (`Mon, 19 October`).
pub fn format_header_date(date: NaiveDate) -> String {
    date.format("%a, %-d %B").to_string()
}

/// Reduce episode show notes to plain text.
///
/// Descriptions come from the API as HTML and are not trusted, so tags are
/// dropped rather than interpreted. Block-level tags become line breaks and a
/// handful of common entities are decoded.
pub fn strip_markup(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' => {
                let mut tag = String::new();
                for t in chars.by_ref() {
                    if t == '>' {
                        break;
                    }
                    tag.push(t);
                }
                let name: String = tag
                    .trim_start_matches('/')
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_ascii_lowercase();
                if matches!(name.as_str(), "p" | "br" | "div" | "li" | "h1" | "h2" | "h3" | "h4" | "ul" | "ol")
                    && !text.ends_with('\n')
                    && !text.is_empty()
                {
                    text.push('\n');
                }
            }
            '&' => {
                let mut entity = String::new();
                while let Some(&e) = chars.peek() {
                    if !(e.is_ascii_alphanumeric() || e == '#') || entity.len() > 8 {
                        break;
                    }
                    entity.push(e);
                    chars.next();
                }
                let terminated = chars.peek() == Some(&';');
                let decoded = match entity.as_str() {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "#39" | "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                };
                match decoded {
                    Some(d) if terminated => {
                        chars.next();
                        text.push(d);
                    }
                    _ => {
                        text.push('&');
                        text.push_str(&entity);
                    }
                }
            }
            _ => text.push(c),
        }
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_pads_both_parts() {
        assert_eq!(duration_to_string(0), "00:00");
        assert_eq!(duration_to_string(59), "00:59");
        assert_eq!(duration_to_string(60), "01:00");
        assert_eq!(duration_to_string(3661), "61:01");
    }

    #[test]
    fn duration_minutes_are_not_truncated() {
        assert_eq!(duration_to_string(100 * 60 + 5), "100:05");
    }

    #[test]
    fn published_at_accepts_common_shapes() {
        assert_eq!(format_published_at("2021-01-08 17:00:00").unwrap(), "8 Jan 21");
        assert_eq!(format_published_at("2021-01-08T17:00:00").unwrap(), "8 Jan 21");
        assert_eq!(format_published_at("2020-12-24T09:30:00Z").unwrap(), "24 Dec 20");
        assert_eq!(format_published_at("2021-03-01").unwrap(), "1 Mar 21");
    }

    #[test]
    fn published_at_rejects_garbage() {
        assert!(format_published_at("yesterday").is_err());
    }

    #[test]
    fn header_date_uses_full_month() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(format_header_date(date), "Mon, 19 October");
    }

    #[test]
    fn strips_tags_and_breaks_paragraphs() {
        let html = "<p>Nesse episódio do <strong>Faladev</strong>.</p><p>Segundo</p>";
        assert_eq!(strip_markup(html), "Nesse episódio do Faladev.\nSegundo");
    }

    #[test]
    fn scripts_are_never_kept_as_markup() {
        let html = r#"<p onclick="x()">Hi<script>alert(1)</script></p>"#;
        let text = strip_markup(html);
        assert!(!text.contains('<'));
        assert!(text.starts_with("Hi"));
    }

    #[test]
    fn decodes_common_entities() {
        assert_eq!(
            strip_markup("Tom &amp; Jerry &lt;3 &quot;hi&quot; it&#39;s&nbsp;ok"),
            "Tom & Jerry <3 \"hi\" it's ok"
        );
    }

    #[test]
    fn leaves_unknown_or_bare_ampersands() {
        assert_eq!(strip_markup("R&D &copy;"), "R&D &copy;");
    }
}
