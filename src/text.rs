//! Text utilities

/// Wrap text to a maximum width, preserving line breaks.
#[must_use]
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        if raw_line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0usize;
        for word in raw_line.split_whitespace() {
            let word_width = word.chars().count();
            if current_width > 0 && current_width + 1 + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
                continue;
            }
            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            let mut chunk: Vec<char> = word.chars().collect();
            while chunk.len() > max_width {
                let rest = chunk.split_off(max_width);
                lines.push(chunk.into_iter().collect());
                chunk = rest;
            }
            current_width = chunk.len();
            current = chunk.into_iter().collect();
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Turn `content` into a markdown blockquote ready to reply under.
///
/// Every line gets a `> ` prefix and a trailing blank line is appended, so
/// `"a\nb"` becomes `"> a\n> b\n\n"`.
#[must_use]
pub fn quote_markdown(content: &str) -> String {
    let mut quoted: Vec<String> = content.split('\n').map(|line| format!("> {line}")).collect();
    quoted.push("\n".to_string());
    quoted.join("\n")
}

/// Human-readable age of `then` relative to `now` (both epoch millis).
#[must_use]
pub fn time_ago(then_ms: i64, now_ms: i64) -> String {
    let secs = now_ms.saturating_sub(then_ms).max(0) / 1000;
    let (value, unit) = match secs {
        0..=44 => return "just now".to_string(),
        45..=3_599 => ((secs + 30) / 60, "minute"),
        3_600..=86_399 => ((secs + 1_800) / 3_600, "hour"),
        86_400..=2_591_999 => ((secs + 43_200) / 86_400, "day"),
        2_592_000..=31_535_999 => (secs / 2_592_000, "month"),
        _ => (secs / 31_536_000, "year"),
    };
    let value = value.max(1);
    if value == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{value} {unit}s ago")
    }
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 1 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_prefixes_each_line_and_appends_blank_line() {
        assert_eq!(quote_markdown("a\nb"), "> a\n> b\n\n");
        assert_eq!(quote_markdown("single"), "> single\n\n");
    }

    #[test]
    fn wrap_keeps_blank_lines_and_splits_long_words() {
        let wrapped = wrap_text("one two three\n\nabcdefgh", 7);
        assert_eq!(wrapped, ["one two", "three", "", "abcdefg", "h"]);
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        let wrapped = wrap_text("héllo wörld", 5);
        assert_eq!(wrapped, ["héllo", "wörld"]);
    }

    #[test]
    fn time_ago_buckets() {
        let minute = 60_000;
        assert_eq!(time_ago(0, 10_000), "just now");
        assert_eq!(time_ago(0, minute), "1 minute ago");
        assert_eq!(time_ago(0, 5 * minute), "5 minutes ago");
        assert_eq!(time_ago(0, 2 * 60 * minute), "2 hours ago");
        assert_eq!(time_ago(0, 3 * 24 * 60 * minute), "3 days ago");
        assert_eq!(time_ago(10_000, 0), "just now");
        let years = i64::MAX / 1000 / 31_536_000;
        assert_eq!(time_ago(i64::MIN, i64::MAX), format!("{years} years ago"));
        assert_eq!(time_ago(i64::MAX, i64::MIN), "just now");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate_chars("alice", 10), "alice");
        assert_eq!(truncate_chars("alexandria", 5), "alex…");
    }
}
