use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }

    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }

    if max <= 3 {
        return s.chars().take(max).collect();
    }

    let truncated: String = s.chars().take(max - 3).collect();
    format!("{}...", truncated)
}

/// Keep the tail of `s` that fits in `width` terminal columns.
///
/// Used for the input line so the cursor end stays visible while typing.
pub fn tail_to_width(s: &str, width: usize) -> &str {
    if s.width() <= width {
        return s;
    }
    let mut used = 0usize;
    let mut start = s.len();
    for (idx, ch) in s.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &s[start..]
}

/// Greedy word wrap by display width. Long words are hard-split.
pub fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut current = String::new();
        let mut current_width = 0usize;

        for word in raw_line.split_whitespace() {
            let word_width = word.width();
            let sep = usize::from(!current.is_empty());

            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            for ch in word.chars() {
                let w = ch.width().unwrap_or(0);
                if current_width + w > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += w;
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_tail_to_width_keeps_end() {
        assert_eq!(tail_to_width("abcdef", 3), "def");
        assert_eq!(tail_to_width("abc", 10), "abc");
        // Wide glyphs take two columns each
        assert_eq!(tail_to_width("日本語", 4), "本語");
    }

    #[test]
    fn test_wrap_to_width_splits_on_words() {
        let lines = wrap_to_width("add a HEALTHCHECK instruction", 12);
        assert_eq!(lines, vec!["add a", "HEALTHCHECK", "instruction"]);
    }

    #[test]
    fn test_wrap_to_width_hard_splits_long_words() {
        let lines = wrap_to_width("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_keeps_blank_lines() {
        let lines = wrap_to_width("one\n\ntwo", 10);
        assert_eq!(lines, vec!["one", "", "two"]);
    }
}
