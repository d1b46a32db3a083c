pub mod pane_chrome;
pub mod status_bar;
pub mod text_field;
pub mod toast;

/// Cut `s` to at most `max` display columns, ending in `…` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn test_truncate_short_is_unchanged() {
        assert_eq!(truncate("Jazz24", 10), "Jazz24");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate("Radio Paradise", 6), "Radio…");
    }

    #[test]
    fn test_truncate_wide_chars() {
        assert_eq!(truncate("日本語ラジオ", 5), "日本…");
    }
}
