#![forbid(unsafe_code)]

//! Label title display helpers.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Appended to titles wider than the display budget.
pub const ELLIPSIS: &str = "…";

/// Display width of `text` in cells.
#[inline]
#[must_use]
pub fn display_width(text: &str) -> usize {
    if text.is_ascii() && text.bytes().all(|b| (0x20..0x7f).contains(&b)) {
        return text.len();
    }
    text.graphemes(true).map(grapheme_width).sum()
}

fn grapheme_width(grapheme: &str) -> usize {
    UnicodeWidthStr::width(grapheme)
}

/// Longest grapheme-aligned prefix of `text` that fits in `max_width`.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: usize) -> &str {
    let mut byte_end = 0;
    let mut width = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme_width(grapheme);
        if width + w > max_width {
            break;
        }
        width += w;
        byte_end += grapheme.len();
    }
    &text[..byte_end]
}

/// The title as shown on a label: whitespace runs collapsed, then
/// shortened to `max_width` cells with a trailing [`ELLIPSIS`].
#[must_use]
pub fn display_title(title: &str, max_width: usize) -> String {
    let collapsed = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if display_width(&collapsed) <= max_width {
        return collapsed;
    }
    let ellipsis_width = display_width(ELLIPSIS);
    if ellipsis_width >= max_width {
        return truncate_to_width(&collapsed, max_width).to_owned();
    }
    let mut out = truncate_to_width(&collapsed, max_width - ellipsis_width)
        .trim_end()
        .to_owned();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_titles_pass_through() {
        assert_eq!(display_title("Overview", 24), "Overview");
        assert_eq!(display_title("  two   words ", 24), "two words");
        assert_eq!(display_title("", 24), "");
    }

    #[test]
    fn long_titles_get_an_ellipsis() {
        assert_eq!(display_title("Configuration", 8), "Configu…");
        assert_eq!(display_width(&display_title("Configuration", 8)), 8);
        // Trailing space before the ellipsis is dropped.
        assert_eq!(display_title("ab cdef", 4), "ab…");
    }

    #[test]
    fn wide_graphemes_are_never_split() {
        // Each ideograph is two cells wide.
        let title = "設定ファイル";
        assert_eq!(display_width(title), 12);
        let shown = display_title(title, 6);
        assert_eq!(shown, "設定…");
        assert!(display_width(&shown) <= 6);
        assert_eq!(truncate_to_width(title, 3), "設");

        // Combining marks stay with their base.
        assert_eq!(truncate_to_width("e\u{301}x", 1), "e\u{301}");
    }

    #[test]
    fn tiny_budgets_drop_the_ellipsis() {
        assert_eq!(display_title("abc", 1), "a");
        assert_eq!(display_title("abc", 0), "");
    }
}
