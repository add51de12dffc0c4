#![no_main]

use ftabs_widgets::text::{display_title, display_width, truncate_to_width};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&width, rest)) = data.split_first() else {
        return;
    };
    let Ok(title) = std::str::from_utf8(rest) else {
        return;
    };
    if title.len() > 4096 {
        return;
    }
    let max_width = usize::from(width % 64);

    let truncated = truncate_to_width(title, max_width);
    assert!(title.starts_with(truncated), "truncation must be a prefix");
    assert!(display_width(truncated) <= max_width);

    let shown = display_title(title, max_width);
    assert!(display_width(&shown) <= max_width, "{shown:?} wider than {max_width}");
    assert!(!shown.starts_with(' ') && !shown.ends_with(' '));
});
