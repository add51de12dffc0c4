#![no_main]

use ftabs::{Config, TabEditor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 8192 {
        return;
    }

    // Loading must never panic; rejected markup is fine.
    let Ok(editor) = TabEditor::with_markup(Config::default(), text) else {
        return;
    };

    for group in editor.groups() {
        assert!(!group.tabs.is_empty(), "group without tabs at {}", group.path);
        // Seeding guarantees one; duplicate markers in the input are kept.
        let active = group.tabs.iter().filter(|t| t.active).count();
        assert!(active >= 1, "settled group {} has no active tab", group.path);
    }

    // Settled output is a fixed point.
    let markup = editor.to_markup();
    let again = TabEditor::with_markup(Config::default(), &markup).expect("own output parses");
    assert_eq!(again.to_markup(), markup);
});
