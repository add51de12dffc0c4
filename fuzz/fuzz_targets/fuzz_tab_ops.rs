#![no_main]

use arbitrary::Arbitrary;
use ftabs::TabEditor;
use ftabs_widgets::ident::derive_id;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    InsertGroup,
    Create { group: u8 },
    Select { group: u8, tab: u8 },
    Rename { group: u8, tab: u8, title: String },
    Delete { group: u8, tab: u8 },
}

fuzz_target!(|ops: Vec<Op>| {
    let mut editor = TabEditor::default();
    for op in ops.into_iter().take(64) {
        let groups = editor.groups();
        let pick = |g: u8| groups.get(usize::from(g) % groups.len().max(1)).map(|s| s.path.clone());
        let _ = match op {
            Op::InsertGroup => editor.insert_tab_group().map(|_| true),
            Op::Create { group } => match pick(group) {
                Some(path) => editor.create_tab(&path),
                None => Ok(false),
            },
            Op::Select { group, tab } => match pick(group) {
                Some(path) => editor.select_tab(&path, usize::from(tab % 8)),
                None => Ok(false),
            },
            Op::Rename { group, tab, title } => match pick(group) {
                Some(path) => editor.rename_tab(&path, usize::from(tab % 8), &title),
                None => Ok(false),
            },
            Op::Delete { group, tab } => match pick(group) {
                Some(path) => editor.delete_tab(&path, usize::from(tab % 8)),
                None => Ok(false),
            },
        };

        assert_eq!(editor.host().pending_tasks(), 0, "editor left work queued");
        for group in editor.groups() {
            let active = group.tabs.iter().filter(|t| t.active).count();
            assert_eq!(active, 1, "group {} has {active} active tabs", group.path);
            for (ordinal, tab) in group.tabs.iter().enumerate() {
                assert_eq!(tab.id, derive_id("tab", &group.path.child(ordinal * 3)));
            }
        }
    }
});
