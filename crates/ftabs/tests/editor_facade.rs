#![forbid(unsafe_code)]

//! Facade-level behavior: markup in and out, config layering, errors.

use std::cell::Cell;
use std::rc::Rc;

use ftabs::prelude::*;
use ftabs::{RecoveryAction, TabView};

const TWO_TABS: &str = concat!(
    "<p>intro</p>",
    r#"<div class="tabs">"#,
    r#"<input class="radiotab" type="radio" name="tabs" id="tab_1_0"/>"#,
    r#"<label class="label" for="tab_1_0">Overview</label>"#,
    r#"<div class="panel" parent="tab_1_0" title="Overview"><p>first</p></div>"#,
    r#"<input class="radiotab" type="radio" name="tabs" id="tab_1_3"/>"#,
    r#"<label class="label" for="tab_1_3">Details</label>"#,
    r#"<div class="panel" parent="tab_1_3"><p>second</p></div>"#,
    r#"<button class="tab-create" style="display: none">+</button>"#,
    r#"</div>"#
);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn loading_markup_settles_the_document() {
    init_tracing();
    let editor = TabEditor::with_markup(Config::default(), TWO_TABS).expect("parse");
    let groups = editor.groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].path, Path::from(vec![1]));
    let active: Vec<bool> = groups[0].tabs.iter().map(|t| t.active).collect();
    assert_eq!(active, vec![true, false]);

    let markup = editor.to_markup();
    assert!(markup.contains(r#"id="tab_1_0" active="" checked="""#));
    let again = TabEditor::with_markup(Config::default(), &markup).expect("reparse");
    assert_eq!(again.to_markup(), markup);
}

#[test]
fn insert_after_caret_block() {
    let mut editor = TabEditor::with_markup(Config::default(), TWO_TABS).expect("parse");
    editor
        .host_mut()
        .set_selection(Selection::inside(Path::from(vec![0])));
    let group = editor.insert_tab_group().expect("insert");
    assert_eq!(group, Path::from(vec![1]));

    let groups = editor.groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1].path, Path::from(vec![2]));
    assert_eq!(groups[1].tabs[1].id, "tab_2_3");
    assert_eq!(groups[0].tabs[0].id, "tab_1_0");
    assert!(groups.iter().all(|g| g.tabs.iter().filter(|t| t.active).count() == 1));
}

#[test]
fn config_file_shapes_the_editor() {
    let config = Config::from_toml_str(concat!(
        "[host]\neditable = false\n",
        "[tabs]\nid_prefix = \"pane\"\ndefault_title = \"Untitled\"\nmax_title_width = 4\n",
    ))
    .expect("parse")
    .validated()
    .expect("valid");

    let mut editor = TabEditor::new(config);
    let group = editor.insert_tab_group().expect("insert");
    assert!(editor.create_tab(&group).expect("create"));
    let tabs = &editor.groups()[0].tabs;
    assert_eq!(tabs[1].id, "pane_0_3");
    assert_eq!(tabs[1].title, "Untitled");

    let host = editor.host();
    assert!(!host.editable());
    assert_eq!(host.pointer().listener_count(), 0);
    let label = editor
        .document()
        .node_at(&group.child(1))
        .map(|n| n.id())
        .expect("label");
    let binding = host
        .view(label)
        .and_then(TabView::as_label)
        .expect("label view");
    assert_eq!(binding.display_title(), "Unt…");
}

#[test]
fn failed_load_keeps_document() {
    let mut editor = TabEditor::with_markup(Config::default(), TWO_TABS).expect("parse");
    let before = editor.to_markup();
    let err = editor
        .load_markup(r#"<div class="tabs"><button class="tab-create">+</button></div>"#)
        .expect_err("grammar violation");
    assert_eq!(err.recovery(), RecoveryAction::KeepDocument);
    assert_eq!(err.error_type(), "markup");
    assert_eq!(editor.to_markup(), before);
}

#[test]
fn snapshots_follow_commits() {
    let mut editor = TabEditor::default();
    let commits = Rc::new(Cell::new(0));
    let _sub = editor.subscribe({
        let commits = Rc::clone(&commits);
        move |_| commits.set(commits.get() + 1)
    });
    let group = editor.insert_tab_group().expect("insert");
    // The insert plus the deferred seeding.
    assert_eq!(commits.get(), 2);
    assert!(editor.rename_tab(&group, 0, "Only").expect("rename"));
    assert_eq!(commits.get(), 3);
    assert!(editor.delete_tab(&group, 0).expect("delete"));
    assert!(editor.groups().is_empty());
}

#[test]
fn empty_title_survives_reload() {
    let mut editor = TabEditor::default();
    let group = editor.insert_tab_group().expect("insert");
    assert!(editor.rename_tab(&group, 0, "").expect("rename"));
    assert_eq!(editor.groups()[0].tabs[0].title, "");

    let markup = editor.to_markup();
    let reloaded = TabEditor::with_markup(Config::default(), &markup).expect("reparse");
    assert_eq!(reloaded.groups()[0].tabs[0].title, "");
    assert_eq!(reloaded.to_markup(), markup);
}
