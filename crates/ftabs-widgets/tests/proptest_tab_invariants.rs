#![forbid(unsafe_code)]

//! Property tests for tab groups driven through the editor host.
//!
//! Validates, after every operation and a full drain of deferred work:
//! - every group has exactly one active selector (`checked` agreeing);
//! - selector ids are unique per group and match their derived value;
//! - `Label.for == Panel.parent == Selector.id` for every triplet;
//! - create and delete change the triplet count by exactly one, and deleting
//!   the sole triplet removes the group.

use std::collections::HashSet;

use proptest::prelude::*;

use ftabs_core::{Document, Node, NodeId, Path};
use ftabs_runtime::{EditorView, HitPart, HitTarget, HostConfig};
use ftabs_widgets::group::{groups, selectors, triplet_count};
use ftabs_widgets::ident::derive_id;
use ftabs_widgets::kind::{ATTR_ACTIVE, ATTR_CHECKED, ATTR_FOR, ATTR_ID, ATTR_PARENT, ATTR_TITLE};
use ftabs_widgets::{TabsConfig, TabsExtension, insert_tab_group};

type Host = EditorView<TabsExtension>;

#[derive(Debug, Clone)]
enum Op {
    Create,
    Select(usize),
    Rename(usize, String),
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Create),
        3 => (0usize..8).prop_map(Op::Select),
        2 => (0usize..8, "[a-z ]{1,10}").prop_map(|(k, t)| Op::Rename(k, t)),
        2 => (0usize..8).prop_map(Op::Delete),
    ]
}

fn group_path(host: &Host) -> Option<Path> {
    groups(host.document()).into_iter().next()
}

fn ensure_group(host: &mut Host) -> Path {
    if let Some(path) = group_path(host) {
        return path;
    }
    let tx = insert_tab_group(host.document(), host.selection(), host.extension().config())
        .expect("insertion point always resolves");
    host.dispatch(&tx).expect("fresh group is valid");
    host.run_pending();
    group_path(host).expect("group inserted")
}

fn child_id(doc: &Document, group: &Path, index: usize) -> NodeId {
    doc.node_at(&group.child(index))
        .map(Node::id)
        .expect("child exists")
}

fn check(doc: &Document) -> Result<(), TestCaseError> {
    for group_path in groups(doc) {
        let group = doc.node_at(&group_path).expect("group");
        let active: Vec<bool> = selectors(group)
            .map(|(_, s)| s.bool_attr(ATTR_ACTIVE))
            .collect();
        prop_assert_eq!(active.iter().filter(|a| **a).count(), 1, "active {:?}", active);

        let mut seen = HashSet::new();
        for (index, selector) in selectors(group) {
            let id = selector.str_attr(ATTR_ID);
            let expected = derive_id("tab", &group_path.child(index));
            prop_assert_eq!(id, expected.as_str());
            prop_assert!(seen.insert(id.to_owned()));
            prop_assert_eq!(group.children()[index + 1].str_attr(ATTR_FOR), id);
            prop_assert_eq!(group.children()[index + 2].str_attr(ATTR_PARENT), id);
            prop_assert_eq!(selector.bool_attr(ATTR_CHECKED), selector.bool_attr(ATTR_ACTIVE));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn tab_groups_stay_consistent(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let mut host: Host = EditorView::new(TabsExtension::new(TabsConfig::default()), HostConfig::default());
        for op in &ops {
            let group = ensure_group(&mut host);
            let count = triplet_count(host.document().node_at(&group).expect("group"));
            match op {
                Op::Create => {
                    let create = child_id(host.document(), &group, count * 3);
                    prop_assert!(host.pointer_down(HitTarget::on(create, HitPart::Control)));
                    host.run_pending();
                    let after = host.document().node_at(&group).expect("group");
                    prop_assert_eq!(triplet_count(after), count + 1);
                }
                Op::Select(k) => {
                    let ordinal = k % count;
                    let selector = child_id(host.document(), &group, ordinal * 3);
                    host.pointer_down(HitTarget::on(selector, HitPart::Control));
                    host.run_pending();
                    let after = host.document().node_at(&group).expect("group");
                    prop_assert!(after.children()[ordinal * 3].bool_attr(ATTR_ACTIVE));
                }
                Op::Rename(k, title) => {
                    let ordinal = k % count;
                    let label = child_id(host.document(), &group, ordinal * 3 + 1);
                    host.text_commit(label, title.clone());
                    host.run_pending();
                    let after = host.document().node_at(&group).expect("group");
                    prop_assert_eq!(after.children()[ordinal * 3 + 1].str_attr(ATTR_TITLE), title.as_str());
                    prop_assert_eq!(after.children()[ordinal * 3 + 2].str_attr(ATTR_TITLE), title.as_str());
                }
                Op::Delete(k) => {
                    let ordinal = k % count;
                    let label = child_id(host.document(), &group, ordinal * 3 + 1);
                    prop_assert!(host.pointer_down(HitTarget::on(label, HitPart::DeleteButton)));
                    host.run_pending();
                    match host.document().node_at(&group).filter(|n| n.is("tab_group")) {
                        Some(after) => prop_assert_eq!(triplet_count(after), count - 1),
                        None => prop_assert_eq!(count, 1),
                    }
                }
            }
            prop_assert_eq!(host.pending_tasks(), 0);
            check(host.document())?;
            prop_assert_eq!(host.pointer().listener_count(), labels(host.document()));
        }
    }
}

fn labels(doc: &Document) -> usize {
    let mut count = 0;
    doc.walk(|_, node| {
        if node.is("tab_label") {
            count += 1;
        }
    });
    count
}
