//! Property-based tests for session store operations.
//!
//! For any sequence of store operations the session stays consistent: the
//! active pointer is `None` exactly when there are no tabs and otherwise
//! names an open tab, ids are unique and never handed out twice, and the
//! sidebar width stays in range.

use std::collections::HashSet;
use std::sync::Arc;

use pookie_session::{NewTab, SessionStore, TabPatch, Theme};
use pookie_storage::MemoryStore;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum StoreOp {
    Add { incognito: bool },
    Close(usize),
    Duplicate(usize),
    Switch(usize),
    SwitchUnknown,
    Retitle(usize, String),
    Width(i64),
    Theme(u8),
}

fn arb_ops() -> impl Strategy<Value = Vec<StoreOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => any::<bool>().prop_map(|incognito| StoreOp::Add { incognito }),
            3 => (0..16usize).prop_map(StoreOp::Close),
            2 => (0..16usize).prop_map(StoreOp::Duplicate),
            2 => (0..16usize).prop_map(StoreOp::Switch),
            1 => Just(StoreOp::SwitchUnknown),
            2 => ((0..16usize), "[A-Za-z ]{0,12}").prop_map(|(i, t)| StoreOp::Retitle(i, t)),
            1 => (-2000i64..2000).prop_map(StoreOp::Width),
            1 => (0u8..3).prop_map(StoreOp::Theme),
        ],
        1..60,
    )
}

fn pick(store: &SessionStore, index: usize) -> Option<String> {
    let tabs = store.tabs();
    if tabs.is_empty() {
        None
    } else {
        Some(tabs[index % tabs.len()].id.clone())
    }
}

fn apply(store: &SessionStore, op: &StoreOp) -> Option<String> {
    match op {
        StoreOp::Add { incognito } => {
            Some(store.add_tab(NewTab::default().incognito(*incognito)))
        }
        StoreOp::Close(i) => {
            if let Some(id) = pick(store, *i) {
                store.close_tab(&id);
            }
            None
        }
        StoreOp::Duplicate(i) => pick(store, *i).and_then(|id| store.duplicate_tab(&id)),
        StoreOp::Switch(i) => {
            if let Some(id) = pick(store, *i) {
                store.switch_tab(&id);
            }
            None
        }
        StoreOp::SwitchUnknown => {
            store.switch_tab("no-such-tab");
            None
        }
        StoreOp::Retitle(i, title) => {
            if let Some(id) = pick(store, *i) {
                store.update_tab(&id, TabPatch::default().with_title(title.clone()));
            }
            None
        }
        StoreOp::Width(w) => {
            store.set_sidebar_width(*w);
            None
        }
        StoreOp::Theme(t) => {
            let theme = match t {
                0 => Theme::Dark,
                1 => Theme::Light,
                _ => Theme::Frosted,
            };
            store.set_theme(theme);
            None
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invariants_hold_after_every_operation(ops in arb_ops()) {
        let store = SessionStore::new(Arc::new(MemoryStore::new()), false);
        let mut issued: HashSet<String> = store.tabs().into_iter().map(|t| t.id).collect();

        for op in &ops {
            let before = store.session();
            let created = apply(&store, op);
            let session = store.session();

            prop_assert!(session.is_consistent(), "after {:?}: {:?}", op, session);
            prop_assert_eq!(session.active_id.is_none(), session.tabs.is_empty());

            if let Some(id) = created {
                prop_assert!(issued.insert(id.clone()), "id {} handed out twice", id);
                prop_assert_eq!(session.tabs.last().map(|t| t.id.clone()), Some(id.clone()));
                prop_assert_eq!(session.active_id.clone(), Some(id));
                prop_assert_eq!(session.tabs.len(), before.tabs.len() + 1);
            }
        }
    }

    #[test]
    fn closing_the_active_tab_prefers_next_then_previous(len in 1usize..8, active in 0usize..8) {
        let store = SessionStore::new(Arc::new(MemoryStore::new()), false);
        for _ in 1..len {
            store.add_tab(NewTab::default());
        }
        let ids: Vec<String> = store.tabs().into_iter().map(|t| t.id).collect();
        let active = active % len;
        store.switch_tab(&ids[active]);

        store.close_tab(&ids[active]);

        let expected = if active + 1 < len {
            Some(ids[active + 1].clone())
        } else if active > 0 {
            Some(ids[active - 1].clone())
        } else {
            None
        };
        prop_assert_eq!(store.active_id(), expected);
    }

    #[test]
    fn snapshot_round_trips(ops in arb_ops()) {
        let memory = MemoryStore::new();
        let store = SessionStore::new(Arc::new(memory.clone()), false);
        for op in &ops {
            apply(&store, op);
        }
        prop_assume!(!store.tabs().is_empty());
        store.flush();

        let restored = SessionStore::new(Arc::new(memory), false);
        restored.load();

        let saved = store.session();
        let loaded = restored.session();
        prop_assert_eq!(loaded.tabs, saved.tabs);
        prop_assert_eq!(loaded.active_id, saved.active_id);
        prop_assert_eq!(loaded.sidebar_width, saved.sidebar_width);
        prop_assert_eq!(loaded.theme, saved.theme);
    }
}
