//! Tab lifecycle invariants exercised over long pseudo-random operation
//! sequences, plus the close-neighbor rules.

mod common;

use common::{Lcg, code_cell, markdown_cell};
use pedagent::content::{ContentVariant, DropOutcome, DropRejection, SwapOutcome};
use pedagent::{CloseOutcome, TabEvent, TabId, TabManager, VariantKind};

fn assert_invariants(mgr: &TabManager) {
    assert!(mgr.tab_count() >= 1, "tab list must never be empty");
    let active = mgr.active_tab_id();
    assert!(
        mgr.tabs().iter().any(|t| t.id == active),
        "active tab {active} must be a member of the tab list"
    );
    for tab in mgr.tabs() {
        assert!(
            !tab.slot.variant().is_torn_down(),
            "tab {} holds a torn-down variant",
            tab.id
        );
    }
}

fn random_tab(mgr: &TabManager, rng: &mut Lcg) -> TabId {
    let idx = rng.below(mgr.tab_count() as u64) as usize;
    mgr.tabs()[idx].id
}

#[test]
fn test_random_create_close_sequences_keep_invariants() {
    for seed in 0..50 {
        let mut rng = Lcg::new(seed);
        let mut mgr = TabManager::new();

        for _ in 0..200 {
            match rng.below(6) {
                0 | 1 => {
                    mgr.create_tab();
                }
                2 | 3 => {
                    let id = random_tab(&mgr, &mut rng);
                    mgr.close_tab(id);
                }
                4 => {
                    let id = random_tab(&mgr, &mut rng);
                    mgr.switch_active_tab(id);
                }
                _ => {
                    let id = random_tab(&mgr, &mut rng);
                    let index = rng.below(20) as usize;
                    mgr.drop_on_tab(id, &code_cell(&format!("cell-{index}")), index);
                }
            }
            assert_invariants(&mgr);
        }
    }
}

#[test]
fn test_tab_order_only_changes_by_removal() {
    let mut rng = Lcg::new(7);
    let mut mgr = TabManager::new();
    let mut expected: Vec<TabId> = vec![mgr.active_tab_id()];

    for _ in 0..300 {
        if rng.below(3) == 0 && mgr.tab_count() > 1 {
            let id = random_tab(&mgr, &mut rng);
            mgr.close_tab(id);
            expected.retain(|t| *t != id);
        } else if rng.below(2) == 0 {
            let id = random_tab(&mgr, &mut rng);
            mgr.switch_active_tab(id);
        } else {
            expected.push(mgr.create_tab());
        }
        let actual: Vec<TabId> = mgr.tabs().iter().map(|t| t.id).collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn test_closing_neighbor_rules() {
    // Closing index i > 0 activates i - 1.
    let mut mgr = TabManager::new();
    let ids: Vec<TabId> = std::iter::once(mgr.active_tab_id())
        .chain((0..4).map(|_| mgr.create_tab()))
        .collect();
    mgr.switch_active_tab(ids[3]);
    assert_eq!(
        mgr.close_tab(ids[3]),
        CloseOutcome::Removed {
            closed: ids[3],
            activated: ids[2]
        }
    );

    // Closing index 0 activates what was index 1.
    mgr.switch_active_tab(ids[0]);
    mgr.close_tab(ids[0]);
    assert_eq!(mgr.active_tab_id(), ids[1]);
    assert_eq!(mgr.active_tab_index(), 0);
}

#[test]
fn test_closing_sole_tab_resets_to_agent() {
    let mut mgr = TabManager::new();
    let id = mgr.active_tab_id();
    mgr.drop_on_tab(id, &markdown_cell("notes"), 4);
    assert_eq!(mgr.active_tab().label, "Markdown-4");

    assert_eq!(mgr.close_tab(id), CloseOutcome::Reset(id));
    assert_eq!(mgr.tab_count(), 1);
    assert_eq!(mgr.active_tab_id(), id);
    assert_eq!(mgr.active_tab().variant_kind(), VariantKind::Agent);

    // Drops are accepted again after the reset.
    assert_eq!(
        mgr.drop_on_tab(id, &code_cell("again"), 1),
        Some(DropOutcome::Accepted)
    );
}

#[test]
fn test_activation_change_is_a_single_event() {
    let mut mgr = TabManager::new();
    let first = mgr.active_tab_id();
    let second = mgr.create_tab();
    mgr.drain_events();

    mgr.switch_active_tab(first);
    let events = mgr.drain_events();
    assert_eq!(
        events,
        vec![TabEvent::ActiveChanged {
            previous: Some(second),
            current: first
        }]
    );

    // Re-activating the active tab emits nothing.
    mgr.switch_active_tab(first);
    assert!(mgr.drain_events().is_empty());
}

#[test]
fn test_swap_twice_with_same_instance() {
    let mut mgr = TabManager::new();
    let id = mgr.active_tab_id();
    let fresh = ContentVariant::empty(mgr.variant_ids_mut());
    let duplicate = fresh.clone();

    match mgr.swap_content(id, fresh) {
        Some(SwapOutcome::Swapped(outgoing)) => {
            assert_eq!(outgoing.kind(), VariantKind::Agent);
            assert!(outgoing.is_torn_down());
        }
        other => panic!("first swap should succeed, got {other:?}"),
    }
    assert!(matches!(
        mgr.swap_content(id, duplicate),
        Some(SwapOutcome::Rejected)
    ));
    assert_eq!(mgr.active_tab().variant_kind(), VariantKind::Empty);
    assert!(!mgr.active_tab().slot.variant().is_torn_down());
}

#[test]
fn test_duplicate_drop_from_one_gesture() {
    let mut mgr = TabManager::new();
    let id = mgr.active_tab_id();
    let payload = code_cell("c1");
    assert_eq!(mgr.drop_on_tab(id, &payload, 0), Some(DropOutcome::Accepted));
    assert_eq!(
        mgr.drop_on_tab(id, &payload, 0),
        Some(DropOutcome::Rejected(DropRejection::NotAccepting))
    );
    assert_eq!(mgr.drop_on_tab(999, &payload, 0), None);
}
