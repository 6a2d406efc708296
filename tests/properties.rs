//! Property tests over generated documents: small graphs with random
//! triggers, random edges, and edges to a node that does not exist, plus a
//! messier variant with repeated names, odd positions and rejected types.

#[allow(dead_code)]
mod helpers;

use std::collections::HashSet;

use flowcheck::Validator;
use flowcheck::classify::KnownTypes;
use flowcheck::options::RepairOptions;
use flowcheck::parse::types::{Position, Workflow};
use flowcheck::report::Report;
use flowcheck::validate_and_repair;
use helpers::*;
use proptest::prelude::*;

fn arb_workflow() -> impl Strategy<Value = Workflow> {
    (1usize..=8)
        .prop_flat_map(|n| {
            (
                proptest::collection::vec(prop::bool::weighted(0.2), n),
                // A target index of `n` stands for "Ghost".
                proptest::collection::vec((0..n, 0..=n), 0..=12),
            )
        })
        .prop_map(|(is_trigger, edges)| {
            let n = is_trigger.len();
            let names: Vec<String> = (0..n).map(|i| format!("N{}", i)).collect();
            let nodes = names
                .iter()
                .zip(&is_trigger)
                .map(|(name, &t)| if t { trigger(name) } else { action(name) })
                .collect();
            let edges: Vec<(String, String)> = edges
                .into_iter()
                .map(|(s, t)| {
                    let target = names.get(t).cloned().unwrap_or_else(|| "Ghost".into());
                    (names[s].clone(), target)
                })
                .collect();
            let edges: Vec<(&str, &str)> =
                edges.iter().map(|(s, t)| (s.as_str(), t.as_str())).collect();
            workflow(nodes, &edges)
        })
}

fn arb_position() -> impl Strategy<Value = Option<Position>> {
    prop_oneof![
        Just(None),
        (-2i32..=2, -2i32..=2)
            .prop_map(|(x, y)| Some(Position(200.0 * x as f64, 100.0 * y as f64))),
        Just(Some(Position(-1e20, 1e20))),
    ]
}

fn arb_node_type() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("http".to_string())),
        Just(Some("custom".to_string())),
    ]
}

/// Repeated names, missing or far-off positions, and node types a
/// `KnownTypes(["http"])` classifier rejects.
fn arb_messy_workflow() -> impl Strategy<Value = Workflow> {
    (1usize..=8)
        .prop_flat_map(|n| {
            (
                proptest::collection::vec(
                    (0..n, prop::bool::weighted(0.2), arb_position(), arb_node_type()),
                    n,
                ),
                proptest::collection::vec((0..n, 0..=n), 0..=12),
            )
        })
        .prop_map(|(specs, edges)| {
            let names: Vec<String> = specs.iter().map(|(k, ..)| format!("N{}", k)).collect();
            let nodes = specs
                .iter()
                .zip(&names)
                .enumerate()
                .map(|(i, ((_, is_trigger, _, node_type), name))| {
                    let mut node = if *is_trigger { trigger(name) } else { action(name) };
                    node.id = format!("id-{}", i);
                    node.node_type = node_type.clone();
                    node
                })
                .collect();
            let edges: Vec<(String, String)> = edges
                .into_iter()
                .map(|(s, t)| {
                    let target = names.get(t).cloned().unwrap_or_else(|| "Ghost".into());
                    (names[s].clone(), target)
                })
                .collect();
            let edges: Vec<(&str, &str)> =
                edges.iter().map(|(s, t)| (s.as_str(), t.as_str())).collect();
            let mut wf = workflow(nodes, &edges);
            for (node, (_, _, position, _)) in wf.nodes.iter_mut().zip(&specs) {
                node.position = *position;
            }
            wf
        })
}

fn trigger_ids(wf: &Workflow) -> HashSet<String> {
    wf.nodes
        .iter()
        .filter(|n| n.is_trigger())
        .map(|n| n.id.clone())
        .collect()
}

/// A report that claims validity must describe a valid graph.
fn valid_means_sound(report: &Report) -> bool {
    !report.is_valid
        || (all_references_resolve(&report.document)
            && is_acyclic(&report.document)
            && all_reachable_from_triggers(&report.document))
}

fn generous() -> RepairOptions {
    RepairOptions::with_max_iterations(64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn repair_yields_a_valid_graph(wf in arb_workflow()) {
        let report = validate_and_repair(&wf, &generous()).unwrap();
        prop_assert!(report.is_valid, "{:?}\n{:?}", report.issues, report.warnings);
        prop_assert!(all_references_resolve(&report.document));
        prop_assert!(is_acyclic(&report.document));
        prop_assert!(all_reachable_from_triggers(&report.document));
    }

    #[test]
    fn repair_never_removes_nodes(wf in arb_workflow()) {
        let report = validate_and_repair(&wf, &generous()).unwrap();
        prop_assert!(node_ids(&wf).is_subset(&node_ids(&report.document)));
        prop_assert!(report.document.nodes.len() <= wf.nodes.len() + 1);
    }

    #[test]
    fn repair_is_idempotent(wf in arb_workflow()) {
        let first = validate_and_repair(&wf, &generous()).unwrap();
        let second = validate_and_repair(&first.document, &generous()).unwrap();
        prop_assert!(second.fixes.is_empty(), "{:?}", second.fixes);
        prop_assert_eq!(second.document, first.document);
    }

    #[test]
    fn validate_only_never_changes_the_document(wf in arb_workflow()) {
        let report = validate_and_repair(&wf, &RepairOptions::validate_only()).unwrap();
        prop_assert!(report.fixes.is_empty());
        prop_assert_eq!(report.metadata.iterations, 0);
        prop_assert_eq!(report.document, wf);
    }

    #[test]
    fn reports_are_deterministic(wf in arb_workflow()) {
        let a = validate_and_repair(&wf, &generous()).unwrap();
        let b = validate_and_repair(&wf, &generous()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn default_options_terminate_soundly(wf in arb_workflow()) {
        let report = validate_and_repair(&wf, &RepairOptions::default()).unwrap();
        prop_assert!(valid_means_sound(&report));
        prop_assert!(node_ids(&wf).is_subset(&node_ids(&report.document)));
    }

    #[test]
    fn messy_documents_terminate_soundly(wf in arb_messy_workflow()) {
        let validator = Validator::with_classifier(KnownTypes::new(["http"]));
        let report = validator.validate_and_repair(&wf, &RepairOptions::default()).unwrap();
        prop_assert!(valid_means_sound(&report));
        prop_assert!(node_ids(&wf).is_subset(&node_ids(&report.document)));
        prop_assert!(trigger_ids(&wf).is_subset(&trigger_ids(&report.document)));
        for node in &report.document.nodes {
            if let Some(p) = node.position {
                prop_assert!(p.0.is_finite() && p.1.is_finite());
            }
        }
    }

    #[test]
    fn messy_documents_repair_with_room(wf in arb_messy_workflow()) {
        let validator = Validator::with_classifier(KnownTypes::new(["http"]));
        let report = validator.validate_and_repair(&wf, &generous()).unwrap();
        prop_assert!(report.is_valid, "{:?}\n{:?}", report.issues, report.warnings);
        prop_assert!(valid_means_sound(&report));
    }
}
