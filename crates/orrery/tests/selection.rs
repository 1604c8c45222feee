//! Integration tests for selection propagation and annotation lifecycle.
//!
//! These drive the public `GraphContext` API with a recording surface and
//! verify the propagation rules: one-hop cascades, the derived-edge
//! target-only asymmetry, round-trip idempotence, and the atomic clear.

use orrery::{EntityId, GraphContext, RecordingSurface};
use proptest::prelude::*;

/// A two-node chart.
///
/// ```text
///   A (BUNDLE) --REQUIRES--> B (COMPONENT)
/// ```
///
/// Assembled trace order: 0 bundle nodes, 1 REQUIRES edges, 2 component
/// nodes, 3 SOFT_REQUIRES edges, 4 extension points, 5 contributions,
/// 6 REFERENCES edges, 7-12 containment node traces (one per type),
/// 13 containment edges.
fn two_node_chart() -> GraphContext {
    GraphContext::from_json_str(
        r#"{
            "type": "BASIC_LAYOUT",
            "title": "two nodes",
            "nodes": [
                {"id": "A", "type": "BUNDLE", "label": "bundle a"},
                {"id": "B", "type": "COMPONENT", "label": "component b"}
            ],
            "edges": [
                {"source": "A", "target": "B", "value": "REQUIRES"}
            ]
        }"#,
    )
    .expect("chart should load")
}

/// A three-node chain: selecting `A` must never reach `C`.
///
/// ```text
///   A --E0--> B --E1--> C      (all REQUIRES)
/// ```
fn chain_chart() -> GraphContext {
    GraphContext::from_json_str(
        r#"{
            "type": "BASIC_LAYOUT",
            "title": "chain",
            "nodes": [
                {"id": "A", "type": "BUNDLE", "label": "a"},
                {"id": "B", "type": "BUNDLE", "label": "b"},
                {"id": "C", "type": "BUNDLE", "label": "c"}
            ],
            "edges": [
                {"source": "A", "target": "B", "value": "REQUIRES"},
                {"source": "B", "target": "C", "value": "REQUIRES"}
            ]
        }"#,
    )
    .expect("chart should load")
}

fn node(id: &str) -> EntityId {
    EntityId::Node(id.into())
}

fn edge(id: &str) -> EntityId {
    EntityId::Edge(id.into())
}

/// Everything the round-trip invariant ranges over.
fn snapshot(chart: &GraphContext) -> (Vec<EntityId>, Vec<Vec<usize>>, Vec<orrery::Annotation>) {
    (
        chart.selection().entities().to_vec(),
        chart
            .traces()
            .iter()
            .map(|t| t.selected_indexes.clone())
            .collect(),
        chart.annotations().to_vec(),
    )
}

#[test]
fn selecting_a_node_selects_adjacent_edge_and_its_target() {
    let mut chart = two_node_chart();
    let mut surface = RecordingSurface::default();

    chart.toggle_entity(&mut surface, node("A"));

    let selection = chart.selection();
    assert!(selection.contains(&node("A")));
    assert!(selection.contains(&edge("Edge0-REQUIRES")));
    assert!(selection.contains(&node("B")));

    // full point block for the edge, single points for the nodes
    let traces = chart.traces();
    assert_eq!(traces[0].selected_indexes, vec![0]);
    assert_eq!(traces[1].selected_indexes.len(), orrery::points_per_edge(4));
    assert_eq!(traces[2].selected_indexes, vec![0]);

    // one annotation per cascade step
    assert_eq!(chart.annotations().len(), 3);
    assert_eq!(surface.update_calls, 1);
}

#[test]
fn toggling_twice_restores_prior_state_exactly() {
    let mut chart = two_node_chart();
    let mut surface = RecordingSurface::default();
    let before = snapshot(&chart);

    chart.toggle_entity(&mut surface, node("A"));
    assert_ne!(snapshot(&chart), before);
    chart.toggle_entity(&mut surface, node("A"));

    assert_eq!(snapshot(&chart), before);
    assert!(chart.selection().is_empty());
    assert!(chart.annotations().is_empty());
}

#[test]
fn cascade_is_bounded_to_one_hop() {
    let mut chart = chain_chart();
    let mut surface = RecordingSurface::default();

    chart.toggle_entity(&mut surface, node("A"));

    let selection = chart.selection();
    assert!(selection.contains(&node("A")));
    assert!(selection.contains(&edge("Edge0-REQUIRES")));
    assert!(selection.contains(&node("B")));
    // B's own links are not auto-expanded
    assert!(!selection.contains(&edge("Edge1-REQUIRES")));
    assert!(!selection.contains(&node("C")));
}

#[test]
fn clicking_an_edge_selects_both_endpoints() {
    let mut chart = chain_chart();
    let mut surface = RecordingSurface::default();

    chart.toggle_entity(&mut surface, edge("Edge0-REQUIRES"));

    let selection = chart.selection();
    assert!(selection.contains(&edge("Edge0-REQUIRES")));
    assert!(selection.contains(&node("A")));
    assert!(selection.contains(&node("B")));
    assert!(!selection.contains(&node("C")));
}

#[test]
fn annotation_records_every_contributing_trace() {
    let mut chart = two_node_chart();
    let mut surface = RecordingSurface::default();

    chart.toggle_entity(&mut surface, node("A"));

    // A maps into the primary bundle trace and the containment bundle trace
    let annotation = chart
        .annotations()
        .iter()
        .find(|a| a.trace_indexes.contains(&0))
        .expect("annotation for A");
    assert_eq!(annotation.trace_indexes, vec![0, 7]);
    // anchored once, at the primary trace's point
    assert!(annotation.visible);
}

#[test]
fn annotation_visibility_follows_trace_visibility_or() {
    let mut chart = two_node_chart();
    let mut surface = RecordingSurface::default();

    chart.toggle_entity(&mut surface, node("A"));

    // hide the primary bundle trace; the containment copy is LegendOnly,
    // so no contributing trace renders anymore
    assert!(chart.set_trace_visibility(0, orrery::Visibility::Hidden));
    chart.handle_visibility_changed(&mut surface);
    let annotation = chart
        .annotations()
        .iter()
        .find(|a| a.trace_indexes.contains(&0))
        .expect("annotation for A");
    assert!(!annotation.visible);
    assert_eq!(surface.relayout_calls, 1);

    // turning the containment copy on resurrects the label
    assert!(chart.set_trace_visibility(7, orrery::Visibility::Visible));
    chart.handle_visibility_changed(&mut surface);
    let annotation = chart
        .annotations()
        .iter()
        .find(|a| a.trace_indexes.contains(&0))
        .expect("annotation for A");
    assert!(annotation.visible);

    // no change, no relayout
    chart.handle_visibility_changed(&mut surface);
    assert_eq!(surface.relayout_calls, 2);
}

#[test]
fn clear_resets_everything_in_one_update() {
    let mut chart = two_node_chart();
    let mut surface = RecordingSurface::default();

    chart.toggle_entity(&mut surface, node("A"));
    let updates_before = surface.update_calls;

    chart.clear_selections(&mut surface);

    assert!(chart.selection().is_empty());
    assert!(chart.annotations().is_empty());
    assert!(chart.traces().iter().all(|t| t.selected_indexes.is_empty()));
    assert_eq!(surface.update_calls, updates_before + 1);

    let data = surface.last_data.expect("clear sends a data patch");
    assert!(
        data.selected_indexes
            .expect("selected indexes cleared")
            .iter()
            .all(Vec::is_empty)
    );
}

#[test]
fn highlight_dims_points_outside_the_selection() {
    let mut chart = two_node_chart();
    let mut surface = RecordingSurface::default();

    chart.toggle_entity(&mut surface, node("A"));
    chart.highlight_unselected(&mut surface, false);

    // REQUIRES trace is fully selected, so it keeps its original colors
    let traces = chart.traces();
    assert_eq!(traces[1].colors, traces[1].original_colors);
    // the untouched containment edge trace dims entirely
    assert!(
        traces[13]
            .colors
            .iter()
            .all(|c| c == orrery::UNSELECTED_COLOR)
    );

    // restoring brings back the baseline everywhere
    chart.highlight_unselected(&mut surface, true);
    for trace in chart.traces() {
        assert_eq!(trace.colors, trace.original_colors);
    }
}

#[test]
fn unreferenced_entity_is_a_noop() {
    let mut chart = two_node_chart();
    let mut surface = RecordingSurface::default();
    let before = snapshot(&chart);

    chart.toggle_entity(&mut surface, node("ghost"));

    assert_eq!(snapshot(&chart), before);
}

/// Strategy: a small random graph plus the entity to toggle.
fn arbitrary_chart() -> impl Strategy<Value = (String, usize, usize)> {
    (2usize..6, 1usize..8).prop_flat_map(|(node_count, edge_count)| {
        let types = ["BUNDLE", "COMPONENT", "EXTENSION_POINT", "CONTRIBUTION"];
        let values = ["REQUIRES", "SOFT_REQUIRES", "REFERENCES", "CONTAINS"];
        (
            proptest::collection::vec(0usize..types.len(), node_count),
            proptest::collection::vec(
                (0usize..node_count, 0usize..node_count, 0usize..values.len()),
                edge_count,
            ),
            0usize..(node_count + edge_count),
        )
            .prop_map(move |(node_types, edges, pick)| {
                let nodes: Vec<String> = node_types
                    .iter()
                    .enumerate()
                    .map(|(i, &t)| {
                        format!(r#"{{"id": "n{i}", "type": "{}", "label": "n{i}"}}"#, types[t])
                    })
                    .collect();
                let edge_docs: Vec<String> = edges
                    .iter()
                    .map(|&(s, t, v)| {
                        format!(
                            r#"{{"source": "n{s}", "target": "n{t}", "value": "{}"}}"#,
                            values[v]
                        )
                    })
                    .collect();
                let json = format!(
                    r#"{{"type": "BASIC_LAYOUT", "title": "p", "nodes": [{}], "edges": [{}]}}"#,
                    nodes.join(","),
                    edge_docs.join(",")
                );
                (json, pick, node_types.len())
            })
    })
}

proptest! {
    /// Round-trip idempotence over arbitrary small graphs: toggling any
    /// entity twice restores the selected set, every trace's selected
    /// indexes, and the annotation set.
    #[test]
    fn toggle_roundtrip_is_identity((json, pick, node_count) in arbitrary_chart()) {
        let mut chart = GraphContext::from_json_str(&json).unwrap();
        let mut surface = RecordingSurface::default();

        let entity = if pick < node_count {
            EntityId::Node(orrery::NodeId(format!("n{pick}")))
        } else {
            let edge = &chart.model().edges()[pick - node_count];
            EntityId::Edge(edge.id.clone())
        };

        let before = snapshot(&chart);
        chart.toggle_entity(&mut surface, entity.clone());
        chart.toggle_entity(&mut surface, entity);
        prop_assert_eq!(snapshot(&chart), before);
    }
}
