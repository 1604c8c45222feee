//! Selection propagation and highlight state.
//!
//! Selection is a toggle state machine over entity ids. A user-initiated
//! toggle cascades exactly one hop across the link graph: a node expands to
//! its adjacent edges, an edge to its endpoint nodes. Entities reached by
//! the hop never cascade further, so a single click can never flood-fill
//! the whole graph.
//!
//! One asymmetry is inherited from the product behavior: an edge reached
//! *via* a node hop toggles only its target endpoint, highlighting the
//! direction of dependency instead of re-expanding the neighborhood around
//! the source.
//!
//! Every cascade works on a scratch copy of the per-trace selected-index
//! lists and the annotation set, then commits both in a single surface
//! update. Toggling the same entity twice restores the selected set, every
//! trace's selected indexes, and the annotation set exactly.

use tracing::{debug, warn};

use crate::GraphContext;
use crate::annotation::{Annotation, arrow_offsets};
use crate::style;
use crate::surface::{DataPatch, LayoutPatch, RenderSurface};
use crate::trace::{PointData, TraceType};
use crate::types::EntityId;

/// The set of currently selected entity ids.
///
/// Kept in insertion order for predictable logs; membership toggling is
/// idempotent (add then remove returns exactly to the prior state).
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: Vec<EntityId>,
}

impl SelectionState {
    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether the entity is currently selected.
    #[must_use]
    pub fn contains(&self, entity: &EntityId) -> bool {
        self.selected.contains(entity)
    }

    /// Selected entities in insertion order.
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.selected
    }

    /// Flip membership; returns `true` when the entity was selected before
    /// (the step is a deselect).
    fn toggle(&mut self, entity: &EntityId) -> bool {
        if let Some(position) = self.selected.iter().position(|e| e == entity) {
            self.selected.remove(position);
            true
        } else {
            self.selected.push(entity.clone());
            false
        }
    }

    fn clear(&mut self) {
        self.selected.clear();
    }
}

/// Scratch state for one selection cascade, committed atomically at the end.
struct CascadeUpdate {
    trace_updates: Vec<Vec<usize>>,
    annotations: Vec<Annotation>,
}

/// Everything the cascade learned about an entity from the first trace
/// referencing it: the representative point, its payload, and the set of
/// contributing trace indices.
struct SelectionInfo {
    x: f64,
    y: f64,
    z: Option<f64>,
    visible: bool,
    trace_indexes: Vec<usize>,
    payload: PointData,
    color: String,
    is_flat_edge: bool,
}

/// Pure per-step index update: returns the new selected-index list after
/// applying one entity's reference block.
fn apply_toggle(current: &[usize], refs: &[usize], deselecting: bool) -> Vec<usize> {
    if deselecting {
        current
            .iter()
            .copied()
            .filter(|index| !refs.contains(index))
            .collect()
    } else {
        let mut next = current.to_vec();
        next.extend_from_slice(refs);
        next
    }
}

impl GraphContext {
    /// Handle a point click from the rendering surface.
    ///
    /// Guarded against re-entrant clicks: a redraw can emit a secondary
    /// click event for the same gesture before the first finished, which
    /// would double-toggle the entity.
    pub fn handle_point_click(&mut self, surface: &mut dyn RenderSurface, point: &PointData) {
        self.toggle_entity(surface, point.entity());
    }

    /// Toggle an entity by bare id, as external selectors (and the click
    /// handler) do, cascading one hop and committing in one surface update.
    pub fn toggle_entity(&mut self, surface: &mut dyn RenderSurface, entity: EntityId) {
        if self.click_in_flight {
            debug!(entity = %entity, "overlapping click ignored");
            return;
        }
        self.click_in_flight = true;

        let mut update = CascadeUpdate {
            trace_updates: self
                .traces
                .iter()
                .map(|trace| trace.selected_indexes.clone())
                .collect(),
            annotations: self.annotations.clone(),
        };
        self.propagate(&mut update, entity, true);

        for (trace, indexes) in self.traces.iter_mut().zip(&update.trace_updates) {
            trace.selected_indexes.clone_from(indexes);
        }
        self.annotations = update.annotations;

        let trace_indices: Vec<usize> = (0..self.traces.len()).collect();
        let data = DataPatch {
            selected_indexes: Some(update.trace_updates),
            colors: self
                .dim_unselected
                .then(|| self.highlight_colors(false)),
        };
        if let Some(colors) = &data.colors {
            for (trace, colors) in self.traces.iter_mut().zip(colors) {
                trace.colors.clone_from(colors);
            }
        }
        let layout = LayoutPatch {
            annotations: Some(self.annotations.clone()),
        };
        surface.update(&data, &layout, &trace_indices);

        self.click_in_flight = false;
    }

    /// One cascade step: toggle membership, patch every referencing trace,
    /// create or remove the annotation, then hop.
    fn propagate(&mut self, update: &mut CascadeUpdate, entity: EntityId, initial: bool) {
        let deselecting = self.selection.toggle(&entity);
        debug!(entity = %entity, initial, deselecting, "selection step");

        let mut info: Option<SelectionInfo> = None;
        for (trace_index, trace) in self.traces.iter().enumerate() {
            let Some(indexes) = trace.reference.get(&entity) else {
                continue;
            };
            match info.as_mut() {
                None => info = self.selection_info(trace_index, indexes),
                // an id mapped into several traces anchors once but depends
                // on every contributing trace for visibility
                Some(info) => info.trace_indexes.push(trace_index),
            }
            update.trace_updates[trace_index] =
                apply_toggle(&update.trace_updates[trace_index], indexes, deselecting);
        }

        let Some(info) = info else {
            // no trace references the id; undo the membership flip so the
            // event is a true no-op
            warn!(entity = %entity, "selection event for unreferenced entity");
            self.selection.toggle(&entity);
            return;
        };

        if deselecting {
            remove_annotation(&mut update.annotations, &info);
        } else {
            update.annotations.push(build_annotation(self.is_3d(), &info));
        }

        // One-hop bound: only the initial, user-initiated step cascades;
        // derived steps stop here (except the edge-to-target asymmetry).
        match (&info.payload, initial) {
            (PointData::Node { links, .. }, true) => {
                for edge_id in links.clone() {
                    self.propagate(update, EntityId::Edge(edge_id), false);
                }
            }
            (PointData::Edge { links, .. }, true) => {
                for node_id in links.clone() {
                    self.propagate(update, EntityId::Node(node_id), false);
                }
            }
            (PointData::Edge { links, .. }, false) => {
                // derived edge step: highlight the dependency direction only
                let target = links[1].clone();
                self.propagate(update, EntityId::Node(target), false);
            }
            (PointData::Node { .. }, false) => {}
        }
    }

    /// Snapshot the representative point of `indexes` within a trace.
    ///
    /// Nodes anchor at their single point; edges at the middle sample of
    /// their subdivided block, so the callout sits at the edge's center
    /// rather than an endpoint.
    fn selection_info(&self, trace_index: usize, indexes: &[usize]) -> Option<SelectionInfo> {
        let trace = &self.traces[trace_index];
        let index = match trace.trace_type {
            TraceType::Node => *indexes.first()?,
            TraceType::Edge => *indexes.get((indexes.len() / 2 + 1).min(indexes.len() - 1))?,
        };
        Some(SelectionInfo {
            x: trace.x[index],
            y: trace.y[index],
            z: trace.z.as_ref().map(|z| z[index]),
            visible: trace.is_visible(),
            trace_indexes: vec![trace_index],
            payload: trace.customdata[index].clone(),
            color: trace.original_colors[index].clone(),
            is_flat_edge: trace.is_flat_edge,
        })
    }

    /// Remove every selection in one atomic batch: reset the selected set,
    /// clear all selected indexes, drop all annotations, restore original
    /// colors, and commit with a single surface update.
    pub fn clear_selections(&mut self, surface: &mut dyn RenderSurface) {
        self.selection.clear();
        for trace in &mut self.traces {
            trace.selected_indexes.clear();
            trace.colors.clone_from(&trace.original_colors);
        }
        self.annotations.clear();
        self.dim_unselected = false;

        let trace_indices: Vec<usize> = (0..self.traces.len()).collect();
        let data = DataPatch {
            selected_indexes: Some(vec![Vec::new(); self.traces.len()]),
            colors: Some(
                self.traces
                    .iter()
                    .map(|trace| trace.original_colors.clone())
                    .collect(),
            ),
        };
        let layout = LayoutPatch {
            annotations: Some(Vec::new()),
        };
        surface.update(&data, &layout, &trace_indices);
    }

    /// Toggle unselected-point dimming.
    ///
    /// With `do_highlight` false, points outside the selection render in the
    /// unselected color; with it true, every trace restores its original
    /// color baseline.
    pub fn highlight_unselected(&mut self, surface: &mut dyn RenderSurface, do_highlight: bool) {
        self.dim_unselected = !do_highlight;
        let colors = self.highlight_colors(do_highlight);
        for (trace, colors) in self.traces.iter_mut().zip(&colors) {
            trace.colors.clone_from(colors);
        }
        let trace_indices: Vec<usize> = (0..self.traces.len()).collect();
        let data = DataPatch {
            selected_indexes: None,
            colors: Some(colors),
        };
        surface.update(&data, &LayoutPatch::default(), &trace_indices);
    }

    fn highlight_colors(&self, do_highlight: bool) -> Vec<Vec<String>> {
        self.traces
            .iter()
            .map(|trace| {
                if do_highlight {
                    trace.original_colors.clone()
                } else if trace.selected_indexes.is_empty() {
                    vec![style::UNSELECTED_COLOR.to_string(); trace.len()]
                } else {
                    trace
                        .original_colors
                        .iter()
                        .enumerate()
                        .map(|(index, color)| {
                            if trace.selected_indexes.contains(&index) {
                                color.clone()
                            } else {
                                style::UNSELECTED_COLOR.to_string()
                            }
                        })
                        .collect()
                }
            })
            .collect()
    }
}

fn build_annotation(is_3d: bool, info: &SelectionInfo) -> Annotation {
    let is_edge = matches!(info.payload, PointData::Edge { .. });
    let (ax, ay) = arrow_offsets(is_3d, is_edge, info.is_flat_edge);
    let text_color = if is_edge { "black" } else { "white" };
    Annotation {
        x: info.x,
        y: info.y,
        z: info.z,
        ax,
        ay,
        text: info.payload.annotation().to_string(),
        background: info.color.clone(),
        text_color: text_color.to_string(),
        visible: info.visible,
        trace_indexes: info.trace_indexes.clone(),
    }
}

fn remove_annotation(annotations: &mut Vec<Annotation>, info: &SelectionInfo) {
    let Some(position) = annotations
        .iter()
        .position(|a| a.anchored_at(info.x, info.y, info.z))
    else {
        warn!("no annotation anchored at deselected point");
        return;
    };
    annotations.remove(position);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_toggle_roundtrips() {
        let base = vec![7, 9];
        let selected = apply_toggle(&base, &[1, 2, 3], false);
        assert_eq!(selected, vec![7, 9, 1, 2, 3]);
        let restored = apply_toggle(&selected, &[1, 2, 3], true);
        assert_eq!(restored, base);
    }

    #[test]
    fn apply_toggle_leaves_inputs_untouched() {
        let base = vec![4];
        let _ = apply_toggle(&base, &[4], true);
        assert_eq!(base, vec![4]);
    }

    #[test]
    fn selection_state_toggle_is_involutive() {
        let mut state = SelectionState::default();
        let entity = EntityId::Node("n1".into());
        assert!(!state.toggle(&entity));
        assert!(state.contains(&entity));
        assert!(state.toggle(&entity));
        assert!(state.is_empty());
    }
}
