//! Deterministic radial layout.
//!
//! Nodes are grouped by type and each group is spread evenly around a circle
//! whose radius is the type's fixed level, so the same document always lays
//! out to bit-identical coordinates. There is deliberately no force
//! simulation and no randomness: the chart must look the same on every
//! render for visual diffing and user muscle memory.
//!
//! In 3D mode each type ring additionally sits at its level on the z axis,
//! stacking the rings into concentric tiers.

use std::f64::consts::TAU;

use tracing::{debug, trace};

use crate::loader::GraphModel;
use crate::types::{EdgeType, NodeId, NodeType};

/// Layout tuning knobs.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Root entity pinned at the origin, overriding its type ring.
    /// Pinning silently no-ops when the id is absent from the graph.
    pub root_id: Option<NodeId>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            root_id: Some(NodeId::from("Bundle-root")),
        }
    }
}

/// Assign positions to every node in the model, in place.
///
/// Each position field is written exactly once. After placement, any
/// `REQUIRES` edge targeting the pinned root is dropped from the edge set:
/// anchored at the center, those edges would visually dominate the chart.
pub fn assign_positions(model: &mut GraphModel, options: &LayoutOptions) {
    let is_3d = model.kind.is_3d();
    let root_id = options
        .root_id
        .as_ref()
        .filter(|id| model.contains_node(id))
        .cloned();

    for node_type in NodeType::ALL {
        // Original ordinal order within the group keeps the ring placement
        // stable across reloads of the same document.
        let group: Vec<usize> = model
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| node.node_type == node_type)
            .filter(|(_, node)| Some(&node.id) != root_id.as_ref())
            .map(|(index, _)| index)
            .collect();
        if group.is_empty() {
            // Empty groups produce no placement calls.
            continue;
        }

        let radius = node_type.level();
        let total = group.len();
        for (position, &index) in group.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let angle = TAU * position as f64 / total as f64;
            let node = &mut model.nodes_mut()[index];
            node.x = radius * angle.cos();
            node.y = radius * angle.sin();
            if is_3d {
                node.z = Some(node_type.level());
            }
            trace!(id = %node.id, x = node.x, y = node.y, "node placed");
        }
        debug!(node_type = %node_type, count = total, radius, "ring placed");
    }

    if let Some(root_id) = root_id {
        let root_level = model
            .node(&root_id)
            .map(|node| node.node_type.level())
            .unwrap_or_default();
        for node in model.nodes_mut() {
            if node.id == root_id {
                node.x = 0.0;
                node.y = 0.0;
                if is_3d {
                    node.z = Some(root_level);
                }
                break;
            }
        }
    }

    // Requirements on the centered root would all converge on the origin.
    if let Some(root_id) = options.root_id.clone() {
        model.retain_edges(|edge| edge.value != EdgeType::Requires || edge.target != root_id);
    }
}
