//! Trace construction: graph slices compiled into renderable point groups.
//!
//! A trace is one entity-type/edge-type slice of the graph flattened into
//! parallel per-point sequences, plus a reference map from entity id to the
//! point indices representing it. Node traces carry one point per node.
//!
//! Edge traces do not emit line segments: the rendering surface's line
//! primitives cannot carry independent per-segment hover text or selectable
//! sub-regions. Each edge's source-to-target span is instead subdivided by
//! repeated midpoint bisection into a fixed block of sample points, and
//! every per-edge scalar (color, payload) is replicated across the block so
//! each sample point carries the full edge semantics.
//!
//! Trace assembly order is significant: the trace's position in the output
//! vector is used as a first-class key for selection and annotation
//! visibility bookkeeping. Callers must not reorder traces.

use std::collections::HashMap;

use crate::loader::GraphModel;
use crate::style;
use crate::types::{Edge, EdgeId, EdgeType, EntityId, Node, NodeId, NodeType};

/// Default number of bisection levels for edge sample blocks.
pub const DEFAULT_SUBDIVISION_DEPTH: u32 = 4;

/// Number of interior sample points one edge contributes at a given depth.
#[must_use]
pub fn points_per_edge(depth: u32) -> usize {
    (1 << depth) - 1
}

/// Whether a trace renders nodes or edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceType {
    /// One point per node.
    Node,
    /// A block of interpolated sample points per edge.
    Edge,
}

/// Trace visibility, mirroring the rendering surface's three-valued flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Drawn and listed in the legend.
    #[default]
    Visible,
    /// Not drawn.
    Hidden,
    /// Listed in the legend but not drawn until toggled on.
    LegendOnly,
}

/// Per-point payload attached to every rendered point.
///
/// The payload is what a click event hands back to the selection engine, so
/// it carries the entity id, the hover annotation text, and the one-hop
/// links to cascade over.
#[derive(Debug, Clone, PartialEq)]
pub enum PointData {
    /// Payload of a node point.
    Node {
        /// Owning node id.
        id: NodeId,
        /// Hover/annotation text.
        annotation: String,
        /// Adjacent outgoing edge ids, for selection propagation.
        links: Vec<EdgeId>,
    },
    /// Payload of an edge sample point.
    Edge {
        /// Owning edge id.
        id: EdgeId,
        /// Hover/annotation text.
        annotation: String,
        /// Endpoint node ids as `[source, target]`.
        links: [NodeId; 2],
    },
}

impl PointData {
    /// The entity this point belongs to.
    #[must_use]
    pub fn entity(&self) -> EntityId {
        match self {
            PointData::Node { id, .. } => EntityId::Node(id.clone()),
            PointData::Edge { id, .. } => EntityId::Edge(id.clone()),
        }
    }

    /// Hover/annotation text for this point.
    #[must_use]
    pub fn annotation(&self) -> &str {
        match self {
            PointData::Node { annotation, .. } | PointData::Edge { annotation, .. } => annotation,
        }
    }
}

/// Per-trace options recognized by the builders.
#[derive(Debug, Clone, Default)]
pub struct TraceConfig {
    /// Legend group this trace toggles with.
    pub legend_group: Option<String>,
    /// Initial visibility; defaults to visible.
    pub visible: Visibility,
    /// Whether edge annotations should treat this trace's edges as flat
    /// (drawn within a single ring rather than across tiers).
    pub is_flat_edge: bool,
}

impl TraceConfig {
    fn for_group(group: &str) -> Self {
        Self {
            legend_group: Some(group.to_string()),
            ..Self::default()
        }
    }
}

/// A renderable group of points for one slice of the graph.
#[derive(Debug, Clone)]
pub struct Trace {
    /// Legend name.
    pub name: String,
    /// Whether this is a node or an edge trace.
    pub trace_type: TraceType,
    /// X coordinates, one per point.
    pub x: Vec<f64>,
    /// Y coordinates, one per point.
    pub y: Vec<f64>,
    /// Z coordinates in 3D mode, one per point.
    pub z: Option<Vec<f64>>,
    /// Per-point payload, parallel to the coordinate sequences.
    pub customdata: Vec<PointData>,
    /// Per-point marker symbols.
    pub symbols: Vec<&'static str>,
    /// Per-point marker sizes.
    pub sizes: Vec<f64>,
    /// Current per-point colors; mutated by highlight mode.
    pub colors: Vec<String>,
    /// Marker outline color; node markers carry a fixed dark outline.
    pub marker_line_color: Option<&'static str>,
    /// Immutable color baseline used to restore state after highlighting.
    pub original_colors: Vec<String>,
    /// Entity id to the ordered point indices representing it.
    pub reference: HashMap<EntityId, Vec<usize>>,
    /// Point indices currently highlighted by selection.
    pub selected_indexes: Vec<usize>,
    /// Current visibility; toggled externally via legend interactions.
    pub visible: Visibility,
    /// Legend group, shared-toggle key on the rendering surface.
    pub legend_group: Option<String>,
    /// Flat-edge flag for annotation arrow placement.
    pub is_flat_edge: bool,
}

impl Trace {
    /// Number of points in this trace.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the trace holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Whether the trace currently renders.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible == Visibility::Visible
    }
}

fn node_annotation(node: &Node) -> String {
    format!(
        "<b>{}</b><br />Type: {}<br />Category: {}<br />Weight: {}",
        node.label, node.node_type, node.category, node.weight
    )
}

fn edge_annotation(edge: &Edge, source: &Node, target: &Node) -> String {
    format!(
        "{}<br /><b>{}</b><br />{}",
        source.label, edge.value, target.label
    )
}

/// Build a node trace for the nodes matching `filter` (all nodes if `None`).
///
/// Point order follows the model's node order; `reference[node.id]` holds
/// the single point index for that node.
#[must_use]
pub fn node_trace(
    model: &GraphModel,
    filter: Option<NodeType>,
    config: TraceConfig,
) -> Trace {
    let is_3d = model.kind.is_3d();
    let nodes: Vec<&Node> = model
        .nodes()
        .iter()
        .filter(|node| filter.is_none_or(|t| node.node_type == t))
        .collect();

    let reference = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (EntityId::Node(node.id.clone()), vec![index]))
        .collect();
    let colors: Vec<String> = nodes
        .iter()
        .map(|node| node.category.color().to_string())
        .collect();
    let customdata = nodes
        .iter()
        .map(|node| PointData::Node {
            id: node.id.clone(),
            annotation: node_annotation(node),
            links: model.adjacent_edges(&node.id).to_vec(),
        })
        .collect();

    Trace {
        name: filter.map_or("Nodes".to_string(), |t| t.label().to_string()),
        trace_type: TraceType::Node,
        x: nodes.iter().map(|node| node.x).collect(),
        y: nodes.iter().map(|node| node.y).collect(),
        z: is_3d.then(|| nodes.iter().map(|node| node.z.unwrap_or_default()).collect()),
        symbols: nodes.iter().map(|node| node.node_type.symbol()).collect(),
        sizes: nodes.iter().map(|node| node.marker_size()).collect(),
        original_colors: colors.clone(),
        colors,
        marker_line_color: Some(style::NODE_MARKER_LINE_COLOR),
        customdata,
        reference,
        selected_indexes: Vec::new(),
        visible: config.visible,
        legend_group: config.legend_group,
        is_flat_edge: config.is_flat_edge,
    }
}

/// Build an edge trace for the edges matching `filter` (all edges if `None`).
///
/// Each edge contributes exactly `2^depth - 1` interior sample points;
/// `reference[edge.id]` is the contiguous block of its point indices.
#[must_use]
pub fn edge_trace(
    model: &GraphModel,
    filter: Option<EdgeType>,
    depth: u32,
    config: TraceConfig,
) -> Trace {
    let is_3d = model.kind.is_3d();
    // Endpoints resolve against the positioned model; the pairing keeps
    // reference blocks contiguous even if a malformed edge is dropped.
    let edges: Vec<(&Edge, &Node, &Node)> = model
        .edges()
        .iter()
        .filter(|edge| filter.is_none_or(|t| edge.value == t))
        .filter_map(|edge| {
            let source = model.node(&edge.source)?;
            let target = model.node(&edge.target)?;
            Some((edge, source, target))
        })
        .collect();
    let block = points_per_edge(depth);

    let mut x = Vec::with_capacity(edges.len() * block);
    let mut y = Vec::with_capacity(edges.len() * block);
    let mut z = is_3d.then(|| Vec::with_capacity(edges.len() * block));
    let mut customdata = Vec::with_capacity(edges.len() * block);
    let mut colors = Vec::with_capacity(edges.len() * block);
    let mut reference = HashMap::with_capacity(edges.len());

    for (ordinal, &(edge, source, target)) in edges.iter().enumerate() {
        subdivide(source.x, target.x, depth, &mut x);
        subdivide(source.y, target.y, depth, &mut y);
        if let Some(z) = z.as_mut() {
            subdivide(
                source.z.unwrap_or_default(),
                target.z.unwrap_or_default(),
                depth,
                z,
            );
        }

        // Replicate per-edge scalars so every sample point carries the full
        // edge payload.
        let payload = PointData::Edge {
            id: edge.id.clone(),
            annotation: edge_annotation(edge, source, target),
            links: [edge.source.clone(), edge.target.clone()],
        };
        customdata.extend(std::iter::repeat_n(payload, block));
        let color = edge.value.color().to_string();
        colors.extend(std::iter::repeat_n(color, block));

        let start = ordinal * block;
        reference.insert(
            EntityId::Edge(edge.id.clone()),
            (start..start + block).collect(),
        );
    }

    Trace {
        name: filter.map_or("Edges".to_string(), |t| t.label().to_string()),
        trace_type: TraceType::Edge,
        symbols: vec![style::edge_marker_symbol(is_3d); x.len()],
        sizes: vec![style::edge_marker_size(is_3d); x.len()],
        original_colors: colors.clone(),
        colors,
        marker_line_color: None,
        x,
        y,
        z,
        customdata,
        reference,
        selected_indexes: Vec::new(),
        visible: config.visible,
        legend_group: config.legend_group,
        is_flat_edge: config.is_flat_edge,
    }
}

/// Recursive midpoint bisection of the `a..b` span, `depth` levels deep.
///
/// The overall midpoint is emitted first, then the left half's samples,
/// then the right half's. Selection relies on this recursion order when it
/// picks an edge's representative point, so it must not change.
fn subdivide(a: f64, b: f64, depth: u32, out: &mut Vec<f64>) {
    if depth == 0 {
        return;
    }
    let mid = f64::midpoint(a, b);
    out.push(mid);
    subdivide(a, mid, depth - 1, out);
    subdivide(mid, b, depth - 1, out);
}

/// Assemble the full trace sequence for a loaded, positioned model.
///
/// Primary relation traces come first, grouped the way the runtime relates
/// entities; the containment hierarchy follows as a `LegendOnly` group the
/// user opts into. The returned order is a stable contract.
#[must_use]
pub fn assemble_traces(model: &GraphModel, depth: u32) -> Vec<Trace> {
    let flat = |group: &str| TraceConfig {
        is_flat_edge: true,
        ..TraceConfig::for_group(group)
    };

    let mut traces = vec![
        node_trace(model, Some(NodeType::Bundle), TraceConfig::for_group("bundles")),
        edge_trace(model, Some(EdgeType::Requires), depth, flat("bundles")),
        node_trace(
            model,
            Some(NodeType::Component),
            TraceConfig::for_group("components"),
        ),
        edge_trace(model, Some(EdgeType::SoftRequires), depth, flat("components")),
        node_trace(
            model,
            Some(NodeType::ExtensionPoint),
            TraceConfig::for_group("xps"),
        ),
        node_trace(
            model,
            Some(NodeType::Contribution),
            TraceConfig::for_group("xps"),
        ),
        edge_trace(
            model,
            Some(EdgeType::References),
            depth,
            TraceConfig::for_group("xps"),
        ),
    ];

    // Containment duplicates every node type so the hierarchy can be
    // explored in isolation; hidden behind the legend until requested.
    let contains = || TraceConfig {
        legend_group: Some("contains".to_string()),
        visible: Visibility::LegendOnly,
        is_flat_edge: false,
    };
    for node_type in NodeType::ALL {
        traces.push(node_trace(model, Some(node_type), contains()));
    }
    traces.push(edge_trace(model, Some(EdgeType::Contains), depth, contains()));

    traces
}
