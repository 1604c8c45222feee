//! Domain types for the dependency-graph chart.
//!
//! These types represent the core model:
//! - **Document**: `GraphDocument`, `Node`, `Edge` (deserialized input)
//! - **Classification**: `NodeType`, `EdgeType`, `NodeCategory`, `GraphKind`
//! - **Identity**: `NodeId`, `EdgeId`, `EntityId`
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Node/edge types | Enum not String | Exhaustive matches; unknown types fail at parse time |
//! | Edge ids | Synthesized at load | Input edges carry none; selection needs stable keys |
//! | `EntityId` | Tagged Node/Edge variant | Selection cascades over both; no stringly-typed dispatch |
//! | Positions | Plain fields, written once | Layout is deterministic; no interior mutability needed |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::style;

// ============================================================================
// Strongly-typed id wrappers
// ============================================================================

/// A strongly-typed node id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// View the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A strongly-typed edge id.
///
/// Edge ids are synthesized by the loader as `"Edge{ordinal}-{value}"` and
/// never change afterward; the input document does not carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    /// View the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Either a node id or an edge id.
///
/// Selection cascades hop between nodes and edges, so reference maps and the
/// selected set are keyed by this tagged id rather than a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// A node entity.
    Node(NodeId),
    /// An edge entity.
    Edge(EdgeId),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Node(id) => id.fmt(f),
            EntityId::Edge(id) => id.fmt(f),
        }
    }
}

// ============================================================================
// Classification enums
// ============================================================================

/// Rendering mode declared by the input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    /// Flat radial layout.
    Basic2d,
    /// Radial layout with node types stacked on z levels.
    Basic3d,
}

impl GraphKind {
    /// Map a document `type` field to a graph kind, if recognized.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "BASIC_LAYOUT" => Some(GraphKind::Basic2d),
            "BASIC_LAYOUT_3D" => Some(GraphKind::Basic3d),
            _ => None,
        }
    }

    /// Whether this kind renders with a z axis.
    #[must_use]
    pub fn is_3d(self) -> bool {
        matches!(self, GraphKind::Basic3d)
    }
}

/// Kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    /// A deployable software bundle.
    Bundle,
    /// A runtime component declared by a bundle.
    Component,
    /// A service exposed by a component.
    Service,
    /// An extension point opened by a component.
    ExtensionPoint,
    /// A contribution targeting an extension point.
    Contribution,
    /// A distribution package grouping bundles.
    Package,
}

impl NodeType {
    /// Every node type, in layout order (inner rings first).
    pub const ALL: [NodeType; 6] = [
        NodeType::Bundle,
        NodeType::Component,
        NodeType::Service,
        NodeType::ExtensionPoint,
        NodeType::Contribution,
        NodeType::Package,
    ];

    /// Fixed layout level: the ring radius and, in 3D, the z height.
    ///
    /// Levels start at one; the origin is reserved for the pinned root.
    /// Services and extension points share a ring on purpose: both hang off
    /// components and read best side by side.
    #[must_use]
    pub fn level(self) -> f64 {
        match self {
            NodeType::Bundle => 1.0,
            NodeType::Component => 2.0,
            NodeType::Service | NodeType::ExtensionPoint => 3.0,
            NodeType::Contribution => 4.0,
            NodeType::Package => 6.0,
        }
    }

    /// Legend label for a trace of this node type.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            NodeType::Bundle => "Bundles",
            NodeType::Component => "Components",
            NodeType::Service => "Services",
            NodeType::ExtensionPoint => "Extension Points",
            NodeType::Contribution => "Contributions",
            NodeType::Package => "Packages",
        }
    }

    /// Marker symbol name understood by the rendering surface.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            NodeType::Bundle => "diamond",
            NodeType::Component => "square",
            NodeType::Service => "diamond-open",
            NodeType::ExtensionPoint => "cross",
            NodeType::Contribution => "circle",
            NodeType::Package => "square-open",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Bundle => "BUNDLE",
            NodeType::Component => "COMPONENT",
            NodeType::Service => "SERVICE",
            NodeType::ExtensionPoint => "EXTENSION_POINT",
            NodeType::Contribution => "CONTRIBUTION",
            NodeType::Package => "PACKAGE",
        };
        f.write_str(name)
    }
}

/// Kind of relation an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    /// Hard bundle requirement.
    Requires,
    /// Component-level requirement.
    SoftRequires,
    /// Contribution to an extension point.
    References,
    /// Containment hierarchy.
    Contains,
}

impl EdgeType {
    /// Legend label for a trace of this edge type.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EdgeType::Requires => "Requires Bundle",
            EdgeType::SoftRequires => "Requires Component",
            EdgeType::References => "Contributes to Extension Point",
            EdgeType::Contains => "Contains",
        }
    }

    /// Line/marker color for this relation kind.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            EdgeType::Requires => style::EDGE_REQUIRES_COLOR,
            EdgeType::SoftRequires => style::EDGE_SOFT_REQUIRES_COLOR,
            EdgeType::References => style::EDGE_REFERENCES_COLOR,
            EdgeType::Contains => style::EDGE_CONTAINS_COLOR,
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeType::Requires => "REQUIRES",
            EdgeType::SoftRequires => "SOFT_REQUIRES",
            EdgeType::References => "REFERENCES",
            EdgeType::Contains => "CONTAINS",
        };
        f.write_str(name)
    }
}

/// Coarse platform category of a node, driving its marker color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeCategory {
    /// Runtime-level node.
    #[default]
    Runtime,
    /// Core platform node.
    Core,
    /// Platform feature node.
    Platform,
    /// Customization/studio node.
    Studio,
}

impl NodeCategory {
    /// Marker color sampled from the category color ramp.
    #[must_use]
    pub fn color(self) -> &'static str {
        let value = match self {
            NodeCategory::Runtime => 0.0,
            NodeCategory::Core => 1.0,
            NodeCategory::Platform => 2.0,
            NodeCategory::Studio => 3.0,
        };
        style::color_from_scale(value)
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeCategory::Runtime => "RUNTIME",
            NodeCategory::Core => "CORE",
            NodeCategory::Platform => "PLATFORM",
            NodeCategory::Studio => "STUDIO",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Document entities
// ============================================================================

/// A graph node as parsed from the input document.
///
/// Immutable after layout: the position fields are written exactly once by
/// the layout engine, everything else comes straight from the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Stable node id from the document.
    pub id: NodeId,
    /// Node classification.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Human-readable label.
    pub label: String,
    /// Relative importance; scales the marker size.
    #[serde(default)]
    pub weight: u32,
    /// Platform category; drives the marker color.
    #[serde(default)]
    pub category: NodeCategory,
    /// X coordinate, assigned by layout.
    #[serde(default)]
    pub x: f64,
    /// Y coordinate, assigned by layout.
    #[serde(default)]
    pub y: f64,
    /// Z coordinate, assigned by layout in 3D mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Node {
    /// Marker size for this node's weight (unweighted nodes get a floor size).
    #[must_use]
    pub fn marker_size(&self) -> f64 {
        if self.weight > 0 {
            f64::from(self.weight) * style::NODE_WEIGHT_SIZE_FACTOR
        } else {
            style::NODE_WEIGHT_SIZE_FACTOR
        }
    }
}

/// A directed relation between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Synthesized id; empty until the loader assigns one.
    #[serde(default)]
    pub id: EdgeId,
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
    /// Relation kind.
    pub value: EdgeType,
}

/// The raw input document: a typed node/edge list plus chart metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphDocument {
    /// Graph type name; must map to a [`GraphKind`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Chart title.
    pub title: String,
    /// Optional chart subtitle.
    #[serde(default)]
    pub description: Option<String>,
    /// Nodes, in document order (ordinal position matters for layout).
    pub nodes: Vec<Node>,
    /// Edges, in document order (ordinal position seeds the edge ids).
    pub edges: Vec<Edge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_kind_parses_known_types() {
        assert_eq!(GraphKind::parse("BASIC_LAYOUT"), Some(GraphKind::Basic2d));
        assert_eq!(GraphKind::parse("BASIC_LAYOUT_3D"), Some(GraphKind::Basic3d));
        assert_eq!(GraphKind::parse("CIRCULAR"), None);
    }

    #[test]
    fn node_type_deserializes_screaming_snake_case() {
        let t: NodeType = serde_json::from_str("\"EXTENSION_POINT\"").unwrap();
        assert_eq!(t, NodeType::ExtensionPoint);
    }

    #[test]
    fn service_and_extension_point_share_a_ring() {
        assert_eq!(
            NodeType::Service.level(),
            NodeType::ExtensionPoint.level()
        );
    }

    #[test]
    fn unweighted_node_gets_floor_marker_size() {
        let node: Node = serde_json::from_str(
            r#"{"id": "n1", "type": "BUNDLE", "label": "n1"}"#,
        )
        .unwrap();
        assert_eq!(node.weight, 0);
        assert!(node.marker_size() > 0.0);
    }
}
