//! # Orrery: dependency-graph chart engine
//!
//! Orrery turns a typed dependency-graph document (bundles, components,
//! extension points, contributions and their relations) into an interactive
//! chart: deterministic concentric ring layout per node type, renderable
//! point traces with per-point payloads, and a selection engine that
//! highlights a clicked entity's one-hop neighborhood and annotates it with
//! details.
//!
//! Drawing is delegated to a [`RenderSurface`] supplied by the embedder;
//! the engine owns the graph model, the traces, the selection state, and
//! the annotation set, and emits patches on every interaction.
//!
//! ## Quick Start
//!
//! ```no_run
//! use orrery::{GraphContext, RecordingSurface};
//! use std::path::Path;
//!
//! let mut chart = GraphContext::from_file(Path::new("graph.json"))?;
//! let mut surface = RecordingSurface::default();
//! chart.render(&mut surface);
//!
//! // Click a bundle: its adjacent edges and their targets light up.
//! let entity = orrery::EntityId::Node("Bundle-my.bundle".into());
//! chart.toggle_entity(&mut surface, entity);
//! println!("{} entities selected", chart.selection().entities().len());
//! # Ok::<(), orrery::Error>(())
//! ```

mod annotation;
mod error;
mod layout;
mod loader;
mod selection;
mod style;
mod surface;
mod trace;
mod types;

pub use annotation::{Annotation, arrow_offsets, reconcile_visibility};
pub use error::{Error, Result};
pub use layout::{LayoutOptions, assign_positions};
pub use loader::GraphModel;
pub use selection::SelectionState;
pub use style::UNSELECTED_COLOR;
pub use surface::{ChartLayout, DataPatch, LayoutPatch, RecordingSurface, RenderSurface};
pub use trace::{
    DEFAULT_SUBDIVISION_DEPTH, PointData, Trace, TraceConfig, TraceType, Visibility,
    assemble_traces, edge_trace, node_trace, points_per_edge,
};
pub use types::{
    Edge, EdgeId, EdgeType, EntityId, GraphDocument, GraphKind, Node, NodeCategory, NodeId,
    NodeType,
};

use std::path::Path;

/// Custom chart buttons whose click events the engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartButton {
    /// Remove every selection in one batch.
    ClearSelections,
    /// Toggle unselected-point dimming; `active` is the button state after
    /// the click.
    HighlightUnselected {
        /// Whether dimming is requested.
        active: bool,
    },
}

/// One rendered graph instance: the model, its traces, and all interaction
/// state. Nothing is shared across instances and there is no ambient global
/// lookup; every operation takes the context explicitly.
#[derive(Debug)]
pub struct GraphContext {
    model: GraphModel,
    pub(crate) traces: Vec<Trace>,
    pub(crate) selection: SelectionState,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) dim_unselected: bool,
    pub(crate) click_in_flight: bool,
}

impl GraphContext {
    /// Build a chart context from a loaded model: position the nodes, then
    /// compile the trace sequence.
    #[must_use]
    pub fn new(mut model: GraphModel, options: &LayoutOptions, depth: u32) -> Self {
        assign_positions(&mut model, options);
        let traces = assemble_traces(&model, depth);
        Self {
            model,
            traces,
            selection: SelectionState::default(),
            annotations: Vec::new(),
            dim_unselected: false,
            click_in_flight: false,
        }
    }

    /// Build a chart context from a parsed document with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedGraphType`] for an unrecognized `type`.
    pub fn from_document(document: GraphDocument) -> Result<Self> {
        let model = GraphModel::from_document(document)?;
        Ok(Self::new(
            model,
            &LayoutOptions::default(),
            DEFAULT_SUBDIVISION_DEPTH,
        ))
    }

    /// Build a chart context from a JSON string with default options.
    ///
    /// # Errors
    ///
    /// Returns the parse errors of [`GraphModel::from_json_str`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let model = GraphModel::from_json_str(json)?;
        Ok(Self::new(
            model,
            &LayoutOptions::default(),
            DEFAULT_SUBDIVISION_DEPTH,
        ))
    }

    /// Build a chart context from a JSON file with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataSourceUnavailable`] if the file cannot be read,
    /// plus the parse errors of [`GraphModel::from_json_str`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let model = GraphModel::from_file(path)?;
        Ok(Self::new(
            model,
            &LayoutOptions::default(),
            DEFAULT_SUBDIVISION_DEPTH,
        ))
    }

    /// Draw the whole chart on a surface.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        surface.render(&self.traces, &self.chart_layout());
    }

    /// Chart-level layout: title markup plus mode flags.
    #[must_use]
    pub fn chart_layout(&self) -> ChartLayout {
        let mut title = format!("<b>{}</b>", self.model.title);
        if let Some(description) = &self.model.description {
            title.push_str(&format!("<br><i>{description}</i>"));
        }
        ChartLayout {
            title,
            show_legend: true,
            is_3d: self.is_3d(),
        }
    }

    /// The loaded, positioned model.
    #[must_use]
    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    /// The compiled trace sequence, in its stable assembly order.
    #[must_use]
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// Current selection state.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Current annotation set.
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Whether the chart renders with a z axis.
    #[must_use]
    pub fn is_3d(&self) -> bool {
        self.model.kind.is_3d()
    }

    /// Record an externally toggled trace visibility (legend click).
    ///
    /// Returns `false` when the index names no trace. Callers follow up
    /// with [`GraphContext::handle_visibility_changed`] to sync annotations.
    pub fn set_trace_visibility(&mut self, index: usize, visibility: Visibility) -> bool {
        match self.traces.get_mut(index) {
            Some(trace) => {
                trace.visible = visibility;
                true
            }
            None => false,
        }
    }

    /// React to a trace visibility change: flip annotation visibility to
    /// the OR of each annotation's contributing traces, and relayout if
    /// anything changed. Annotations are never created or destroyed here.
    pub fn handle_visibility_changed(&mut self, surface: &mut dyn RenderSurface) {
        if reconcile_visibility(&mut self.annotations, &self.traces) {
            surface.relayout(&LayoutPatch {
                annotations: Some(self.annotations.clone()),
            });
        }
    }

    /// Dispatch a custom chart button click.
    pub fn handle_button(&mut self, surface: &mut dyn RenderSurface, button: ChartButton) {
        match button {
            ChartButton::ClearSelections => self.clear_selections(surface),
            ChartButton::HighlightUnselected { active } => {
                self.highlight_unselected(surface, !active);
            }
        }
    }
}
