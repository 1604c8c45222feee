//! The rendering surface seam.
//!
//! The engine never draws anything itself: it hands traces, layout, and
//! incremental patches to a [`RenderSurface`] implementation owned by the
//! embedder (a plotting widget, a canvas binding, a test double). The trait
//! mirrors the three operations every interaction reduces to: a full
//! (re)draw, a partial data+layout update restricted to named traces, and a
//! layout-only patch.

use crate::annotation::Annotation;
use crate::trace::Trace;

/// Chart-level layout handed to the surface on a full render.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    /// Chart title, with the document description folded in when present.
    pub title: String,
    /// Whether the legend is shown.
    pub show_legend: bool,
    /// Whether the chart renders with a z axis.
    pub is_3d: bool,
}

/// Partial per-trace data update.
///
/// Each field, when set, carries one entry per patched trace, in the same
/// order as the `trace_indices` passed alongside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPatch {
    /// New selected point indices per trace.
    pub selected_indexes: Option<Vec<Vec<usize>>>,
    /// New per-point colors per trace.
    pub colors: Option<Vec<Vec<String>>>,
}

/// Partial layout update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPatch {
    /// Full replacement annotation set, when changed.
    pub annotations: Option<Vec<Annotation>>,
}

/// A black-box drawing engine consuming point arrays and patches.
pub trait RenderSurface {
    /// Draw (or redraw) the whole chart.
    fn render(&mut self, traces: &[Trace], layout: &ChartLayout);

    /// Apply a partial re-render restricted to the named trace indices.
    fn update(&mut self, data: &DataPatch, layout: &LayoutPatch, trace_indices: &[usize]);

    /// Apply a layout-only patch (annotation visibility flips).
    fn relayout(&mut self, layout: &LayoutPatch);
}

/// A [`RenderSurface`] that records the calls it receives.
///
/// Useful both as a test double and for embedders that want to buffer
/// patches before forwarding them to a real drawing engine.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    /// Number of full renders received.
    pub render_calls: usize,
    /// Number of partial updates received.
    pub update_calls: usize,
    /// Number of layout-only patches received.
    pub relayout_calls: usize,
    /// Most recent data patch.
    pub last_data: Option<DataPatch>,
    /// Most recent layout patch (from `update` or `relayout`).
    pub last_layout: Option<LayoutPatch>,
    /// Trace indices named by the most recent update.
    pub last_trace_indices: Vec<usize>,
}

impl RenderSurface for RecordingSurface {
    fn render(&mut self, _traces: &[Trace], _layout: &ChartLayout) {
        self.render_calls += 1;
    }

    fn update(&mut self, data: &DataPatch, layout: &LayoutPatch, trace_indices: &[usize]) {
        self.update_calls += 1;
        self.last_data = Some(data.clone());
        self.last_layout = Some(layout.clone());
        self.last_trace_indices = trace_indices.to_vec();
    }

    fn relayout(&mut self, layout: &LayoutPatch) {
        self.relayout_calls += 1;
        self.last_layout = Some(layout.clone());
    }
}
