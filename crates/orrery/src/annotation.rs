//! Floating label callouts attached to selected points.
//!
//! Annotations are keyed by the coordinates of the point they decorate, not
//! by entity id: two entities can coincide in position, and the selection
//! cascade creates exactly one callout per path step. An annotation records
//! every trace index that contributed its anchor so its visibility can
//! follow the logical OR of those traces' visibility.

use crate::trace::Trace;

/// A floating label anchored to a rendered point's coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Anchor x coordinate.
    pub x: f64,
    /// Anchor y coordinate.
    pub y: f64,
    /// Anchor z coordinate in 3D mode.
    pub z: Option<f64>,
    /// Arrow tail x offset, in pixels from the anchor.
    pub ax: f64,
    /// Arrow tail y offset, in pixels from the anchor.
    pub ay: f64,
    /// Label text (the point's hover annotation).
    pub text: String,
    /// Label background color, matching the point's original color.
    pub background: String,
    /// Label text color.
    pub text_color: String,
    /// Whether the label currently renders.
    pub visible: bool,
    /// Indices of the traces whose visibility this label depends on.
    pub trace_indexes: Vec<usize>,
}

impl Annotation {
    /// Whether this annotation decorates the given anchor position.
    ///
    /// Anchor coordinates are copied verbatim from trace points, never
    /// recomputed, so exact float equality is the intended key match.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn anchored_at(&self, x: f64, y: f64, z: Option<f64>) -> bool {
        self.x == x && self.y == y && (z.is_none() || self.z == z)
    }
}

/// Arrow tail offsets for a callout, tuned per rendering mode.
///
/// 3D edge callouts sit farther out so the arrow clears the sample block;
/// flat edges flip below the anchor to stay inside their ring.
#[must_use]
pub fn arrow_offsets(is_3d: bool, is_edge: bool, is_flat_edge: bool) -> (f64, f64) {
    if !is_3d {
        return (-50.0, -100.0);
    }
    let ax = if is_edge && !is_flat_edge { -200.0 } else { -100.0 };
    let ay = if is_edge {
        if is_flat_edge { 150.0 } else { 0.0 }
    } else {
        -150.0
    };
    (ax, ay)
}

/// Recompute every annotation's visible flag from trace visibility.
///
/// An annotation renders iff at least one of its recorded traces renders.
/// Returns whether any flag changed. Never creates or destroys annotations.
pub fn reconcile_visibility(annotations: &mut [Annotation], traces: &[Trace]) -> bool {
    let visible: Vec<bool> = traces.iter().map(Trace::is_visible).collect();
    let mut changed = false;
    for annotation in annotations {
        let next = annotation
            .trace_indexes
            .iter()
            .any(|&index| visible.get(index).copied().unwrap_or(false));
        if next != annotation.visible {
            annotation.visible = next;
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{TraceType, Visibility};
    use std::collections::HashMap;

    fn empty_trace(visible: Visibility) -> Trace {
        Trace {
            name: String::new(),
            trace_type: TraceType::Node,
            x: Vec::new(),
            y: Vec::new(),
            z: None,
            customdata: Vec::new(),
            symbols: Vec::new(),
            sizes: Vec::new(),
            colors: Vec::new(),
            original_colors: Vec::new(),
            marker_line_color: None,
            reference: HashMap::new(),
            selected_indexes: Vec::new(),
            visible,
            legend_group: None,
            is_flat_edge: false,
        }
    }

    fn annotation(trace_indexes: Vec<usize>, visible: bool) -> Annotation {
        Annotation {
            x: 0.0,
            y: 0.0,
            z: None,
            ax: -50.0,
            ay: -100.0,
            text: String::new(),
            background: String::new(),
            text_color: String::new(),
            visible,
            trace_indexes,
        }
    }

    #[test]
    fn annotation_visible_while_any_trace_is() {
        let traces = vec![
            empty_trace(Visibility::Hidden),
            empty_trace(Visibility::Visible),
        ];
        let mut annotations = vec![annotation(vec![0, 1], false)];
        assert!(reconcile_visibility(&mut annotations, &traces));
        assert!(annotations[0].visible);
    }

    #[test]
    fn annotation_hides_when_all_traces_do() {
        let traces = vec![empty_trace(Visibility::LegendOnly)];
        let mut annotations = vec![annotation(vec![0], true)];
        assert!(reconcile_visibility(&mut annotations, &traces));
        assert!(!annotations[0].visible);
    }

    #[test]
    fn no_change_reports_false() {
        let traces = vec![empty_trace(Visibility::Visible)];
        let mut annotations = vec![annotation(vec![0], true)];
        assert!(!reconcile_visibility(&mut annotations, &traces));
    }

    #[test]
    fn anchor_match_ignores_z_in_2d() {
        let a = annotation(vec![0], true);
        assert!(a.anchored_at(0.0, 0.0, None));
        assert!(!a.anchored_at(1.0, 0.0, None));
    }
}
