//! Pointer interaction state machine for the composer canvas.
//!
//! The controller owns the transient interaction state (which text layer is
//! selected and whether a drag is in progress) and translates pointer
//! events into layer-model mutations. It is an explicit three-state machine:
//!
//! ```text
//! Idle ──pointer-down on layer──▶ Dragging(id, pos) ──up/leave──▶ Selected(id)
//!  ▲                                     │
//!  └───────pointer-down on background────┘ (from any state)
//! ```
//!
//! Dragging applies the *incremental* pointer delta (new − last) on every
//! move, then advances the remembered position. Applying absolute positions
//! instead would make the layer jump when a drag resumes after leaving and
//! re-entering the canvas.
//!
//! Selection is transient: it is never written into the [`DesignSnapshot`],
//! and at most one layer id is selected at any time.

use crate::design::{DesignSnapshot, LayerId, TextLayerPatch};
use crate::geometry::Point;

/// The interaction state of the composer canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    /// Nothing selected; the container/icon panel is active.
    #[default]
    Idle,
    /// One text layer selected, no drag in progress.
    Selected(LayerId),
    /// A drag in progress; `last` is the most recent pointer position.
    Dragging { id: LayerId, last: Point },
}

/// Translates pointer events into layer mutations and selection changes.
#[derive(Debug, Clone, Default)]
pub struct ComposerController {
    state: Interaction,
}

impl ComposerController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current interaction state.
    pub fn state(&self) -> Interaction {
        self.state
    }

    /// The selected layer id, if any. A dragging layer counts as selected.
    pub fn selected(&self) -> Option<LayerId> {
        match self.state {
            Interaction::Idle => None,
            Interaction::Selected(id) | Interaction::Dragging { id, .. } => Some(id),
        }
    }

    /// Pointer pressed at `pos`; `hit` is the topmost text layer under the
    /// pointer, or `None` for the canvas background.
    ///
    /// A hit (re)asserts selection and begins a drag; a background press
    /// clears selection. A hit on an id that no longer exists degrades to a
    /// background press.
    pub fn pointer_down(&mut self, design: &DesignSnapshot, hit: Option<LayerId>, pos: Point) {
        self.state = match hit {
            Some(id) if design.contains_text_layer(id) => Interaction::Dragging { id, last: pos },
            _ => Interaction::Idle,
        };
    }

    /// Pointer moved to `pos`. While dragging, moves the layer by the delta
    /// from the last remembered position and advances it; otherwise ignored.
    pub fn pointer_move(&mut self, design: &mut DesignSnapshot, pos: Point) {
        let Interaction::Dragging { id, last } = &mut self.state else {
            return;
        };
        let delta = pos.delta_from(*last);
        if let Some(layer) = design.text_layer(*id) {
            let (x, y) = (layer.x + delta.dx, layer.y + delta.dy);
            design.update_text_layer(*id, TextLayerPatch::new().position(x, y));
        }
        *last = pos;
    }

    /// Pointer released: a drag resolves to plain selection.
    pub fn pointer_up(&mut self) {
        if let Interaction::Dragging { id, .. } = self.state {
            self.state = Interaction::Selected(id);
        }
    }

    /// Pointer left the canvas mid-drag; same resolution as release.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Explicitly selects a layer (panel-driven selection).
    pub fn select(&mut self, design: &DesignSnapshot, id: LayerId) {
        if design.contains_text_layer(id) {
            self.state = Interaction::Selected(id);
        }
    }

    /// Clears any selection.
    pub fn clear_selection(&mut self) {
        self.state = Interaction::Idle;
    }

    /// Notifies the controller that a layer was removed from the model.
    /// If it was the selected (or dragging) layer, selection clears.
    pub fn layer_removed(&mut self, id: LayerId) {
        if self.selected() == Some(id) {
            self.state = Interaction::Idle;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::TextLayerPatch;

    fn design_with_layer_at(x: f32, y: f32) -> (DesignSnapshot, LayerId) {
        let mut design = DesignSnapshot::default();
        let id = design.add_text_layer(TextLayerPatch::new().position(x, y));
        (design, id)
    }

    #[test]
    fn click_selects_and_background_clears() {
        let (design, id) = design_with_layer_at(100.0, 100.0);
        let mut ctl = ComposerController::new();

        ctl.pointer_down(&design, Some(id), Point::new(100.0, 100.0));
        ctl.pointer_up();
        assert_eq!(ctl.selected(), Some(id));

        ctl.pointer_down(&design, None, Point::new(5.0, 5.0));
        assert_eq!(ctl.selected(), None);
        assert_eq!(ctl.state(), Interaction::Idle);
    }

    #[test]
    fn drag_applies_incremental_deltas() {
        let (mut design, id) = design_with_layer_at(100.0, 100.0);
        let mut ctl = ComposerController::new();

        let start = Point::new(50.0, 50.0);
        ctl.pointer_down(&design, Some(id), start);

        // Deltas (3,0), (0,4), (-1,-1) accumulate exactly.
        ctl.pointer_move(&mut design, Point::new(53.0, 50.0));
        ctl.pointer_move(&mut design, Point::new(53.0, 54.0));
        ctl.pointer_move(&mut design, Point::new(52.0, 53.0));
        ctl.pointer_up();

        let layer = design.text_layer(id).unwrap();
        assert_eq!((layer.x, layer.y), (102.0, 103.0));
        assert_eq!(ctl.state(), Interaction::Selected(id));
    }

    #[test]
    fn drag_resume_does_not_jump() {
        let (mut design, id) = design_with_layer_at(100.0, 100.0);
        let mut ctl = ComposerController::new();

        ctl.pointer_down(&design, Some(id), Point::new(0.0, 0.0));
        ctl.pointer_move(&mut design, Point::new(10.0, 0.0));
        ctl.pointer_leave();
        assert_eq!(ctl.state(), Interaction::Selected(id));

        // New drag starts far away; only subsequent deltas apply.
        ctl.pointer_down(&design, Some(id), Point::new(300.0, 300.0));
        ctl.pointer_move(&mut design, Point::new(301.0, 300.0));

        let layer = design.text_layer(id).unwrap();
        assert_eq!((layer.x, layer.y), (111.0, 100.0));
    }

    #[test]
    fn selection_is_exclusive() {
        let mut design = DesignSnapshot::default();
        let ids: Vec<_> = (0..4)
            .map(|_| design.add_text_layer(TextLayerPatch::new()))
            .collect();
        let mut ctl = ComposerController::new();

        for &id in &ids {
            ctl.pointer_down(&design, Some(id), Point::new(0.0, 0.0));
            ctl.pointer_up();
            assert_eq!(ctl.selected(), Some(id));
        }
    }

    #[test]
    fn stale_update_after_delete_is_noop() {
        let (mut design, id) = design_with_layer_at(100.0, 100.0);
        let mut ctl = ComposerController::new();
        ctl.select(&design, id);

        design.remove_text_layer(id);
        ctl.layer_removed(id);
        assert_eq!(ctl.selected(), None);

        // The stale id neither errors nor resurrects the layer.
        assert!(!design.update_text_layer(id, TextLayerPatch::new().text("ghost")));
        assert!(design.text_layers.is_empty());
    }

    #[test]
    fn layer_deleted_mid_drag_degrades_to_noop_moves() {
        let (mut design, id) = design_with_layer_at(100.0, 100.0);
        let mut ctl = ComposerController::new();

        ctl.pointer_down(&design, Some(id), Point::new(0.0, 0.0));
        design.remove_text_layer(id);
        ctl.pointer_move(&mut design, Point::new(10.0, 10.0));
        ctl.pointer_up();

        assert!(design.text_layers.is_empty());
    }

    #[test]
    fn pointer_down_on_vanished_id_clears_selection() {
        let (mut design, id) = design_with_layer_at(100.0, 100.0);
        let mut ctl = ComposerController::new();
        design.remove_text_layer(id);

        ctl.pointer_down(&design, Some(id), Point::new(0.0, 0.0));
        assert_eq!(ctl.state(), Interaction::Idle);
    }
}
