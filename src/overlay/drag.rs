use crate::foundation::core::{Point, Rect, clamp_percent};
use crate::foundation::error::{GlowupError, GlowupResult};
use crate::overlay::model::{OverlayId, OverlayModel};

/// Exclusive right of one overlay to receive pointer moves, bound to the on-screen box of the
/// photo it was grabbed in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerCapture {
    pub id: OverlayId,
    pub container: Rect,
}

impl PointerCapture {
    /// Percent-space position of `pointer` inside the container, clamped to `[0, 100]`.
    pub fn percent_at(&self, pointer: Point) -> (f64, f64) {
        let c = self.container;
        (
            clamp_percent(100.0 * (pointer.x - c.x0) / c.width()),
            clamp_percent(100.0 * (pointer.y - c.y0) / c.height()),
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(PointerCapture),
}

/// Turns pointer gestures into absolute percent positions on the overlay model.
///
/// At most one capture is live; a new `pointer_down` replaces it.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Id of the overlay currently being dragged.
    pub fn dragging(&self) -> Option<OverlayId> {
        match self.state {
            DragState::Dragging(cap) => Some(cap.id),
            DragState::Idle => None,
        }
    }

    /// Start dragging `id` inside `container` (the photo's on-screen box).
    pub fn pointer_down(
        &mut self,
        model: &OverlayModel,
        id: OverlayId,
        container: Rect,
    ) -> GlowupResult<()> {
        let container = container.abs();
        let (w, h) = (container.width(), container.height());
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(GlowupError::validation(format!(
                "drag container must have a positive size, got {w}x{h}"
            )));
        }
        if !model.contains(id) {
            return Err(GlowupError::validation(format!("no overlay {id} to drag")));
        }
        if let DragState::Dragging(prev) = self.state {
            tracing::debug!(prev = %prev.id, next = %id, "replacing pointer capture");
        }
        self.state = DragState::Dragging(PointerCapture { id, container });
        Ok(())
    }

    /// Move the captured overlay so its anchor sits under `pointer`.
    ///
    /// Returns the new percent position, or `None` when idle. A capture whose overlay has been
    /// removed is released.
    pub fn pointer_move(&mut self, model: &mut OverlayModel, pointer: Point) -> Option<(f64, f64)> {
        let DragState::Dragging(cap) = self.state else {
            return None;
        };
        let (x, y) = cap.percent_at(pointer);
        if model.move_to(cap.id, x, y) {
            Some((x, y))
        } else {
            tracing::debug!(id = %cap.id, "dragged overlay disappeared; ending drag");
            self.state = DragState::Idle;
            None
        }
    }

    /// Finish the gesture, returning the overlay that was being dragged.
    pub fn pointer_up(&mut self) -> Option<OverlayId> {
        let id = self.dragging();
        self.state = DragState::Idle;
        id
    }

    /// Drop any capture without a final move, e.g. when the editor view goes away mid-gesture.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/drag.rs"]
mod tests;
