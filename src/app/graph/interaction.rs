use eframe::egui::{self, Pos2, Rect, Ui};

use crate::interaction::PointerEvent;

use super::super::ExplorerApp;

impl ExplorerApp {
    /// Translates this frame's egui input over the graph surface into
    /// surface-local pointer events, in the order they happened.
    pub(in crate::app) fn collect_pointer_events(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) -> Vec<PointerEvent> {
        let local = |position: Pos2| (position - rect.min).to_pos2();
        let mut events = Vec::new();

        let (hover_pos, press_origin, pointer_delta, scroll) = ui.input(|input| {
            (
                input.pointer.hover_pos(),
                input.pointer.press_origin(),
                input.pointer.delta(),
                input.raw_scroll_delta.y,
            )
        });

        let inside = hover_pos.is_some_and(|position| rect.contains(position));
        let captured = response.dragged() || response.drag_stopped();

        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = press_origin.or(hover_pos).unwrap_or_else(|| rect.center());
            events.push(PointerEvent::Down {
                position: local(origin),
            });
        }

        if let Some(position) = hover_pos
            && (inside || captured)
            && (pointer_delta != egui::Vec2::ZERO || response.drag_started())
        {
            events.push(PointerEvent::Move {
                position: local(position),
            });
        }

        if response.drag_stopped() {
            let position = hover_pos.unwrap_or_else(|| rect.center());
            events.push(PointerEvent::Up {
                position: local(position),
            });
        }

        if inside && scroll.abs() > f32::EPSILON {
            let position = hover_pos.unwrap_or_else(|| rect.center());
            events.push(PointerEvent::Wheel {
                position: local(position),
                delta: scroll,
            });
        }

        if self.pointer_inside && !inside && !captured {
            events.push(PointerEvent::Leave);
        }
        self.pointer_inside = inside;

        events
    }
}
