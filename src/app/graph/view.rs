use std::time::Instant;

use eframe::egui::{CursorIcon, Sense, Ui};

use crate::interaction::HoverTarget;
use crate::render::{draw_background, paint_scene};

use super::super::ExplorerApp;

impl ExplorerApp {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let events = self.collect_pointer_events(ui, rect, &response);
        let explorer = self.ensure_explorer(rect.size());

        let mut interacted = false;
        for event in events {
            interacted |= explorer.handle_pointer(event).needs_redraw();
        }

        let now = Instant::now();
        let frame = explorer.frame(now);

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, explorer.surface().viewport());
        paint_scene(&painter, rect, &explorer.scene());

        let interaction = explorer.interaction();
        if interaction.dragging().is_some() || interaction.is_panning() {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        } else if matches!(interaction.hover(), Some(HoverTarget::Node(_))) {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
        }

        if frame.animating || frame.highlight_expired || interacted {
            ui.ctx().request_repaint();
        } else if let Some(remaining) = explorer.highlight_remaining(now) {
            ui.ctx().request_repaint_after(remaining);
        }
    }
}
