use eframe::egui::{self, Align, Layout, Ui};

use super::super::ExplorerApp;

impl ExplorerApp {
    pub(in crate::app) fn draw_top_bar(&mut self, ui: &mut Ui) {
        let mut reload_requested = false;
        let mut reset_requested = false;

        ui.horizontal(|ui| {
            ui.heading("Knowledge Graph");
            ui.separator();

            match &self.explorer {
                Some(explorer) => {
                    ui.label(format!("nodes: {}", explorer.model().node_count()));
                    ui.label(format!("edges: {}", explorer.model().edge_count()));
                    if let Some(graph_id) = explorer.graph_id() {
                        ui.label(format!("graph: {graph_id}"));
                    }
                }
                None => {
                    ui.label("preparing surface...");
                }
            }

            if let Some(path) = &self.source_path {
                ui.label(format!("source: {}", path.display()));
            }

            let loading = self.is_loading();
            reload_requested = ui
                .add_enabled(!loading, egui::Button::new("Reload"))
                .on_hover_text("Load the source graph again with a fresh layout.")
                .clicked();
            reset_requested = ui
                .add_enabled(!loading, egui::Button::new("Reset"))
                .on_hover_text("Clear the graph.")
                .clicked();

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if let Some(explorer) = &self.explorer {
                    let layout = explorer.layout();
                    let state = if layout.is_quiescent() {
                        "layout settled".to_owned()
                    } else {
                        format!("layout energy {:.3}", layout.alpha())
                    };
                    ui.weak(state);
                }
            });
        });

        if reload_requested {
            self.reload();
        }
        if reset_requested {
            self.reset();
        }
    }
}
