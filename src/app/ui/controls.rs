use eframe::egui::{self, Key, Response, RichText, Ui};

use crate::config::LayoutConfig;

use super::super::{ExplorerApp, Status};

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f32,
    negative_secs: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

// Holding an arrow key on a focused slider speeds up the longer it is held.
fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut f32,
    min: f32,
    max: f32,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    hold_state.positive_secs = if increase_down {
        hold_state.positive_secs + delta_time
    } else {
        0.0
    };
    hold_state.negative_secs = if decrease_down {
        hold_state.negative_secs + delta_time
    } else {
        0.0
    };
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));

    let direction = (increase_down as i8) - (decrease_down as i8);
    if direction == 0 {
        return false;
    }

    let hold_secs = if direction > 0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let step = ((max - min) / 200.0).max(0.0005);
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let delta = direction as f32 * step * speed * delta_time;

    let old_value = *value;
    *value = (*value + delta).clamp(min, max);
    ui.ctx().request_repaint();
    (*value - old_value).abs() > f32::EPSILON
}

fn tuning_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
    label: &str,
    hint: &str,
) -> bool {
    let (min, max) = (*range.start(), *range.end());
    let response = ui
        .add(
            egui::Slider::new(&mut *value, range)
                .text(label)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hint);
    let mut changed = response.changed();
    if response.hovered() {
        response.request_focus();
    }
    changed |= apply_slider_arrow_acceleration(ui, &response, value, min, max);
    changed
}

impl ExplorerApp {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        self.draw_ingest(ui);
        ui.separator();
        self.draw_last_merge(ui);
        ui.separator();

        ui.collapsing("Physics tuning", |ui| {
            if self.draw_tuning(ui)
                && let Some(explorer) = self.explorer.as_mut()
            {
                explorer.set_config(self.tuning);
                self.tuning = explorer.config();
            }
        });
    }

    fn draw_ingest(&mut self, ui: &mut Ui) {
        ui.label("Ingest snapshot (JSON path)")
            .on_hover_text("Merge a graph file into the current graph and highlight what is new.");
        let field = ui.text_edit_singleline(&mut self.ingest_path);
        let submitted = field.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));

        let loading = self.is_loading();
        let clicked = ui
            .add_enabled(!loading, egui::Button::new("Ingest"))
            .clicked();
        if (clicked || submitted) && !loading {
            self.ingest_from_field();
        }

        ui.add_space(4.0);
        match &self.status {
            Status::Idle => {}
            Status::Loading(message) => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(message.as_str());
                });
            }
            Status::Info(message) => {
                ui.label(message.as_str());
            }
            Status::Error(message) => {
                ui.colored_label(ui.visuals().error_fg_color, message.as_str());
            }
        }
    }

    fn draw_last_merge(&self, ui: &mut Ui) {
        ui.label(RichText::new("Last merge").strong());
        let Some(report) = self.explorer.as_ref().and_then(|explorer| explorer.last_merge()) else {
            ui.weak("Nothing merged yet.");
            return;
        };

        ui.label(report.summary());
        if report.new_edges.is_empty() {
            return;
        }
        egui::ScrollArea::vertical()
            .id_salt("last_merge_edges")
            .max_height(160.0)
            .show(ui, |ui| {
                for (source, target, relationship) in &report.new_edges {
                    ui.label(format!("{source} -[{relationship}]-> {target}"));
                }
            });
    }

    fn draw_tuning(&mut self, ui: &mut Ui) -> bool {
        let tuning = &mut self.tuning;
        let mut changed = false;

        changed |= tuning_slider(
            ui,
            &mut tuning.link_distance,
            30.0..=300.0,
            "Link distance",
            "Rest length of every edge.",
        );
        changed |= tuning_slider(
            ui,
            &mut tuning.link_strength,
            0.05..=1.0,
            "Link strength",
            "How strongly connected nodes pull toward the link distance.",
        );
        changed |= tuning_slider(
            ui,
            &mut tuning.repulsion,
            0.0..=600.0,
            "Repulsion",
            "How strongly every node pushes the others away.",
        );
        changed |= tuning_slider(
            ui,
            &mut tuning.collision_spacing,
            1.0..=4.0,
            "Collision spacing",
            "Minimum gap between nodes, as a multiple of their radii.",
        );
        changed |= tuning_slider(
            ui,
            &mut tuning.velocity_decay,
            0.1..=0.9,
            "Velocity decay",
            "How quickly node movement slows each tick.",
        );
        changed |= tuning_slider(
            ui,
            &mut tuning.center_strength,
            0.0..=1.0,
            "Centering",
            "How firmly the graph is kept in the middle of the surface.",
        );

        changed |= ui
            .checkbox(&mut tuning.carry_over_positions, "Keep positions on ingest")
            .on_hover_text("Surviving nodes keep their place when a snapshot is merged.")
            .changed();

        if ui.button("Restore defaults").clicked() {
            *tuning = LayoutConfig::default();
            changed = true;
        }

        changed
    }
}
