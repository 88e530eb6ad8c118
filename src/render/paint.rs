use eframe::egui::{Align2, FontId, Painter, Pos2, Rect, Stroke, Vec2, vec2};

use super::palette;
use super::{EMPTY_HINT, EMPTY_TITLE, Label, Scene, TooltipSprite, Viewport};

const GRID_STEP: f32 = 56.0;
const TOOLTIP_PADDING: f32 = 8.0;
const TOOLTIP_LINE_HEIGHT: f32 = 16.0;
const TOOLTIP_FONT: f32 = 12.0;
const HEADER_FONT: f32 = 12.0;

pub fn draw_background(painter: &Painter, rect: Rect, viewport: &Viewport) {
    painter.rect_filled(rect, 0.0, palette::BACKGROUND);

    let step = (GRID_STEP * viewport.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + viewport.translate;
    let stroke = Stroke::new(1.0, palette::GRID);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

/// Paints a composed scene. Scene coordinates are surface-local, so every
/// point is offset by `rect.min`.
pub fn paint_scene(painter: &Painter, rect: Rect, scene: &Scene) {
    let offset = rect.min.to_vec2();

    let graph = match scene {
        Scene::Empty { center } => {
            let center = *center + offset;
            painter.text(
                center - vec2(0.0, 10.0),
                Align2::CENTER_CENTER,
                EMPTY_TITLE,
                FontId::proportional(16.0),
                palette::NODE_LABEL,
            );
            painter.text(
                center + vec2(0.0, 12.0),
                Align2::CENTER_CENTER,
                EMPTY_HINT,
                FontId::proportional(12.0),
                palette::MUTED_TEXT,
            );
            return;
        }
        Scene::Graph(graph) => graph,
    };

    for edge in &graph.edges {
        painter.line_segment([edge.start + offset, edge.end + offset], edge.stroke);
        paint_label(painter, &edge.label, offset);
    }

    for node in &graph.nodes {
        let center = node.center + offset;
        if let Some(glow) = node.glow {
            // Soft falloff from the glow rim in to the node edge.
            let rings = 4;
            for ring in 0..rings {
                let t = ring as f32 / rings as f32;
                let radius = glow.radius + (node.radius - glow.radius) * t;
                let color = palette::with_opacity(glow.color, 0.25 + 0.15 * t);
                painter.circle_filled(center, radius, color);
            }
        }
        painter.circle_filled(center, node.radius, node.fill);
        painter.circle_stroke(center, node.radius, node.stroke);
        paint_label(painter, &node.label, offset);
    }

    painter.text(
        rect.left_top() + vec2(10.0, 10.0),
        Align2::LEFT_TOP,
        &graph.header,
        FontId::proportional(HEADER_FONT),
        palette::NODE_LABEL,
    );

    if let Some(tooltip) = &graph.tooltip {
        paint_tooltip(painter, rect, tooltip);
    }
}

fn paint_label(painter: &Painter, label: &Label, offset: Vec2) {
    if label.size < 1.0 || label.text.is_empty() {
        return;
    }
    let position = label.position + offset;
    let font = FontId::proportional(label.size);
    if label.strong {
        // Default fonts ship no bold face; a half-pixel double strike stands in.
        painter.text(
            position + vec2(0.5, 0.0),
            Align2::CENTER_CENTER,
            &label.text,
            font.clone(),
            label.color,
        );
    }
    painter.text(position, Align2::CENTER_CENTER, &label.text, font, label.color);
}

fn paint_tooltip(painter: &Painter, rect: Rect, tooltip: &TooltipSprite) {
    let font = FontId::proportional(TOOLTIP_FONT);
    let galleys = tooltip
        .lines
        .iter()
        .map(|line| painter.layout_no_wrap(line.clone(), font.clone(), palette::NODE_LABEL))
        .collect::<Vec<_>>();
    let width = galleys
        .iter()
        .map(|galley| galley.size().x)
        .fold(0.0_f32, f32::max);
    let height = galleys.len() as f32 * TOOLTIP_LINE_HEIGHT;

    // Tooltip anchors at its bottom-left corner, above and right of the pointer.
    let anchor = tooltip.anchor + rect.min.to_vec2();
    let size = vec2(width, height) + Vec2::splat(TOOLTIP_PADDING * 2.0);
    let frame = Rect::from_min_size(anchor - vec2(0.0, size.y), size);

    painter.rect_filled(frame, 4.0, palette::TOOLTIP_FILL);
    painter.rect_stroke(
        frame,
        4.0,
        Stroke::new(1.0, palette::TOOLTIP_BORDER),
        eframe::egui::StrokeKind::Inside,
    );

    for (index, galley) in galleys.into_iter().enumerate() {
        let position = frame.min
            + Vec2::splat(TOOLTIP_PADDING)
            + vec2(0.0, index as f32 * TOOLTIP_LINE_HEIGHT);
        painter.galley(position, galley, palette::NODE_LABEL);
    }
}
