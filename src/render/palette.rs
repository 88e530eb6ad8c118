use eframe::egui::Color32;

use crate::graph::NodeKind;
use crate::util::stable_hash;

pub const TOPIC: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
pub const CONCEPT: Color32 = Color32::from_rgb(0x10, 0xb9, 0x81);
pub const FIELD: Color32 = Color32::from_rgb(0x8b, 0x5c, 0xf6);
pub const DOCUMENT: Color32 = Color32::from_rgb(0xf5, 0x9e, 0x0b);
pub const ENTITY: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);

const KIND_PALETTE: [Color32; 5] = [TOPIC, CONCEPT, FIELD, DOCUMENT, ENTITY];

pub const EDGE: Color32 = Color32::from_rgb(0x6b, 0x72, 0x80);
pub const EDGE_OPACITY: f32 = 0.6;
pub const NODE_LABEL: Color32 = Color32::from_rgb(0x37, 0x41, 0x51);
pub const HIGHLIGHT_STROKE: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24);
pub const BACKGROUND: Color32 = Color32::from_rgb(0xf9, 0xfa, 0xfb);
pub const GRID: Color32 = Color32::from_rgba_premultiplied(0x0b, 0x0c, 0x0e, 0x0f);
pub const MUTED_TEXT: Color32 = Color32::from_rgb(0x9c, 0xa3, 0xaf);
pub const TOOLTIP_FILL: Color32 = Color32::from_rgb(0xff, 0xff, 0xff);
pub const TOOLTIP_BORDER: Color32 = Color32::from_rgb(0xe5, 0xe7, 0xeb);

pub fn kind_color(kind: &NodeKind) -> Color32 {
    match kind {
        NodeKind::Topic => TOPIC,
        NodeKind::Concept => CONCEPT,
        NodeKind::Field => FIELD,
        NodeKind::Document => DOCUMENT,
        NodeKind::Entity => ENTITY,
        NodeKind::Other(label) => {
            KIND_PALETTE[(stable_hash(label) % KIND_PALETTE.len() as u64) as usize]
        }
    }
}

pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_use_fixed_colors() {
        assert_eq!(kind_color(&NodeKind::parse("Topic")), TOPIC);
        assert_eq!(kind_color(&NodeKind::parse("entity")), ENTITY);
    }

    #[test]
    fn other_kinds_hash_into_the_palette_stably() {
        let person = NodeKind::parse("person");
        let color = kind_color(&person);
        assert!(KIND_PALETTE.contains(&color));
        assert_eq!(color, kind_color(&NodeKind::parse("person")));
    }

    #[test]
    fn opacity_scales_alpha() {
        assert_eq!(with_opacity(EDGE, 0.5).a(), 127);
        assert_eq!(with_opacity(EDGE, 1.0), EDGE);
        assert_eq!(with_opacity(EDGE, 0.0).a(), 0);
    }
}
