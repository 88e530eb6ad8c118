mod paint;
mod palette;
mod viewport;

use eframe::egui::{Color32, Pos2, Stroke, Vec2, pos2};

use crate::graph::{EdgeId, GraphModel};
use crate::highlight::HighlightSet;
use crate::interaction::{HoverTarget, Tooltip};
use crate::layout::{EMPHASIZED_RADIUS, LayoutEngine, NODE_RADIUS};
use crate::util::plural;

pub use paint::{draw_background, paint_scene};
pub use palette::kind_color;
pub use viewport::{MAX_SCALE, MIN_SCALE, Viewport};

pub const EMPTY_TITLE: &str = "No graph data";
pub const EMPTY_HINT: &str = "Ingest a document to start";

const EDGE_WIDTH: f32 = 2.0;
const HOVERED_EDGE_WIDTH: f32 = 4.0;
const EDGE_LABEL_SIZE: f32 = 10.0;
const NODE_LABEL_SIZE: f32 = 12.0;
const NORMAL_STROKE_WIDTH: f32 = 2.0;
const HIGHLIGHT_STROKE_WIDTH: f32 = 3.0;
const GLOW_SPREAD: f32 = 8.0;

pub struct FrameInput<'a> {
    pub model: &'a GraphModel,
    pub layout: &'a LayoutEngine,
    pub highlight: &'a HighlightSet,
    pub hover: Option<&'a HoverTarget>,
    pub tooltip: Option<&'a Tooltip>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Pos2,
    pub size: f32,
    pub color: Color32,
    pub strong: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSprite {
    pub id: EdgeId,
    pub start: Pos2,
    pub end: Pos2,
    pub stroke: Stroke,
    pub label: Label,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub radius: f32,
    pub color: Color32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeSprite {
    pub id: String,
    pub center: Pos2,
    pub radius: f32,
    pub fill: Color32,
    pub stroke: Stroke,
    pub glow: Option<Glow>,
    pub label: Label,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipSprite {
    pub anchor: Pos2,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphScene {
    pub header: String,
    pub edges: Vec<EdgeSprite>,
    pub nodes: Vec<NodeSprite>,
    pub tooltip: Option<TooltipSprite>,
}

/// Display list for one frame, in surface-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Scene {
    Empty { center: Pos2 },
    Graph(GraphScene),
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

pub struct RenderSurface {
    size: Vec2,
    viewport: Viewport,
}

impl RenderSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            viewport: Viewport::initial(size),
        }
    }

    /// Re-reads the surface size and resets the transform.
    pub fn reinitialize(&mut self, size: Vec2) {
        self.size = size;
        self.viewport = Viewport::initial(size);
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn center(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn compose(&self, frame: FrameInput<'_>) -> Scene {
        if frame.model.is_empty() {
            return Scene::Empty {
                center: pos2(self.size.x * 0.5, self.size.y * 0.5),
            };
        }

        let viewport = &self.viewport;
        let scale = viewport.scale;
        let bodies = frame.layout.bodies();
        let hovered_node = match frame.hover {
            Some(HoverTarget::Node(id)) => Some(id.as_str()),
            _ => None,
        };
        let hovered_edge = match frame.hover {
            Some(HoverTarget::Edge(id)) => Some(id),
            _ => None,
        };

        let edges = frame
            .model
            .edges()
            .iter()
            .zip(frame.model.edge_endpoints())
            .filter_map(|(edge, &(source, target))| {
                let start = viewport.world_to_screen(bodies.get(source)?.position);
                let end = viewport.world_to_screen(bodies.get(target)?.position);
                let width = if hovered_edge == Some(&edge.id) {
                    HOVERED_EDGE_WIDTH
                } else {
                    EDGE_WIDTH
                };
                Some(EdgeSprite {
                    id: edge.id.clone(),
                    start,
                    end,
                    stroke: Stroke::new(
                        width * scale,
                        palette::with_opacity(palette::EDGE, palette::EDGE_OPACITY),
                    ),
                    label: Label {
                        text: edge.relationship.clone(),
                        position: start + (end - start) * 0.5,
                        size: EDGE_LABEL_SIZE * scale,
                        color: palette::EDGE,
                        strong: false,
                    },
                })
            })
            .collect();

        let nodes = frame
            .model
            .nodes()
            .iter()
            .zip(bodies)
            .map(|(node, body)| {
                let highlighted = frame.highlight.contains(&node.id);
                let emphasized = highlighted || hovered_node == Some(node.id.as_str());
                let radius = if emphasized {
                    EMPHASIZED_RADIUS
                } else {
                    NODE_RADIUS
                };
                let (stroke, glow) = if highlighted {
                    (
                        Stroke::new(HIGHLIGHT_STROKE_WIDTH * scale, palette::HIGHLIGHT_STROKE),
                        Some(Glow {
                            radius: (radius + GLOW_SPREAD) * scale,
                            color: palette::with_opacity(palette::HIGHLIGHT_STROKE, 0.6),
                        }),
                    )
                } else {
                    (Stroke::new(NORMAL_STROKE_WIDTH * scale, Color32::WHITE), None)
                };
                let center = viewport.world_to_screen(body.position);

                NodeSprite {
                    id: node.id.clone(),
                    center,
                    radius: radius * scale,
                    fill: kind_color(&node.kind),
                    stroke,
                    glow,
                    label: Label {
                        text: node.id.clone(),
                        position: center,
                        size: NODE_LABEL_SIZE * scale,
                        color: palette::NODE_LABEL,
                        strong: true,
                    },
                }
            })
            .collect();

        let tooltip = frame.tooltip.map(|tooltip| TooltipSprite {
            anchor: tooltip.anchor,
            lines: tooltip.content.lines(),
        });

        Scene::Graph(GraphScene {
            header: format!(
                "{} · {}",
                plural(frame.model.node_count(), "node", "nodes"),
                plural(frame.model.edge_count(), "edge", "edges")
            ),
            edges,
            nodes,
            tooltip,
        })
    }
}
