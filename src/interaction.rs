use eframe::egui::{Pos2, Vec2, vec2};
use tracing::debug;

use crate::graph::{EdgeId, GraphModel};
use crate::layout::{EMPHASIZED_RADIUS, LayoutEngine};
use crate::render::Viewport;

const TOOLTIP_OFFSET: Vec2 = vec2(10.0, -10.0);
const EDGE_HIT_TOLERANCE: f32 = 6.0;
const WHEEL_ZOOM_RATE: f32 = 0.0018;
const NO_DESCRIPTION: &str = "No description";

/// Pointer input in surface-local screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { position: Pos2 },
    Move { position: Pos2 },
    Up { position: Pos2 },
    Wheel { position: Pos2, delta: f32 },
    Leave,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HoverTarget {
    Node(String),
    Edge(EdgeId),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TooltipContent {
    Node {
        id: String,
        kind: String,
        description: Option<String>,
    },
    Edge {
        relationship: String,
        description: Option<String>,
    },
}

impl TooltipContent {
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Node {
                id,
                kind,
                description,
            } => vec![
                id.clone(),
                format!("Type: {kind}"),
                description.as_deref().unwrap_or(NO_DESCRIPTION).to_owned(),
            ],
            Self::Edge {
                relationship,
                description,
            } => vec![
                relationship.clone(),
                description.as_deref().unwrap_or(NO_DESCRIPTION).to_owned(),
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub content: TooltipContent,
    pub anchor: Pos2,
}

/// The single tooltip slot. Acquiring replaces whatever was shown.
#[derive(Debug, Default)]
pub struct TooltipOverlay {
    active: Option<Tooltip>,
}

impl TooltipOverlay {
    pub fn acquire(&mut self, content: TooltipContent, pointer: Pos2) {
        self.active = Some(Tooltip {
            content,
            anchor: pointer + TOOLTIP_OFFSET,
        });
    }

    pub fn follow(&mut self, pointer: Pos2) {
        if let Some(tooltip) = &mut self.active {
            tooltip.anchor = pointer + TOOLTIP_OFFSET;
        }
    }

    pub fn release(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn current(&self) -> Option<&Tooltip> {
        self.active.as_ref()
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Capture {
    Drag { id: String, offset: Vec2 },
    Pan { last: Pos2 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum InteractionOutcome {
    Ignored,
    Idle,
    HoverChanged(Option<HoverTarget>),
    DragStarted(String),
    Dragged,
    DragEnded(String),
    Panned,
    PanEnded,
    Zoomed,
    Left,
}

impl InteractionOutcome {
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, Self::Ignored | Self::Idle)
    }
}

#[derive(Default)]
pub struct InteractionController {
    capture: Option<Capture>,
    hover: Option<HoverTarget>,
    overlay: TooltipOverlay,
    torn_down: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        model: &GraphModel,
        layout: &mut LayoutEngine,
        viewport: &mut Viewport,
    ) -> InteractionOutcome {
        if self.torn_down {
            return InteractionOutcome::Ignored;
        }

        match event {
            PointerEvent::Down { position } => self.pointer_down(position, model, layout, viewport),
            PointerEvent::Move { position } => self.pointer_move(position, model, layout, viewport),
            PointerEvent::Up { .. } => self.end_capture(layout),
            PointerEvent::Wheel { position, delta } => {
                let factor = (1.0 + delta * WHEEL_ZOOM_RATE).clamp(0.85, 1.15);
                viewport.zoom_about(position, factor);
                InteractionOutcome::Zoomed
            }
            PointerEvent::Leave => {
                self.release_all(layout);
                InteractionOutcome::Left
            }
        }
    }

    fn pointer_down(
        &mut self,
        position: Pos2,
        model: &GraphModel,
        layout: &mut LayoutEngine,
        viewport: &Viewport,
    ) -> InteractionOutcome {
        // A missed Up leaves a stale capture behind; drop it first.
        if self.capture.is_some() {
            self.end_capture(layout);
        }

        let world = viewport.screen_to_world(position);
        let Some(index) = node_at(layout, world, self.hovered_node()) else {
            self.capture = Some(Capture::Pan { last: position });
            return InteractionOutcome::Idle;
        };

        let body = &layout.bodies()[index];
        let id = body.id.clone();
        let offset = body.position - world;
        if !model.contains_node(&id) || !layout.pin(&id) {
            return InteractionOutcome::Idle;
        }
        layout.reheat();
        self.overlay.release();
        self.hover = Some(HoverTarget::Node(id.clone()));
        self.capture = Some(Capture::Drag {
            id: id.clone(),
            offset,
        });
        debug!(node = %id, "drag started");
        InteractionOutcome::DragStarted(id)
    }

    fn pointer_move(
        &mut self,
        position: Pos2,
        model: &GraphModel,
        layout: &mut LayoutEngine,
        viewport: &mut Viewport,
    ) -> InteractionOutcome {
        match &mut self.capture {
            Some(Capture::Drag { id, offset }) => {
                let target = viewport.screen_to_world(position) + *offset;
                layout.set_pinned_position(id, target);
                InteractionOutcome::Dragged
            }
            Some(Capture::Pan { last }) => {
                viewport.pan_by(position - *last);
                *last = position;
                InteractionOutcome::Panned
            }
            None => self.update_hover(position, model, layout, viewport),
        }
    }

    fn update_hover(
        &mut self,
        position: Pos2,
        model: &GraphModel,
        layout: &LayoutEngine,
        viewport: &Viewport,
    ) -> InteractionOutcome {
        let world = viewport.screen_to_world(position);
        let target = node_at(layout, world, self.hovered_node())
            .map(|index| HoverTarget::Node(layout.bodies()[index].id.clone()))
            .or_else(|| {
                edge_at(model, layout, world, EDGE_HIT_TOLERANCE / viewport.scale)
                    .map(HoverTarget::Edge)
            });

        if target == self.hover {
            self.overlay.follow(position);
            return InteractionOutcome::Idle;
        }

        self.overlay.release();
        if let Some(HoverTarget::Edge(id)) = &target {
            debug!(edge = %id, "edge hovered");
        }
        if let Some(content) = target.as_ref().and_then(|target| tooltip_for(model, target)) {
            self.overlay.acquire(content, position);
        }
        self.hover = target.clone();
        InteractionOutcome::HoverChanged(target)
    }

    fn end_capture(&mut self, layout: &mut LayoutEngine) -> InteractionOutcome {
        match self.capture.take() {
            Some(Capture::Drag { id, .. }) => {
                layout.unpin(&id);
                layout.cool();
                debug!(node = %id, "drag ended");
                InteractionOutcome::DragEnded(id)
            }
            Some(Capture::Pan { .. }) => InteractionOutcome::PanEnded,
            None => InteractionOutcome::Idle,
        }
    }

    /// Drops hover, tooltip and any captured pointer state.
    pub fn release_all(&mut self, layout: &mut LayoutEngine) {
        self.end_capture(layout);
        self.hover = None;
        self.overlay.release();
    }

    pub fn teardown(&mut self, layout: &mut LayoutEngine) {
        self.release_all(layout);
        self.torn_down = true;
    }

    fn hovered_node(&self) -> Option<&str> {
        match &self.hover {
            Some(HoverTarget::Node(id)) => Some(id),
            _ => None,
        }
    }

    pub fn hover(&self) -> Option<&HoverTarget> {
        self.hover.as_ref()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.overlay.current()
    }

    pub fn dragging(&self) -> Option<&str> {
        match &self.capture {
            Some(Capture::Drag { id, .. }) => Some(id),
            _ => None,
        }
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.capture, Some(Capture::Pan { .. }))
    }
}

// Topmost first: bodies are drawn in order, so the last hit wins. The hovered
// node is drawn emphasized and is hit at that radius.
fn node_at(layout: &LayoutEngine, world: Vec2, hovered: Option<&str>) -> Option<usize> {
    layout
        .bodies()
        .iter()
        .enumerate()
        .rev()
        .find(|(_, body)| {
            let radius = if hovered == Some(body.id.as_str()) {
                body.radius.max(EMPHASIZED_RADIUS)
            } else {
                body.radius
            };
            (body.position - world).length() <= radius
        })
        .map(|(index, _)| index)
}

fn edge_at(model: &GraphModel, layout: &LayoutEngine, world: Vec2, tolerance: f32) -> Option<EdgeId> {
    let bodies = layout.bodies();
    model
        .edges()
        .iter()
        .zip(model.edge_endpoints())
        .filter_map(|(edge, &(source, target))| {
            let start = bodies.get(source)?.position;
            let end = bodies.get(target)?.position;
            let distance = segment_distance(world, start, end);
            (distance <= tolerance).then_some((edge, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(edge, _)| edge.id.clone())
}

fn segment_distance(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let span = end - start;
    let length_sq = span.length_sq();
    if length_sq <= f32::EPSILON {
        return (point - start).length();
    }
    let t = ((point - start).dot(span) / length_sq).clamp(0.0, 1.0);
    (point - (start + span * t)).length()
}

fn tooltip_for(model: &GraphModel, target: &HoverTarget) -> Option<TooltipContent> {
    match target {
        HoverTarget::Node(id) => model.node(id).map(|node| TooltipContent::Node {
            id: node.id.clone(),
            kind: node.kind.label().to_owned(),
            description: node.description.clone(),
        }),
        HoverTarget::Edge(id) => model.edge(id).map(|edge| TooltipContent::Edge {
            relationship: edge.relationship.clone(),
            description: edge.description.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::config::LayoutConfig;
    use crate::graph::GraphSnapshot;
    use crate::layout::SeedPolicy;

    struct Fixture {
        model: GraphModel,
        layout: LayoutEngine,
        viewport: Viewport,
        controller: InteractionController,
    }

    impl Fixture {
        // Two nodes on the x axis, identity transform.
        fn new() -> Self {
            let snapshot = GraphSnapshot::builder()
                .node("a", "topic", Some("first"))
                .node("b", "concept", None)
                .edge("a", "b", "links")
                .build()
                .unwrap();
            let model = GraphModel::from_snapshot(snapshot);
            let mut layout = LayoutEngine::new(LayoutConfig::default(), Vec2::ZERO);
            layout.reseed(&model, SeedPolicy::Fresh);
            layout.pin("a");
            layout.set_pinned_position("a", vec2(100.0, 100.0));
            layout.pin("b");
            layout.set_pinned_position("b", vec2(300.0, 100.0));
            layout.unpin("a");
            layout.unpin("b");

            Self {
                model,
                layout,
                viewport: Viewport::default(),
                controller: InteractionController::new(),
            }
        }

        fn send(&mut self, event: PointerEvent) -> InteractionOutcome {
            self.controller
                .handle(event, &self.model, &mut self.layout, &mut self.viewport)
        }
    }

    #[test]
    fn hovering_a_node_acquires_its_tooltip() {
        let mut fixture = Fixture::new();
        let outcome = fixture.send(PointerEvent::Move {
            position: pos2(105.0, 95.0),
        });

        assert_eq!(
            outcome,
            InteractionOutcome::HoverChanged(Some(HoverTarget::Node("a".to_owned())))
        );
        let tooltip = fixture.controller.tooltip().unwrap();
        assert_eq!(tooltip.anchor, pos2(115.0, 85.0));
        assert_eq!(tooltip.content.lines(), vec!["a", "Type: topic", "first"]);
    }

    #[test]
    fn hovering_an_edge_falls_back_to_no_description() {
        let mut fixture = Fixture::new();
        fixture.send(PointerEvent::Move {
            position: pos2(200.0, 103.0),
        });

        assert!(matches!(fixture.controller.hover(), Some(HoverTarget::Edge(_))));
        let lines = fixture.controller.tooltip().unwrap().content.lines();
        assert_eq!(lines, vec!["links", "No description"]);
    }

    #[test]
    fn hover_change_replaces_tooltip_and_leave_releases_it() {
        let mut fixture = Fixture::new();
        fixture.send(PointerEvent::Move {
            position: pos2(100.0, 100.0),
        });
        fixture.send(PointerEvent::Move {
            position: pos2(300.0, 100.0),
        });
        let lines = fixture.controller.tooltip().unwrap().content.lines();
        assert_eq!(lines[0], "b");
        assert_eq!(lines[2], "No description");

        fixture.send(PointerEvent::Move {
            position: pos2(600.0, 600.0),
        });
        assert!(fixture.controller.tooltip().is_none());

        fixture.send(PointerEvent::Move {
            position: pos2(300.0, 100.0),
        });
        assert_eq!(fixture.send(PointerEvent::Leave), InteractionOutcome::Left);
        assert!(fixture.controller.tooltip().is_none());
        assert!(fixture.controller.hover().is_none());
    }

    #[test]
    fn drag_pins_follows_pointer_and_releases() {
        let mut fixture = Fixture::new();
        let outcome = fixture.send(PointerEvent::Down {
            position: pos2(110.0, 100.0),
        });
        assert_eq!(outcome, InteractionOutcome::DragStarted("a".to_owned()));
        assert!(fixture.layout.body("a").unwrap().is_pinned());

        fixture.send(PointerEvent::Move {
            position: pos2(160.0, 250.0),
        });
        assert_eq!(fixture.layout.position("a"), Some(vec2(150.0, 250.0)));
        assert_eq!(fixture.controller.dragging(), Some("a"));

        let outcome = fixture.send(PointerEvent::Up {
            position: pos2(160.0, 250.0),
        });
        assert_eq!(outcome, InteractionOutcome::DragEnded("a".to_owned()));
        assert!(!fixture.layout.body("a").unwrap().is_pinned());
        assert!(fixture.controller.dragging().is_none());
    }

    #[test]
    fn hovered_node_is_grabbable_at_its_drawn_radius() {
        let mut fixture = Fixture::new();
        assert_eq!(
            fixture.send(PointerEvent::Move {
                position: pos2(100.0, 123.0),
            }),
            InteractionOutcome::Idle
        );

        fixture.send(PointerEvent::Move {
            position: pos2(100.0, 100.0),
        });
        assert_eq!(
            fixture.send(PointerEvent::Move {
                position: pos2(100.0, 123.0),
            }),
            InteractionOutcome::Idle
        );
        assert_eq!(fixture.controller.hover(), Some(&HoverTarget::Node("a".to_owned())));

        assert_eq!(
            fixture.send(PointerEvent::Down {
                position: pos2(100.0, 123.0),
            }),
            InteractionOutcome::DragStarted("a".to_owned())
        );
    }

    #[test]
    fn background_drag_pans_the_viewport() {
        let mut fixture = Fixture::new();
        fixture.send(PointerEvent::Down {
            position: pos2(500.0, 500.0),
        });
        assert!(fixture.controller.is_panning());

        fixture.send(PointerEvent::Move {
            position: pos2(520.0, 490.0),
        });
        assert_eq!(fixture.viewport.translate, vec2(20.0, -10.0));

        assert_eq!(
            fixture.send(PointerEvent::Up {
                position: pos2(520.0, 490.0)
            }),
            InteractionOutcome::PanEnded
        );
    }

    #[test]
    fn wheel_zoom_is_clamped() {
        let mut fixture = Fixture::new();
        for _ in 0..200 {
            fixture.send(PointerEvent::Wheel {
                position: pos2(50.0, 50.0),
                delta: 500.0,
            });
        }
        assert_eq!(fixture.viewport.scale, 4.0);

        for _ in 0..200 {
            fixture.send(PointerEvent::Wheel {
                position: pos2(50.0, 50.0),
                delta: -500.0,
            });
        }
        assert_eq!(fixture.viewport.scale, 0.1);
    }

    #[test]
    fn teardown_releases_state_and_ignores_later_events() {
        let mut fixture = Fixture::new();
        fixture.send(PointerEvent::Down {
            position: pos2(100.0, 100.0),
        });
        fixture.controller.teardown(&mut fixture.layout);

        assert!(!fixture.layout.body("a").unwrap().is_pinned());
        assert!(fixture.controller.tooltip().is_none());
        for event in [
            PointerEvent::Down {
                position: pos2(100.0, 100.0),
            },
            PointerEvent::Move {
                position: pos2(1.0, 1.0),
            },
            PointerEvent::Wheel {
                position: pos2(1.0, 1.0),
                delta: 100.0,
            },
            PointerEvent::Leave,
        ] {
            assert_eq!(fixture.send(event), InteractionOutcome::Ignored);
        }
        assert_eq!(fixture.viewport, Viewport::default());
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let start = vec2(0.0, 0.0);
        let end = vec2(10.0, 0.0);
        assert_eq!(segment_distance(vec2(5.0, 3.0), start, end), 3.0);
        assert_eq!(segment_distance(vec2(-4.0, 3.0), start, end), 5.0);
        assert_eq!(segment_distance(vec2(1.0, 1.0), start, start), 2.0_f32.sqrt());
    }
}
