use std::time::{Duration, Instant};

use eframe::egui::Vec2;
use tracing::{debug, info, warn};

use crate::config::LayoutConfig;
use crate::graph::{GraphModel, GraphSnapshot, RawSnapshot, SnapshotResult, diff};
use crate::highlight::HighlightSet;
use crate::interaction::{InteractionController, InteractionOutcome, PointerEvent};
use crate::layout::{EMPHASIZED_RADIUS, LayoutEngine, SeedPolicy, TickReport};
use crate::render::{FrameInput, RenderSurface, Scene};
use crate::util::plural;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeReport {
    pub new_node_ids: Vec<String>,
    /// `(source, target, relationship)` of every added edge.
    pub new_edges: Vec<(String, String, String)>,
    pub node_count: usize,
    pub edge_count: usize,
}

impl MergeReport {
    pub fn is_empty(&self) -> bool {
        self.new_node_ids.is_empty() && self.new_edges.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No new nodes or edges".to_owned();
        }

        let mut summary = format!(
            "Added {} and {}",
            plural(self.new_node_ids.len(), "node", "nodes"),
            plural(self.new_edges.len(), "edge", "edges")
        );
        if !self.new_node_ids.is_empty() {
            summary.push_str(": ");
            summary.push_str(&self.new_node_ids.join(", "));
        }
        summary
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub tick: TickReport,
    pub highlight_expired: bool,
    pub animating: bool,
}

/// Owns the graph core and sequences merge, reseed, tick, interaction and
/// draw. Every mutation goes through a `&mut self` call, so a frame never sees
/// a model and layout out of step.
pub struct GraphExplorer {
    model: GraphModel,
    layout: LayoutEngine,
    surface: RenderSurface,
    interaction: InteractionController,
    highlight: HighlightSet,
    graph_id: Option<String>,
    last_merge: Option<MergeReport>,
    torn_down: bool,
}

impl GraphExplorer {
    pub fn new(config: LayoutConfig, size: Vec2) -> Self {
        let surface = RenderSurface::new(size);
        let layout = LayoutEngine::new(config, surface.center());
        Self {
            model: GraphModel::new(),
            layout,
            surface,
            interaction: InteractionController::new(),
            highlight: HighlightSet::new(),
            graph_id: None,
            last_merge: None,
            torn_down: false,
        }
    }

    pub fn with_snapshot(config: LayoutConfig, size: Vec2, snapshot: GraphSnapshot) -> Self {
        let mut explorer = Self::new(config, size);
        explorer.model.replace(snapshot);
        explorer.layout.reseed(&explorer.model, SeedPolicy::Fresh);
        explorer
    }

    /// Diffs `snapshot` against the current graph, installs it and reseeds the
    /// layout in one step. Added nodes are highlighted until the timeout.
    pub fn merge(&mut self, snapshot: GraphSnapshot, now: Instant) -> MergeReport {
        let policy = if self.layout.config().carry_over_positions {
            SeedPolicy::CarryOver
        } else {
            SeedPolicy::Fresh
        };
        let report = self.install(snapshot, policy);

        self.highlight.flag(report.new_node_ids.iter().cloned(), now);
        for id in &report.new_node_ids {
            self.layout.set_radius(id, EMPHASIZED_RADIUS);
        }

        info!(
            new_nodes = report.new_node_ids.len(),
            new_edges = report.new_edges.len(),
            nodes = report.node_count,
            edges = report.edge_count,
            "merged snapshot"
        );
        debug!(ids = ?report.new_node_ids, "highlighted new nodes");

        self.last_merge = Some(report.clone());
        report
    }

    /// Validates a wire snapshot and merges it. A malformed snapshot leaves
    /// the graph untouched.
    pub fn ingest_raw(&mut self, raw: RawSnapshot, now: Instant) -> SnapshotResult<MergeReport> {
        match GraphSnapshot::from_raw(raw) {
            Ok(snapshot) => Ok(self.merge(snapshot, now)),
            Err(error) => {
                warn!(%error, "rejected snapshot");
                self.interaction.release_all(&mut self.layout);
                Err(error)
            }
        }
    }

    /// Replaces the graph with a freshly laid out `snapshot`, re-reading the
    /// surface size. Nothing is highlighted.
    pub fn reload(&mut self, snapshot: GraphSnapshot, size: Vec2) -> MergeReport {
        self.highlight.clear();
        self.reinitialize_surface(size);
        let report = self.install(snapshot, SeedPolicy::Fresh);
        info!(
            nodes = report.node_count,
            edges = report.edge_count,
            "reloaded snapshot"
        );
        report
    }

    pub fn reset(&mut self, size: Vec2) {
        self.interaction.release_all(&mut self.layout);
        self.model.clear();
        self.layout.clear();
        self.highlight.clear();
        self.graph_id = None;
        self.last_merge = None;
        self.reinitialize_surface(size);
        info!("graph reset");
    }

    fn install(&mut self, snapshot: GraphSnapshot, policy: SeedPolicy) -> MergeReport {
        let added = diff(&self.model.current_ids(), &snapshot);
        let new_edges = added
            .relationship_summaries()
            .into_iter()
            .map(|(source, target, relationship)| {
                (source.to_owned(), target.to_owned(), relationship.to_owned())
            })
            .collect();

        self.interaction.release_all(&mut self.layout);
        self.model.replace(snapshot);
        self.layout.reseed(&self.model, policy);

        MergeReport {
            new_node_ids: added.new_node_ids,
            new_edges,
            node_count: self.model.node_count(),
            edge_count: self.model.edge_count(),
        }
    }

    fn reinitialize_surface(&mut self, size: Vec2) {
        self.surface.reinitialize(size);
        self.layout.set_center(self.surface.center());
    }

    pub fn frame(&mut self, now: Instant) -> FrameReport {
        let highlight_expired = self.highlight.expire_if_due(now);
        if highlight_expired {
            self.layout.reset_radii();
            debug!("highlight expired");
        }

        let tick = self.layout.tick();
        FrameReport {
            tick,
            highlight_expired,
            animating: tick.moving || self.interaction.dragging().is_some(),
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> InteractionOutcome {
        self.interaction.handle(
            event,
            &self.model,
            &mut self.layout,
            self.surface.viewport_mut(),
        )
    }

    pub fn scene(&self) -> Scene {
        self.surface.compose(FrameInput {
            model: &self.model,
            layout: &self.layout,
            highlight: &self.highlight,
            hover: self.interaction.hover(),
            tooltip: self.interaction.tooltip(),
        })
    }

    /// Stops ticking and releases the tooltip and pointer capture. Later
    /// pointer events are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.interaction.teardown(&mut self.layout);
        self.layout.stop();
        self.torn_down = true;
        debug!("explorer torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn set_config(&mut self, config: LayoutConfig) {
        self.layout.set_config(config);
    }

    pub fn config(&self) -> LayoutConfig {
        self.layout.config()
    }

    pub fn highlight_remaining(&self, now: Instant) -> Option<Duration> {
        self.highlight.remaining(now)
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn highlight(&self) -> &HighlightSet {
        &self.highlight
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn graph_id(&self) -> Option<&str> {
        self.graph_id.as_deref()
    }

    pub fn set_graph_id(&mut self, graph_id: Option<String>) {
        self.graph_id = graph_id;
    }

    pub fn last_merge(&self) -> Option<&MergeReport> {
        self.last_merge.as_ref()
    }
}
