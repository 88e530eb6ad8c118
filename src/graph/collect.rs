use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::parse::parse_snapshot_payload;
use super::snapshot::GraphSnapshot;

#[derive(Clone, Debug)]
pub struct CollectedSnapshot {
    pub snapshot: GraphSnapshot,
    pub graph_id: Option<String>,
}

pub fn collect_snapshot(path: &Path) -> Result<CollectedSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph payload from {}", path.display()))?;

    let payload = parse_snapshot_payload(&raw)
        .with_context(|| format!("failed to parse graph payload in {}", path.display()))?;

    let snapshot = GraphSnapshot::from_raw(payload.snapshot)
        .inspect_err(|error| warn!(path = %path.display(), %error, "refusing malformed snapshot"))
        .with_context(|| format!("malformed graph in {}", path.display()))?;

    info!(
        path = %path.display(),
        nodes = snapshot.nodes().len(),
        edges = snapshot.edges().len(),
        graph_id = payload.graph_id.as_deref().unwrap_or("-"),
        "collected graph snapshot"
    );

    Ok(CollectedSnapshot {
        snapshot,
        graph_id: payload.graph_id,
    })
}

pub fn demo_snapshot() -> GraphSnapshot {
    GraphSnapshot::builder()
        .node(
            "AI Research",
            "topic",
            Some("Artificial Intelligence research and development"),
        )
        .node("Machine Learning", "topic", Some("ML algorithms and techniques"))
        .node(
            "Neural Networks",
            "concept",
            Some("Deep learning neural network architectures"),
        )
        .node(
            "Data Science",
            "field",
            Some("Data analysis and scientific computing"),
        )
        .edge("AI Research", "Machine Learning", "includes")
        .edge("Machine Learning", "Neural Networks", "uses")
        .edge("Machine Learning", "Data Science", "overlaps")
        .build()
        .unwrap_or_default()
}
