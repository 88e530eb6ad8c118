mod collect;
mod diff;
mod model;
mod parse;
mod snapshot;

pub use collect::{CollectedSnapshot, collect_snapshot, demo_snapshot};
pub use diff::{GraphDiff, diff};
pub use model::{GraphModel, IdSets};
pub use parse::{ParsedPayload, RawEdge, RawNode, RawSnapshot, parse_snapshot_payload};
pub use snapshot::{
    Edge, EdgeId, GraphSnapshot, Node, NodeKind, SnapshotBuilder, SnapshotError, SnapshotResult,
};
