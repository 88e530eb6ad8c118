//! Interactive knowledge-graph explorer: incremental snapshot merging, a
//! force-directed layout and an egui front end.

pub mod app;
pub mod config;
pub mod explorer;
pub mod graph;
pub mod highlight;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod util;

pub use explorer::{FrameReport, GraphExplorer, MergeReport};
