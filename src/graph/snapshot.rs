use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use super::parse::RawSnapshot;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("node id must not be empty")]
    EmptyNodeId,

    #[error("duplicate node id {0:?}")]
    DuplicateNode(String),

    #[error("edge #{ordinal} references missing source node {id:?}")]
    DanglingSource { ordinal: usize, id: String },

    #[error("edge #{ordinal} references missing target node {id:?}")]
    DanglingTarget { ordinal: usize, id: String },
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Topic,
    Concept,
    Field,
    Document,
    Entity,
    Other(String),
}

impl NodeKind {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "topic" => Self::Topic,
            "concept" => Self::Concept,
            "field" => Self::Field,
            "document" => Self::Document,
            "entity" => Self::Entity,
            _ => Self::Other(trimmed.to_owned()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Topic => "topic",
            Self::Concept => "concept",
            Self::Field => "field",
            Self::Document => "document",
            Self::Entity => "entity",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of an edge: its endpoints plus its position in the snapshot's
/// edge list, so parallel edges between one pair stay distinct.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId {
    source: String,
    target: String,
    ordinal: usize,
}

impl EdgeId {
    pub fn derive(source: &str, target: &str, ordinal: usize) -> Self {
        Self {
            source: source.to_owned(),
            target: target.to_owned(),
            ordinal,
        }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.source, self.target, self.ordinal)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: String,
    pub target: String,
    pub relationship: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    pub fn from_raw(raw: RawSnapshot) -> SnapshotResult<Self> {
        let mut builder = SnapshotBuilder::default();
        for node in raw.nodes {
            builder = builder.node(&node.id, &node.kind, node.description.as_deref());
        }
        for edge in raw.edges {
            builder = builder.described_edge(
                &edge.source,
                &edge.target,
                &edge.relationship,
                edge.description.as_deref(),
            );
        }
        builder.build()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(super) fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }
}

struct PendingEdge {
    source: String,
    target: String,
    relationship: String,
    description: Option<String>,
}

#[derive(Default)]
pub struct SnapshotBuilder {
    nodes: Vec<Node>,
    edges: Vec<PendingEdge>,
}

impl SnapshotBuilder {
    pub fn node(mut self, id: &str, kind: &str, description: Option<&str>) -> Self {
        self.nodes.push(Node {
            id: id.trim().to_owned(),
            kind: NodeKind::parse(kind),
            description: normalize_description(description),
        });
        self
    }

    pub fn edge(self, source: &str, target: &str, relationship: &str) -> Self {
        self.described_edge(source, target, relationship, None)
    }

    pub fn described_edge(
        mut self,
        source: &str,
        target: &str,
        relationship: &str,
        description: Option<&str>,
    ) -> Self {
        self.edges.push(PendingEdge {
            source: source.trim().to_owned(),
            target: target.trim().to_owned(),
            relationship: relationship.trim().to_owned(),
            description: normalize_description(description),
        });
        self
    }

    pub fn build(self) -> SnapshotResult<GraphSnapshot> {
        let mut known = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if node.id.is_empty() {
                return Err(SnapshotError::EmptyNodeId);
            }
            if !known.insert(node.id.as_str()) {
                return Err(SnapshotError::DuplicateNode(node.id.clone()));
            }
        }

        let mut edges = Vec::with_capacity(self.edges.len());
        for (ordinal, pending) in self.edges.into_iter().enumerate() {
            if !known.contains(pending.source.as_str()) {
                return Err(SnapshotError::DanglingSource {
                    ordinal,
                    id: pending.source,
                });
            }
            if !known.contains(pending.target.as_str()) {
                return Err(SnapshotError::DanglingTarget {
                    ordinal,
                    id: pending.target,
                });
            }

            edges.push(Edge {
                id: EdgeId::derive(&pending.source, &pending.target, ordinal),
                source: pending.source,
                target: pending.target,
                relationship: pending.relationship,
                description: pending.description,
            });
        }

        Ok(GraphSnapshot {
            nodes: self.nodes,
            edges,
        })
    }
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}
