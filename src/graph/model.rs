use std::collections::{HashMap, HashSet};

use super::snapshot::{Edge, EdgeId, GraphSnapshot, Node};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdSets {
    pub nodes: HashSet<String>,
    pub edges: HashSet<EdgeId>,
}

/// The node/edge set currently on screen. Only ever replaced wholesale from a
/// validated [`GraphSnapshot`], so every edge endpoint resolves.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
    endpoints: Vec<(usize, usize)>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut model = Self::new();
        model.replace(snapshot);
        model
    }

    pub fn replace(&mut self, snapshot: GraphSnapshot) {
        let (nodes, edges) = snapshot.into_parts();

        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_id.insert(node.id.clone(), index);
        }

        let endpoints = edges
            .iter()
            .filter_map(|edge| {
                Some((
                    *index_by_id.get(&edge.source)?,
                    *index_by_id.get(&edge.target)?,
                ))
            })
            .collect::<Vec<_>>();
        debug_assert_eq!(endpoints.len(), edges.len());

        self.nodes = nodes;
        self.edges = edges;
        self.index_by_id = index_by_id;
        self.endpoints = endpoints;
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.index_by_id.clear();
        self.endpoints.clear();
    }

    pub fn current_ids(&self) -> IdSets {
        IdSets {
            nodes: self.nodes.iter().map(|node| node.id.clone()).collect(),
            edges: self.edges.iter().map(|edge| edge.id.clone()).collect(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_endpoints(&self) -> &[(usize, usize)] {
        &self.endpoints
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|edge| &edge.id == id)
    }

    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.endpoints.iter().filter_map(move |&(source, target)| {
            if source == index {
                Some(target)
            } else if target == index {
                Some(source)
            } else {
                None
            }
        })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
