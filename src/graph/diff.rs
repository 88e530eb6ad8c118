use super::model::IdSets;
use super::snapshot::{Edge, GraphSnapshot};

/// What a snapshot adds on top of a previous id set. Removals are not
/// tracked: a shrinking snapshot simply replaces the model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphDiff {
    pub new_node_ids: Vec<String>,
    pub new_edges: Vec<Edge>,
}

impl GraphDiff {
    pub fn is_empty(&self) -> bool {
        self.new_node_ids.is_empty() && self.new_edges.is_empty()
    }

    pub fn relationship_summaries(&self) -> Vec<(&str, &str, &str)> {
        self.new_edges
            .iter()
            .map(|edge| {
                (
                    edge.source.as_str(),
                    edge.target.as_str(),
                    edge.relationship.as_str(),
                )
            })
            .collect()
    }
}

pub fn diff(previous: &IdSets, snapshot: &GraphSnapshot) -> GraphDiff {
    let new_node_ids = snapshot
        .nodes()
        .iter()
        .filter(|node| !previous.nodes.contains(&node.id))
        .map(|node| node.id.clone())
        .collect();

    let new_edges = snapshot
        .edges()
        .iter()
        .filter(|edge| !previous.edges.contains(&edge.id))
        .cloned()
        .collect();

    GraphDiff {
        new_node_ids,
        new_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphModel;

    fn ids_of(snapshot: &GraphSnapshot) -> IdSets {
        GraphModel::from_snapshot(snapshot.clone()).current_ids()
    }

    fn base() -> GraphSnapshot {
        GraphSnapshot::builder()
            .node("AI Research", "topic", None)
            .node("Machine Learning", "topic", None)
            .edge("AI Research", "Machine Learning", "includes")
            .build()
            .unwrap()
    }

    #[test]
    fn diff_against_itself_is_empty() {
        let snapshot = base();
        let result = diff(&ids_of(&snapshot), &snapshot);
        assert!(result.is_empty());
    }

    #[test]
    fn vacuous_prior_state_reports_everything() {
        let snapshot = base();
        let result = diff(&IdSets::default(), &snapshot);

        assert_eq!(result.new_node_ids, ["AI Research", "Machine Learning"]);
        assert_eq!(result.new_edges.len(), 1);
    }

    #[test]
    fn growth_is_reported_in_snapshot_order() {
        let grown = GraphSnapshot::builder()
            .node("Zeta", "concept", None)
            .node("AI Research", "topic", None)
            .node("Alpha", "concept", None)
            .node("Machine Learning", "topic", None)
            .build()
            .unwrap();

        let result = diff(&ids_of(&base()), &grown);
        assert_eq!(result.new_node_ids, ["Zeta", "Alpha"]);
    }

    #[test]
    fn removals_are_not_reported() {
        let shrunk = GraphSnapshot::builder()
            .node("AI Research", "topic", None)
            .build()
            .unwrap();

        let result = diff(&ids_of(&base()), &shrunk);
        assert!(result.is_empty());
    }

    #[test]
    fn relationship_summaries_follow_new_edges() {
        let grown = GraphSnapshot::builder()
            .node("AI Research", "topic", None)
            .node("Machine Learning", "topic", None)
            .node("Ethics", "concept", None)
            .edge("AI Research", "Machine Learning", "includes")
            .edge("AI Research", "Ethics", "raises")
            .build()
            .unwrap();

        let result = diff(&ids_of(&base()), &grown);
        assert_eq!(
            result.relationship_summaries(),
            [("AI Research", "Ethics", "raises")]
        );
    }
}
