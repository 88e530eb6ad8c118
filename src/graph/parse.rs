use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RawNode {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RawEdge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RawSnapshot {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawTriplet {
    source: String,
    #[serde(default)]
    source_type: String,
    #[serde(default)]
    source_desc: String,
    target: String,
    #[serde(default)]
    target_type: String,
    #[serde(default)]
    target_desc: String,
    #[serde(default)]
    relation: String,
    #[serde(default)]
    relation_desc: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedPayload {
    pub snapshot: RawSnapshot,
    pub graph_id: Option<String>,
}

/// Accepts a bare `{nodes, edges}` graph, an upload response wrapping it as
/// `{graph, graph_id}`, or an extraction result `{triplets: [...]}`.
pub fn parse_snapshot_payload(raw: &str) -> Result<ParsedPayload> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in graph payload")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("unexpected JSON type for graph payload; expected an object"))?;

    if let Some(graph_value) = object.get("graph") {
        let graph_id = object
            .get("graph_id")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let snapshot =
            RawSnapshot::deserialize(graph_value).context("invalid graph object in upload response")?;
        return Ok(ParsedPayload { snapshot, graph_id });
    }

    if let Some(triplets_value) = object.get("triplets") {
        let triplets = Vec::<RawTriplet>::deserialize(triplets_value)
            .context("invalid triplet list in graph payload")?;
        return Ok(ParsedPayload {
            snapshot: snapshot_from_triplets(triplets),
            graph_id: None,
        });
    }

    if object.contains_key("nodes") || object.contains_key("edges") {
        let snapshot = RawSnapshot::deserialize(&parsed).context("invalid nodes/edges payload")?;
        return Ok(ParsedPayload {
            snapshot,
            graph_id: None,
        });
    }

    Err(anyhow!(
        "could not find graph data in payload; expected `nodes`/`edges`, `graph` or `triplets`"
    ))
}

fn snapshot_from_triplets(triplets: Vec<RawTriplet>) -> RawSnapshot {
    let mut nodes: Vec<RawNode> = Vec::new();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();
    let mut edges = Vec::with_capacity(triplets.len());

    let mut upsert = |id: &str, kind: &str, description: &str| {
        let description = Some(description.to_owned()).filter(|text| !text.trim().is_empty());
        match index_by_id.get(id) {
            Some(&index) => {
                if description.is_some() {
                    nodes[index].description = description;
                }
            }
            None => {
                index_by_id.insert(id.to_owned(), nodes.len());
                nodes.push(RawNode {
                    id: id.to_owned(),
                    kind: kind.to_owned(),
                    description,
                });
            }
        }
    };

    for triplet in triplets {
        upsert(&triplet.source, &triplet.source_type, &triplet.source_desc);
        upsert(&triplet.target, &triplet.target_type, &triplet.target_desc);
        edges.push(RawEdge {
            source: triplet.source,
            target: triplet.target,
            relationship: triplet.relation,
            description: Some(triplet.relation_desc).filter(|text| !text.trim().is_empty()),
        });
    }

    RawSnapshot { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_graph() {
        let payload = parse_snapshot_payload(
            r#"{
                "nodes": [{"id": "A", "type": "topic"}, {"id": "B", "type": "concept", "description": "b"}],
                "edges": [{"source": "A", "target": "B", "relationship": "uses"}]
            }"#,
        )
        .unwrap();

        assert_eq!(payload.graph_id, None);
        assert_eq!(payload.snapshot.nodes.len(), 2);
        assert_eq!(payload.snapshot.nodes[1].description.as_deref(), Some("b"));
        assert_eq!(payload.snapshot.edges[0].relationship, "uses");
    }

    #[test]
    fn parses_upload_response_with_graph_id() {
        let payload = parse_snapshot_payload(
            r#"{
                "graph_id": "g-42",
                "graph": {"nodes": [{"id": "A", "type": "topic", "description": null}], "edges": []}
            }"#,
        )
        .unwrap();

        assert_eq!(payload.graph_id.as_deref(), Some("g-42"));
        assert_eq!(payload.snapshot.nodes[0].id, "A");
        assert_eq!(payload.snapshot.nodes[0].description, None);
    }

    #[test]
    fn triplets_dedupe_nodes_in_first_seen_order() {
        let payload = parse_snapshot_payload(
            r#"{"triplets": [
                {"source": "Adam", "source_type": "Person", "source_desc": "",
                 "target": "Microsoft", "target_type": "Company", "target_desc": "Tech company",
                 "relation": "works_for", "relation_desc": "employee"},
                {"source": "Word", "source_type": "Product", "source_desc": "Editor",
                 "target": "Microsoft", "target_type": "Company", "target_desc": "Makes software",
                 "relation": "produced_by", "relation_desc": ""}
            ]}"#,
        )
        .unwrap();

        let ids = payload
            .snapshot
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["Adam", "Microsoft", "Word"]);
        assert_eq!(
            payload.snapshot.nodes[1].description.as_deref(),
            Some("Makes software")
        );
        assert_eq!(payload.snapshot.nodes[0].description, None);
        assert_eq!(payload.snapshot.edges.len(), 2);
        assert_eq!(payload.snapshot.edges[1].description, None);
    }

    #[test]
    fn rejects_payload_without_graph_data() {
        let error = parse_snapshot_payload(r#"{"detail": "Upload failed"}"#).unwrap_err();
        assert!(error.to_string().contains("could not find graph data"));

        assert!(parse_snapshot_payload("[1, 2]").is_err());
        assert!(parse_snapshot_payload("not json").is_err());
    }
}
