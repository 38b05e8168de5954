// lib/src/engine/serialization.rs

//! JSON document form of a graph:
//!
//! ```json
//! { "_id": "...", "_created": "...", "_nodes": { "<id>": {...} }, "_edges": { "<id>": {...} } }
//! ```
//!
//! `_error` is never written, since a failed graph refuses to serialize. On
//! the way in it is honoured: a document with a non-null `_error` becomes a
//! failed graph.

use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use models::{Clock, Edge, GraphError, GraphResult, Identifier, Node, SystemClock, Timestamp};

use crate::config::{GraphConfig, JsonOptions, PRETTY_JSON_INDENT};
use crate::engine::entity_map::EntityMap;
use crate::engine::graph::{DiGraph, GraphState, Snapshot};

#[derive(Serialize)]
struct GraphDocumentRef<'a, N, E> {
    #[serde(rename = "_id")]
    id: &'a Identifier,
    #[serde(rename = "_created")]
    created: Timestamp,
    #[serde(rename = "_nodes")]
    nodes: &'a EntityMap<Node<N>>,
    #[serde(rename = "_edges")]
    edges: &'a EntityMap<Edge<E>>,
}

#[derive(Deserialize)]
struct GraphDocument<N, E> {
    #[serde(rename = "_id")]
    id: Identifier,
    #[serde(rename = "_created")]
    created: Option<Timestamp>,
    #[serde(rename = "_nodes")]
    nodes: Option<EntityMap<Node<N>>>,
    #[serde(rename = "_edges")]
    edges: Option<EntityMap<Edge<E>>>,
    #[serde(rename = "_error")]
    error: Option<Value>,
}

/// Reads a stored `_error` back into an error value. `null` means no error.
fn restore_error(raw: Value) -> Option<GraphError> {
    match raw {
        Value::Null => None,
        Value::String(message) => Some(GraphError::Restored(message)),
        Value::Object(ref fields) => match fields.get("message").and_then(Value::as_str) {
            Some(message) => Some(GraphError::Restored(message.to_string())),
            None => Some(GraphError::Restored(raw.to_string())),
        },
        other => Some(GraphError::Restored(other.to_string())),
    }
}

impl<N: Serialize, E: Serialize> DiGraph<N, E> {
    /// Serializes the graph to JSON text.
    ///
    /// A failed graph returns its stored error. Payloads that cannot be
    /// represented in JSON yield a `SerializationError`.
    pub fn to_json(&self, options: JsonOptions) -> GraphResult<String> {
        let snapshot = match &self.state {
            GraphState::Failed(_, error) => return Err(error.clone()),
            GraphState::Valid(snapshot) => snapshot,
        };
        let document = GraphDocumentRef {
            id: snapshot.id(),
            created: snapshot.created(),
            nodes: snapshot.nodes(),
            edges: snapshot.edges(),
        };

        let written = if options.pretty {
            let mut buf = Vec::new();
            let result = {
                let formatter = PrettyFormatter::with_indent(PRETTY_JSON_INDENT);
                let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
                document.serialize(&mut serializer)
            };
            result
                .map_err(|e| e.to_string())
                .and_then(|()| String::from_utf8(buf).map_err(|e| e.to_string()))
        } else {
            serde_json::to_string(&document).map_err(|e| e.to_string())
        };

        match written {
            Ok(json) => {
                debug!("Serialized graph {} ({} bytes)", snapshot.id(), json.len());
                Ok(json)
            }
            Err(e) => {
                error!("Failed to serialize graph {}: {}", snapshot.id(), e);
                Err(GraphError::SerializationError(e))
            }
        }
    }

    /// `to_json` with the options from a loaded configuration.
    pub fn to_json_with_config(&self, config: &GraphConfig) -> GraphResult<String> {
        self.to_json(config.json)
    }
}

impl<N: DeserializeOwned, E: DeserializeOwned> DiGraph<N, E> {
    /// Rebuilds a graph from JSON text produced by `to_json`.
    ///
    /// `_id` is required. A missing `_created` is stamped with the current
    /// time; missing `_nodes`/`_edges` are empty. Edges are not checked
    /// against the nodes they name.
    ///
    /// Every id in the document, `_id` and the node and edge keys included,
    /// must be non-empty; an empty id is a `DeserializationError`.
    pub fn from_json(json: &str) -> GraphResult<Self> {
        Self::from_json_with_clock(json, &SystemClock)
    }

    /// `from_json`, taking the fallback creation time from `clock`.
    pub fn from_json_with_clock(json: &str, clock: &impl Clock) -> GraphResult<Self> {
        let document: GraphDocument<N, E> = serde_json::from_str(json).map_err(|e| {
            debug!("Rejected graph document: {}", e);
            GraphError::from(e)
        })?;

        let snapshot = Snapshot::from_parts(
            document.id,
            document
                .created
                .unwrap_or_else(|| Timestamp::from_instant(Some(clock.now()))),
            document.nodes.unwrap_or_default(),
            document.edges.unwrap_or_default(),
        );
        debug!(
            "Deserialized graph {} ({} nodes, {} edges)",
            snapshot.id(),
            snapshot.nodes().len(),
            snapshot.edges().len()
        );

        Ok(match document.error.and_then(restore_error) {
            Some(error) => DiGraph::failed(snapshot, error),
            None => DiGraph::from_snapshot(snapshot),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use models::{EntityFactory, FixedClock, SequentialIds};
    use std::collections::HashMap;

    fn factory() -> EntityFactory<SequentialIds, FixedClock> {
        EntityFactory::with_providers(
            SequentialIds::new("id"),
            FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
        )
    }

    fn two_nodes_one_edge() -> DiGraph<String, String> {
        let f = factory();
        let a = f.new_node("A".to_string());
        let b = f.new_node("B".to_string());
        let e = f.new_edge(a.id().clone(), b.id().clone(), "x".to_string());
        DiGraph::with_identity(
            Identifier::new("g").unwrap(),
            Timestamp::parse("2024-03-01T00:00:00.000Z").unwrap(),
        )
        .set_node(a)
        .set_node(b)
        .set_edge(e)
    }

    #[test]
    fn writes_the_documented_shape() {
        let json = two_nodes_one_edge().to_json(JsonOptions::compact()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["_id"], "g");
        assert_eq!(value["_created"], "2024-03-01T00:00:00.000Z");
        assert_eq!(value["_nodes"]["id-1"]["value"], "A");
        assert_eq!(value["_nodes"]["id-1"]["edgeIdsOut"][0], "id-3");
        assert_eq!(value["_nodes"]["id-2"]["edgeIdsIn"][0], "id-3");
        assert_eq!(value["_edges"]["id-3"]["fromId"], "id-1");
        assert_eq!(value["_edges"]["id-3"]["toId"], "id-2");
        assert!(value.get("_error").is_none());
        assert!(!json.contains('\n'));
    }

    #[test]
    fn pretty_uses_two_space_indent() {
        let json = two_nodes_one_edge().to_json(JsonOptions::pretty()).unwrap();
        assert!(json.starts_with("{\n  \"_id\": \"g\""));
        let config = GraphConfig {
            json: JsonOptions::pretty(),
        };
        assert_eq!(two_nodes_one_edge().to_json_with_config(&config).unwrap(), json);
    }

    #[test]
    fn failed_graph_returns_its_error() {
        let f = factory();
        let g: DiGraph<String, String> = two_nodes_one_edge().set_edge(f.new_edge(
            Identifier::new("missing").unwrap(),
            Identifier::new("gone").unwrap(),
            String::new(),
        ));
        let err = g.to_json(JsonOptions::default()).unwrap_err();
        assert_eq!(Some(&err), g.error());
    }

    #[test]
    fn unrepresentable_payload_is_a_serialization_error() {
        let f = factory();
        let mut value = HashMap::new();
        value.insert((1, 2), "tuple keys are not JSON object keys");
        let g: DiGraph<HashMap<(i32, i32), &str>> =
            DiGraph::with_identity(Identifier::new("g").unwrap(), Timestamp::now())
                .set_node(f.new_node(value));
        let err = g.to_json(JsonOptions::default()).unwrap_err();
        assert!(matches!(err, GraphError::SerializationError(_)));
        assert!(g.is_valid());
    }

    #[test]
    fn round_trip_keeps_identity_counts_and_order() {
        let g = two_nodes_one_edge();
        let json = g.to_json(JsonOptions::default()).unwrap();
        let back: DiGraph<String, String> = DiGraph::from_json(&json).unwrap();
        assert_eq!(back.id(), g.id());
        assert_eq!(back.created(), g.created());
        assert_eq!(back.node_count(), g.node_count());
        assert_eq!(back.edge_count(), g.edge_count());
        assert_eq!(back.node_values(), g.node_values());
        assert_eq!(back.get_node("id-1").unwrap().edge_ids_out(), g.get_node("id-1").unwrap().edge_ids_out());
        assert!(back.is_valid());
    }

    #[test]
    fn defaults_missing_fields() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
        let g: DiGraph<u32, u32> = DiGraph::from_json_with_clock(r#"{"_id":"bare"}"#, &clock).unwrap();
        assert_eq!(g.id(), "bare");
        assert_eq!(g.created().to_string(), "2030-01-01T00:00:00.000Z");
        assert!(!g.has_nodes());
        assert!(!g.has_edges());
        assert!(g.is_valid());

        let g: DiGraph<u32, u32> =
            DiGraph::from_json(r#"{"_id":"nulls","_nodes":null,"_edges":null,"_error":null}"#).unwrap();
        assert_eq!(g.node_count(), 0);
        assert!(g.error().is_none());
    }

    #[test]
    fn requires_an_id() {
        let err = DiGraph::<u32, u32>::from_json(r#"{"_nodes":{}}"#).unwrap_err();
        assert!(matches!(err, GraphError::DeserializationError(_)));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Weight(u32);

    fn read<N: DeserializeOwned, E: DeserializeOwned>(json: &str) -> GraphResult<DiGraph<N, E>> {
        DiGraph::from_json(json)
    }

    #[test]
    fn payloads_need_no_default() {
        let json = r#"{
            "_id": "g",
            "_nodes": {
                "n": {"id":"n","created":"2024-01-01T00:00:00.000Z","value":5}
            }
        }"#;
        let g: DiGraph<Weight, Weight> = read(json).unwrap();
        assert_eq!(g.node_values(), vec![&Weight(5)]);
        assert!(g.get_node("n").unwrap().is_isolated());
        assert!(!g.has_edges());
    }

    #[test]
    fn empty_ids_are_rejected() {
        let err = DiGraph::<u32, u32>::from_json(r#"{"_id":"","_nodes":{}}"#).unwrap_err();
        assert!(matches!(err, GraphError::DeserializationError(_)));
        assert!(err.to_string().contains("identifier has invalid length"));

        let keyed = r#"{"_id":"g","_nodes":{"":{"id":"n","created":"2024-01-01T00:00:00.000Z","value":1}}}"#;
        assert!(DiGraph::<u32, u32>::from_json(keyed).is_err());
    }

    #[test]
    fn rejects_malformed_text() {
        let err = DiGraph::<u32, u32>::from_json("{not json").unwrap_err();
        assert!(matches!(err, GraphError::DeserializationError(_)));
        assert!(DiGraph::<u32, u32>::from_json(r#"{"_id":"g","_created":"soon"}"#).is_err());
        assert!(DiGraph::<u32, u32>::from_json(r#"{"_id":"g","_nodes":[]}"#).is_err());
    }

    #[test]
    fn stored_error_yields_failed_graph() {
        let g: DiGraph<u32, u32> =
            DiGraph::from_json(r#"{"_id":"g","_error":{"message":"undefined edge: fromId=a; toId=b"}}"#)
                .unwrap();
        assert!(g.is_failed());
        assert_eq!(g.error().unwrap().to_string(), "undefined edge: fromId=a; toId=b");

        let g: DiGraph<u32, u32> = DiGraph::from_json(r#"{"_id":"g","_error":"boom"}"#).unwrap();
        assert_eq!(g.error(), Some(&GraphError::Restored("boom".to_string())));
    }

    #[test]
    fn edges_are_not_rechecked_on_read() {
        let json = r#"{
            "_id": "g",
            "_edges": {
                "e1": {"id":"e1","created":"2024-01-01T00:00:00.000Z","fromId":"a","toId":"b","value":1}
            }
        }"#;
        let g: DiGraph<u32, u32> = DiGraph::from_json(json).unwrap();
        assert!(g.is_valid());
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_bad_edges());
    }
}
