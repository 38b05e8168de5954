// models/src/nodes.rs

use serde::{Deserialize, Serialize};

use crate::identifiers::Identifier;
use crate::timestamps::Timestamp;

/// A node carrying a payload of type `N`.
///
/// `id` and `created` never change once the node exists. Adjacency lists hold
/// edge ids, newest first, and are only grown when a container admits an edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node<N> {
    id: Identifier,
    created: Timestamp,
    value: N,
    #[serde(default)]
    edge_ids_out: Vec<Identifier>,
    #[serde(default)]
    edge_ids_in: Vec<Identifier>,
}

impl<N> Node<N> {
    /// Creates an unattached node with empty adjacency lists.
    pub fn new(id: Identifier, created: Timestamp, value: N) -> Self {
        Node {
            id,
            created,
            value,
            edge_ids_out: Vec::new(),
            edge_ids_in: Vec::new(),
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn created(&self) -> Timestamp {
        self.created
    }

    pub fn value(&self) -> &N {
        &self.value
    }

    /// Outgoing edge ids, most recently admitted first.
    pub fn edge_ids_out(&self) -> &[Identifier] {
        &self.edge_ids_out
    }

    /// Incoming edge ids, most recently admitted first.
    pub fn edge_ids_in(&self) -> &[Identifier] {
        &self.edge_ids_in
    }

    /// True when no edge id is recorded in either direction.
    pub fn is_isolated(&self) -> bool {
        self.edge_ids_out.is_empty() && self.edge_ids_in.is_empty()
    }

    /// Replaces the payload, keeping identity and adjacency.
    pub fn with_value<T>(self, value: T) -> Node<T> {
        Node {
            id: self.id,
            created: self.created,
            value,
            edge_ids_out: self.edge_ids_out,
            edge_ids_in: self.edge_ids_in,
        }
    }

    /// Builds a node with a transformed payload, keeping identity and adjacency.
    pub fn map_value<T>(&self, f: impl FnOnce(&N) -> T) -> Node<T> {
        Node {
            id: self.id.clone(),
            created: self.created,
            value: f(&self.value),
            edge_ids_out: self.edge_ids_out.clone(),
            edge_ids_in: self.edge_ids_in.clone(),
        }
    }

    /// Prepends `edge_id` to the outgoing list.
    pub fn with_edge_out(mut self, edge_id: Identifier) -> Self {
        self.edge_ids_out.insert(0, edge_id);
        self
    }

    /// Prepends `edge_id` to the incoming list.
    pub fn with_edge_in(mut self, edge_id: Identifier) -> Self {
        self.edge_ids_in.insert(0, edge_id);
        self
    }
}
