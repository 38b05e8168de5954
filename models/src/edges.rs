// models/src/edges.rs
use serde::{Deserialize, Serialize};

use crate::identifiers::Identifier;
use crate::timestamps::Timestamp;

/// A directed edge from `from_id` to `to_id` carrying a payload of type `E`.
///
/// Endpoints are plain node ids; whether they resolve is decided by the
/// container at admission time, never here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge<E> {
    id: Identifier,
    created: Timestamp,
    from_id: Identifier,
    to_id: Identifier,
    value: E,
}

impl<E> Edge<E> {
    /// Create an edge.
    ///
    /// # Arguments
    /// * `id`: the edge's own id
    /// * `created`: creation instant
    /// * `from_id`: source node
    /// * `to_id`: target node
    /// * `value`: payload
    pub fn new(id: Identifier, created: Timestamp, from_id: Identifier, to_id: Identifier, value: E) -> Self {
        Edge {
            id,
            created,
            from_id,
            to_id,
            value,
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn created(&self) -> Timestamp {
        self.created
    }

    pub fn from_id(&self) -> &Identifier {
        &self.from_id
    }

    pub fn to_id(&self) -> &Identifier {
        &self.to_id
    }

    pub fn value(&self) -> &E {
        &self.value
    }

    /// Replaces the payload, keeping identity and endpoints.
    pub fn with_value<T>(self, value: T) -> Edge<T> {
        Edge {
            id: self.id,
            created: self.created,
            from_id: self.from_id,
            to_id: self.to_id,
            value,
        }
    }

    /// Builds an edge with a transformed payload, keeping identity and endpoints.
    pub fn map_value<T>(&self, f: impl FnOnce(&E) -> T) -> Edge<T> {
        Edge {
            id: self.id.clone(),
            created: self.created,
            from_id: self.from_id.clone(),
            to_id: self.to_id.clone(),
            value: f(&self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    #[test]
    fn serializes_endpoints_as_from_id_and_to_id() {
        let edge = Edge::new(
            id("e1"),
            Timestamp::parse("2024-01-01T00:00:00.000Z").unwrap(),
            id("a"),
            id("b"),
            "x".to_string(),
        );
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["fromId"], "a");
        assert_eq!(json["toId"], "b");
        assert_eq!(json["value"], "x");

        let back: Edge<String> = serde_json::from_value(json).unwrap();
        assert_eq!(back, edge);
    }

    #[test]
    fn map_value_keeps_endpoints() {
        let edge = Edge::new(id("e1"), Timestamp::now(), id("a"), id("b"), 10);
        let mapped = edge.map_value(|v| format!("w{}", v));
        assert_eq!(mapped.from_id(), edge.from_id());
        assert_eq!(mapped.to_id(), edge.to_id());
        assert_eq!(mapped.value(), "w10");
    }
}
