// lib/src/lib.rs

//! A persistent, value-oriented directed graph.
//!
//! ```
//! use digraph::{new_edge, new_node, DiGraph, JsonOptions};
//!
//! let a = new_node("A");
//! let b = new_node("B");
//! let graph: DiGraph<&str> = DiGraph::new()
//!     .set_node(a.clone())
//!     .set_node(b.clone())
//!     .set_edge(new_edge(a.id().clone(), b.id().clone(), "knows".to_string()));
//!
//! assert_eq!(graph.edge_count(), 1);
//! assert_eq!(graph.get_node(a.id()).unwrap().edge_ids_out().len(), 1);
//! assert!(graph.to_json(JsonOptions::default()).is_ok());
//! ```

pub mod config;
pub mod engine;

pub use config::{GraphConfig, JsonOptions};
pub use engine::{DiGraph, EntityMap, Snapshot};

// Shared value types live in the `models` crate.
pub use models::{
    new_edge, new_node, Clock, Edge, EntityFactory, FixedClock, GraphError, GraphResult,
    IdGenerator, Identifier, Node, SequentialIds, SystemClock, Timestamp, UuidGenerator,
    ValidationError,
};
