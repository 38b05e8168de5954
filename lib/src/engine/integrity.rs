// lib/src/engine/integrity.rs

//! Read-only checks for the references a graph can lose.
//!
//! Admission keeps nodes and edges consistent, but `filter_nodes`,
//! `filter_edges` and `from_json` do not re-check. These report what is
//! dangling; nothing here repairs it.

use models::{Edge, Node};

use crate::engine::graph::DiGraph;

impl<N, E> DiGraph<N, E> {
    /// Nodes with no recorded edge in either direction.
    pub fn orphans(&self) -> Vec<&Node<N>> {
        self.nodes_where(|node| node.is_isolated())
    }

    pub fn has_orphans(&self) -> bool {
        self.iter_nodes().any(Node::is_isolated)
    }

    /// Edges whose source or target is not a node of this graph.
    pub fn bad_edges(&self) -> Vec<&Edge<E>> {
        self.iter_edges().filter(|edge| self.is_bad_edge(edge)).collect()
    }

    pub fn has_bad_edges(&self) -> bool {
        self.iter_edges().any(|edge| self.is_bad_edge(edge))
    }

    fn is_bad_edge(&self, edge: &Edge<E>) -> bool {
        self.get_node(edge.from_id()).is_none() || self.get_node(edge.to_id()).is_none()
    }
}
