// lib/src/engine/traversal.rs

//! Filter, for-each, map and reduce over a graph's storage order.
//!
//! Filters and maps derive a new graph with the same id, creation time and
//! state (a failed graph stays failed). Filters do not repair adjacency: a
//! node removed by `filter_nodes` may still be named by surviving edges and
//! adjacency lists.

use models::{Edge, Node};

use crate::engine::graph::{DiGraph, GraphState, Snapshot};

impl<N, E> DiGraph<N, E> {
    fn derive<T, U>(&self, snapshot: Snapshot<T, U>) -> DiGraph<T, U> {
        match &self.state {
            GraphState::Valid(_) => DiGraph::from_snapshot(snapshot),
            GraphState::Failed(_, error) => DiGraph::failed(snapshot, error.clone()),
        }
    }

    pub fn filter_nodes(&self, keep: impl FnMut(&Node<N>) -> bool) -> Self {
        let snapshot = self.snapshot();
        self.derive(snapshot.with_nodes(snapshot.nodes().filter(keep)))
    }

    pub fn filter_edges(&self, keep: impl FnMut(&Edge<E>) -> bool) -> Self {
        let snapshot = self.snapshot();
        self.derive(snapshot.with_edges(snapshot.edges().filter(keep)))
    }

    pub fn filter_node_values(&self, mut keep: impl FnMut(&N) -> bool) -> Self {
        self.filter_nodes(|node| keep(node.value()))
    }

    pub fn filter_edge_values(&self, mut keep: impl FnMut(&E) -> bool) -> Self {
        self.filter_edges(|edge| keep(edge.value()))
    }

    pub fn for_each_node(&self, f: impl FnMut(&Node<N>)) -> &Self {
        self.iter_nodes().for_each(f);
        self
    }

    pub fn for_each_edge(&self, f: impl FnMut(&Edge<E>)) -> &Self {
        self.iter_edges().for_each(f);
        self
    }

    pub fn for_each_node_value(&self, f: impl FnMut(&N)) -> &Self {
        self.iter_nodes().map(Node::value).for_each(f);
        self
    }

    pub fn for_each_edge_value(&self, f: impl FnMut(&E)) -> &Self {
        self.iter_edges().map(Edge::value).for_each(f);
        self
    }

    /// Replaces every node with `f(node)`, keyed by the original id. The edge
    /// mapping is shared, not copied.
    pub fn map_nodes<T>(&self, f: impl FnMut(&Node<N>) -> Node<T>) -> DiGraph<T, E> {
        let snapshot = self.snapshot();
        self.derive(snapshot.with_nodes(snapshot.nodes().map(f)))
    }

    /// Replaces every edge with `f(edge)`, keyed by the original id. The node
    /// mapping is shared, not copied.
    pub fn map_edges<T>(&self, f: impl FnMut(&Edge<E>) -> Edge<T>) -> DiGraph<N, T> {
        let snapshot = self.snapshot();
        self.derive(snapshot.with_edges(snapshot.edges().map(f)))
    }

    pub fn map_node_values<T>(&self, mut f: impl FnMut(&N) -> T) -> DiGraph<T, E> {
        self.map_nodes(|node| node.map_value(&mut f))
    }

    pub fn map_edge_values<T>(&self, mut f: impl FnMut(&E) -> T) -> DiGraph<N, T> {
        self.map_edges(|edge| edge.map_value(&mut f))
    }

    /// Left fold over nodes; `f` receives the accumulator, the node and its position.
    pub fn reduce_nodes<T>(&self, mut f: impl FnMut(T, &Node<N>, usize) -> T, seed: T) -> T {
        self.iter_nodes()
            .enumerate()
            .fold(seed, |acc, (index, node)| f(acc, node, index))
    }

    pub fn reduce_edges<T>(&self, mut f: impl FnMut(T, &Edge<E>, usize) -> T, seed: T) -> T {
        self.iter_edges()
            .enumerate()
            .fold(seed, |acc, (index, edge)| f(acc, edge, index))
    }

    pub fn reduce_node_values<T>(&self, mut f: impl FnMut(T, &N, usize) -> T, seed: T) -> T {
        self.reduce_nodes(|acc, node, index| f(acc, node.value(), index), seed)
    }

    pub fn reduce_edge_values<T>(&self, mut f: impl FnMut(T, &E, usize) -> T, seed: T) -> T {
        self.reduce_edges(|acc, edge, index| f(acc, edge.value(), index), seed)
    }
}
