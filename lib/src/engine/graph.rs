// lib/src/engine/graph.rs

use std::fmt;

use log::{debug, warn};

use models::{
    Clock, Edge, GraphError, IdGenerator, Identifier, Node, SystemClock, Timestamp, UuidGenerator,
};

use crate::engine::entity_map::EntityMap;

/// The data of one graph value: identity plus the two id-keyed mappings.
///
/// Nodes and edges refer to each other only through ids resolved against
/// these mappings.
pub struct Snapshot<N, E> {
    id: Identifier,
    created: Timestamp,
    nodes: EntityMap<Node<N>>,
    edges: EntityMap<Edge<E>>,
}

impl<N, E> Clone for Snapshot<N, E> {
    fn clone(&self) -> Self {
        Snapshot {
            id: self.id.clone(),
            created: self.created,
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }
}

impl<N: fmt::Debug, E: fmt::Debug> fmt::Debug for Snapshot<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("id", &self.id)
            .field("created", &self.created)
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .finish()
    }
}

impl<N, E> Snapshot<N, E> {
    pub(crate) fn from_parts(
        id: Identifier,
        created: Timestamp,
        nodes: EntityMap<Node<N>>,
        edges: EntityMap<Edge<E>>,
    ) -> Self {
        Snapshot {
            id,
            created,
            nodes,
            edges,
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn created(&self) -> Timestamp {
        self.created
    }

    pub fn nodes(&self) -> &EntityMap<Node<N>> {
        &self.nodes
    }

    pub fn edges(&self) -> &EntityMap<Edge<E>> {
        &self.edges
    }

    /// Same identity, node mapping replaced.
    pub(crate) fn with_nodes<T>(&self, nodes: EntityMap<Node<T>>) -> Snapshot<T, E> {
        Snapshot {
            id: self.id.clone(),
            created: self.created,
            nodes,
            edges: self.edges.clone(),
        }
    }

    /// Same identity, edge mapping replaced.
    pub(crate) fn with_edges<T>(&self, edges: EntityMap<Edge<T>>) -> Snapshot<N, T> {
        Snapshot {
            id: self.id.clone(),
            created: self.created,
            nodes: self.nodes.clone(),
            edges,
        }
    }

    fn insert_node(&self, node: Node<N>) -> Self {
        self.with_nodes(self.nodes.with(node.id().clone(), node))
    }
}

impl<N: Clone, E> Snapshot<N, E> {
    /// Admits `edge` if both endpoints resolve; the receiver is never touched.
    fn admit_edge(&self, edge: Edge<E>) -> Result<Self, GraphError> {
        let (from, to) = match (self.nodes.get(edge.from_id()), self.nodes.get(edge.to_id())) {
            (Some(from), Some(_)) => (from.clone(), edge.to_id().clone()),
            _ => {
                return Err(GraphError::undefined_edge(
                    edge.from_id().as_str(),
                    edge.to_id().as_str(),
                ))
            }
        };

        let edge_id = edge.id().clone();
        let mut nodes = self.nodes.clone();
        let mut edges = self.edges.clone();
        edges.insert(edge_id.clone(), edge);
        nodes.insert(from.id().clone(), from.with_edge_out(edge_id.clone()));
        // Looked up again so a self-loop sees the outgoing update.
        if let Some(target) = nodes.get(&to).cloned() {
            nodes.insert(to, target.with_edge_in(edge_id));
        }

        Ok(Snapshot {
            id: self.id.clone(),
            created: self.created,
            nodes,
            edges,
        })
    }
}

pub(crate) enum GraphState<N, E> {
    Valid(Snapshot<N, E>),
    Failed(Snapshot<N, E>, GraphError),
}

impl<N, E> Clone for GraphState<N, E> {
    fn clone(&self) -> Self {
        match self {
            GraphState::Valid(snapshot) => GraphState::Valid(snapshot.clone()),
            GraphState::Failed(snapshot, error) => {
                GraphState::Failed(snapshot.clone(), error.clone())
            }
        }
    }
}

/// A persistent directed graph of `Node<N>` and `Edge<E>` values.
///
/// Every update returns a new graph and leaves the receiver as it was.
/// Unchanged mappings are shared between a graph and the graphs derived from
/// it, so clones and updates are cheap.
///
/// A graph is either valid or failed. It fails, once and for good, when an
/// edge is offered whose endpoints are not both present. A failed graph
/// ignores further updates but still answers queries over the data it held
/// when it failed.
pub struct DiGraph<N, E = String> {
    pub(crate) state: GraphState<N, E>,
}

impl<N, E> Clone for DiGraph<N, E> {
    fn clone(&self) -> Self {
        DiGraph {
            state: self.state.clone(),
        }
    }
}

impl<N: fmt::Debug, E: fmt::Debug> fmt::Debug for DiGraph<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiGraph")
            .field("snapshot", self.snapshot())
            .field("error", &self.error())
            .finish()
    }
}

impl<N, E> Default for DiGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> DiGraph<N, E> {
    /// An empty graph with a random id, created now.
    pub fn new() -> Self {
        Self::with_providers(&UuidGenerator, &SystemClock)
    }

    /// An empty graph whose identity comes from the given collaborators.
    pub fn with_providers(ids: &impl IdGenerator, clock: &impl Clock) -> Self {
        Self::with_identity(ids.next_id(), Timestamp::from_instant(Some(clock.now())))
    }

    /// An empty graph with an explicit identity.
    pub fn with_identity(id: Identifier, created: Timestamp) -> Self {
        DiGraph::from_snapshot(Snapshot::from_parts(
            id,
            created,
            EntityMap::new(),
            EntityMap::new(),
        ))
    }

    pub(crate) fn from_snapshot(snapshot: Snapshot<N, E>) -> Self {
        DiGraph {
            state: GraphState::Valid(snapshot),
        }
    }

    pub(crate) fn failed(snapshot: Snapshot<N, E>, error: GraphError) -> Self {
        DiGraph {
            state: GraphState::Failed(snapshot, error),
        }
    }

    /// The data this graph answers queries from.
    pub fn snapshot(&self) -> &Snapshot<N, E> {
        match &self.state {
            GraphState::Valid(snapshot) | GraphState::Failed(snapshot, _) => snapshot,
        }
    }

    pub fn id(&self) -> &Identifier {
        self.snapshot().id()
    }

    pub fn created(&self) -> Timestamp {
        self.snapshot().created()
    }

    /// The error that froze this graph, if any.
    pub fn error(&self) -> Option<&GraphError> {
        match &self.state {
            GraphState::Valid(_) => None,
            GraphState::Failed(_, error) => Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.state, GraphState::Valid(_))
    }

    pub fn is_failed(&self) -> bool {
        !self.is_valid()
    }

    /// Branches on the graph's state: `Ok(on_success(self))` when valid,
    /// `Err(on_failure(error))` when failed.
    pub fn match_with<T, ErrT>(
        &self,
        on_success: impl FnOnce(&Self) -> T,
        on_failure: impl FnOnce(&GraphError) -> ErrT,
    ) -> Result<T, ErrT> {
        match &self.state {
            GraphState::Valid(_) => Ok(on_success(self)),
            GraphState::Failed(_, error) => Err(on_failure(error)),
        }
    }

    pub fn has_nodes(&self) -> bool {
        !self.snapshot().nodes.is_empty()
    }

    pub fn has_edges(&self) -> bool {
        !self.snapshot().edges.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.snapshot().nodes.len()
    }

    pub fn node_count_where(&self, mut predicate: impl FnMut(&Node<N>) -> bool) -> usize {
        self.iter_nodes().filter(|node| predicate(node)).count()
    }

    pub fn edge_count(&self) -> usize {
        self.snapshot().edges.len()
    }

    pub fn edge_count_where(&self, mut predicate: impl FnMut(&Edge<E>) -> bool) -> usize {
        self.iter_edges().filter(|edge| predicate(edge)).count()
    }

    /// Nodes in insertion order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node<N>> + '_ {
        self.snapshot().nodes.values()
    }

    /// Edges in insertion order.
    pub fn iter_edges(&self) -> impl Iterator<Item = &Edge<E>> + '_ {
        self.snapshot().edges.values()
    }

    pub fn nodes(&self) -> Vec<&Node<N>> {
        self.iter_nodes().collect()
    }

    pub fn nodes_where(&self, mut predicate: impl FnMut(&Node<N>) -> bool) -> Vec<&Node<N>> {
        self.iter_nodes().filter(|node| predicate(node)).collect()
    }

    pub fn edges(&self) -> Vec<&Edge<E>> {
        self.iter_edges().collect()
    }

    pub fn edges_where(&self, mut predicate: impl FnMut(&Edge<E>) -> bool) -> Vec<&Edge<E>> {
        self.iter_edges().filter(|edge| predicate(edge)).collect()
    }

    pub fn node_values(&self) -> Vec<&N> {
        self.iter_nodes().map(Node::value).collect()
    }

    pub fn node_values_where(&self, mut predicate: impl FnMut(&N) -> bool) -> Vec<&N> {
        self.iter_nodes()
            .map(Node::value)
            .filter(|value| predicate(value))
            .collect()
    }

    pub fn edge_values(&self) -> Vec<&E> {
        self.iter_edges().map(Edge::value).collect()
    }

    pub fn edge_values_where(&self, mut predicate: impl FnMut(&E) -> bool) -> Vec<&E> {
        self.iter_edges()
            .map(Edge::value)
            .filter(|value| predicate(value))
            .collect()
    }

    /// Looks up a node; `None` when the id is not in this graph.
    pub fn get_node(&self, id: &str) -> Option<&Node<N>> {
        self.snapshot().nodes.get(id)
    }

    /// Looks up an edge; `None` when the id is not in this graph.
    pub fn get_edge(&self, id: &str) -> Option<&Edge<E>> {
        self.snapshot().edges.get(id)
    }

    /// Inserts `node`, or overwrites the node with the same id.
    ///
    /// A failed graph returns itself unchanged.
    pub fn set_node(&self, node: Node<N>) -> Self {
        match &self.state {
            GraphState::Failed(_, error) => {
                warn!("Ignoring node {} on failed graph {}: {}", node.id(), self.id(), error);
                self.clone()
            }
            GraphState::Valid(snapshot) => {
                debug!("Setting node {} on graph {}", node.id(), snapshot.id());
                DiGraph::from_snapshot(snapshot.insert_node(node))
            }
        }
    }
}

impl<N: Clone, E> DiGraph<N, E> {
    /// Admits `edge` and records its id, newest first, on the source's
    /// outgoing list and the target's incoming list.
    ///
    /// If either endpoint is missing the result is a failed graph holding the
    /// same nodes and edges as `self`; the edge is not stored. A failed graph
    /// returns itself unchanged. Parallel edges are kept apart by their ids.
    pub fn set_edge(&self, edge: Edge<E>) -> Self {
        match &self.state {
            GraphState::Failed(_, error) => {
                warn!("Ignoring edge {} on failed graph {}: {}", edge.id(), self.id(), error);
                self.clone()
            }
            GraphState::Valid(snapshot) => {
                let edge_id = edge.id().clone();
                match snapshot.admit_edge(edge) {
                    Ok(next) => {
                        debug!("Admitted edge {} on graph {}", edge_id, next.id());
                        DiGraph::from_snapshot(next)
                    }
                    Err(error) => {
                        warn!("Graph {} failed on edge {}: {}", snapshot.id(), edge_id, error);
                        DiGraph::failed(snapshot.clone(), error)
                    }
                }
            }
        }
    }
}
