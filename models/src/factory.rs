// models/src/factory.rs

use log::trace;

use crate::edges::Edge;
use crate::identifiers::{IdGenerator, Identifier, UuidGenerator};
use crate::nodes::Node;
use crate::timestamps::{Clock, SystemClock, Timestamp};

/// Mints unattached nodes and edges from an id source and a clock.
///
/// The factory does not know about containers: an edge is built even when
/// its endpoints exist nowhere.
#[derive(Clone, Debug, Default)]
pub struct EntityFactory<G = UuidGenerator, C = SystemClock> {
    ids: G,
    clock: C,
}

impl EntityFactory {
    /// A factory backed by random UUIDs and the system clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: IdGenerator, C: Clock> EntityFactory<G, C> {
    pub fn with_providers(ids: G, clock: C) -> Self {
        EntityFactory { ids, clock }
    }

    fn stamp(&self) -> (Identifier, Timestamp) {
        (self.ids.next_id(), Timestamp::from_instant(Some(self.clock.now())))
    }

    pub fn new_node<N>(&self, value: N) -> Node<N> {
        let (id, created) = self.stamp();
        trace!("Minted node {}", id);
        Node::new(id, created, value)
    }

    pub fn new_edge<E>(&self, from_id: Identifier, to_id: Identifier, value: E) -> Edge<E> {
        let (id, created) = self.stamp();
        trace!("Minted edge {} ({} -> {})", id, from_id, to_id);
        Edge::new(id, created, from_id, to_id, value)
    }
}

/// Creates a node with a fresh UUID and the current time.
pub fn new_node<N>(value: N) -> Node<N> {
    EntityFactory::new().new_node(value)
}

/// Creates an edge with a fresh UUID and the current time.
pub fn new_edge<E>(from_id: Identifier, to_id: Identifier, value: E) -> Edge<E> {
    EntityFactory::new().new_edge(from_id, to_id, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::MockIdGenerator;
    use crate::timestamps::{FixedClock, MockClock};
    use chrono::{TimeZone, Utc};
    use mockall::Sequence;

    #[test]
    fn new_node_uses_both_providers() {
        let mut ids = MockIdGenerator::new();
        ids.expect_next_id()
            .times(1)
            .returning(|| Identifier::new("n-1").unwrap());
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .times(1)
            .return_const(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap());

        let node = EntityFactory::with_providers(ids, clock).new_node("payload");
        assert_eq!(node.id(), "n-1");
        assert_eq!(node.created().to_string(), "2024-05-01T08:30:00.000Z");
        assert_eq!(*node.value(), "payload");
        assert!(node.is_isolated());
    }

    #[test]
    fn new_edge_does_not_validate_endpoints() {
        let mut ids = MockIdGenerator::new();
        let mut seq = Sequence::new();
        ids.expect_next_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Identifier::new("e-1").unwrap());
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap());

        let edge = EntityFactory::with_providers(ids, clock).new_edge(
            Identifier::new("nowhere").unwrap(),
            Identifier::new("nobody").unwrap(),
            3u8,
        );
        assert_eq!(edge.id(), "e-1");
        assert_eq!(edge.from_id(), "nowhere");
        assert_eq!(edge.to_id(), "nobody");
    }

    #[test]
    fn default_factory_mints_unique_ids() {
        let a = new_node(1);
        let b = new_node(1);
        assert_ne!(a.id(), b.id());
        let e = new_edge(a.id().clone(), b.id().clone(), ());
        assert_ne!(e.id(), a.id());
    }
}
