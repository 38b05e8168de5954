// models/src/lib.rs

//! Shared value types for the directed-graph container: identifiers,
//! timestamps, nodes, edges and the error taxonomy.

pub mod edges;
pub mod errors;
pub mod factory;
pub mod identifiers;
pub mod nodes;
pub mod timestamps;

pub use edges::Edge;
pub use errors::{GraphError, GraphResult, ValidationError, ValidationResult};
pub use factory::{new_edge, new_node, EntityFactory};
pub use identifiers::{IdGenerator, Identifier, SequentialIds, UuidGenerator};
pub use nodes::Node;
pub use timestamps::{Clock, FixedClock, SystemClock, Timestamp};
