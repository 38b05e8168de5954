pub mod entity_map;
pub mod graph;
pub mod integrity;
pub mod serialization;
pub mod traversal;

// Public re-exports
pub use entity_map::EntityMap;
pub use graph::{DiGraph, Snapshot};
