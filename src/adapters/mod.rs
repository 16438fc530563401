//! Adapters implementing domain ports.
//!
//! Storage backends for saved models and a reference environment. Adapters
//! depend on the ports, not the other way around.

pub mod corridor;
pub mod in_memory_repository;
pub mod msgpack_repository;

pub use corridor::{CorridorConfig, CorridorTrack};
pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;
