//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: collection media backing the record stores, either
//!   JSON files in a data directory or process memory.
//!
//! Adapters are thin translators between bytes on a medium and the domain
//! port contract. They contain no business logic.

pub mod persistence;
