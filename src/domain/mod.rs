//! Domain layer: entities and the item store
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod indexer;
pub mod repository;

pub use entities::*;
pub use error::{DomainError, TreeResult};
pub use indexer::Indexer;
pub use repository::Repository;
