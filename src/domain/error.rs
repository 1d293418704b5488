//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::ItemId;

/// Domain errors represent rejected store mutations.
///
/// Every variant is raised before any state is touched, so a failed call
/// leaves the store exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("item already exists: {0}")]
    DuplicateId(ItemId),

    #[error("item not found: {0}")]
    NotFound(ItemId),

    #[error("item must have an id")]
    MissingId,

    #[error("cyclic reference: item {id} cannot have {parent} as parent")]
    CyclicReference { id: ItemId, parent: ItemId },
}

/// Result type for store operations.
pub type TreeResult<T> = Result<T, DomainError>;
