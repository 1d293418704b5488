//! Infrastructure layer: I/O implementations
//!
//! This layer implements I/O boundary traits and loads item files.

pub mod error;
pub mod loader;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use loader::{ItemFormat, ItemLoader};
