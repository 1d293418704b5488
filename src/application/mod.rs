//! Application layer: services and use cases
//!
//! This layer orchestrates the domain store and produces display output.

pub mod builder;
pub mod error;
pub mod services;

pub use builder::{DefaultTreeBuilder, TreeBuilder};
pub use error::{ApplicationError, ApplicationResult};
pub use services::TreeService;
