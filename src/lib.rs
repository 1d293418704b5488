//! treegrid: in-memory hierarchical item store.
//!
//! Items carry an id and an optional parent id and form a forest. The
//! [`TreeService`] keeps a flat [`Repository`] and a parent/child [`Indexer`]
//! in sync, rejects cyclic parent links and cascades deletes. A
//! [`TreeBuilder`] flattens the forest into ordered [`GridRow`]s for a
//! tree-grid display.
//!
//! ```
//! use treegrid::{DefaultTreeBuilder, ItemId, ParentId, TreeBuilder, TreeItem, TreeService};
//!
//! let mut service = TreeService::new(vec![
//!     TreeItem::labeled(1, ParentId::Root, "A"),
//!     TreeItem::labeled(2, ItemId::from(1), "B"),
//! ])
//! .unwrap();
//! service.add_item(TreeItem::labeled(3, ItemId::from(2), "C")).unwrap();
//!
//! let rows = DefaultTreeBuilder::default().build_flat_tree(&service);
//! assert_eq!(rows.len(), 3);
//! assert_eq!(rows[2].path, vec!["1", "2", "3"]);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use application::{DefaultTreeBuilder, TreeBuilder, TreeService};
pub use domain::{
    Attributes, Category, DomainError, GridRow, Indexer, ItemAttributes, ItemId, ParentId,
    Repository, TreeItem, TreeResult,
};
