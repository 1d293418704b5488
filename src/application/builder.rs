//! Flattening of the item forest into grid rows.

use std::collections::HashSet;

use tracing::{instrument, trace};

use crate::application::services::TreeService;
use crate::domain::{Category, GridRow, ItemAttributes, ItemId, TreeItem};

/// Attribute read as row label unless configured otherwise.
pub const DEFAULT_LABEL_KEY: &str = "label";

/// Strategy turning the store into an ordered row sequence.
pub trait TreeBuilder<A> {
    fn build_flat_tree(&self, service: &TreeService<A>) -> Vec<GridRow>;

    fn node_category(&self, _item: &TreeItem<A>, child_count: usize) -> Category {
        if child_count > 0 {
            Category::Group
        } else {
            Category::Item
        }
    }
}

/// Depth-first pre-order flattening, roots and siblings in index order.
#[derive(Debug, Clone)]
pub struct DefaultTreeBuilder {
    label_key: String,
}

impl Default for DefaultTreeBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_KEY)
    }
}

impl DefaultTreeBuilder {
    pub fn new(label_key: impl Into<String>) -> Self {
        Self {
            label_key: label_key.into(),
        }
    }
}

impl<A: ItemAttributes> TreeBuilder<A> for DefaultTreeBuilder {
    /// Items not reachable from a root are left out. A visited set guarantees
    /// termination even if the index holds a cycle.
    #[instrument(level = "debug", skip(self, service))]
    fn build_flat_tree(&self, service: &TreeService<A>) -> Vec<GridRow> {
        let mut rows = Vec::new();
        let mut seen: HashSet<&ItemId> = HashSet::new();
        // (item, path of its parent)
        let mut stack: Vec<(&TreeItem<A>, Vec<String>)> = service
            .get_root_items()
            .into_iter()
            .rev()
            .map(|item| (item, Vec::new()))
            .collect();

        while let Some((item, parent_path)) = stack.pop() {
            if !seen.insert(&item.id) {
                trace!("cycle guard: {} already emitted", item.id);
                continue;
            }

            let children = service.get_children(&item.id);
            let level = parent_path.len();
            let mut path = parent_path;
            path.push(item.id.to_string());

            rows.push(GridRow {
                id: item.id.clone(),
                category: self.node_category(item, children.len()),
                label: item
                    .attributes
                    .label(&self.label_key)
                    .unwrap_or_else(|| item.id.to_string()),
                path: path.clone(),
                level,
                has_children: !children.is_empty(),
                row_number: 0,
            });

            for child in children.into_iter().rev() {
                stack.push((child, path.clone()));
            }
        }

        for (i, row) in rows.iter_mut().enumerate() {
            row.row_number = i + 1;
        }
        rows
    }
}
