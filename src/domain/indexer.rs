//! Parent → children adjacency over repository records.
//!
//! The indexer never owns items. It keeps arena handles into a [`Repository`]
//! grouped by parent, and every query resolves those handles against the
//! repository it is given.

use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use tracing::{instrument, trace};

use crate::domain::entities::{ItemId, ParentId, TreeItem};
use crate::domain::repository::Repository;

/// Id-indexed reference to a record.
#[derive(Debug, Clone)]
struct Entry {
    index: Index,
    parent: ParentId,
}

#[derive(Debug, Default, Clone)]
pub struct Indexer {
    /// Children of the root, in insertion order
    roots: Vec<Index>,
    /// Children per parent id, in insertion order
    children: HashMap<ItemId, Vec<Index>>,
    items: HashMap<ItemId, Entry>,
}

impl Indexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items<'a, A: 'a>(items: impl IntoIterator<Item = (Index, &'a TreeItem<A>)>) -> Self {
        let mut indexer = Self::new();
        indexer.rebuild(items);
        indexer
    }

    /// Direct children of `id`; empty if it has none or is unknown.
    pub fn get_children<'r, A>(&self, repo: &'r Repository<A>, id: &ItemId) -> Vec<&'r TreeItem<A>> {
        resolve(repo, self.child_indices(id))
    }

    /// All descendants of `id`.
    ///
    /// Stack-based traversal: siblings are not visited in pre-order, callers
    /// should rely on the resulting set only.
    #[instrument(level = "trace", skip(self, repo))]
    pub fn get_all_children<'r, A>(&self, repo: &'r Repository<A>, id: &ItemId) -> Vec<&'r TreeItem<A>> {
        let mut result = Vec::new();
        let mut visited: HashSet<&ItemId> = HashSet::from([id]);
        let mut stack = self.child_indices(id).to_vec();

        while let Some(idx) = stack.pop() {
            let Some(item) = repo.get(idx) else {
                continue;
            };
            if !visited.insert(&item.id) {
                trace!("skipping already visited item {}", item.id);
                continue;
            }
            result.push(item);
            stack.extend_from_slice(self.child_indices(&item.id));
        }

        result
    }

    /// Ancestor chain of `id`, self-inclusive, ordered upward.
    ///
    /// Stops at a root item or at the first parent that is not stored; an
    /// unknown `id` yields an empty chain.
    #[instrument(level = "trace", skip(self, repo))]
    pub fn get_all_parents<'r, A>(&self, repo: &'r Repository<A>, id: &ItemId) -> Vec<&'r TreeItem<A>> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut current = id;

        while let Some(item) = self.items.get(current).and_then(|e| repo.get(e.index)) {
            if !visited.insert(&item.id) {
                break;
            }
            result.push(item);
            match &item.parent {
                ParentId::Root => break,
                ParentId::Item(parent) => current = parent,
            }
        }

        result
    }

    pub fn get_root_items<'r, A>(&self, repo: &'r Repository<A>) -> Vec<&'r TreeItem<A>> {
        resolve(repo, &self.roots)
    }

    /// Discard all adjacency and index `items` from scratch.
    #[instrument(level = "debug", skip(self, items))]
    pub fn rebuild<'a, A: 'a>(&mut self, items: impl IntoIterator<Item = (Index, &'a TreeItem<A>)>) {
        self.roots.clear();
        self.children.clear();
        self.items.clear();

        for (idx, item) in items {
            self.add_item(idx, item);
        }
        trace!("rebuilt index with {} items", self.items.len());
    }

    /// Append `item` to its parent's sibling list.
    pub fn add_item<A>(&mut self, idx: Index, item: &TreeItem<A>) {
        self.items.insert(
            item.id.clone(),
            Entry {
                index: idx,
                parent: item.parent.clone(),
            },
        );
        self.siblings_mut(&item.parent).push(idx);
    }

    /// Drop `id` from its sibling list and the id index. Children are left alone.
    pub fn remove_item(&mut self, id: &ItemId) {
        let Some(entry) = self.items.remove(id) else {
            return;
        };
        if let Some(siblings) = self.existing_siblings_mut(&entry.parent) {
            if let Some(pos) = siblings.iter().position(|&i| i == entry.index) {
                siblings.remove(pos);
            }
        }
    }

    /// Re-index a replaced record.
    ///
    /// Same parent: the record keeps its sibling position. New parent: it is
    /// spliced out of the old list and appended to the new one.
    #[instrument(level = "trace", skip(self, item), fields(id = %item.id))]
    pub fn update_item<A>(&mut self, idx: Index, item: &TreeItem<A>, old_parent: &ParentId) {
        let previous = self
            .items
            .insert(
                item.id.clone(),
                Entry {
                    index: idx,
                    parent: item.parent.clone(),
                },
            )
            .map(|e| e.index)
            .unwrap_or(idx);

        if *old_parent == item.parent {
            if let Some(slot) = self
                .existing_siblings_mut(old_parent)
                .and_then(|siblings| siblings.iter_mut().find(|i| **i == previous))
            {
                *slot = idx;
            }
            return;
        }

        if let Some(siblings) = self.existing_siblings_mut(old_parent) {
            siblings.retain(|&i| i != previous);
        }
        self.siblings_mut(&item.parent).push(idx);
    }

    pub fn child_count(&self, id: &ItemId) -> usize {
        self.child_indices(id).len()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn child_indices(&self, id: &ItemId) -> &[Index] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn siblings_mut(&mut self, parent: &ParentId) -> &mut Vec<Index> {
        match parent {
            ParentId::Root => &mut self.roots,
            ParentId::Item(id) => self.children.entry(id.clone()).or_default(),
        }
    }

    fn existing_siblings_mut(&mut self, parent: &ParentId) -> Option<&mut Vec<Index>> {
        match parent {
            ParentId::Root => Some(&mut self.roots),
            ParentId::Item(id) => self.children.get_mut(id),
        }
    }
}

fn resolve<'r, A>(repo: &'r Repository<A>, indices: &[Index]) -> Vec<&'r TreeItem<A>> {
    indices.iter().filter_map(|&idx| repo.get(idx)).collect()
}
