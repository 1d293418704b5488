//! Flat id → item store backed by a generational arena.
//!
//! The repository owns every item record. Other components refer to records
//! through arena [`Index`] handles, which stay valid across in-place updates
//! and go stale once the record is deleted.

use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use tracing::{instrument, trace};

use crate::domain::entities::{Attributes, ItemId, TreeItem};
use crate::domain::error::{DomainError, TreeResult};

#[derive(Debug)]
pub struct Repository<A = Attributes> {
    /// Arena storage for all item records
    arena: Arena<TreeItem<A>>,
    /// Id lookup into the arena
    by_id: HashMap<ItemId, Index>,
    /// Insertion order; arena slots are reused, so order is tracked separately
    order: Vec<Index>,
}

impl<A> Default for Repository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Repository<A> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            by_id: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Build a repository from an initial collection, rejecting duplicate ids.
    pub fn from_items(items: impl IntoIterator<Item = TreeItem<A>>) -> TreeResult<Self> {
        let mut repo = Self::new();
        for item in items {
            repo.save(item)?;
        }
        Ok(repo)
    }

    /// All items in insertion order.
    pub fn find_all(&self) -> Vec<&TreeItem<A>> {
        self.iter_indexed().map(|(_, item)| item).collect()
    }

    pub fn find_by_id(&self, id: &ItemId) -> Option<&TreeItem<A>> {
        self.by_id.get(id).and_then(|&idx| self.arena.get(idx))
    }

    pub fn exists(&self, id: &ItemId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Insert a new item; fails if the id is already stored.
    #[instrument(level = "trace", skip(self, item), fields(id = %item.id))]
    pub fn save(&mut self, item: TreeItem<A>) -> TreeResult<(Index, &TreeItem<A>)> {
        if self.by_id.contains_key(&item.id) {
            return Err(DomainError::DuplicateId(item.id));
        }
        let id = item.id.clone();
        let idx = self.arena.insert(item);
        self.by_id.insert(id, idx);
        self.order.push(idx);
        Ok((idx, &self.arena[idx]))
    }

    /// Replace a stored item wholesale, keeping its slot and position.
    #[instrument(level = "trace", skip(self, item), fields(id = %item.id))]
    pub fn update(&mut self, item: TreeItem<A>) -> TreeResult<(Index, &TreeItem<A>)> {
        let Some(&idx) = self.by_id.get(&item.id) else {
            return Err(DomainError::NotFound(item.id));
        };
        self.arena[idx] = item;
        Ok((idx, &self.arena[idx]))
    }

    /// Remove an item; absent ids are a no-op.
    #[instrument(level = "trace", skip(self))]
    pub fn delete(&mut self, id: &ItemId) -> Option<TreeItem<A>> {
        let idx = self.by_id.remove(id)?;
        self.order.retain(|&i| i != idx);
        self.arena.remove(idx)
    }

    /// Remove several items with a single pass over the insertion order.
    ///
    /// Returns the number of items actually removed.
    #[instrument(level = "trace", skip(self, ids))]
    pub fn delete_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a ItemId>) -> usize {
        let mut removed = HashSet::new();
        for id in ids {
            if let Some(idx) = self.by_id.remove(id) {
                self.arena.remove(idx);
                removed.insert(idx);
            }
        }
        if !removed.is_empty() {
            self.order.retain(|idx| !removed.contains(idx));
        }
        trace!("deleted {} items", removed.len());
        removed.len()
    }

    /// Replace the whole content; on a duplicate id the old content is kept.
    pub fn reset(&mut self, items: impl IntoIterator<Item = TreeItem<A>>) -> TreeResult<()> {
        *self = Self::from_items(items)?;
        Ok(())
    }

    /// Resolve an arena handle; `None` if the record was deleted.
    pub fn get(&self, idx: Index) -> Option<&TreeItem<A>> {
        self.arena.get(idx)
    }

    /// Items with their arena handles, in insertion order.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (Index, &TreeItem<A>)> + '_ {
        self.order
            .iter()
            .filter_map(move |&idx| self.arena.get(idx).map(|item| (idx, item)))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
