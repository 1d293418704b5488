//! Tree service
//!
//! Orchestrates the repository and the indexer. All mutations go through here,
//! so the two stay in lockstep. A write never makes an item its own ancestor
//! through a resolvable chain; links among dangling items are not checked.

use tracing::{debug, instrument};

use crate::domain::{
    Attributes, DomainError, Indexer, ItemId, ParentId, Repository, TreeItem, TreeResult,
};

/// Service owning the item store and its parent/child index.
#[derive(Debug)]
pub struct TreeService<A = Attributes> {
    repository: Repository<A>,
    indexer: Indexer,
}

impl<A> Default for TreeService<A> {
    fn default() -> Self {
        Self {
            repository: Repository::new(),
            indexer: Indexer::new(),
        }
    }
}

impl<A> TreeService<A> {
    /// Create a service over an initial collection.
    ///
    /// Only id uniqueness is checked here; parent links are taken as given.
    pub fn new(items: impl IntoIterator<Item = TreeItem<A>>) -> TreeResult<Self> {
        let repository = Repository::from_items(items)?;
        let indexer = Indexer::from_items(repository.iter_indexed());
        debug!("new: {} items", repository.len());
        Ok(Self { repository, indexer })
    }

    pub fn get_all_items(&self) -> Vec<&TreeItem<A>> {
        self.repository.find_all()
    }

    pub fn get_item(&self, id: &ItemId) -> Option<&TreeItem<A>> {
        self.repository.find_by_id(id)
    }

    pub fn get_children(&self, id: &ItemId) -> Vec<&TreeItem<A>> {
        self.indexer.get_children(&self.repository, id)
    }

    pub fn get_all_children(&self, id: &ItemId) -> Vec<&TreeItem<A>> {
        self.indexer.get_all_children(&self.repository, id)
    }

    pub fn get_all_parents(&self, id: &ItemId) -> Vec<&TreeItem<A>> {
        self.indexer.get_all_parents(&self.repository, id)
    }

    pub fn get_root_items(&self) -> Vec<&TreeItem<A>> {
        self.indexer.get_root_items(&self.repository)
    }

    /// Insert a new item. Nothing changes if validation or the insert fails.
    #[instrument(level = "debug", skip(self, item), fields(id = %item.id, parent = %item.parent))]
    pub fn add_item(&mut self, item: TreeItem<A>) -> TreeResult<()> {
        self.validate_item(&item)?;
        let (idx, stored) = self.repository.save(item)?;
        self.indexer.add_item(idx, stored);
        Ok(())
    }

    /// Replace an existing item wholesale; attributes missing from `item` are dropped.
    #[instrument(level = "debug", skip(self, item), fields(id = %item.id, parent = %item.parent))]
    pub fn update_item(&mut self, item: TreeItem<A>) -> TreeResult<()> {
        let old_parent = match self.repository.find_by_id(&item.id) {
            Some(existing) => existing.parent.clone(),
            None => return Err(DomainError::NotFound(item.id)),
        };
        self.validate_item(&item)?;

        let (idx, stored) = self.repository.update(item)?;
        self.indexer.update_item(idx, stored, &old_parent);
        Ok(())
    }

    /// Remove `id` together with all of its descendants.
    ///
    /// Unknown ids are a no-op. Returns the removed ids, `id` first.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_item(&mut self, id: &ItemId) -> Vec<ItemId> {
        if !self.repository.exists(id) {
            debug!("remove_item: {} not stored, nothing to do", id);
            return Vec::new();
        }

        let mut removed = vec![id.clone()];
        removed.extend(
            self.indexer
                .get_all_children(&self.repository, id)
                .into_iter()
                .map(|item| item.id.clone()),
        );

        self.repository.delete_many(&removed);
        self.indexer.rebuild(self.repository.iter_indexed());
        debug!("remove_item: removed {} items", removed.len());
        removed
    }

    /// Check that `item` has an id and that its parent is not one of its descendants.
    ///
    /// The proposed parent does not have to exist.
    pub fn validate_item(&self, item: &TreeItem<A>) -> TreeResult<()> {
        if item.id.is_empty() {
            return Err(DomainError::MissingId);
        }

        if let ParentId::Item(parent) = &item.parent {
            let cyclic = *parent == item.id
                || self
                    .indexer
                    .get_all_parents(&self.repository, parent)
                    .iter()
                    .any(|ancestor| ancestor.id == item.id);
            if cyclic {
                return Err(DomainError::CyclicReference {
                    id: item.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
        Ok(())
    }

    /// Replace the whole content. On a duplicate id the old content is kept.
    #[instrument(level = "debug", skip(self, items))]
    pub fn reset(&mut self, items: impl IntoIterator<Item = TreeItem<A>>) -> TreeResult<()> {
        self.repository.reset(items)?;
        self.indexer.rebuild(self.repository.iter_indexed());
        Ok(())
    }

    pub fn repository(&self) -> &Repository<A> {
        &self.repository
    }

    pub fn indexer(&self) -> &Indexer {
        &self.indexer
    }

    pub fn len(&self) -> usize {
        self.repository.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repository.is_empty()
    }
}
