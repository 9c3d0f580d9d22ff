use crate::tree_grid::{DataItem, ItemId, TreeStore};

/// A small convenience builder for constructing a [`TreeStore`] from code.
///
/// This is intended for scripted fixtures and fake data: it panics on duplicate ids or unknown
/// parents instead of returning errors. For fallible construction use [`TreeStore::insert`].
#[derive(Debug, Default)]
pub struct ForestBuilder {
    tree: TreeStore,
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` under `parent` (or as a new root) and return its id.
    pub fn item(&mut self, parent: Option<&ItemId>, item: DataItem) -> ItemId {
        let id = item.id.clone();
        if let Err(err) = self.tree.insert(parent, item) {
            panic!("ForestBuilder::item: {err}");
        }
        id
    }

    /// Append a group labeled `Group <id>`.
    pub fn group(&mut self, parent: Option<&ItemId>, id: &str) -> ItemId {
        self.item(parent, DataItem::new(id, format!("Group {id}")))
    }

    /// Append several sibling groups under `parent`.
    pub fn groups<'a>(
        &mut self,
        parent: Option<&ItemId>,
        ids: impl IntoIterator<Item = &'a str>,
    ) -> Vec<ItemId> {
        ids.into_iter().map(|id| self.group(parent, id)).collect()
    }

    /// Access the forest built so far.
    pub fn tree(&self) -> &TreeStore {
        &self.tree
    }

    pub fn build(self) -> TreeStore {
        self.tree
    }
}
