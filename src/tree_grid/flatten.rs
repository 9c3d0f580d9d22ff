use super::tree::TreeStore;
use super::types::{DataItemRow, ItemId};

/// Lazy depth-first, pre-order projection of a forest into grid rows.
///
/// Each row carries the ids from its root down to itself. Children follow their parent before the
/// parent's next sibling.
pub struct FlattenRows<'a> {
    tree: &'a TreeStore,
    stack: Vec<(&'a ItemId, usize)>,
    path: Vec<ItemId>,
}

impl<'a> FlattenRows<'a> {
    pub fn new(tree: &'a TreeStore) -> Self {
        Self {
            tree,
            stack: tree.roots().iter().rev().map(|id| (id, 0)).collect(),
            path: Vec::new(),
        }
    }
}

impl Iterator for FlattenRows<'_> {
    type Item = DataItemRow;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, depth) = self.stack.pop()?;
            let Some(node) = self.tree.get(id) else {
                continue;
            };

            self.path.truncate(depth);
            self.path.push(id.clone());
            self.stack
                .extend(node.children().iter().rev().map(|child| (child, depth + 1)));

            return Some(DataItemRow {
                item: node.data().clone(),
                path: self.path.clone(),
            });
        }
    }
}

/// All rows of `tree` in display order.
pub fn flatten_rows(tree: &TreeStore) -> Vec<DataItemRow> {
    FlattenRows::new(tree).collect()
}
