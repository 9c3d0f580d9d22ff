use ahash::HashMap;

use super::error::{InsertError, MoveError};
use super::types::{DataItem, ItemEdit, ItemId, Placement};

/// One node of the forest.
///
/// `parent` is a plain id, never an owner: ownership flows from [`TreeStore`] through the
/// ordered `children` lists.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    data: DataItem,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
}

impl TreeNode {
    pub fn data(&self) -> &DataItem {
        &self.data
    }

    pub fn id(&self) -> &ItemId {
        &self.data.id
    }

    pub fn parent(&self) -> Option<&ItemId> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// The canonical in-memory forest: id lookup plus ordered root and child lists.
#[derive(Clone, Debug, Default)]
pub struct TreeStore {
    nodes: HashMap<ItemId, TreeNode>,
    roots: Vec<ItemId>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &ItemId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&DataItem> {
        self.nodes.get(id).map(TreeNode::data)
    }

    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    /// Empty for leaves and for unknown ids.
    pub fn children_of(&self, id: &ItemId) -> &[ItemId] {
        self.nodes.get(id).map_or(&[], |node| node.children())
    }

    pub fn parent_of(&self, id: &ItemId) -> Option<&ItemId> {
        self.nodes.get(id)?.parent()
    }

    /// Position of `id` among its siblings (the root list for roots).
    pub fn index_in_parent(&self, id: &ItemId) -> Option<usize> {
        let siblings = match self.parent_of(id) {
            Some(parent) => self.children_of(parent),
            None => self.roots(),
        };
        siblings.iter().position(|sibling| sibling == id)
    }

    /// True if `node` is strictly below `ancestor`.
    pub fn is_descendant(&self, ancestor: &ItemId, node: &ItemId) -> bool {
        let mut current = self.parent_of(node);
        let mut steps = 0;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                // Only reachable if the parent chain is cyclic.
                return false;
            }
            current = self.parent_of(parent);
        }
        false
    }

    /// All nodes in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.values()
    }

    /// Append `item` as the last root (`parent == None`) or the last child of `parent`.
    pub fn insert(&mut self, parent: Option<&ItemId>, item: DataItem) -> Result<(), InsertError> {
        if self.nodes.contains_key(&item.id) {
            return Err(InsertError::DuplicateId { id: item.id });
        }
        let siblings = match parent {
            Some(parent_id) => match self.nodes.get_mut(parent_id) {
                Some(parent_node) => &mut parent_node.children,
                None => {
                    return Err(InsertError::ParentNotFound {
                        id: parent_id.clone(),
                    });
                }
            },
            None => &mut self.roots,
        };
        siblings.push(item.id.clone());
        self.nodes.insert(
            item.id.clone(),
            TreeNode {
                data: item,
                parent: parent.cloned(),
                children: Vec::new(),
            },
        );
        Ok(())
    }

    /// Apply an inline edit. Returns `false` if `id` is unknown.
    pub fn update_item(&mut self, id: &ItemId, edit: &ItemEdit) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                edit.apply(&mut node.data);
                true
            }
            None => false,
        }
    }

    /// Returns `false` if `id` is unknown.
    pub fn set_count(&mut self, id: &ItemId, count: u32) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.data.count = count;
                true
            }
            None => false,
        }
    }

    /// Move `id` into, before or after `dest_id`.
    ///
    /// Refused (without touching the forest) if either id is unknown, or if `dest_id` is `id`
    /// itself or one of its descendants. For `Before`/`After` the insertion index is the
    /// destination's index among its siblings *after* `id` was detached.
    pub fn move_node(
        &mut self,
        id: &ItemId,
        dest_id: &ItemId,
        placement: Placement,
    ) -> Result<(), MoveError> {
        for required in [id, dest_id] {
            if !self.nodes.contains_key(required) {
                return Err(MoveError::NotFound {
                    id: required.clone(),
                });
            }
        }
        if id == dest_id || self.is_descendant(id, dest_id) {
            return Err(MoveError::InvalidTarget {
                id: id.clone(),
                dest_id: dest_id.clone(),
            });
        }

        self.detach(id);

        let new_parent = match placement {
            Placement::Into => {
                if let Some(dest) = self.nodes.get_mut(dest_id) {
                    dest.children.push(id.clone());
                }
                Some(dest_id.clone())
            }
            Placement::Before | Placement::After => {
                let new_parent = self.parent_of(dest_id).cloned();
                if let Some(siblings) = self.siblings_mut(new_parent.as_ref()) {
                    let dest_index = siblings
                        .iter()
                        .position(|sibling| sibling == dest_id)
                        .unwrap_or(siblings.len());
                    let index = match placement {
                        Placement::After => dest_index + 1,
                        _ => dest_index,
                    };
                    siblings.insert(index.min(siblings.len()), id.clone());
                }
                new_parent
            }
        };

        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = new_parent;
        }
        Ok(())
    }

    fn detach(&mut self, id: &ItemId) {
        let parent = self.parent_of(id).cloned();
        if let Some(siblings) = self.siblings_mut(parent.as_ref()) {
            siblings.retain(|sibling| sibling != id);
        }
    }

    fn siblings_mut(&mut self, parent: Option<&ItemId>) -> Option<&mut Vec<ItemId>> {
        match parent {
            Some(parent) => self.nodes.get_mut(parent).map(|node| &mut node.children),
            None => Some(&mut self.roots),
        }
    }
}
