use std::hash::{Hash as _, Hasher as _};

use ahash::{HashMap, HashSet};

use super::tree::TreeStore;
use super::types::ItemId;

/// Check the forest invariants; an empty result means the forest is consistent.
///
/// - roots have no parent, non-roots point at an existing parent,
/// - every node sits in exactly one children list (or the root list), exactly once,
/// - the parent back-reference agrees with that membership,
/// - every node is reachable from a root (no cycles, no orphans).
pub fn forest_integrity_issues(tree: &TreeStore) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();

    let mut listed_under: HashMap<ItemId, Option<ItemId>> = HashMap::default();
    let mut note_membership = |child: &ItemId, parent: Option<&ItemId>, issues: &mut Vec<String>| {
        if let Some(previous) = listed_under.insert(child.clone(), parent.cloned()) {
            issues.push(format!(
                "integrity: {child} listed under both {previous:?} and {parent:?}"
            ));
        }
    };

    for root in tree.roots() {
        note_membership(root, None, &mut issues);
    }
    for node in tree.iter() {
        for child in node.children() {
            note_membership(child, Some(node.id()), &mut issues);
        }
    }

    for (child, listed_parent) in &listed_under {
        match tree.get(child) {
            None => issues.push(format!(
                "integrity: {listed_parent:?} references missing node {child}"
            )),
            Some(node) => {
                if node.parent() != listed_parent.as_ref() {
                    issues.push(format!(
                        "integrity: {child} has parent {:?} but is listed under {listed_parent:?}",
                        node.parent()
                    ));
                }
            }
        }
    }

    for node in tree.iter() {
        if !listed_under.contains_key(node.id()) {
            issues.push(format!("integrity: {} is not listed anywhere", node.id()));
        }
        if let Some(parent) = node.parent() {
            if !tree.contains(parent) {
                issues.push(format!(
                    "integrity: {} points at missing parent {parent}",
                    node.id()
                ));
            }
        }
    }

    let mut visited: HashSet<ItemId> = HashSet::default();
    let mut stack: Vec<&ItemId> = tree.roots().iter().collect();
    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            issues.push(format!("integrity: {id} reached twice"));
            continue;
        }
        stack.extend(tree.children_of(id));
    }
    if visited.len() != tree.len() {
        issues.push(format!(
            "integrity: unreachable nodes {} of {}",
            tree.len().saturating_sub(visited.len()),
            tree.len()
        ));
    }

    issues.sort();
    issues
}

pub(crate) fn hash_issues(lines: &[String]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for line in lines {
        line.hash(&mut hasher);
    }
    hasher.finish()
}
