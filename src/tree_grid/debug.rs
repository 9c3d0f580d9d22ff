use std::collections::VecDeque;

use super::tree::TreeStore;

/// Small ring buffer of debug lines, for copy-paste from an on-screen panel.
#[derive(Debug, Default)]
pub(crate) struct DebugLog {
    lines: VecDeque<String>,
    frame: u64,
}

impl DebugLog {
    pub(crate) fn set_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    pub(crate) fn push(&mut self, capacity: usize, message: String) {
        let cap = capacity.clamp(1, 10_000);
        while self.lines.len() >= cap {
            self.lines.pop_front();
        }
        self.lines.push_back(format!("[frame {}] {}", self.frame, message));
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn text(&self) -> String {
        self.lines.iter().cloned().collect::<Vec<_>>().join("\n")
    }
}

/// Indented outline of (at most `max_nodes` of) the forest.
pub fn debug_tree_summary(tree: &TreeStore, max_nodes: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut stack: Vec<(&super::ItemId, usize)> =
        tree.roots().iter().rev().map(|id| (id, 0)).collect();

    while let Some((id, depth)) = stack.pop() {
        if lines.len() >= max_nodes {
            break;
        }
        let children = tree.children_of(id);
        lines.push(format!(
            "{:indent$}{id} children={}",
            "",
            children.len(),
            indent = depth * 2
        ));
        stack.extend(children.iter().rev().map(|child| (child, depth + 1)));
    }

    format!(
        "roots={} total={}\n{}",
        tree.roots().len(),
        tree.len(),
        lines.join("\n")
    )
}
