use std::path::Path;

use ahash::HashSet;

use super::error::InsertError;
use super::tree::TreeStore;
use super::types::{DataItem, ItemId};

pub const FOREST_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum SnapshotError {
    UnsupportedVersion { found: u32, expected: u32 },
    Insert(InsertError),
    RonSerialize(ron::Error),
    RonDeserialize(ron::error::SpannedError),
    Io(std::io::Error),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "unsupported forest snapshot version: {found} (expected {expected})"
                )
            }
            Self::Insert(err) => write!(f, "invalid snapshot: {err}"),
            Self::RonSerialize(err) => write!(f, "ron serialize error: {err}"),
            Self::RonDeserialize(err) => write!(f, "ron deserialize error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedVersion { .. } => None,
            Self::Insert(err) => Some(err),
            Self::RonSerialize(err) => Some(err),
            Self::RonDeserialize(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<InsertError> for SnapshotError {
    fn from(err: InsertError) -> Self {
        Self::Insert(err)
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ron::Error> for SnapshotError {
    fn from(err: ron::Error) -> Self {
        Self::RonSerialize(err)
    }
}

impl From<ron::error::SpannedError> for SnapshotError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::RonDeserialize(err)
    }
}

/// Serializable, nested form of a forest.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ForestSnapshot {
    pub version: u32,
    pub roots: Vec<NodeSnapshot>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NodeSnapshot {
    pub item: DataItem,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

fn pretty_ron_config() -> ron::ser::PrettyConfig {
    ron::ser::PrettyConfig::new()
        .depth_limit(128)
        .separate_tuple_members(true)
}

fn snapshot_node(tree: &TreeStore, id: &ItemId) -> Option<NodeSnapshot> {
    let node = tree.get(id)?;
    Some(NodeSnapshot {
        item: node.data().clone(),
        children: node
            .children()
            .iter()
            .filter_map(|child| snapshot_node(tree, child))
            .collect(),
    })
}

impl TreeStore {
    pub fn to_snapshot(&self) -> ForestSnapshot {
        ForestSnapshot {
            version: FOREST_SNAPSHOT_VERSION,
            roots: self
                .roots()
                .iter()
                .filter_map(|root| snapshot_node(self, root))
                .collect(),
        }
    }

    /// Rebuild a forest. Fails on a version mismatch or if an id occurs twice.
    pub fn from_snapshot(snapshot: ForestSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.version != FOREST_SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: FOREST_SNAPSHOT_VERSION,
            });
        }

        fn load(
            tree: &mut TreeStore,
            parent: Option<&ItemId>,
            node: NodeSnapshot,
        ) -> Result<(), SnapshotError> {
            let id = node.item.id.clone();
            tree.insert(parent, node.item)?;
            for child in node.children {
                load(tree, Some(&id), child)?;
            }
            Ok(())
        }

        let mut tree = Self::new();
        for root in snapshot.roots {
            load(&mut tree, None, root)?;
        }
        Ok(tree)
    }

    pub fn to_ron_string(&self) -> Result<String, SnapshotError> {
        Ok(ron::ser::to_string_pretty(
            &self.to_snapshot(),
            pretty_ron_config(),
        )?)
    }

    pub fn from_ron_str(ron: &str) -> Result<Self, SnapshotError> {
        let snapshot: ForestSnapshot = ron::from_str(ron)?;
        Self::from_snapshot(snapshot)
    }

    pub fn save_to_ron_file(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let ron = self.to_ron_string()?;
        std::fs::write(path, ron)?;
        Ok(())
    }

    pub fn load_from_ron_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let ron = std::fs::read_to_string(path)?;
        Self::from_ron_str(&ron)
    }
}

/// Ids that occur more than once in `snapshot`, sorted.
pub fn duplicate_ids(snapshot: &ForestSnapshot) -> Vec<ItemId> {
    fn walk(node: &NodeSnapshot, seen: &mut HashSet<ItemId>, dups: &mut Vec<ItemId>) {
        if !seen.insert(node.item.id.clone()) {
            dups.push(node.item.id.clone());
        }
        for child in &node.children {
            walk(child, seen, dups);
        }
    }

    let mut seen = HashSet::default();
    let mut dups = Vec::new();
    for root in &snapshot.roots {
        walk(root, &mut seen, &mut dups);
    }
    dups.sort();
    dups.dedup();
    dups
}
