use super::dispatch::DataStore;
use super::error::StoreError;
use super::tree::TreeStore;
use super::types::{DataItem, ItemEdit, ItemId, MoveRequest};

const FAKE_ROOTS: usize = 5;
const FAKE_CHILDREN: usize = 3;
const FAKE_DEPTH: usize = 3;
const FAKE_TAGS: [&str; 3] = ["Apples", "Bananas", "Cherries"];

/// In-memory [`DataStore`] standing in for a backend.
///
/// Load latency is simulated by [`super::DataQuery`]; this store applies mutations immediately.
#[derive(Clone, Debug, Default)]
pub struct SimulatedStore {
    tree: TreeStore,
    fail_next: usize,
    rng: Rng,
}

impl SimulatedStore {
    pub fn new(tree: TreeStore) -> Self {
        Self {
            tree,
            fail_next: 0,
            rng: Rng::new(0),
        }
    }

    /// Five root groups, each three levels of three child groups deep.
    pub fn with_fake_data(seed: u64) -> Self {
        Self {
            tree: fake_forest(seed),
            fail_next: 0,
            rng: Rng::new(seed.wrapping_add(1)),
        }
    }

    pub fn tree(&self) -> &TreeStore {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TreeStore {
        &mut self.tree
    }

    /// Reject the next `count` mutations, as if the backend were unreachable.
    pub fn fail_next(&mut self, count: usize) {
        self.fail_next = count;
    }

    /// Assign fresh counts to every item, as if they were recomputed server-side.
    pub fn recount(&mut self) {
        let mut ids: Vec<ItemId> = self.tree.iter().map(|node| node.id().clone()).collect();
        ids.sort_unstable();
        for id in ids {
            let count = self.rng.next_count();
            self.tree.set_count(&id, count);
        }
    }

    fn take_injected_failure(&mut self) -> Result<(), StoreError> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(StoreError::Rejected {
                reason: "simulated network failure".to_owned(),
            });
        }
        Ok(())
    }
}

impl DataStore for SimulatedStore {
    fn snapshot(&self) -> TreeStore {
        self.tree.clone()
    }

    fn move_node(&mut self, request: &MoveRequest) -> Result<(), StoreError> {
        self.take_injected_failure()?;
        self.tree
            .move_node(&request.id, &request.dest_id, request.placement)?;
        Ok(())
    }

    fn update_item(&mut self, id: &ItemId, edit: &ItemEdit) -> Result<(), StoreError> {
        self.take_injected_failure()?;
        if self.tree.update_item(id, edit) {
            Ok(())
        } else {
            Err(StoreError::ItemNotFound { id: id.clone() })
        }
    }
}

/// Deterministic fake dataset. Ids are `grp:1`, `grp:2`, … in pre-order.
pub fn fake_forest(seed: u64) -> TreeStore {
    struct Gen {
        tree: TreeStore,
        next_num: u64,
        rng: Rng,
    }

    impl Gen {
        fn node(&mut self, depth: usize, parent: Option<&ItemId>) {
            let id = ItemId::new(format!("grp:{}", self.next_num));
            self.next_num += 1;

            let item = DataItem {
                id: id.clone(),
                label: format!("Group {id}"),
                count: self.rng.next_count(),
                description: "Description".to_owned(),
                tags: FAKE_TAGS.iter().map(|tag| (*tag).to_owned()).collect(),
                kind: "Type".to_owned(),
                source: "file.csv".to_owned(),
                long_description: "Long description".to_owned(),
                location: "root -> folder -> file.csv".to_owned(),
            };
            if let Err(err) = self.tree.insert(parent, item) {
                log::error!("fake data: {err}");
                return;
            }

            if depth < FAKE_DEPTH {
                for _ in 0..FAKE_CHILDREN {
                    self.node(depth + 1, Some(&id));
                }
            }
        }
    }

    let mut generator = Gen {
        tree: TreeStore::new(),
        next_num: 1,
        rng: Rng::new(seed),
    };
    for _ in 0..FAKE_ROOTS {
        generator.node(0, None);
    }
    generator.tree
}

#[derive(Clone, Debug, Default)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed ^ 0x7EE6_71D0_7EE6_71D0)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0
    }

    fn next_count(&mut self) -> u32 {
        ((self.next_u64() >> 33) % 1000) as u32
    }
}
