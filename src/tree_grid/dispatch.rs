use std::collections::VecDeque;

use super::error::{DispatchFailure, StoreError};
use super::query::DataQuery;
use super::tree::TreeStore;
use super::types::{ItemEdit, ItemId, MoveRequest, Mutation};

/// The external data store the grid edits.
pub trait DataStore {
    /// The current forest. Consumers replace their copy wholesale.
    fn snapshot(&self) -> TreeStore;

    /// Move `request.id` relative to `request.dest_id`.
    fn move_node(&mut self, request: &MoveRequest) -> Result<(), StoreError>;

    /// Apply an inline edit to one item.
    fn update_item(&mut self, id: &ItemId, edit: &ItemEdit) -> Result<(), StoreError>;
}

/// Queue of mutations waiting to be sent to the [`DataStore`].
///
/// Submitting never fails and never blocks the drag gesture; the outcome is only known on the
/// next [`Self::flush`].
#[derive(Debug, Default)]
pub struct MutationDispatcher {
    queue: VecDeque<Mutation>,
}

impl MutationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, mutation: Mutation) {
        self.queue.push_back(mutation);
    }

    pub fn submit_move(&mut self, request: MoveRequest) {
        self.submit(Mutation::Move(request));
    }

    pub fn submit_edit(&mut self, id: ItemId, edit: ItemEdit) {
        if edit.is_empty() {
            return;
        }
        self.submit(Mutation::Edit { id, edit });
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_mutations(&self) -> impl Iterator<Item = &Mutation> {
        self.queue.iter()
    }

    /// Send all queued mutations to `store`, in submission order.
    ///
    /// If anything was applied, `query` is invalidated so the rows get re-derived from a fresh
    /// snapshot. Failures are returned (and logged), never retried.
    pub fn flush(
        &mut self,
        store: &mut dyn DataStore,
        query: &mut DataQuery,
        now: f64,
    ) -> Vec<DispatchFailure> {
        let mut failures = Vec::new();
        let mut applied = 0usize;

        while let Some(mutation) = self.queue.pop_front() {
            let result = match &mutation {
                Mutation::Move(request) => store.move_node(request),
                Mutation::Edit { id, edit } => store.update_item(id, edit),
            };
            match result {
                Ok(()) => {
                    log::debug!("applied {mutation}");
                    applied += 1;
                }
                Err(error) => {
                    log::warn!("{mutation} failed: {error}");
                    failures.push(DispatchFailure { mutation, error });
                }
            }
        }

        if applied > 0 {
            query.invalidate(now);
        }
        failures
    }
}
