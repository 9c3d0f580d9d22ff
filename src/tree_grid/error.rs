use super::types::{ItemId, Mutation};

/// Why a structural move was refused. A refused move leaves the forest untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveError {
    /// `id` is not in the forest (either the moved node or the destination).
    NotFound { id: ItemId },
    /// Moving `id` relative to `dest_id` would put it inside itself.
    InvalidTarget { id: ItemId, dest_id: ItemId },
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "node not found: {id}"),
            Self::InvalidTarget { id, dest_id } => {
                write!(f, "cannot move {id} relative to itself or its descendant {dest_id}")
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// Error returned by a [`super::DataStore`] mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    Move(MoveError),
    ItemNotFound { id: ItemId },
    /// The store refused the mutation for its own reasons (e.g. a simulated network failure).
    Rejected { reason: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Move(err) => write!(f, "move failed: {err}"),
            Self::ItemNotFound { id } => write!(f, "item not found: {id}"),
            Self::Rejected { reason } => write!(f, "rejected by store: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Move(err) => Some(err),
            Self::ItemNotFound { .. } | Self::Rejected { .. } => None,
        }
    }
}

impl From<MoveError> for StoreError {
    fn from(err: MoveError) -> Self {
        Self::Move(err)
    }
}

/// A mutation the store did not apply. Not retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchFailure {
    pub mutation: Mutation,
    pub error: StoreError,
}

impl std::fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.mutation, self.error)
    }
}

impl std::error::Error for DispatchFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Why a node could not be inserted into a forest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertError {
    DuplicateId { id: ItemId },
    ParentNotFound { id: ItemId },
}

impl std::fmt::Display for InsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "duplicate id: {id}"),
            Self::ParentNotFound { id } => write!(f, "parent not found: {id}"),
        }
    }
}

impl std::error::Error for InsertError {}
