#![forbid(unsafe_code)]

pub mod tree_builder;
pub mod tree_grid;

pub use tree_builder::ForestBuilder;
pub use tree_grid::{
    DataItem, DataItemRow, DataQuery, DataStore, DispatchFailure, DragSession, DropLocation,
    ExportColumn, ExportParams, GridApi, HoveredRow, ItemEdit, ItemId, MoveError, MoveRequest,
    Mutation, MutationDispatcher, QuickFilter, RowGeometry, SimulatedStore, StoreError, TreeGrid,
    TreeGridOptions, TreeGridView, TreeStore,
};

#[cfg(feature = "persistence")]
pub use tree_grid::{ForestSnapshot, SnapshotError, FOREST_SNAPSHOT_VERSION};
