mod debug;
mod dispatch;
mod drop_zone;
mod error;
mod expand_timer;
mod export;
mod filter;
mod flatten;
mod grid_api;
mod integrity;
mod options;
mod query;
mod session;
mod simulated;
mod tree;
mod types;
mod view;

#[cfg(feature = "persistence")]
mod persistence;

#[cfg(test)]
mod session_tests;
#[cfg(test)]
mod scenario_tests;

pub use debug::debug_tree_summary;
pub use dispatch::{DataStore, MutationDispatcher};
pub use drop_zone::{classify_drop, RowGeometry, DROP_ZONE_PAD};
pub use error::{DispatchFailure, InsertError, MoveError, StoreError};
pub use export::{export_csv, ExportColumn, ExportParams, DEFAULT_EXPORT_COLUMNS, EXPORT_FILE_PREFIX};
pub use filter::{quick_filter_text, QuickFilter};
pub use flatten::{flatten_rows, FlattenRows};
pub use grid_api::{GridApi, HoveredRow};
pub use integrity::forest_integrity_issues;
pub use options::TreeGridOptions;
pub use query::DataQuery;
pub use session::DragSession;
pub use simulated::{fake_forest, SimulatedStore};
pub use tree::{TreeNode, TreeStore};
pub use types::{DataItem, DataItemRow, DropLocation, EditField, ItemEdit, ItemId, MoveRequest, Mutation, Placement};
pub use view::{paint_drop_hint, TreeGridView};

#[cfg(feature = "persistence")]
pub use persistence::{duplicate_ids, ForestSnapshot, NodeSnapshot, SnapshotError, FOREST_SNAPSHOT_VERSION};

use debug::DebugLog;

/// Tree-grid over a [`DataStore`] with drag-and-drop reordering.
///
/// Per frame:
/// - queued mutations are flushed to the store; failures are kept for the application to show,
/// - the data query delivers a fresh snapshot once its (simulated) latency elapsed, and the rows
///   are re-derived from it,
/// - drag events from the grid drive the [`DragSession`], which submits one move per drop.
///
/// Use [`Self::ui`] to render with egui, or call the `drag_*` methods directly when driving the
/// grid from another widget.
#[derive(Debug)]
pub struct TreeGrid {
    options: TreeGridOptions,

    session: DragSession,
    dispatcher: MutationDispatcher,
    query: DataQuery,
    view: TreeGridView,

    rows: Vec<DataItemRow>,
    rows_generation: u64,
    search: String,
    filter: QuickFilter,

    failures: Vec<DispatchFailure>,
    debug_log: DebugLog,
    last_integrity_hash: Option<u64>,
    frame: u64,
}

impl Default for TreeGrid {
    fn default() -> Self {
        Self::new(TreeGridOptions::default())
    }
}

impl TreeGrid {
    pub fn new(options: TreeGridOptions) -> Self {
        Self {
            session: DragSession::new(&options),
            dispatcher: MutationDispatcher::new(),
            query: DataQuery::new(options.load_latency),
            view: TreeGridView::default(),
            rows: Vec::new(),
            rows_generation: 0,
            search: String::new(),
            filter: QuickFilter::default(),
            failures: Vec::new(),
            debug_log: DebugLog::default(),
            last_integrity_hash: None,
            frame: 0,
            options,
        }
    }

    pub fn options(&self) -> &TreeGridOptions {
        &self.options
    }

    /// Replace the options. Timing changes apply to the next drag and the next fetch.
    pub fn set_options(&mut self, options: TreeGridOptions) {
        self.session.configure(&options);
        self.query.set_latency(options.load_latency);
        self.options = options;
    }

    /// All rows of the last snapshot, in tree order.
    pub fn rows(&self) -> &[DataItemRow] {
        &self.rows
    }

    /// Generation of the snapshot the rows were derived from (0 before the first load).
    pub fn rows_generation(&self) -> u64 {
        self.rows_generation
    }

    pub fn is_loading(&self) -> bool {
        self.query.is_fetching()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.filter = QuickFilter::new(&self.search);
    }

    /// Rows currently shown: collapsed subtrees are hidden; with a search, matching rows and their
    /// ancestors are shown regardless of expansion.
    pub fn visible_rows(&self) -> Vec<&DataItemRow> {
        self.view.visible_rows(&self.rows, &self.filter)
    }

    /// Rows passing the search, ignoring expansion (what an export contains).
    pub fn filtered_rows(&self) -> Vec<&DataItemRow> {
        if self.filter.is_empty() {
            return self.rows.iter().collect();
        }
        let keep = self.filter.retained_ids(&self.rows);
        self.rows.iter().filter(|row| keep.contains(row.id())).collect()
    }

    pub fn export_csv(&self, params: &ExportParams) -> String {
        export_csv(self.filtered_rows(), params)
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn view(&self) -> &TreeGridView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TreeGridView {
        &mut self.view
    }

    /// Mutations submitted but not yet sent to the store.
    pub fn pending_mutations(&self) -> usize {
        self.dispatcher.pending()
    }

    /// Mutations the store refused since the last [`Self::take_failures`].
    pub fn failures(&self) -> &[DispatchFailure] {
        &self.failures
    }

    pub fn take_failures(&mut self) -> Vec<DispatchFailure> {
        std::mem::take(&mut self.failures)
    }

    /// Queue an inline edit (ignored in readonly mode).
    pub fn submit_edit(&mut self, id: ItemId, edit: ItemEdit) {
        if self.options.readonly {
            log::trace!("edit of {id} ignored, grid is readonly");
            return;
        }
        self.dispatcher.submit_edit(id, edit);
    }

    /// Refetch from the store after a change the grid did not make itself.
    pub fn invalidate(&mut self, now: f64) {
        self.query.invalidate(now);
    }

    /// Flush mutations, drive the data query and the auto-expand timer.
    ///
    /// `now` is egui input time in seconds.
    pub fn update(&mut self, now: f64, store: &mut dyn DataStore) {
        let failures = self.dispatcher.flush(store, &mut self.query, now);
        for failure in &failures {
            self.debug_log_event(format!("dispatch_failed {failure}"));
        }
        self.failures.extend(failures);

        if self.query.poll(now, store) {
            self.refresh_rows();
        }

        if let Some(expanded) = self.session.poll_auto_expand(&mut self.view, now) {
            self.debug_log_event(format!("auto_expand {expanded}"));
        }
    }

    pub fn drag_start(&mut self, id: &ItemId) {
        if self.options.readonly {
            return;
        }
        self.session.drag_start(&mut self.view, id);
        self.debug_log_event(format!("drag_start {id}"));
    }

    pub fn drag_move(&mut self, now: f64, pointer_y: f32, over: Option<&HoveredRow>) {
        let before = (self.session.hovered().cloned(), self.session.drop_location());
        self.session.drag_move(&mut self.view, now, pointer_y, over);
        let after = (self.session.hovered().cloned(), self.session.drop_location());
        if before != after {
            self.debug_log_event(format!("drop_target {:?} {:?}", after.0, after.1));
        }
    }

    pub fn drag_end(&mut self, id: &ItemId) -> Option<MoveRequest> {
        let request = self
            .session
            .drag_end(&mut self.view, &mut self.dispatcher, id);
        match &request {
            Some(request) => self.debug_log_event(format!("drop {request}")),
            None => self.debug_log_event(format!("drop_skip {id} no target")),
        }
        request
    }

    pub fn drag_leave(&mut self) {
        self.session.drag_leave(&mut self.view);
    }

    pub fn drag_cancel(&mut self) {
        self.session.cancel(&mut self.view);
        self.debug_log_event("drag_cancel".to_owned());
    }

    pub fn debug_log_text(&self) -> String {
        self.debug_log.text()
    }

    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }

    fn debug_log_event(&mut self, message: String) {
        if !self.options.debug_event_log {
            return;
        }
        self.debug_log
            .push(self.options.debug_event_log_capacity, message);
    }

    fn refresh_rows(&mut self) {
        let Some(tree) = self.query.data() else {
            return;
        };
        self.rows = flatten_rows(tree);
        self.rows_generation = self.query.generation();
        self.view.sync_groups(tree);

        if self.options.debug_integrity {
            let issues = forest_integrity_issues(tree);
            let hash = integrity::hash_issues(&issues);
            if !issues.is_empty() && self.last_integrity_hash != Some(hash) {
                for issue in &issues {
                    log::error!("{issue}");
                }
                assert!(
                    !self.options.debug_integrity_panic,
                    "forest integrity failed:\n{}",
                    issues.join("\n")
                );
            }
            self.last_integrity_hash = Some(hash);
        }

        let all: Vec<ItemId> = self.rows.iter().map(|row| row.id().clone()).collect();
        self.view.redraw_rows(&all);
        self.debug_log_event(format!(
            "refresh generation={} rows={}",
            self.rows_generation,
            self.rows.len()
        ));
    }
}
