use std::time::Duration;

use super::{
    DataStore as _, DropLocation, EditField, GridApi as _, HoveredRow, ItemEdit, ItemId,
    RowGeometry, SimulatedStore, StoreError, TreeGrid, TreeGridOptions,
};
use crate::tree_builder::ForestBuilder;

fn id(s: &str) -> ItemId {
    ItemId::from(s)
}

/// `A -> [B, C]`
fn store() -> SimulatedStore {
    let mut b = ForestBuilder::new();
    let a = b.group(None, "A");
    b.groups(Some(&a), ["B", "C"]);
    SimulatedStore::new(b.build())
}

fn grid() -> TreeGrid {
    TreeGrid::new(TreeGridOptions {
        load_latency: Duration::from_millis(100),
        debug_event_log: true,
        debug_integrity: true,
        debug_integrity_panic: true,
        ..TreeGridOptions::default()
    })
}

fn row_ids(grid: &TreeGrid) -> Vec<String> {
    grid.rows().iter().map(|row| row.id().to_string()).collect()
}

fn visible_ids(grid: &TreeGrid) -> Vec<String> {
    grid.visible_rows()
        .iter()
        .map(|row| row.id().to_string())
        .collect()
}

/// Loads the initial snapshot: the first update schedules, the second one delivers.
fn loaded(store: &mut SimulatedStore) -> TreeGrid {
    let mut grid = grid();
    grid.update(0.0, store);
    assert!(grid.is_loading());
    assert!(grid.rows().is_empty());
    grid.update(0.2, store);
    assert!(!grid.is_loading());
    grid
}

#[test]
fn drag_before_sibling_reorders() {
    let mut store = store();
    let mut grid = loaded(&mut store);
    assert_eq!(row_ids(&grid), ["A", "B", "C"]);
    grid.view_mut().set_expanded(&id("A"), true);
    assert_eq!(visible_ids(&grid), ["A", "B", "C"]);

    // Rows are 40 points high; B occupies 40..80, so y=45 is its "before" band.
    grid.drag_start(&id("C"));
    grid.drag_move(1.0, 45.0, Some(&HoveredRow::new("B", RowGeometry::new(40.0, 40.0))));
    assert_eq!(grid.session().drop_location(), Some(DropLocation::Before));
    let request = grid.drag_end(&id("C"));
    assert!(request.is_some());
    assert_eq!(grid.pending_mutations(), 1);

    // Applied on the next update, visible once the refetch latency elapsed.
    grid.update(1.0, &mut store);
    assert_eq!(grid.pending_mutations(), 0);
    assert_eq!(store.tree().children_of(&id("A")), &[id("C"), id("B")]);
    assert!(grid.is_loading());
    assert_eq!(row_ids(&grid), ["A", "B", "C"]);

    grid.update(1.2, &mut store);
    assert_eq!(row_ids(&grid), ["A", "C", "B"]);
    assert_eq!(grid.rows()[1].path, vec![id("A"), id("C")]);
    assert!(grid.view().is_expanded(&id("A")));
    assert!(grid.failures().is_empty());
    assert_eq!(grid.rows_generation(), 2);
}

#[test]
fn rejected_move_is_reported_and_tree_unchanged() {
    let mut store = store();
    let mut grid = loaded(&mut store);

    grid.drag_start(&id("A"));
    grid.drag_move(1.0, 60.0, Some(&HoveredRow::new("B", RowGeometry::new(40.0, 40.0))));
    grid.drag_end(&id("A"));
    grid.update(1.0, &mut store);

    let failures = grid.take_failures();
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0].error, StoreError::Move(_)));
    assert!(grid.failures().is_empty());
    assert_eq!(store.tree().children_of(&id("A")), &[id("B"), id("C")]);
    assert!(!grid.is_loading());
}

#[test]
fn injected_network_failure_surfaces_without_refetch() {
    let mut store = store();
    let mut grid = loaded(&mut store);
    store.fail_next(1);

    grid.drag_start(&id("C"));
    grid.drag_move(1.0, 60.0, Some(&HoveredRow::new("B", RowGeometry::new(40.0, 40.0))));
    grid.drag_end(&id("C"));
    grid.update(1.0, &mut store);

    assert!(matches!(
        grid.failures()[0].error,
        StoreError::Rejected { .. }
    ));
    assert!(!grid.is_loading());
    assert_eq!(store.tree().children_of(&id("A")), &[id("B"), id("C")]);
}

#[test]
fn auto_expand_during_drag_then_drop_into() {
    let mut store = store();
    let mut grid = loaded(&mut store);
    store
        .tree_mut()
        .insert(None, crate::tree_grid::DataItem::new("D", "Group D"))
        .unwrap();
    store
        .move_node(&crate::tree_grid::MoveRequest {
            id: id("D"),
            dest_id: id("A"),
            placement: DropLocation::After,
        })
        .unwrap();
    grid.invalidate(1.0);
    grid.update(1.0, &mut store);
    assert!(grid.is_loading());
    grid.update(1.2, &mut store);
    assert_eq!(visible_ids(&grid), ["A", "D"]);

    grid.drag_start(&id("D"));
    grid.drag_move(2.0, 20.0, Some(&HoveredRow::new("A", RowGeometry::new(0.0, 40.0))));
    grid.update(2.5, &mut store);
    assert!(!grid.view().is_expanded(&id("A")));
    grid.update(3.2, &mut store);
    assert!(grid.view().is_expanded(&id("A")));
    assert_eq!(visible_ids(&grid), ["A", "B", "C", "D"]);

    grid.drag_end(&id("D"));
    grid.update(3.3, &mut store);
    grid.update(3.5, &mut store);
    assert_eq!(row_ids(&grid), ["A", "B", "C", "D"]);
    assert_eq!(grid.rows()[3].path, vec![id("A"), id("D")]);
    assert!(grid.debug_log_text().contains("auto_expand A"));
}

#[test]
fn inline_edit_round_trip_and_search() {
    let mut store = store();
    let mut grid = loaded(&mut store);

    grid.submit_edit(id("B"), ItemEdit::label("Quarterly report"));
    grid.submit_edit(id("C"), ItemEdit::default());
    assert_eq!(grid.pending_mutations(), 1);
    grid.update(1.0, &mut store);
    grid.update(1.2, &mut store);
    assert_eq!(grid.rows()[1].item.label, "Quarterly report");

    grid.set_search("QUARTERLY");
    assert_eq!(visible_ids(&grid), ["A", "B"]);
    assert_eq!(grid.filtered_rows().len(), 2);
    grid.set_search("");
    assert_eq!(visible_ids(&grid), ["A"]);
}

#[test]
fn description_edit_reaches_store_search_and_export() {
    let mut store = store();
    let mut grid = loaded(&mut store);

    let c = grid.rows()[2].item.clone();
    grid.view_mut().begin_edit(&c, EditField::Description);
    assert_eq!(grid.view().editing(), Some((&id("C"), EditField::Description)));
    grid.submit_edit(id("C"), EditField::Description.edit("Monthly churn"));
    grid.update(1.0, &mut store);
    grid.update(1.2, &mut store);

    let c = &grid.rows()[2].item;
    assert_eq!(c.description, "Monthly churn");
    assert_eq!(c.label, "Group C");

    grid.set_search("churn");
    assert_eq!(visible_ids(&grid), ["A", "C"]);
    let csv = grid.export_csv(&crate::tree_grid::ExportParams::with_stamp("261018"));
    assert!(csv.lines().nth(2).is_some_and(|line| line.ends_with("\"Monthly churn\"")));
}

#[test]
fn redraw_requests_stay_bounded_without_rendering() {
    let mut store = SimulatedStore::with_fake_data(7);
    let mut grid = loaded(&mut store);
    let rows = grid.rows().len();
    assert!(rows > 0);

    for round in 0..100 {
        let now = 1.0 + f64::from(round);
        grid.invalidate(now);
        grid.update(now, &mut store);
        grid.update(now + 0.2, &mut store);
    }
    assert_eq!(grid.rows_generation(), 101);
    let pending = grid.view_mut().take_redraw_requests();
    assert!(pending.len() <= rows, "{} > {rows}", pending.len());
}

#[test]
fn readonly_grid_ignores_drags_and_edits() {
    let mut store = store();
    let mut grid = loaded(&mut store);
    grid.set_options(TreeGridOptions {
        readonly: true,
        ..grid.options().clone()
    });

    grid.drag_start(&id("C"));
    assert!(!grid.session().is_dragging());
    grid.submit_edit(id("B"), ItemEdit::label("x"));
    assert_eq!(grid.pending_mutations(), 0);
}

#[test]
fn export_follows_search() {
    let mut store = store();
    let mut grid = loaded(&mut store);
    grid.set_search("id:(c)");

    let csv = grid.export_csv(&crate::tree_grid::ExportParams::with_stamp("240101"));
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("\"A\""));
    assert!(lines[2].contains("\"C\""));
}
