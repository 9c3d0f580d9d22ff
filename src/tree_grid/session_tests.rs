use ahash::HashSet;

use super::{
    DragSession, DropLocation, GridApi, HoveredRow, ItemId, MoveRequest, Mutation,
    MutationDispatcher, RowGeometry, TreeGridOptions,
};

/// Grid fake that records every redraw request.
#[derive(Default)]
struct RecordingGrid {
    expanded: HashSet<ItemId>,
    groups: HashSet<ItemId>,
    redraws: Vec<Vec<ItemId>>,
}

impl RecordingGrid {
    fn with_groups(groups: &[&str]) -> Self {
        Self {
            groups: groups.iter().map(|id| ItemId::from(*id)).collect(),
            ..Self::default()
        }
    }

    fn take_redraws(&mut self) -> Vec<Vec<ItemId>> {
        std::mem::take(&mut self.redraws)
    }
}

impl GridApi for RecordingGrid {
    fn redraw_rows(&mut self, rows: &[ItemId]) {
        self.redraws.push(rows.to_vec());
    }

    fn is_expanded(&self, id: &ItemId) -> bool {
        self.expanded.contains(id)
    }

    fn set_expanded(&mut self, id: &ItemId, expanded: bool) {
        if expanded {
            self.expanded.insert(id.clone());
        } else {
            self.expanded.remove(id);
        }
    }

    fn has_children(&self, id: &ItemId) -> bool {
        self.groups.contains(id)
    }
}

fn id(s: &str) -> ItemId {
    ItemId::from(s)
}

/// Rows are 40 points high and stacked from y=0 in the order given.
fn row(s: &str, index: usize) -> HoveredRow {
    HoveredRow::new(s, RowGeometry::new(index as f32 * 40.0, 40.0))
}

fn session() -> DragSession {
    DragSession::new(&TreeGridOptions::default())
}

#[test]
fn drop_without_target_submits_nothing() {
    let mut grid = RecordingGrid::default();
    let mut dispatcher = MutationDispatcher::new();
    let mut session = session();

    session.drag_start(&mut grid, &id("C"));
    assert!(session.is_dragging());
    assert_eq!(session.drag_end(&mut grid, &mut dispatcher, &id("C")), None);
    assert!(!session.is_dragging());
    assert_eq!(dispatcher.pending(), 0);
}

#[test]
fn drop_submits_exactly_one_move_with_classified_placement() {
    let mut grid = RecordingGrid::default();
    let mut dispatcher = MutationDispatcher::new();
    let mut session = session();

    session.drag_start(&mut grid, &id("C"));
    session.drag_move(&mut grid, 0.0, 45.0, Some(&row("B", 1)));
    session.drag_move(&mut grid, 0.1, 60.0, Some(&row("B", 1)));
    session.drag_move(&mut grid, 0.2, 78.0, Some(&row("B", 1)));
    assert_eq!(session.drop_location(), Some(DropLocation::After));

    let expected = MoveRequest {
        id: id("C"),
        dest_id: id("B"),
        placement: DropLocation::After,
    };
    assert_eq!(
        session.drag_end(&mut grid, &mut dispatcher, &id("C")),
        Some(expected.clone())
    );
    assert_eq!(
        dispatcher.pending_mutations().collect::<Vec<_>>(),
        vec![&Mutation::Move(expected)]
    );
    // A second end for the same gesture is ignored.
    assert_eq!(session.drag_end(&mut grid, &mut dispatcher, &id("C")), None);
    assert_eq!(dispatcher.pending(), 1);
}

#[test]
fn dragged_group_is_collapsed_and_restored() {
    let mut grid = RecordingGrid::with_groups(&["A"]);
    grid.set_expanded(&id("A"), true);
    let mut dispatcher = MutationDispatcher::new();
    let mut session = session();

    session.drag_start(&mut grid, &id("A"));
    assert!(!grid.is_expanded(&id("A")));
    session.drag_end(&mut grid, &mut dispatcher, &id("A"));
    assert!(grid.is_expanded(&id("A")));

    // A collapsed group stays collapsed.
    grid.set_expanded(&id("A"), false);
    session.drag_start(&mut grid, &id("A"));
    session.drag_end(&mut grid, &mut dispatcher, &id("A"));
    assert!(!grid.is_expanded(&id("A")));
}

#[test]
fn repeated_start_keeps_the_original_expanded_flag() {
    let mut grid = RecordingGrid::with_groups(&["A"]);
    grid.set_expanded(&id("A"), true);
    let mut dispatcher = MutationDispatcher::new();
    let mut session = session();

    session.drag_start(&mut grid, &id("A"));
    session.drag_start(&mut grid, &id("A"));
    session.drag_end(&mut grid, &mut dispatcher, &id("A"));
    assert!(grid.is_expanded(&id("A")));
}

#[test]
fn starting_another_drag_cancels_the_first() {
    let mut grid = RecordingGrid::with_groups(&["A"]);
    grid.set_expanded(&id("A"), true);
    let mut dispatcher = MutationDispatcher::new();
    let mut session = session();

    session.drag_start(&mut grid, &id("A"));
    session.drag_move(&mut grid, 0.0, 60.0, Some(&row("B", 1)));
    session.drag_start(&mut grid, &id("C"));

    assert!(grid.is_expanded(&id("A")));
    assert_eq!(session.dragged(), Some(&id("C")));
    assert_eq!(session.hovered(), None);
    assert_eq!(session.drag_end(&mut grid, &mut dispatcher, &id("C")), None);
}

#[test]
fn hovering_own_row_yields_no_target() {
    let mut grid = RecordingGrid::default();
    let mut dispatcher = MutationDispatcher::new();
    let mut session = session();

    session.drag_start(&mut grid, &id("C"));
    session.drag_move(&mut grid, 0.0, 20.0, Some(&row("C", 0)));
    assert_eq!(session.hovered(), None);
    assert_eq!(session.drop_location(), None);
    assert_eq!(session.drop_hint(&id("C")), None);

    // Moving back onto itself after hovering another row forgets that row.
    session.drag_move(&mut grid, 0.1, 60.0, Some(&row("B", 1)));
    session.drag_move(&mut grid, 0.2, 20.0, Some(&row("C", 0)));
    assert_eq!(session.hovered(), None);
    assert_eq!(session.drag_end(&mut grid, &mut dispatcher, &id("C")), None);
    assert_eq!(dispatcher.pending(), 0);
}

#[test]
fn repeated_moves_do_not_repeat_redraws() {
    let mut grid = RecordingGrid::default();
    let mut session = session();
    session.drag_start(&mut grid, &id("C"));

    session.drag_move(&mut grid, 0.0, 60.0, Some(&row("B", 1)));
    assert_eq!(grid.take_redraws(), vec![vec![id("B")]]);

    for step in 1..10 {
        session.drag_move(&mut grid, step as f64 * 0.01, 60.0 + step as f32 * 0.4, Some(&row("B", 1)));
    }
    assert!(grid.take_redraws().is_empty());

    // Zone change on the same row: that row only.
    session.drag_move(&mut grid, 0.2, 42.0, Some(&row("B", 1)));
    assert_eq!(grid.take_redraws(), vec![vec![id("B")]]);
    assert_eq!(session.drop_hint(&id("B")), Some(DropLocation::Before));

    // Row change: new and previous row.
    session.drag_move(&mut grid, 0.3, 100.0, Some(&row("D", 2)));
    assert_eq!(grid.take_redraws(), vec![vec![id("D"), id("B")]]);
}

#[test]
fn move_without_start_is_ignored() {
    let mut grid = RecordingGrid::with_groups(&["B"]);
    let mut session = session();

    session.drag_move(&mut grid, 0.0, 60.0, Some(&row("B", 1)));
    assert!(!session.is_dragging());
    assert!(grid.take_redraws().is_empty());
    assert_eq!(session.poll_auto_expand(&mut grid, 5.0), None);
}

#[test]
fn resting_on_a_group_expands_it_after_the_delay() {
    let mut grid = RecordingGrid::with_groups(&["B"]);
    let mut session = session();
    session.drag_start(&mut grid, &id("C"));

    session.drag_move(&mut grid, 10.0, 60.0, Some(&row("B", 1)));
    assert_eq!(session.pending_expand(), Some(&id("B")));
    assert_eq!(session.poll_auto_expand(&mut grid, 10.5), None);
    assert!(!grid.is_expanded(&id("B")));

    // Moving within the row does not restart the timer.
    session.drag_move(&mut grid, 11.0, 62.0, Some(&row("B", 1)));
    assert_eq!(session.poll_auto_expand(&mut grid, 11.2), Some(id("B")));
    assert!(grid.is_expanded(&id("B")));
    assert_eq!(session.pending_expand(), None);
}

#[test]
fn hover_change_cancels_the_pending_expand() {
    let mut grid = RecordingGrid::with_groups(&["A", "B"]);
    let mut session = session();
    session.drag_start(&mut grid, &id("C"));

    session.drag_move(&mut grid, 0.0, 20.0, Some(&row("A", 0)));
    session.drag_move(&mut grid, 0.5, 60.0, Some(&row("B", 1)));
    assert_eq!(session.pending_expand(), Some(&id("B")));

    assert_eq!(session.poll_auto_expand(&mut grid, 1.2), None);
    assert!(!grid.is_expanded(&id("A")));
    assert_eq!(session.poll_auto_expand(&mut grid, 1.7), Some(id("B")));
    assert!(!grid.is_expanded(&id("A")));
}

#[test]
fn leaves_do_not_auto_expand() {
    let mut grid = RecordingGrid::default();
    let mut session = session();
    session.drag_start(&mut grid, &id("C"));

    session.drag_move(&mut grid, 0.0, 60.0, Some(&row("B", 1)));
    assert_eq!(session.pending_expand(), None);
    assert_eq!(session.poll_auto_expand(&mut grid, 5.0), None);
}

#[test]
fn leaving_the_grid_clears_the_target_but_keeps_dragging() {
    let mut grid = RecordingGrid::with_groups(&["B"]);
    let mut dispatcher = MutationDispatcher::new();
    let mut session = session();
    session.drag_start(&mut grid, &id("C"));
    session.drag_move(&mut grid, 0.0, 60.0, Some(&row("B", 1)));
    grid.take_redraws();

    session.drag_leave(&mut grid);
    assert!(session.is_dragging());
    assert_eq!(session.hovered(), None);
    assert_eq!(session.pending_expand(), None);
    assert_eq!(grid.take_redraws(), vec![vec![id("B")]]);
    assert_eq!(session.poll_auto_expand(&mut grid, 5.0), None);

    session.drag_leave(&mut grid);
    assert!(grid.take_redraws().is_empty());
    assert_eq!(session.drag_end(&mut grid, &mut dispatcher, &id("C")), None);
}

#[test]
fn cancel_restores_without_submitting() {
    let mut grid = RecordingGrid::with_groups(&["A"]);
    grid.set_expanded(&id("A"), true);
    let mut dispatcher = MutationDispatcher::new();
    let mut session = session();

    session.drag_start(&mut grid, &id("A"));
    session.drag_move(&mut grid, 0.0, 60.0, Some(&row("B", 1)));
    session.cancel(&mut grid);

    assert!(!session.is_dragging());
    assert!(grid.is_expanded(&id("A")));
    assert_eq!(session.drag_end(&mut grid, &mut dispatcher, &id("A")), None);
    assert_eq!(dispatcher.pending(), 0);
}

#[test]
fn narrower_drop_zone_pad_from_options() {
    let options = TreeGridOptions {
        drop_zone_pad: 4.0,
        ..TreeGridOptions::default()
    };
    let mut grid = RecordingGrid::default();
    let mut session = DragSession::new(&options);
    session.drag_start(&mut grid, &id("C"));

    session.drag_move(&mut grid, 0.0, 46.0, Some(&row("B", 1)));
    assert_eq!(session.drop_location(), Some(DropLocation::Into));
}
