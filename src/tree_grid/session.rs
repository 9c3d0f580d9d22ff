use super::dispatch::MutationDispatcher;
use super::drop_zone::classify_drop;
use super::expand_timer::ScheduledExpand;
use super::grid_api::{GridApi, HoveredRow};
use super::options::TreeGridOptions;
use super::types::{DropLocation, ItemId, MoveRequest, Mutation};

/// Transient state of one row-drag gesture: `idle -> dragging -> idle`.
///
/// The session is the only source of truth for the current drop target; the grid is only asked
/// to redraw rows whose highlighting may have changed.
#[derive(Debug)]
pub struct DragSession {
    drop_zone_pad: f32,
    auto_expand_delay_secs: f64,
    active: Option<ActiveDrag>,
}

#[derive(Debug)]
struct ActiveDrag {
    dragged: ItemId,
    was_expanded: bool,
    hovered: Option<ItemId>,
    drop_location: Option<DropLocation>,
    pending_expand: ScheduledExpand,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new(&TreeGridOptions::default())
    }
}

impl DragSession {
    pub fn new(options: &TreeGridOptions) -> Self {
        Self {
            drop_zone_pad: options.drop_zone_pad,
            auto_expand_delay_secs: options.auto_expand_delay_secs(),
            active: None,
        }
    }

    pub fn configure(&mut self, options: &TreeGridOptions) {
        self.drop_zone_pad = options.drop_zone_pad;
        self.auto_expand_delay_secs = options.auto_expand_delay_secs();
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn dragged(&self) -> Option<&ItemId> {
        self.active.as_ref().map(|active| &active.dragged)
    }

    pub fn hovered(&self) -> Option<&ItemId> {
        self.active.as_ref()?.hovered.as_ref()
    }

    pub fn drop_location(&self) -> Option<DropLocation> {
        self.active.as_ref()?.drop_location
    }

    /// The drop zone to highlight on row `id`, if it is the current drop target.
    pub fn drop_hint(&self, id: &ItemId) -> Option<DropLocation> {
        let active = self.active.as_ref()?;
        if active.hovered.as_ref() == Some(id) {
            active.drop_location
        } else {
            None
        }
    }

    /// The row that will auto-expand if the pointer keeps resting on it.
    pub fn pending_expand(&self) -> Option<&ItemId> {
        self.active.as_ref()?.pending_expand.target()
    }

    /// Seconds until the pending auto-expand fires.
    pub fn pending_expand_remaining(&self, now: f64) -> Option<f64> {
        self.active.as_ref()?.pending_expand.remaining(now)
    }

    /// A row started being dragged.
    ///
    /// An expanded row is collapsed for the duration of the drag, and re-expanded on drag end.
    pub fn drag_start(&mut self, grid: &mut dyn GridApi, node: &ItemId) {
        if let Some(active) = &self.active {
            if &active.dragged == node {
                // Re-entering the grid: keep the expanded flag recorded at the real start.
                log::trace!("drag start ignored, already dragging {node}");
                return;
            }
            self.cancel(grid);
        }

        let was_expanded = grid.is_expanded(node);
        if was_expanded {
            grid.set_expanded(node, false);
        }
        log::debug!("drag start {node} was_expanded={was_expanded}");

        self.active = Some(ActiveDrag {
            dragged: node.clone(),
            was_expanded,
            hovered: None,
            drop_location: None,
            pending_expand: ScheduledExpand::default(),
        });
    }

    /// The pointer moved to `pointer_y` over `over` (or over no row).
    pub fn drag_move(
        &mut self,
        grid: &mut dyn GridApi,
        now: f64,
        pointer_y: f32,
        over: Option<&HoveredRow>,
    ) {
        if self.active.is_none() {
            log::trace!("drag move without an active drag");
            return;
        }

        let over = match over {
            Some(row) if self.dragged() != Some(&row.id) => row,
            _ => {
                self.clear_hover(grid);
                return;
            }
        };

        let location = classify_drop(pointer_y, over.geometry, self.drop_zone_pad);
        let delay = self.auto_expand_delay_secs;
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let previous_location = active.drop_location.replace(location);

        if active.hovered.as_ref() != Some(&over.id) {
            active.pending_expand.cancel();
            let previous = active.hovered.replace(over.id.clone());

            let mut rows = vec![over.id.clone()];
            rows.extend(previous);
            grid.redraw_rows(&rows);

            if grid.has_children(&over.id) {
                active.pending_expand.arm(over.id.clone(), now, delay);
            }
        } else if previous_location != Some(location) {
            grid.redraw_rows(std::slice::from_ref(&over.id));
        }
    }

    /// Expand the hovered group if the pointer rested on it long enough.
    ///
    /// Returns the expanded row.
    pub fn poll_auto_expand(&mut self, grid: &mut dyn GridApi, now: f64) -> Option<ItemId> {
        let target = self.active.as_mut()?.pending_expand.take_due(now)?;
        log::debug!("auto-expand {target}");
        grid.set_expanded(&target, true);
        Some(target)
    }

    /// The drag finished with the pointer released.
    ///
    /// Submits exactly one move if there is a drop target, and always ends the gesture.
    pub fn drag_end(
        &mut self,
        grid: &mut dyn GridApi,
        dispatcher: &mut MutationDispatcher,
        node: &ItemId,
    ) -> Option<MoveRequest> {
        let Some(mut active) = self.active.take() else {
            log::trace!("drag end for {node} without an active drag");
            return None;
        };
        if &active.dragged != node {
            log::warn!(
                "drag end reported {node} but the drag started on {}",
                active.dragged
            );
        }

        active.pending_expand.cancel();
        grid.set_expanded(&active.dragged, active.was_expanded);

        let request = active.hovered.as_ref().map(|dest_id| MoveRequest {
            id: active.dragged.clone(),
            dest_id: dest_id.clone(),
            placement: active.drop_location.unwrap_or(DropLocation::Into),
        });
        if let Some(request) = &request {
            log::debug!("drag end: {request}");
            dispatcher.submit(Mutation::Move(request.clone()));
        } else {
            log::debug!("drag end {} without a drop target", active.dragged);
        }

        if let Some(previous) = active.hovered.take() {
            grid.redraw_rows(&[previous]);
        }
        request
    }

    /// The pointer left the grid.
    pub fn drag_leave(&mut self, grid: &mut dyn GridApi) {
        self.clear_hover(grid);
    }

    /// Forget the current drop target and cancel the pending auto-expand.
    pub fn clear_hover(&mut self, grid: &mut dyn GridApi) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.pending_expand.cancel();
        active.drop_location = None;
        if let Some(previous) = active.hovered.take() {
            grid.redraw_rows(&[previous]);
        }
    }

    /// Abort the gesture without dispatching anything.
    pub fn cancel(&mut self, grid: &mut dyn GridApi) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        log::debug!("drag cancelled {}", active.dragged);
        active.pending_expand.cancel();
        grid.set_expanded(&active.dragged, active.was_expanded);
        if let Some(previous) = active.hovered.take() {
            grid.redraw_rows(&[previous]);
        }
    }
}
