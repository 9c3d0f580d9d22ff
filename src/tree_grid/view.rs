use std::time::Duration;

use ahash::HashSet;
use itertools::Itertools as _;
use egui::{Align2, Color32, FontId, LayerId, Order, Pos2, Rect, Sense, Stroke};

use super::dispatch::DataStore;
use super::drop_zone::RowGeometry;
use super::filter::QuickFilter;
use super::grid_api::{GridApi, HoveredRow};
use super::tree::TreeStore;
use super::types::{DataItem, DataItemRow, DropLocation, EditField, ItemId};
use super::TreeGrid;

/// Relative widths of the grid columns; the first one holds the tree (indent, toggle, label).
const COLUMNS: [(&str, f32); 6] = [
    ("Label", 0.30),
    ("Id", 0.14),
    ("Type", 0.10),
    ("Source", 0.12),
    ("Count", 0.08),
    ("Description", 0.26),
];

const DESCRIPTION_COLUMN: usize = COLUMNS.len() - 1;

/// Row expansion state and redraw bookkeeping of the egui grid.
#[derive(Debug, Default)]
pub struct TreeGridView {
    expanded: HashSet<ItemId>,
    /// Rows that have children in the current snapshot.
    groups: HashSet<ItemId>,
    redraw_requested: HashSet<ItemId>,
    editing: Option<CellEdit>,
}

#[derive(Debug)]
struct CellEdit {
    id: ItemId,
    field: EditField,
    text: String,
    focused: bool,
}

impl CellEdit {
    fn new(item: &DataItem, field: EditField) -> Self {
        Self {
            id: item.id.clone(),
            field,
            text: field.text(item).to_owned(),
            focused: false,
        }
    }
}

impl GridApi for TreeGridView {
    fn redraw_rows(&mut self, rows: &[ItemId]) {
        self.redraw_requested.extend(rows.iter().cloned());
    }

    fn is_expanded(&self, id: &ItemId) -> bool {
        self.expanded.contains(id)
    }

    fn set_expanded(&mut self, id: &ItemId, expanded: bool) {
        let changed = if expanded {
            self.expanded.insert(id.clone())
        } else {
            self.expanded.remove(id)
        };
        if changed {
            self.redraw_requested.insert(id.clone());
        }
    }

    fn has_children(&self, id: &ItemId) -> bool {
        self.groups.contains(id)
    }
}

impl TreeGridView {
    pub fn toggle(&mut self, id: &ItemId) {
        let expanded = self.is_expanded(id);
        self.set_expanded(id, !expanded);
    }

    pub fn expand_all(&mut self) {
        self.expanded.extend(self.groups.iter().cloned());
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn is_editing(&self, id: &ItemId) -> bool {
        self.editing.as_ref().is_some_and(|edit| &edit.id == id)
    }

    /// The row and cell being edited inline, if any.
    pub fn editing(&self) -> Option<(&ItemId, EditField)> {
        self.editing.as_ref().map(|edit| (&edit.id, edit.field))
    }

    /// Open the inline editor on one cell, replacing any open editor.
    pub fn begin_edit(&mut self, item: &DataItem, field: EditField) {
        self.editing = Some(CellEdit::new(item, field));
    }

    /// Rows whose redraw was requested since the last call, each once, in id order.
    pub fn take_redraw_requests(&mut self) -> Vec<ItemId> {
        std::mem::take(&mut self.redraw_requested)
            .into_iter()
            .sorted()
            .collect()
    }

    /// Adopt a fresh snapshot: recompute which rows are groups and forget vanished rows.
    pub(crate) fn sync_groups(&mut self, tree: &TreeStore) {
        self.groups = tree
            .iter()
            .filter(|node| node.has_children())
            .map(|node| node.id().clone())
            .collect();
        self.expanded.retain(|id| tree.contains(id));
        self.redraw_requested.retain(|id| tree.contains(id));
        if self
            .editing
            .as_ref()
            .is_some_and(|edit| !tree.contains(&edit.id))
        {
            self.editing = None;
        }
    }

    /// Rows to render.
    ///
    /// Without a search a row is shown if all its ancestors are expanded. With a search, matching
    /// rows and their ancestors are shown and those ancestors count as expanded.
    pub fn visible_rows<'a>(
        &self,
        rows: &'a [DataItemRow],
        filter: &QuickFilter,
    ) -> Vec<&'a DataItemRow> {
        if filter.is_empty() {
            rows.iter()
                .filter(|row| {
                    row.ancestors()
                        .iter()
                        .all(|ancestor| self.expanded.contains(ancestor))
                })
                .collect()
        } else {
            let keep = filter.retained_ids(rows);
            rows.iter().filter(|row| keep.contains(row.id())).collect()
        }
    }
}

/// Paint the drop-zone highlight of the hovered row.
pub fn paint_drop_hint(
    painter: &egui::Painter,
    rect: Rect,
    location: DropLocation,
    visuals: &egui::Visuals,
) {
    let stroke = Stroke::new(2.0, visuals.selection.stroke.color);
    match location {
        DropLocation::Before => {
            painter.line_segment([rect.left_top(), rect.right_top()], stroke);
        }
        DropLocation::After => {
            painter.line_segment([rect.left_bottom(), rect.right_bottom()], stroke);
        }
        DropLocation::Into => {
            let base = visuals.selection.bg_fill;
            let fill = with_alpha(base, ((base.a() as f32) * 0.45) as u8);
            painter.rect(rect.shrink(1.0), 2.0, fill, stroke, egui::StrokeKind::Inside);
        }
    }
}

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn column_rects(row: Rect) -> [Rect; COLUMNS.len()] {
    let mut left = row.left();
    COLUMNS.map(|(_, fraction)| {
        let width = row.width() * fraction;
        let rect = Rect::from_min_max(
            Pos2::new(left, row.top()),
            Pos2::new(left + width, row.bottom()),
        );
        left += width;
        rect
    })
}

fn paint_cell(ui: &egui::Ui, rect: Rect, text: &str, font: &FontId, color: Color32) {
    ui.painter_at(rect.shrink2(egui::vec2(4.0, 0.0))).text(
        Pos2::new(rect.left() + 4.0, rect.center().y),
        Align2::LEFT_CENTER,
        text,
        font.clone(),
        color,
    );
}

/// Read-only cells between the tree column and the description.
fn cell_texts(item: &DataItem) -> [String; DESCRIPTION_COLUMN - 1] {
    [
        item.id.to_string(),
        item.kind.clone(),
        item.source.clone(),
        item.count.to_string(),
    ]
}

/// The editable cell under `x`, if any.
fn editable_field_at(row: Rect, x: f32) -> Option<EditField> {
    let columns = column_rects(row);
    if columns[0].x_range().contains(x) {
        Some(EditField::Label)
    } else if columns[DESCRIPTION_COLUMN].x_range().contains(x) {
        Some(EditField::Description)
    } else {
        None
    }
}

/// `Some(true)` once Enter commits, `Some(false)` when focus is lost any other way.
fn show_cell_edit(ui: &mut egui::Ui, rect: Rect, edit: &mut CellEdit) -> Option<bool> {
    let response = ui.put(rect, egui::TextEdit::singleline(&mut edit.text));
    if !edit.focused {
        response.request_focus();
        edit.focused = true;
    }
    response
        .lost_focus()
        .then(|| ui.input(|i| i.key_pressed(egui::Key::Enter)))
}

/// Per-row render input, collected before the scroll area borrows the ui.
struct RowPaint {
    row: DataItemRow,
    expanded: bool,
    has_children: bool,
    hint: Option<DropLocation>,
    dragged: bool,
}

impl TreeGrid {
    /// Render the grid and feed the pointer into the drag session.
    pub fn ui(&mut self, ui: &mut egui::Ui, store: &mut dyn DataStore) {
        let now = ui.input(|i| i.time);
        self.frame += 1;
        self.debug_log.set_frame(self.frame);
        self.update(now, store);

        if let Some(remaining) = self.query.remaining(now) {
            ui.ctx()
                .request_repaint_after(Duration::from_secs_f64(remaining));
        }
        if self.query.data().is_none() {
            ui.label("Loading...");
            return;
        }

        let readonly = self.options.readonly;
        let row_height = self.options.row_height;
        let indent = self.options.indent;
        let rows: Vec<RowPaint> = self
            .visible_rows()
            .into_iter()
            .map(|row| RowPaint {
                row: row.clone(),
                expanded: self.view.is_expanded(row.id()) || !self.filter.is_empty(),
                has_children: self.view.has_children(row.id()),
                hint: self.session.drop_hint(row.id()),
                dragged: self.session.dragged() == Some(row.id()),
            })
            .collect();

        let font = egui::TextStyle::Body.resolve(ui.style());
        let visuals = ui.visuals().clone();

        let (header_rect, _) =
            ui.allocate_exact_size(egui::vec2(ui.available_width(), row_height), Sense::hover());
        ui.painter()
            .rect_filled(header_rect, 0.0, visuals.faint_bg_color);
        for ((title, _), rect) in COLUMNS.iter().zip(column_rects(header_rect)) {
            paint_cell(ui, rect, title, &font, visuals.strong_text_color());
        }

        let mut editing = self.view.editing.take();
        let mut edit_finished = false;
        let mut new_edit: Option<CellEdit> = None;
        let mut committed: Option<(ItemId, EditField, String)> = None;
        let mut toggled: Option<ItemId> = None;
        let mut drag_started: Option<ItemId> = None;
        let mut row_rects: Vec<(ItemId, Rect)> = Vec::new();

        let grid_rect = ui
            .scope(|ui| {
                ui.spacing_mut().item_spacing.y = 0.0;
                egui::ScrollArea::vertical()
                    .id_salt("egui_tree_grid_rows")
                    .auto_shrink([false, false])
                    .show_rows(ui, row_height, rows.len(), |ui, range| {
                        for paint in &rows[range] {
                            let id = paint.row.id();
                            let item = &paint.row.item;
                            let (rect, response) = ui.allocate_exact_size(
                                egui::vec2(ui.available_width(), row_height),
                                Sense::click_and_drag(),
                            );
                            row_rects.push((id.clone(), rect));

                            if response.hovered() && !paint.dragged {
                                ui.painter()
                                    .rect_filled(rect, 0.0, visuals.widgets.hovered.weak_bg_fill);
                            }
                            let text_color = if paint.dragged {
                                visuals.weak_text_color()
                            } else {
                                visuals.text_color()
                            };

                            let columns = column_rects(rect);
                            let tree_cell = columns[0];
                            let toggle_rect = Rect::from_min_size(
                                Pos2::new(
                                    tree_cell.left() + indent * paint.row.depth() as f32,
                                    rect.top(),
                                ),
                                egui::vec2(indent, row_height),
                            );
                            if paint.has_children {
                                let toggle = ui.interact(
                                    toggle_rect,
                                    ui.id().with((id.as_str(), "toggle")),
                                    Sense::click(),
                                );
                                let icon = if paint.expanded { "⏷" } else { "⏵" };
                                ui.painter().text(
                                    toggle_rect.center(),
                                    Align2::CENTER_CENTER,
                                    icon,
                                    font.clone(),
                                    text_color,
                                );
                                if toggle.clicked() {
                                    toggled = Some(id.clone());
                                }
                            }

                            let label_rect = Rect::from_min_max(
                                Pos2::new(toggle_rect.right(), rect.top()),
                                Pos2::new(tree_cell.right().max(toggle_rect.right()), rect.bottom()),
                            );
                            let description_rect = columns[DESCRIPTION_COLUMN];
                            let mut finished = None;
                            match editing.as_mut().filter(|edit| &edit.id == id) {
                                Some(edit) => {
                                    let (edit_rect, other_text, other_rect) = match edit.field {
                                        EditField::Label => {
                                            (label_rect, &item.description, description_rect)
                                        }
                                        EditField::Description => {
                                            (description_rect, &item.label, label_rect)
                                        }
                                    };
                                    paint_cell(ui, other_rect, other_text, &font, text_color);
                                    if let Some(commit) = show_cell_edit(ui, edit_rect, edit) {
                                        finished = Some((commit, edit.field, edit.text.clone()));
                                    }
                                }
                                None => {
                                    paint_cell(ui, label_rect, &item.label, &font, text_color);
                                    paint_cell(
                                        ui,
                                        description_rect,
                                        &item.description,
                                        &font,
                                        text_color,
                                    );
                                }
                            }
                            if let Some((commit, field, text)) = finished {
                                if commit {
                                    committed = Some((id.clone(), field, text));
                                }
                                edit_finished = true;
                            }

                            for (rect, text) in
                                columns[1..DESCRIPTION_COLUMN].iter().zip(cell_texts(item))
                            {
                                paint_cell(ui, *rect, &text, &font, text_color);
                            }

                            if let Some(hint) = paint.hint {
                                paint_drop_hint(ui.painter(), rect, hint, &visuals);
                            }

                            if !readonly {
                                if let Some(field) = response
                                    .interact_pointer_pos()
                                    .filter(|_| response.double_clicked())
                                    .and_then(|pos| editable_field_at(rect, pos.x))
                                {
                                    new_edit = Some(CellEdit::new(item, field));
                                }
                                if response.drag_started() {
                                    drag_started = Some(id.clone());
                                }
                            }
                        }
                    })
                    .inner_rect
            })
            .inner;

        if edit_finished {
            editing = None;
        }
        self.view.editing = new_edit.or(editing);
        if let Some(id) = toggled {
            self.view.toggle(&id);
        }
        if let Some((id, field, text)) = committed {
            self.submit_edit(id, field.edit(text));
        }
        if let Some(id) = drag_started {
            self.drag_start(&id);
        }

        self.track_drag(ui, now, grid_rect, &row_rects);

        if !self.view.take_redraw_requests().is_empty() {
            ui.ctx().request_repaint();
        }
    }

    fn track_drag(&mut self, ui: &egui::Ui, now: f64, grid_rect: Rect, row_rects: &[(ItemId, Rect)]) {
        let Some(dragged) = self.session.dragged().cloned() else {
            return;
        };
        let (pointer, released, escape) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.any_released(),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if escape {
            self.drag_cancel();
            return;
        }

        match pointer.filter(|pos| grid_rect.contains(*pos)) {
            Some(pos) => {
                let over = row_rects
                    .iter()
                    .find(|(_, rect)| rect.top() <= pos.y && pos.y < rect.bottom())
                    .map(|(id, rect)| HoveredRow::new(id.clone(), RowGeometry::from(*rect)));
                self.drag_move(now, pos.y, over.as_ref());
            }
            None => self.drag_leave(),
        }

        if let Some(pos) = pointer {
            let label = self
                .rows
                .iter()
                .find(|row| row.id() == &dragged)
                .map_or_else(|| dragged.to_string(), |row| row.item.label.clone());
            let painter = ui.ctx().layer_painter(LayerId::new(
                Order::Tooltip,
                egui::Id::new("egui_tree_grid_drag_label"),
            ));
            painter.text(
                pos + egui::vec2(12.0, 0.0),
                Align2::LEFT_CENTER,
                label,
                egui::TextStyle::Body.resolve(ui.style()),
                ui.visuals().strong_text_color(),
            );
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        }

        if released {
            self.drag_end(&dragged);
        } else if let Some(remaining) = self.session.pending_expand_remaining(now) {
            ui.ctx()
                .request_repaint_after(Duration::from_secs_f64(remaining));
        }
    }
}
