use super::drop_zone::RowGeometry;
use super::types::ItemId;

/// What the drag session needs from the grid widget.
///
/// Rows are identified by item id. Redraw requests are fire-and-forget hints: the session never
/// reads anything back from the rendered output.
pub trait GridApi {
    /// Ask the grid to re-render `rows` (e.g. to update drop-zone highlighting).
    fn redraw_rows(&mut self, rows: &[ItemId]);

    fn is_expanded(&self, id: &ItemId) -> bool;

    fn set_expanded(&mut self, id: &ItemId, expanded: bool);

    fn has_children(&self, id: &ItemId) -> bool;
}

/// The row currently under the pointer, as reported by the grid during a drag.
#[derive(Clone, Debug, PartialEq)]
pub struct HoveredRow {
    pub id: ItemId,
    pub geometry: RowGeometry,
}

impl HoveredRow {
    pub fn new(id: impl Into<ItemId>, geometry: RowGeometry) -> Self {
        Self {
            id: id.into(),
            geometry,
        }
    }
}
