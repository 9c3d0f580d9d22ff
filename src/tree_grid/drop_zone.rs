use super::types::DropLocation;

/// Height (in points) of the "before" band at the top and the "after" band at the bottom of a row.
pub const DROP_ZONE_PAD: f32 = 16.0;

/// Vertical extent of a rendered row, in the same coordinate space as the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowGeometry {
    pub top: f32,
    pub height: f32,
}

impl RowGeometry {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

impl From<egui::Rect> for RowGeometry {
    fn from(rect: egui::Rect) -> Self {
        Self {
            top: rect.top(),
            height: rect.height(),
        }
    }
}

/// Decide where a drop at `pointer_y` lands relative to `row`.
///
/// The top band is checked first, so rows shorter than `2 * pad` favor `Before`. A distance of
/// exactly `pad` is outside the band.
pub fn classify_drop(pointer_y: f32, row: RowGeometry, pad: f32) -> DropLocation {
    let top_distance = pointer_y - row.top;
    let bottom_distance = row.bottom() - pointer_y;

    if top_distance < pad {
        DropLocation::Before
    } else if bottom_distance < pad {
        DropLocation::After
    } else {
        DropLocation::Into
    }
}
