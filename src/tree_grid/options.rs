use std::time::Duration;

use super::drop_zone::DROP_ZONE_PAD;

/// Options for [`super::TreeGrid`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeGridOptions {
    /// Height (in points) of the "drop before" band at the top of a hovered row, and of the
    /// "drop after" band at its bottom. Everything in between drops *into* the row.
    pub drop_zone_pad: f32,

    /// How long the pointer has to rest on a collapsed group during a drag before it expands.
    ///
    /// Dragging across a group in transit never expands it.
    pub auto_expand_delay: Duration,

    /// Artificial delay between invalidating the data query and the refreshed snapshot arriving.
    pub load_latency: Duration,

    /// Height of one grid row in points.
    pub row_height: f32,

    /// Horizontal indentation per tree level in points.
    pub indent: f32,

    /// If true, rows cannot be dragged or edited.
    pub readonly: bool,

    /// If true, record drag/drop decisions in a small ring buffer (see [`super::TreeGrid::debug_log_text`]).
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep (ring buffer).
    pub debug_event_log_capacity: usize,

    /// If true, check forest integrity after every refresh and log the issues.
    pub debug_integrity: bool,

    /// If true, panic on integrity issues (debug-only).
    pub debug_integrity_panic: bool,
}

impl Default for TreeGridOptions {
    fn default() -> Self {
        Self {
            drop_zone_pad: DROP_ZONE_PAD,
            auto_expand_delay: Duration::from_millis(1100),
            load_latency: Duration::from_millis(100),
            row_height: 24.0,
            indent: 16.0,
            readonly: false,
            debug_event_log: false,
            debug_event_log_capacity: 200,
            debug_integrity: false,
            debug_integrity_panic: false,
        }
    }
}

impl TreeGridOptions {
    pub(crate) fn auto_expand_delay_secs(&self) -> f64 {
        self.auto_expand_delay.as_secs_f64()
    }
}
