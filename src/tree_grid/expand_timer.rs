use super::types::ItemId;

/// A deferred "expand this row" action.
///
/// At most one is outstanding: arming replaces the previous one, and it only fires if nobody
/// cancels it before `deadline` (egui input time, seconds).
#[derive(Clone, Debug, Default)]
pub(crate) struct ScheduledExpand {
    armed: Option<Armed>,
}

#[derive(Clone, Debug)]
struct Armed {
    target: ItemId,
    deadline: f64,
}

impl ScheduledExpand {
    pub(crate) fn arm(&mut self, target: ItemId, now: f64, delay_secs: f64) {
        self.armed = Some(Armed {
            target,
            deadline: now + delay_secs,
        });
    }

    /// Returns the target that was armed, if any.
    pub(crate) fn cancel(&mut self) -> Option<ItemId> {
        self.armed.take().map(|armed| armed.target)
    }

    pub(crate) fn target(&self) -> Option<&ItemId> {
        self.armed.as_ref().map(|armed| &armed.target)
    }

    /// Seconds left until the action fires.
    pub(crate) fn remaining(&self, now: f64) -> Option<f64> {
        self.armed
            .as_ref()
            .map(|armed| (armed.deadline - now).max(0.0))
    }

    /// Disarm and return the target if the deadline has passed.
    pub(crate) fn take_due(&mut self, now: f64) -> Option<ItemId> {
        if self.armed.as_ref().is_some_and(|armed| now >= armed.deadline) {
            self.cancel()
        } else {
            None
        }
    }
}
