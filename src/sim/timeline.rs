use super::job::JobId;
use crate::core::{Observer, Process, Ticks};

/// Per-tick record of which job held the execution slot. Index `t - 1` covers tick `t`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    slots: Vec<Option<JobId>>,
}

impl Timeline {
    pub fn slots(&self) -> &[Option<JobId>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn running_at(&self, tick: Ticks) -> Option<JobId> {
        let index = usize::try_from(tick.checked_sub(1)?).ok()?;
        self.slots.get(index).copied().flatten()
    }

    // Pad with idle slots so the timeline covers ticks 1..=now
    pub(crate) fn extend_to(&mut self, now: Ticks) {
        let len = usize::try_from(now).unwrap_or(usize::MAX);
        if self.slots.len() < len {
            self.slots.resize(len, None);
        }
    }

    /// One column per tick, `.` for idle ticks.
    pub fn render(&self) -> String {
        self.slots
            .iter()
            .map(|slot| match slot {
                Some(id) => id.to_string(),
                None => ".".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Observer<JobId> for Timeline {
    fn on_tick(&mut self, now: Ticks, process: &Process<JobId>) {
        self.extend_to(now);
        if let Some(slot) = now
            .checked_sub(1)
            .and_then(|t| usize::try_from(t).ok())
            .and_then(|index| self.slots.get_mut(index))
        {
            *slot = Some(*process.id());
        }
    }
}
