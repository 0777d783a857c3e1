use tracing::debug;

/// A single rearmable countdown measured against the host's millisecond clock.
///
/// There is never more than one pending deadline: arming replaces whatever
/// was pending before. The host polls [`Countdown::take_ready`] from its
/// event loop; a deadline is consumed the first time it is observed expired.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    deadline_ms: Option<u64>,
    generation: u64,
}

impl Countdown {
    pub const fn new() -> Self {
        Self {
            deadline_ms: None,
            generation: 0,
        }
    }

    /// Cancel any pending deadline and start a new one `delay_ms` from `now_ms`.
    pub fn arm(&mut self, now_ms: u64, delay_ms: u64) {
        let replaced = self.deadline_ms.is_some();
        self.generation = self.generation.wrapping_add(1);
        self.deadline_ms = Some(now_ms.saturating_add(delay_ms));
        debug!(
            generation = self.generation,
            delay_ms, replaced, "countdown armed"
        );
    }

    /// Drop the pending deadline. No-op when nothing is pending.
    pub fn cancel(&mut self) {
        if self.deadline_ms.take().is_some() {
            debug!(generation = self.generation, "countdown cancelled");
        }
    }

    /// Returns true exactly once when the pending deadline has passed.
    pub fn take_ready(&mut self, now_ms: u64) -> bool {
        let Some(deadline) = self.deadline_ms else {
            return false;
        };
        if now_ms >= deadline {
            self.deadline_ms = None;
            debug!(generation = self.generation, now_ms, "countdown fired");
            return true;
        }
        false
    }

    pub const fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Milliseconds left before the pending deadline, if any.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.deadline_ms
            .map(|deadline| deadline.saturating_sub(now_ms))
    }

    /// Number of times the countdown has been armed.
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}
