use std::time::{Duration, Instant};

/// Event loop poll interval in milliseconds
pub const DEFAULT_POLL_MS: u64 = 250;

/// Length of one countdown tick
pub const TICK: Duration = Duration::from_secs(1);

/// Get event loop poll duration
pub fn poll_duration() -> Duration {
    Duration::from_millis(DEFAULT_POLL_MS)
}

/// Armed one-per-second tick schedule
///
/// Holding a handle means ticks are due; dropping it cancels them.
#[derive(Debug)]
pub struct TickHandle {
    next_due: Instant,
}

impl TickHandle {
    /// Arm so that the first tick fires one full second after `now`
    pub fn arm(now: Instant) -> Self {
        Self {
            next_due: now + TICK,
        }
    }

    /// Number of ticks that came due up to `now`, advancing the schedule
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let mut due = 0;
        while now >= self.next_due {
            self.next_due += TICK;
            due += 1;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_duration() {
        assert_eq!(poll_duration(), Duration::from_millis(250));
    }

    #[test]
    fn test_no_tick_before_first_second() {
        let t0 = Instant::now();
        let mut handle = TickHandle::arm(t0);
        assert_eq!(handle.due_ticks(t0), 0);
        assert_eq!(handle.due_ticks(t0 + Duration::from_millis(999)), 0);
        assert_eq!(handle.due_ticks(t0 + TICK), 1);
    }

    #[test]
    fn test_ticks_are_not_counted_twice() {
        let t0 = Instant::now();
        let mut handle = TickHandle::arm(t0);
        assert_eq!(handle.due_ticks(t0 + Duration::from_millis(3500)), 3);
        assert_eq!(handle.due_ticks(t0 + Duration::from_millis(3600)), 0);
        assert_eq!(handle.due_ticks(t0 + Duration::from_millis(4000)), 1);
    }
}
