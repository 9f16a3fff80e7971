use std::time::{Duration, Instant};

/// Fixed-cadence tick driven by the UI's frame loop.
/// Once cancelled it never fires again.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    next_due: Instant,
    cancelled: bool,
}

impl Interval {
    /// The first tick is due immediately.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now,
            cancelled: false,
        }
    }

    /// Returns true when a tick is due and schedules the next one.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.cancelled || now < self.next_due {
            return false;
        }
        self.next_due = now + self.period;
        true
    }

    /// Time until the next tick, or `None` once cancelled.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        if self.cancelled {
            return None;
        }
        Some(self.next_due.saturating_duration_since(now))
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(50);

    #[test]
    fn fires_once_per_period() {
        let start = Instant::now();
        let mut interval = Interval::new(TICK, start);

        assert!(interval.tick(start));
        assert!(!interval.tick(start + Duration::from_millis(10)));
        assert_eq!(
            interval.remaining(start + Duration::from_millis(10)),
            Some(Duration::from_millis(40))
        );
        assert!(interval.tick(start + TICK));
        assert!(!interval.tick(start + TICK + Duration::from_millis(49)));
        assert!(interval.tick(start + TICK * 2));
    }

    #[test]
    fn late_ticks_reschedule_from_now() {
        let start = Instant::now();
        let mut interval = Interval::new(TICK, start);
        interval.tick(start);

        let late = start + Duration::from_millis(300);
        assert!(interval.tick(late));
        assert!(!interval.tick(late + Duration::from_millis(1)));
    }

    #[test]
    fn cancelled_interval_never_fires() {
        let start = Instant::now();
        let mut interval = Interval::new(TICK, start);
        interval.cancel();

        assert!(interval.is_cancelled());
        assert!(!interval.tick(start));
        assert!(!interval.tick(start + Duration::from_secs(10)));
        assert_eq!(interval.remaining(start), None);
    }
}
