//! Time-of-day scheduler
//!
//! Watches for hour-boundary crossings and requests the two fixed daily
//! transitions: a fade to full brightness in the late morning and a fade
//! down to dark in the evening. Whether a requested fade actually starts is
//! decided by the fade engine's guards.

use crate::brightness::MAX_LEVEL;
use crate::config::ScheduleConfig;

/// Hour-crossing detector for the daily schedule.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    cfg: ScheduleConfig,
    last_hour: Option<u8>,
}

impl Scheduler {
    pub fn new(cfg: ScheduleConfig) -> Self {
        Self {
            cfg,
            last_hour: None,
        }
    }

    /// Sample the current hour. On a crossing into one of the two scheduled
    /// hours, returns the full-range target to fade toward. At most one
    /// action per distinct hour value; the cursor always advances.
    pub fn poll(&mut self, hour: u8) -> Option<u8> {
        if self.last_hour == Some(hour) {
            return None;
        }
        self.last_hour = Some(hour);
        if hour == self.cfg.on_hour {
            Some(MAX_LEVEL)
        } else if hour == self.cfg.off_hour {
            Some(0)
        } else {
            None
        }
    }

    /// Most recently observed hour, if any.
    pub fn last_hour(&self) -> Option<u8> {
        self.last_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> Scheduler {
        Scheduler::new(ScheduleConfig::default())
    }

    #[test]
    fn crossing_into_on_hour_requests_full() {
        let mut s = scheduler();
        assert_eq!(s.poll(10), None);
        assert_eq!(s.poll(11), Some(100));
        assert_eq!(s.last_hour(), Some(11));
    }

    #[test]
    fn crossing_into_off_hour_requests_dark() {
        let mut s = scheduler();
        assert_eq!(s.poll(19), None);
        assert_eq!(s.poll(20), Some(0));
    }

    #[test]
    fn same_hour_fires_only_once() {
        let mut s = scheduler();
        assert_eq!(s.poll(11), Some(100));
        for _ in 0..10 {
            assert_eq!(s.poll(11), None);
        }
    }

    #[test]
    fn cursor_advances_on_unscheduled_hours() {
        let mut s = scheduler();
        assert_eq!(s.poll(3), None);
        assert_eq!(s.last_hour(), Some(3));
        assert_eq!(s.poll(4), None);
        assert_eq!(s.last_hour(), Some(4));
    }

    #[test]
    fn first_sample_at_scheduled_hour_fires() {
        // Power-up inside a scheduled hour still triggers that hour's fade.
        let mut s = scheduler();
        assert_eq!(s.poll(20), Some(0));
    }
}
