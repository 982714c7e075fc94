use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// Source of the current time. Production code uses `SystemClock`; tests
/// inject a `ManualClock` and advance it deterministically.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Test clock that only moves when told to.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<SystemTime>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(SystemTime::UNIX_EPOCH)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap()
    }
}

/// Countdown over a fixed number of seconds.
///
/// Inert until a start instant exists: with `started_at = None` it reports
/// the full duration and never expires. Remaining time floors the elapsed
/// seconds, so the countdown reaches zero exactly `duration_secs` after the
/// start instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    duration_secs: u64,
}

impl Countdown {
    pub fn new(duration_secs: u64) -> Self {
        Self { duration_secs }
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining_secs(&self, started_at: Option<SystemTime>, now: SystemTime) -> u64 {
        match started_at {
            None => self.duration_secs,
            Some(start) => {
                let elapsed = now.duration_since(start).unwrap_or(Duration::ZERO).as_secs();
                self.duration_secs.saturating_sub(elapsed)
            }
        }
    }

    pub fn is_expired(&self, started_at: Option<SystemTime>, now: SystemTime) -> bool {
        started_at.is_some() && self.remaining_secs(started_at, now) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstarted_countdown_is_inert() {
        let c = Countdown::new(30);
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1000);

        assert_eq!(c.remaining_secs(None, now), 30);
        assert!(!c.is_expired(None, now));
    }

    #[test]
    fn remaining_floors_elapsed_seconds() {
        let c = Countdown::new(30);
        let start = SystemTime::UNIX_EPOCH;

        assert_eq!(c.remaining_secs(Some(start), start), 30);
        assert_eq!(
            c.remaining_secs(Some(start), start + Duration::from_millis(900)),
            30
        );
        assert_eq!(
            c.remaining_secs(Some(start), start + Duration::from_millis(1100)),
            29
        );
    }

    #[test]
    fn remaining_clamps_at_zero() {
        let c = Countdown::new(15);
        let start = SystemTime::UNIX_EPOCH;
        let late = start + Duration::from_secs(100);

        assert_eq!(c.remaining_secs(Some(start), late), 0);
        assert!(c.is_expired(Some(start), late));
    }

    #[test]
    fn expires_exactly_at_duration() {
        let c = Countdown::new(15);
        let start = SystemTime::UNIX_EPOCH;

        assert!(!c.is_expired(Some(start), start + Duration::from_millis(14_999)));
        assert!(c.is_expired(Some(start), start + Duration::from_secs(15)));
    }

    #[test]
    fn clock_going_backwards_counts_as_no_elapsed_time() {
        let c = Countdown::new(30);
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(10);

        assert_eq!(c.remaining_secs(Some(start), SystemTime::UNIX_EPOCH), 30);
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new();
        let before = clock.now();
        clock.advance(Duration::from_secs(3));

        assert_eq!(clock.now(), before + Duration::from_secs(3));
    }
}
