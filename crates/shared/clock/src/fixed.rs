use costsim_core::Timestamp;
use costsim_ports::Clock;
use chrono::Duration;
use parking_lot::RwLock;

/// Clock that only moves when told to
///
/// Gives deterministic timestamps to the pipeline in tests and replays.
pub struct FixedClock {
    now: RwLock<Timestamp>,
}

impl FixedClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    pub fn set(&self, time: Timestamp) {
        *self.now.write() = time;
    }

    /// Move forward by `step` and return the new time
    pub fn advance(&self, step: Duration) -> Timestamp {
        let mut now = self.now.write();
        *now += step;
        *now
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.read()
    }

    fn name(&self) -> &str {
        "FixedClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_fixed_clock_only_moves_explicitly() {
        let start = Utc.with_ymd_and_hms(2024, 3, 20, 10, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);

        let later = clock.advance(Duration::milliseconds(250));
        assert_eq!(later - start, Duration::milliseconds(250));
        assert_eq!(clock.now(), later);

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
