use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Millisecond clock that never repeats or goes backwards.
///
/// Each [`tick`](Clock::tick) returns the wall-clock time, or one
/// millisecond past the previous tick when the wall clock has not advanced.
#[derive(Debug, Default)]
pub struct Clock {
    last_ms: AtomicI64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_millis();
        let previous = self
            .last_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(wall.max(last + 1)))
            .unwrap_or(wall);
        let next = wall.max(previous + 1);
        DateTime::from_timestamp_millis(next).unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_strictly_increase() {
        let clock = Clock::new();
        let mut last = clock.tick();
        for _ in 0..1_000 {
            let next = clock.tick();
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn ticks_track_wall_clock() {
        let clock = Clock::new();
        let drift = (clock.tick() - Utc::now()).num_milliseconds().abs();
        assert!(drift < 1_000);
    }
}
