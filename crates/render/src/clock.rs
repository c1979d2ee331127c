use std::time::{Duration, Instant};

/// Wall-clock time between consecutive presented frames.
///
/// Only ticked for frames that were actually acquired, so a dropped frame
/// stretches the next delta across the skipped tick.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
    delta: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now` and return the time since the previous one.
    /// The first tick reports zero.
    pub fn tick(&mut self, now: Instant) -> Duration {
        self.delta = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last = Some(now);
        self.delta
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn last(&self) -> Option<Instant> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn delta_is_time_since_previous_tick() {
        let start = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick(start);
        let dt = clock.tick(start + Duration::from_millis(16));
        assert_eq!(dt, Duration::from_millis(16));
        assert_eq!(clock.delta(), dt);
        assert_eq!(clock.last(), Some(start + Duration::from_millis(16)));
    }

    #[test]
    fn backwards_time_saturates() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::new();
        clock.tick(start);
        assert_eq!(clock.tick(start - Duration::from_millis(5)), Duration::ZERO);
    }
}
