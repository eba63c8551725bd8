use std::time::Duration;

use super::types::Ticks;

/// Source of elapsed time for the scheduling loop.
///
/// `wait` blocks for the given number of simulated time units; nothing else
/// is scheduled while it blocks.
pub trait Clock {
    fn wait(&mut self, units: Ticks);
}

/// Sleeps the calling thread for `units * tick` of wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    tick: Duration,
}

impl WallClock {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Clock for WallClock {
    fn wait(&mut self, units: Ticks) {
        let units = u32::try_from(units).unwrap_or(u32::MAX);
        std::thread::sleep(self.tick.saturating_mul(units));
    }
}

/// Returns immediately and only counts how long it was asked to wait.
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualClock {
    elapsed: Ticks,
    waits: usize,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total units waited so far.
    pub fn elapsed(&self) -> Ticks {
        self.elapsed
    }

    /// Number of `wait` calls so far.
    pub fn waits(&self) -> usize {
        self.waits
    }
}

impl Clock for VirtualClock {
    fn wait(&mut self, units: Ticks) {
        self.elapsed = self.elapsed.saturating_add(units);
        self.waits += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn virtual_clock_accumulates() {
        let mut clock = VirtualClock::new();
        clock.wait(2);
        clock.wait(1);
        assert_eq!(clock.elapsed(), 3);
        assert_eq!(clock.waits(), 2);
    }

    #[test]
    fn virtual_clock_saturates() {
        let mut clock = VirtualClock::new();
        clock.wait(u64::MAX - 1);
        clock.wait(5);
        assert_eq!(clock.elapsed(), u64::MAX);
    }

    #[test]
    fn wall_clock_sleeps_per_unit() {
        let mut clock = WallClock::new(Duration::from_millis(5));
        let start = Instant::now();
        clock.wait(2);
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
