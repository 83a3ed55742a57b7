use std::time::{Duration, Instant};

/// Monotonic time source for response-time measurement.
///
/// The game logic only ever asks "what time is it now", so hiding the
/// source behind a trait lets tests drive time by hand instead of
/// sleeping through real delays.
pub trait Clock: Clone + Send + Sync {
    /// Nanoseconds elapsed since the clock's origin.
    fn now(&self) -> u64;

    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
}

/// Monotonic clock backed by `Instant`.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
}

/// Rolling buffer of per-frame render durations, reported at shutdown.
#[derive(Debug)]
pub struct FrameTimes {
    samples: Vec<Duration>,
    max_samples: usize,
}

#[derive(Debug, Clone)]
pub struct FrameStats {
    pub mean_ms: f64,
    pub jitter_ms: f64,
    pub samples: usize,
}

impl FrameTimes {
    pub fn new() -> Self {
        Self {
            samples: Vec::with_capacity(1000),
            max_samples: 1000,
        }
    }

    pub fn record(&mut self, duration: Duration) {
        if self.samples.len() >= self.max_samples {
            self.samples.remove(0);
        }
        self.samples.push(duration);
    }

    /// Mean and standard deviation of the recorded frame durations.
    pub fn stats(&self) -> FrameStats {
        if self.samples.is_empty() {
            return FrameStats {
                mean_ms: 0.0,
                jitter_ms: 0.0,
                samples: 0,
            };
        }
        let times_ms: Vec<f64> = self
            .samples
            .iter()
            .map(|d| d.as_secs_f64() * 1e3)
            .collect();
        let mean = times_ms.iter().sum::<f64>() / times_ms.len() as f64;
        let variance =
            times_ms.iter().map(|x| (*x - mean).powi(2)).sum::<f64>() / times_ms.len() as f64;
        FrameStats {
            mean_ms: mean,
            jitter_ms: variance.sqrt(),
            samples: times_ms.len(),
        }
    }
}

impl Default for FrameTimes {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn frame_stats_from_uniform_samples() {
        let mut times = FrameTimes::new();
        for _ in 0..10 {
            times.record(Duration::from_millis(16));
        }
        let stats = times.stats();
        assert_eq!(stats.samples, 10);
        assert!((stats.mean_ms - 16.0).abs() < 1e-9);
        assert!(stats.jitter_ms.abs() < 1e-9);
    }

    #[test]
    fn frame_buffer_caps_sample_count() {
        let mut times = FrameTimes::new();
        for _ in 0..1100 {
            times.record(Duration::from_millis(1));
        }
        assert_eq!(times.stats().samples, 1000);
    }
}
