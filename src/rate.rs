use indexmap::IndexMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
struct CounterSample {
    value: f64,
    at: Instant,
}

/// Previous cumulative value and timestamp per counter source, used to turn
/// ever-growing byte counters into per-second rates between ticks.
#[derive(Debug, Default)]
pub struct RateState {
    previous: IndexMap<String, CounterSample>,
}

impl RateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` for `key` and returns units per second since the last
    /// observation of the same key.
    ///
    /// The first observation, a non-positive elapsed time and a counter that
    /// went backwards (reset or wrap) all yield zero.
    pub fn per_second(&mut self, key: &str, value: f64, at: Instant) -> f64 {
        let current = CounterSample { value, at };
        let Some(previous) = self.previous.insert(key.to_string(), current) else {
            return 0.0;
        };

        let elapsed = match at.checked_duration_since(previous.at) {
            Some(elapsed) => elapsed.as_secs_f64(),
            None => return 0.0,
        };
        if elapsed <= 0.0 {
            return 0.0;
        }

        let delta = value - previous.value;
        if !delta.is_finite() || delta <= 0.0 {
            return 0.0;
        }
        delta / elapsed
    }

    /// Drops sources that were not seen this tick, e.g. an unplugged drive.
    pub fn retain_keys<'a>(&mut self, seen: impl IntoIterator<Item = &'a str>) {
        let seen: Vec<&str> = seen.into_iter().collect();
        self.previous.retain(|key, _| seen.contains(&key.as_str()));
    }

    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }
}

/// Bytes per second to megabits per second.
pub fn bytes_to_mbps(bytes_per_sec: f64) -> f64 {
    bytes_per_sec * 8.0 / 1_000_000.0
}

/// Bytes per second to MB (2^20 bytes) per second.
pub fn bytes_to_mb_per_sec(bytes_per_sec: f64) -> f64 {
    bytes_per_sec / (1024.0 * 1024.0)
}
