use std::collections::HashMap;
use std::time::Instant;

use itertools::Itertools;
use log::warn;

/// Named stopwatches. Finished timers keep their last duration in seconds until [TimerManager::clear] is called.
#[derive(Default)]
pub struct TimerManager {
    current_timers: HashMap<String, Instant>,
    finished_timers: HashMap<String, f32>,
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start<S: AsRef<str>>(&mut self, name: S) {
        self.current_timers
            .insert(name.as_ref().to_string(), Instant::now());
    }

    /// Stops a timer and returns its duration in seconds, or `None` if it was never started
    pub fn end<S: AsRef<str>>(&mut self, name: S) -> Option<f32> {
        let Some(start) = self.current_timers.remove(name.as_ref()) else {
            warn!("Timer {} was not started yet", name.as_ref());
            return None;
        };

        let duration = Instant::now()
            .duration_since(start)
            .as_secs_f32();
        self.finished_timers
            .insert(name.as_ref().to_string(), duration);

        Some(duration)
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.finished_timers.get(name).copied()
    }

    /// All finished timers sorted by name
    pub fn get_all(&self) -> Vec<(&str, f32)> {
        self.finished_timers
            .iter()
            .map(|(name, duration)| (name.as_str(), *duration))
            .sorted_by(|a, b| a.0.cmp(b.0))
            .collect_vec()
    }

    pub fn clear(&mut self) {
        self.finished_timers.clear();
    }
}
