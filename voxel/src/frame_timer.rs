use std::time::{Duration, Instant};

/// Measures the time between two consecutive frames.
pub struct FrameTimer {
    last_frame: Instant,
    frames: u64,
    total: Duration,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            frames: 0,
            total: Duration::ZERO,
        }
    }

    pub fn get_dt(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame);

        self.last_frame = now;
        self.frames += 1;
        self.total += dt;

        dt
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Mean frame time over every measured frame, zero before the first one
    pub fn average_dt(&self) -> Duration {
        match u32::try_from(self.frames) {
            Ok(0) => Duration::ZERO,
            Ok(frames) => self.total / frames,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.frames as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::frame_timer::FrameTimer;

    #[test]
    fn average_is_zero_before_the_first_frame() {
        let timer = FrameTimer::new();

        assert_eq!(timer.frames(), 0);
        assert_eq!(timer.average_dt(), Duration::ZERO);
    }

    #[test]
    fn counts_frames() {
        let mut timer = FrameTimer::new();

        let a = timer.get_dt();
        let b = timer.get_dt();

        assert_eq!(timer.frames(), 2);
        assert!(timer.average_dt() <= a.max(b));
    }
}
