//! Frame time counter.
//!
//! [`FrameCounter`] keeps the interval between the last
//! [`SAMPLES`](FrameCounter::SAMPLES) frames and exposes their mean in
//! milliseconds, which the debug overlay prints every frame.

use arrayvec::ArrayVec;
use std::time::Instant;

/// Rolling average of frame intervals.
#[derive(Debug, Clone, Default)]
pub struct FrameCounter {
    samples: ArrayVec<f32, { FrameCounter::SAMPLES }>,
    last: Option<Instant>,
    frames: u64,
    /// Mean interval of the stored samples, in milliseconds.
    pub avg: f32,
}

impl FrameCounter {
    pub const SAMPLES: usize = 60;

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame rendered at `now`.
    ///
    /// The first call only sets the reference instant.
    pub fn incr_at(&mut self, now: Instant) {
        self.frames += 1;
        if let Some(last) = self.last {
            let ms = now.saturating_duration_since(last).as_secs_f32() * 1000.0;
            if self.samples.is_full() {
                self.samples.remove(0);
            }
            self.samples.push(ms);
            self.avg = self.samples.iter().sum::<f32>() / self.samples.len() as f32;
        }
        self.last = Some(now);
    }

    /// Record a frame rendered now.
    pub fn incr(&mut self) {
        self.incr_at(Instant::now());
    }

    /// Frames recorded since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_frame_has_no_average() {
        let mut counter = FrameCounter::new();
        counter.incr_at(Instant::now());
        assert_eq!(counter.avg, 0.0);
        assert_eq!(counter.frames(), 1);
    }

    #[test]
    fn test_average_of_intervals() {
        let mut counter = FrameCounter::new();
        let start = Instant::now();
        counter.incr_at(start);
        counter.incr_at(start + Duration::from_millis(10));
        counter.incr_at(start + Duration::from_millis(30));
        assert!((counter.avg - 15.0).abs() < 0.01);
    }

    #[test]
    fn test_oldest_sample_is_dropped() {
        let mut counter = FrameCounter::new();
        let mut now = Instant::now();
        counter.incr_at(now);
        now += Duration::from_millis(100);
        counter.incr_at(now);
        for _ in 0..FrameCounter::SAMPLES {
            now += Duration::from_millis(10);
            counter.incr_at(now);
        }
        assert!((counter.avg - 10.0).abs() < 0.01);
    }
}
