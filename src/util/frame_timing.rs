use std::time::Instant;

/// Delta-time source with a smoothed FPS readout for the UI.
pub struct FrameTiming {
    last_frame: Instant,
    /// Smoothed FPS using an exponential moving average.
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0).
    smoothing: f32,
}

impl FrameTiming {
    /// Create a timer anchored at now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Call once per frame: returns the seconds elapsed since the previous
    /// tick and folds the sample into the FPS average.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if dt > 0.0 {
            let instant_fps = 1.0 / dt;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        dt
    }

    /// Current FPS (smoothed).
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_reports_nonnegative_dt() {
        let mut timing = FrameTiming::new();
        assert!(timing.tick() >= 0.0);
        assert!(timing.fps() > 0.0);
    }
}
