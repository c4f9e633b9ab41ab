//! Frame rate measurement over fixed windows of clock time.

/// Frames-per-second over a window of accumulated clock time.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_ms: u64,
    frames: u64,
    elapsed_ms: u64,
    fps: f32,
}

impl FpsCounter {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms: window_ms.max(1),
            frames: 0,
            elapsed_ms: 0,
            fps: 0.0,
        }
    }

    /// Counts one frame that took `delta_ms`. Returns the new rate whenever a
    /// window closes.
    pub fn record_frame(&mut self, delta_ms: u64) -> Option<f32> {
        self.frames = self.frames.saturating_add(1);
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        if self.elapsed_ms < self.window_ms {
            return None;
        }

        self.fps = self.frames as f32 * 1000.0 / self.elapsed_ms as f32;
        self.frames = 0;
        self.elapsed_ms = 0;
        Some(self.fps)
    }

    /// Rate measured over the last closed window, 0 before the first one.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
