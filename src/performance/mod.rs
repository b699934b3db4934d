//! # Frame Diagnostics
//!
//! Tracks how long each frame's scene submission takes and derives a rolling
//! frames-per-second figure for display.
//!
//! ```rust
//! use kennel::performance::FrameMonitor;
//! use std::time::Duration;
//!
//! let mut monitor = FrameMonitor::new();
//! monitor.record(Duration::from_millis(20));
//! assert_eq!(monitor.diagnostics_text(), "ms: 20 fps: 50");
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Derived numbers for the most recent window of frames
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMetrics {
    /// Duration of the last frame in milliseconds
    pub last_frame_ms: f32,
    /// Average over the sample window
    pub frame_time_ms: f32,
    pub fps: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
    /// Draw calls issued by the last frame
    pub draw_calls: u32,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self {
            last_frame_ms: 0.0,
            frame_time_ms: 0.0,
            fps: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
            draw_calls: 0,
        }
    }
}

pub struct FrameMonitor {
    /// Ring buffer of recent frame times for averaging
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    frame_start: Option<Instant>,
    metrics: FrameMetrics,
}

impl FrameMonitor {
    pub fn new() -> Self {
        Self::with_samples(60)
    }

    pub fn with_samples(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            frame_start: None,
            metrics: FrameMetrics::default(),
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Closes the frame opened by [`FrameMonitor::begin_frame`] and returns its duration
    pub fn end_frame(&mut self) -> Option<Duration> {
        let elapsed = self.frame_start.take()?.elapsed();
        self.record(elapsed);
        Some(elapsed)
    }

    /// Adds one frame duration sample
    pub fn record(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
        self.metrics.last_frame_ms = frame_time.as_secs_f32() * 1000.0;
        self.update_metrics();
    }

    fn update_metrics(&mut self) {
        let total: Duration = self.frame_times.iter().sum();
        let average_ms = total.as_secs_f32() * 1000.0 / self.frame_times.len() as f32;
        self.metrics.frame_time_ms = average_ms;
        self.metrics.fps = if average_ms > 0.0 { 1000.0 / average_ms } else { 0.0 };

        if let (Some(min), Some(max)) = (self.frame_times.iter().min(), self.frame_times.iter().max()) {
            self.metrics.min_frame_time_ms = min.as_secs_f32() * 1000.0;
            self.metrics.max_frame_time_ms = max.as_secs_f32() * 1000.0;
        }
    }

    pub fn set_draw_calls(&mut self, draw_calls: u32) {
        self.metrics.draw_calls = draw_calls;
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    pub fn sample_count(&self) -> usize {
        self.frame_times.len()
    }

    /// The one-line readout shown in the panel
    pub fn diagnostics_text(&self) -> String {
        format!(
            "ms: {} fps: {}",
            self.metrics.last_frame_ms.floor() as u32,
            self.metrics.fps.floor() as u32
        )
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.metrics = FrameMetrics::default();
        self.frame_start = None;
    }

    /// Frame time history for graphing
    pub fn frame_time_history(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }

    pub fn render_ui(&self, ui: &imgui::Ui) {
        ui.text(self.diagnostics_text());
        ui.text(format!(
            "avg {:.2}ms  min {:.2}ms  max {:.2}ms",
            self.metrics.frame_time_ms, self.metrics.min_frame_time_ms, self.metrics.max_frame_time_ms
        ));
        ui.text(format!("draw calls: {}", self.metrics.draw_calls));
        if !self.frame_times.is_empty() {
            ui.plot_lines("##frame_times", &self.frame_time_history())
                .graph_size([260.0, 40.0])
                .scale_min(0.0)
                .scale_max(50.0)
                .build();
        }
    }
}

impl Default for FrameMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_average_drops_old_samples() {
        let mut monitor = FrameMonitor::with_samples(2);
        monitor.record(Duration::from_millis(100));
        monitor.record(Duration::from_millis(10));
        monitor.record(Duration::from_millis(10));
        assert_eq!(monitor.sample_count(), 2);
        let metrics = monitor.metrics();
        assert!((metrics.frame_time_ms - 10.0).abs() < 1e-3);
        assert!((metrics.fps - 100.0).abs() < 1e-2);
        assert!((metrics.max_frame_time_ms - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_diagnostics_text_floors_values() {
        let mut monitor = FrameMonitor::new();
        monitor.record(Duration::from_micros(16_700));
        assert_eq!(monitor.diagnostics_text(), "ms: 16 fps: 59");
    }

    #[test]
    fn test_end_without_begin_is_ignored() {
        let mut monitor = FrameMonitor::new();
        assert!(monitor.end_frame().is_none());
        monitor.begin_frame();
        assert!(monitor.end_frame().is_some());
        assert_eq!(monitor.sample_count(), 1);
        monitor.reset();
        assert_eq!(monitor.sample_count(), 0);
    }

    #[test]
    fn test_sample_spans_everything_until_end() {
        let mut monitor = FrameMonitor::new();
        monitor.begin_frame();
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = monitor.end_frame().unwrap();
        assert!(elapsed >= Duration::from_millis(10));
        assert!(monitor.metrics().last_frame_ms >= 10.0);
    }
}
