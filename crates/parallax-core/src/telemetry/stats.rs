// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Performance statistics for the frame loop.

use crate::utils::timer::Stopwatch;
use std::time::Duration;

/// Smoothing factor for the frame-time moving average.
const FRAME_TIME_EMA_ALPHA: f64 = 0.1;

/// Rolling performance statistics for a render session.
#[derive(Debug, Clone)]
pub struct FrameStats {
    /// A sequential counter of completed frames.
    pub frame_number: u64,
    /// Wall-clock duration of the last completed frame, milliseconds.
    pub last_frame_ms: f64,
    /// Exponential moving average of the frame duration, milliseconds.
    pub average_frame_ms: f64,
    /// Frames the scheduler reported as starved, cumulative.
    pub starved_frames: u64,
}

impl FrameStats {
    /// Creates zeroed statistics.
    pub fn new() -> Self {
        Self {
            frame_number: 0,
            last_frame_ms: 0.0,
            average_frame_ms: 0.0,
            starved_frames: 0,
        }
    }

    /// Folds one completed frame into the statistics.
    pub fn record_frame(&mut self, duration: Duration) {
        let ms = duration.as_secs_f64() * 1000.0;
        self.frame_number += 1;
        self.last_frame_ms = ms;
        self.average_frame_ms = if self.frame_number == 1 {
            ms
        } else {
            self.average_frame_ms * (1.0 - FRAME_TIME_EMA_ALPHA) + ms * FRAME_TIME_EMA_ALPHA
        };
    }

    /// The smoothed frames-per-second estimate.
    pub fn fps(&self) -> f32 {
        if self.average_frame_ms > 0.0 {
            (1000.0 / self.average_frame_ms) as f32
        } else {
            0.0
        }
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Times a frame and records it into [`FrameStats`] when dropped.
///
/// RAII guarantees the measurement lands even on early returns out of the
/// frame body.
pub struct ScopedFrameTimer<'a> {
    watch: Stopwatch,
    stats: &'a mut FrameStats,
}

impl<'a> ScopedFrameTimer<'a> {
    /// Starts timing a frame against the given statistics.
    pub fn new(stats: &'a mut FrameStats) -> Self {
        Self {
            watch: Stopwatch::new(),
            stats,
        }
    }
}

impl Drop for ScopedFrameTimer<'_> {
    fn drop(&mut self) {
        self.stats.record_frame(self.watch.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_seeds_the_average() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_millis(20));
        assert_eq!(stats.frame_number, 1);
        assert_eq!(stats.average_frame_ms, stats.last_frame_ms);
    }

    #[test]
    fn average_tracks_towards_recent_frames() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_millis(10));
        for _ in 0..200 {
            stats.record_frame(Duration::from_millis(20));
        }
        assert!(
            (stats.average_frame_ms - 20.0).abs() < 0.5,
            "EMA should converge to the steady-state frame time, got {}",
            stats.average_frame_ms
        );
    }

    #[test]
    fn fps_is_inverse_of_average() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_millis(10));
        assert!((stats.fps() - 100.0).abs() < 1.0);
    }

    #[test]
    fn zeroed_stats_report_zero_fps() {
        assert_eq!(FrameStats::new().fps(), 0.0);
    }

    #[test]
    fn scoped_timer_records_on_drop() {
        let mut stats = FrameStats::new();
        {
            let _timer = ScopedFrameTimer::new(&mut stats);
        }
        assert_eq!(stats.frame_number, 1);
    }
}
