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

//! A minimal wall-clock stopwatch.

use std::time::{Duration, Instant};

/// Measures elapsed wall-clock time from the moment it was created or last
/// restarted.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    /// Creates a new stopwatch, started immediately.
    #[inline]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Resets the stopwatch to zero elapsed time.
    #[inline]
    pub fn restart(&mut self) {
        self.start_time = Instant::now();
    }

    /// Returns the elapsed time since the stopwatch was started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the elapsed time since the stopwatch was started in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Returns the elapsed time since the stopwatch was started in seconds as `f64`.
    #[inline]
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn stopwatch_elapsed_is_monotonic() {
        let watch = Stopwatch::new();
        let first = watch.elapsed();
        thread::sleep(Duration::from_millis(5));
        let second = watch.elapsed();
        assert!(second >= first, "elapsed time must not go backwards");
    }

    #[test]
    fn restart_resets_elapsed_time() {
        let mut watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(20));
        watch.restart();
        assert!(
            watch.elapsed() < Duration::from_millis(20),
            "restart should reset the elapsed time"
        );
    }
}
