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

//! Sensor-side head pose delivery.

use parallax_core::math::Mat4;
use parallax_core::pose::{HeadPoseProvider, HeadTransform};
use std::sync::Mutex;

/// Latest-snapshot handoff between a sensor thread and the render thread.
///
/// The sensor/AR thread publishes pose matrices as they arrive from the OS;
/// the render thread reads the most recent one once per frame. The lock is
/// held only for the copy, the consumer never waits for a fresh sample, and
/// samples arriving faster than the frame rate simply overwrite each other.
pub struct SampledHeadPose {
    latest: Mutex<HeadTransform>,
}

impl SampledHeadPose {
    /// Creates a handoff seeded with the identity pose, reported until the
    /// first sample arrives.
    pub fn new() -> Self {
        Self {
            latest: Mutex::new(HeadTransform::identity()),
        }
    }

    /// Publishes a new head pose matrix from the sensor thread.
    pub fn publish(&self, pose: Mat4) {
        *self.latest.lock().unwrap() = HeadTransform::new(pose);
        log::trace!("SampledHeadPose: pose published");
    }
}

impl Default for SampledHeadPose {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadPoseProvider for SampledHeadPose {
    fn head_transform(&self) -> HeadTransform {
        *self.latest.lock().unwrap()
    }
}
