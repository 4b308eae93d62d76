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

//! Contract for delivering head pose snapshots to the render thread.

use crate::pose::HeadTransform;

/// Source of per-frame head poses.
///
/// Sensor and AR subsystems publish poses from their own threads; the render
/// thread reads the latest snapshot exactly once per frame. Implementations
/// must return immediately with the most recently published pose — never
/// block waiting for a fresh sample. If no pose has been published yet, the
/// identity pose is an acceptable answer.
pub trait HeadPoseProvider: Send + Sync {
    /// The latest head pose snapshot.
    fn head_transform(&self) -> HeadTransform;
}
