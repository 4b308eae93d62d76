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

//! The per-frame camera composed from application state and the head pose.

use crate::math::{Mat4, Vec3};

/// The viewer camera for one frame.
///
/// Position and base rotation are application-controlled and persist across
/// frames; the head rotation is replaced every frame from the sensor pose.
/// The camera sits at `position`, oriented by `base_rotation` composed with
/// the head rotation, looking down its local negative Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    base_rotation: Mat4,
    head_rotation: Mat4,
}

impl Camera {
    /// A camera at the origin with no rotation.
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            base_rotation: Mat4::IDENTITY,
            head_rotation: Mat4::IDENTITY,
        }
    }

    /// Sets the camera position in world space.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Sets the application-controlled base orientation, applied before the
    /// per-frame head rotation.
    pub fn set_base_rotation(&mut self, rotation: Mat4) {
        self.base_rotation = rotation;
    }

    /// Replaces the per-frame head rotation from the sensor pose.
    pub fn set_head_rotation(&mut self, rotation: Mat4) {
        self.head_rotation = rotation;
    }

    /// The camera position in world space.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The combined world-space orientation: base rotation then head
    /// rotation.
    #[inline]
    pub fn rotation(&self) -> Mat4 {
        self.base_rotation * self.head_rotation
    }

    /// The world-space direction the camera faces. Reticle hit rays are cast
    /// along this vector.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation().transform_vector3(Vec3::NEG_Z)
    }

    /// The camera's world-space up vector.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation().transform_vector3(Vec3::Y)
    }

    /// Computes the world-to-camera view matrix for this frame.
    ///
    /// Eye views are derived from this by an eye-from-head offset; skyboxes
    /// and other at-infinity content use it directly as the monocular view.
    pub fn view_matrix(&self) -> Mat4 {
        // forward and up come from the same orthonormal rotation so the
        // look-at basis cannot degenerate; identity is a safe fallback for
        // a non-orthonormal base rotation supplied by the application.
        Mat4::look_at_rh(self.position, self.position + self.forward(), self.up())
            .unwrap_or(Mat4::IDENTITY)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
