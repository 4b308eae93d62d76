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

//! The per-frame render context threaded through every render callback.

use crate::math::Mat4;
use crate::pose::{Camera, Eye};

/// Mutable per-frame state shared with delegates and scenes.
///
/// Owned by the stereo renderer; rewritten in place as the frame advances
/// (once per frame for camera and monocular state, once per eye for the
/// view/projection pair). Callbacks receive it by shared reference and must
/// not retain it across frames.
#[derive(Debug, Clone)]
pub struct RenderContext {
    frame: u64,
    eye: Eye,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    monocular_view_matrix: Mat4,
    camera: Camera,
    fps: f32,
}

impl RenderContext {
    /// Creates an empty context for frame zero.
    pub fn new() -> Self {
        Self {
            frame: 0,
            eye: Eye::Monocular,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            monocular_view_matrix: Mat4::IDENTITY,
            camera: Camera::new(),
            fps: 0.0,
        }
    }

    /// The sequential number of the frame being rendered.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Sets the current frame number.
    pub fn set_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    /// The eye currently being rendered.
    #[inline]
    pub fn eye(&self) -> Eye {
        self.eye
    }

    /// Tags the eye currently being rendered.
    pub fn set_eye(&mut self, eye: Eye) {
        self.eye = eye;
    }

    /// World-to-eye view matrix for the eye being rendered.
    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    /// Sets the view matrix for the eye being rendered.
    pub fn set_view_matrix(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    /// Projection matrix for the eye being rendered.
    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// Sets the projection matrix for the eye being rendered.
    pub fn set_projection_matrix(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }

    /// The eye-independent view matrix, used for content that should appear
    /// at infinity (skyboxes, distant backgrounds).
    #[inline]
    pub fn monocular_view_matrix(&self) -> Mat4 {
        self.monocular_view_matrix
    }

    /// Sets the eye-independent view matrix.
    pub fn set_monocular_view_matrix(&mut self, matrix: Mat4) {
        self.monocular_view_matrix = matrix;
    }

    /// The camera snapshot for this frame.
    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replaces the camera snapshot for this frame.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// The frame-rate estimate maintained by the frame loop.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Updates the frame-rate estimate.
    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}
