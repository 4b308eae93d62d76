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

//! Per-eye render targets: viewports, fields of view, and the per-frame
//! eye transform derived from calibration.

use crate::math::{Mat4, Vec3, DEG_TO_RAD};
use serde::{Deserialize, Serialize};

/// An independent render viewpoint for stereo display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Eye {
    /// The left eye of a stereo pair.
    Left,
    /// The right eye of a stereo pair.
    Right,
    /// A single centered viewpoint for non-stereo rendering.
    Monocular,
}

impl Eye {
    /// The fixed render order for a stereo frame.
    pub const STEREO_ORDER: [Eye; 2] = [Eye::Left, Eye::Right];

    /// Returns `true` for the eyes of a stereo pair.
    #[inline]
    pub fn is_stereo(&self) -> bool {
        !matches!(self, Eye::Monocular)
    }
}

/// An axis-aligned integer viewport rectangle, origin at the lower left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: i32,
    /// Bottom edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport from its edges and extent.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Width over height. Degenerate heights yield 1.0.
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// A field of view described by four half-angles in degrees, measured from
/// the eye axis to each frustum plane.
///
/// Head-mounted displays use asymmetric frusta (the nasal half-angle is
/// smaller than the temporal one), so the four edges are independent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    /// Half-angle to the left frustum plane, degrees.
    pub left: f32,
    /// Half-angle to the right frustum plane, degrees.
    pub right: f32,
    /// Half-angle to the bottom frustum plane, degrees.
    pub bottom: f32,
    /// Half-angle to the top frustum plane, degrees.
    pub top: f32,
}

impl FieldOfView {
    /// Creates a field of view from four half-angles in degrees.
    #[inline]
    pub const fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// A symmetric field of view with the given horizontal and vertical
    /// half-angles in degrees.
    #[inline]
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(horizontal, horizontal, vertical, vertical)
    }

    /// Builds the projection matrix for this field of view.
    ///
    /// Pure function of its inputs: the same field of view and clip planes
    /// always produce a bit-identical matrix.
    pub fn perspective_projection(&self, z_near: f32, z_far: f32) -> Mat4 {
        let l = -(self.left * DEG_TO_RAD).tan() * z_near;
        let r = (self.right * DEG_TO_RAD).tan() * z_near;
        let b = -(self.bottom * DEG_TO_RAD).tan() * z_near;
        let t = (self.top * DEG_TO_RAD).tan() * z_near;
        Mat4::frustum_rh_zo(l, r, b, t, z_near, z_far)
    }
}

impl Default for FieldOfView {
    /// A typical HMD eye frustum.
    fn default() -> Self {
        Self::symmetric(45.0, 45.0)
    }
}

/// Static per-device display geometry: everything needed to derive eye
/// transforms that is not per-frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EyeCalibration {
    /// Distance between the two eyes in meters.
    pub interpupillary_distance: f32,
    /// The frustum of a single eye.
    pub fov: FieldOfView,
    /// Full render target width in pixels (both eyes side by side).
    pub target_width: u32,
    /// Full render target height in pixels.
    pub target_height: u32,
}

impl EyeCalibration {
    /// Viewport of the given eye within the shared render target. Stereo
    /// eyes split the target side by side; monocular covers it whole.
    pub fn viewport(&self, eye: Eye) -> Viewport {
        let half = self.target_width / 2;
        match eye {
            Eye::Left => Viewport::new(0, 0, half, self.target_height),
            Eye::Right => Viewport::new(half as i32, 0, half, self.target_height),
            Eye::Monocular => Viewport::new(0, 0, self.target_width, self.target_height),
        }
    }

    /// The eye-from-head matrix: translates head space onto the given eye.
    pub fn eye_from_head(&self, eye: Eye) -> Mat4 {
        let half_ipd = self.interpupillary_distance / 2.0;
        match eye {
            // The left eye sits at -x in head space, so head coordinates
            // shift by +x to become eye coordinates.
            Eye::Left => Mat4::from_translation(Vec3::new(half_ipd, 0.0, 0.0)),
            Eye::Right => Mat4::from_translation(Vec3::new(-half_ipd, 0.0, 0.0)),
            Eye::Monocular => Mat4::IDENTITY,
        }
    }

    /// Derives the complete per-frame transform for one eye.
    pub fn eye_transform(&self, eye: Eye, z_near: f32, z_far: f32) -> EyeTransform {
        EyeTransform {
            eye,
            viewport: self.viewport(eye),
            fov: self.fov,
            eye_from_head: self.eye_from_head(eye),
            projection: self.fov.perspective_projection(z_near, z_far),
        }
    }
}

impl Default for EyeCalibration {
    fn default() -> Self {
        Self {
            interpupillary_distance: 0.064,
            fov: FieldOfView::default(),
            target_width: 2048,
            target_height: 1024,
        }
    }
}

/// The complete render parameters of one eye for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeTransform {
    /// Which eye this transform belongs to.
    pub eye: Eye,
    /// Where in the shared target this eye renders.
    pub viewport: Viewport,
    /// The eye's frustum.
    pub fov: FieldOfView,
    /// Head space to eye space.
    pub eye_from_head: Mat4,
    /// Eye space to clip space.
    pub projection: Mat4,
}
