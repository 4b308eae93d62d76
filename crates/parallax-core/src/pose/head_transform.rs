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

//! The immutable per-frame head pose snapshot.

use crate::math::{Mat4, Vec3};

/// Below this cosine-of-pitch the pose is treated as gimbal-locked and the
/// degenerate Euler branch is taken.
const GIMBAL_LOCK_THRESHOLD: f32 = 0.01;

/// Euler angles of a head pose, in radians.
///
/// Decomposition order is yaw (Y) · pitch (X) · roll (Z) in a right-handed,
/// Y-up frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    /// Rotation about the X-axis (looking up/down).
    pub pitch: f32,
    /// Rotation about the Y-axis (looking left/right).
    pub yaw: f32,
    /// Rotation about the Z-axis (head tilt).
    pub roll: f32,
}

/// Immutable snapshot of the viewer's head pose for one frame.
///
/// Wraps the raw 4x4 pose matrix delivered by the platform sensor or AR
/// subsystem. Basis vectors and Euler angles are derived on demand; nothing
/// is stored beyond the matrix, so two snapshots built from the same matrix
/// are indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadTransform {
    matrix: Mat4,
}

impl HeadTransform {
    /// Wraps a raw head pose matrix.
    #[inline]
    pub fn new(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// The identity pose: at the origin, looking down negative Z.
    #[inline]
    pub fn identity() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }

    /// The raw pose matrix.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// The rotation part of the pose: the raw matrix with its translation
    /// column reset. Suitable for composing orientation without dragging
    /// the head position along.
    pub fn rotation(&self) -> Mat4 {
        let mut m = self.matrix;
        m.cols[3] = crate::math::Vec4::W;
        m
    }

    /// Head position: the translation column of the pose.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.matrix.cols[3].truncate()
    }

    /// The viewer's right axis (first basis column).
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.matrix.cols[0].truncate()
    }

    /// The viewer's up axis (second basis column).
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.matrix.cols[1].truncate()
    }

    /// The viewer's forward axis.
    ///
    /// The third basis column is the pose's +Z axis, which points behind a
    /// viewer in this convention; forward is its negation.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        -self.matrix.cols[2].truncate()
    }

    /// Decomposes the pose's rotation into Euler angles.
    ///
    /// Near gimbal lock (|pitch| within ~0.01 of 90 degrees) yaw and roll
    /// become one degree of freedom; the degenerate branch pins yaw to zero
    /// and reports the combined angle as roll. This is defined behavior for
    /// any input pose, not an error path.
    pub fn euler_angles(&self) -> EulerAngles {
        let m = &self.matrix;
        let sin_pitch = (-m.get(1, 2)).clamp(-1.0, 1.0);
        let pitch = sin_pitch.asin();
        let cos_pitch = (1.0 - sin_pitch * sin_pitch).max(0.0).sqrt();

        if cos_pitch >= GIMBAL_LOCK_THRESHOLD {
            EulerAngles {
                pitch,
                yaw: m.get(0, 2).atan2(m.get(2, 2)),
                roll: m.get(1, 0).atan2(m.get(1, 1)),
            }
        } else {
            EulerAngles {
                pitch,
                yaw: 0.0,
                roll: (-m.get(0, 1)).atan2(m.get(0, 0)),
            }
        }
    }
}

impl Default for HeadTransform {
    fn default() -> Self {
        Self::identity()
    }
}
