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

//! The per-frame pose model: head transforms, per-eye transforms, and the
//! camera they feed.
//!
//! All types here are immutable value snapshots. The render loop acquires a
//! [`HeadTransform`] once per frame from a [`HeadPoseProvider`] and derives
//! everything else — camera orientation, per-eye view and projection
//! matrices — as pure functions of that snapshot plus static calibration.
//!
//! Convention: matrices are column-major, the coordinate system is
//! right-handed with Y up, and an unrotated viewer looks down negative Z.

pub mod camera;
pub mod eye;
pub mod head_transform;
pub mod provider;

pub use self::camera::Camera;
pub use self::eye::{Eye, EyeCalibration, EyeTransform, FieldOfView, Viewport};
pub use self::head_transform::{EulerAngles, HeadTransform};
pub use self::provider::HeadPoseProvider;
