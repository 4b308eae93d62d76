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

//! # Parallax Render
//!
//! Frame orchestration for the stereo renderer: the per-frame state machine
//! ([`StereoRenderer`]), scene controllers with animated transitions, the
//! post-effect stack, and the [`FrameLoop`] that drives one strictly
//! ordered frame per call on the render thread.

pub mod effects;
pub mod events;
pub mod frame_loop;
pub mod renderer;
pub mod scene_controller;

pub use self::effects::{PostEffect, PostProcessStack};
pub use self::events::InputEvent;
pub use self::frame_loop::FrameLoop;
pub use self::renderer::StereoRenderer;
pub use self::scene_controller::SceneController;
