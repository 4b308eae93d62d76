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

//! # Parallax Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! that define the stereo renderer's architecture: frame timing and deferred
//! task scheduling, the per-frame head/eye pose model, the driver and render
//! delegate contracts, and the scene lifecycle state machine.

#![warn(missing_docs)]

pub mod event;
pub mod frame;
pub mod math;
pub mod platform;
pub mod pose;
pub mod renderer;
pub mod scene;
pub mod telemetry;
pub mod utils;

pub use frame::{FrameScheduler, FrameTimer};
pub use pose::{Eye, EyeTransform, HeadTransform};
pub use utils::timer::Stopwatch;
