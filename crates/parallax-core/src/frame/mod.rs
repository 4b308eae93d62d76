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

//! Frame timing and deferred-task scheduling.
//!
//! The render thread owns a hard per-frame time budget. Background work
//! (texture uploads, shader compilation, substrate builds) is enqueued on
//! the [`FrameScheduler`] from any thread and drained on the render thread
//! each frame, but only while the [`FrameTimer`] reports budget remaining.
//! A starvation bound guarantees deferred work is never postponed forever.

pub mod scheduler;
pub mod timer;

pub use self::scheduler::{FrameScheduler, FrameTask};
pub use self::timer::FrameTimer;
