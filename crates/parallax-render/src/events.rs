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

//! Input events delivered from platform threads to the frame loop.

/// A platform input event.
///
/// Published onto the frame loop's event bus from UI or sensor threads and
/// consumed at the top of the next frame, so handlers always run on the
/// render thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The user triggered the headset reticle (tap, controller click).
    ReticleTriggered,
    /// The user asked to leave the VR session.
    ExitRequested,
    /// The render surface changed size; dimensions are the full target.
    ViewSizeChanged {
        /// New full-target width in pixels.
        width: u32,
        /// New full-target height in pixels.
        height: u32,
    },
}
