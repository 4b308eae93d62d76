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

//! The window abstraction graphics drivers render into.

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::sync::Arc;

/// Combines the windowing handle traits graphics backends require, so the
/// pair can travel as a single trait object.
pub trait WindowHandle: HasWindowHandle + HasDisplayHandle {}

// Blanket implementation: any type with both handle traits qualifies.
impl<T: HasWindowHandle + HasDisplayHandle> WindowHandle for T {}

/// A shared, thread-safe handle to a platform window, used by drivers to
/// create surfaces.
pub type RenderWindowHandle = Arc<dyn WindowHandle + Send + Sync>;

/// A trait that abstracts the behavior of a platform window.
///
/// Any windowing backend (winit, SDL2, a platform view wrapper) can
/// implement this to host the renderer.
pub trait RenderWindow: HasWindowHandle + HasDisplayHandle + Send + Sync {
    /// Returns the physical dimensions (width, height) of the window's
    /// inner area.
    fn inner_size(&self) -> (u32, u32);

    /// Returns the scale factor of the window.
    fn scale_factor(&self) -> f64;

    /// Requests that the window be redrawn.
    fn request_redraw(&self);

    /// Clones a thread-safe handle to the window for surface creation.
    fn clone_handle_arc(&self) -> RenderWindowHandle;
}
