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

//! The driver contract: the platform-specific GPU substrate factory.

use crate::frame::FrameScheduler;
use crate::pose::Viewport;
use crate::renderer::context::RenderContext;
use crate::renderer::error::DriverError;
use crate::renderer::substrate::{
    GeometryDescriptor, GeometrySubstrate, MaterialDescriptor, MaterialSubstrate,
    TextureDescriptor, TextureSubstrate,
};
use std::sync::Arc;

/// The graphics backend behind a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverBackend {
    /// Hardware rendering through wgpu.
    Wgpu,
    /// A recording driver with no GPU behind it.
    Headless,
}

/// Trait representing a platform graphics driver.
///
/// One driver is selected at session startup and used for the life of the
/// renderer. It is the only way the core obtains GPU resources: substrate
/// factories translate backend-agnostic descriptors into opaque backend
/// objects, and frame bracketing hooks let the backend bind, resolve and
/// present its targets. The driver also owns the session's
/// [`FrameScheduler`], so deferred GPU work (uploads, shader compilation)
/// is queued where the resources live.
pub trait Driver: Send + Sync {
    /// Which backend this driver drives.
    fn backend(&self) -> DriverBackend;

    /// The render session's deferred-task scheduler.
    fn frame_scheduler(&self) -> Arc<FrameScheduler>;

    /// Called at the top of a frame, before any eye renders: acquire and
    /// bind the eye render target.
    fn will_render_frame(&self, context: &RenderContext);

    /// Called after the last eye: resolve multi-sample targets, submit and
    /// present.
    fn did_render_frame(&self, context: &RenderContext);

    /// Uploads a geometry and returns its substrate.
    fn new_geometry_substrate(
        &self,
        descriptor: &GeometryDescriptor,
    ) -> Result<Box<dyn GeometrySubstrate>, DriverError>;

    /// Compiles a material and returns its substrate.
    fn new_material_substrate(
        &self,
        descriptor: &MaterialDescriptor,
    ) -> Result<Box<dyn MaterialSubstrate>, DriverError>;

    /// Uploads a texture and returns its substrate. Malformed layouts (for
    /// example a cube map without exactly six faces) are fatal
    /// [`DriverError`]s, not recoverable conditions.
    fn new_texture_substrate(
        &self,
        descriptor: &TextureDescriptor,
    ) -> Result<Box<dyn TextureSubstrate>, DriverError>;

    /// Runs a fullscreen post-process pass with the given material over the
    /// viewport's region of the eye target.
    fn run_post_process(
        &self,
        material: &dyn MaterialSubstrate,
        viewport: Viewport,
    ) -> Result<(), DriverError>;
}
