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

//! The render delegate contract: callbacks into the surrounding platform
//! layer.

use crate::math::Vec3;
use crate::pose::Eye;
use crate::renderer::context::RenderContext;
use crate::renderer::traits::driver::Driver;

/// Callbacks the stereo renderer makes into the platform/application layer.
///
/// The core calls these; it never implements them. All callbacks arrive on
/// the render thread. Default implementations are empty so delegates only
/// override what they observe.
pub trait RenderDelegate: Send {
    /// Called once, on the first frame, before anything renders.
    fn setup_renderer(&mut self, driver: &dyn Driver) {
        let _ = driver;
    }

    /// Called when the render session is torn down.
    fn shutdown_renderer(&mut self) {}

    /// Called when the per-eye render surface changes size. In stereo mode
    /// `width` is the width of a single eye's viewport, not the full
    /// target.
    fn render_view_did_change_size(&mut self, width: u32, height: u32, context: &RenderContext) {
        let _ = (width, height, context);
    }

    /// Called immediately before an eye's scene traversal.
    fn will_render_eye(&mut self, eye: Eye, context: &RenderContext) {
        let _ = (eye, context);
    }

    /// Called immediately after an eye's scene traversal and post effects.
    fn did_render_eye(&mut self, eye: Eye, context: &RenderContext) {
        let _ = (eye, context);
    }

    /// Called when the user triggers the reticle; `ray` is the camera
    /// forward vector at trigger time.
    fn reticle_tapped(&mut self, ray: Vec3, context: &RenderContext) {
        let _ = (ray, context);
    }

    /// Called when the user asks to leave the VR session.
    fn user_did_request_exit_vr(&mut self) {}
}
