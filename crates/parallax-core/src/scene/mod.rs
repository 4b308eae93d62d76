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

//! Scene lifecycle contracts.
//!
//! The render core does not own scene content. It drives a [`Scene`]
//! through per-eye traversal entry points, notifies a [`SceneDelegate`] of
//! lifecycle edges, and animates scene swaps through the
//! [`transition`] state machine.

pub mod transition;

pub use self::transition::{
    SceneTransition, TimingCurve, TransitionDirection, TransitionError, TransitionProgress,
};

use crate::renderer::context::RenderContext;
use crate::renderer::traits::Driver;

/// The renderable content contract.
///
/// A scene is traversed once per eye per frame: background first (skybox,
/// at-infinity content using the monocular view), then the scene graph
/// proper. Opacity is the transition animation hook — cross-fades drive it
/// from 0 to 1 on the incoming scene and 1 to 0 on the outgoing one.
pub trait Scene: Send {
    /// Called once per frame before any eye renders, with the frame's
    /// camera and matrices already in place.
    fn will_render(&mut self, context: &RenderContext) {
        let _ = context;
    }

    /// Renders the scene's background layer for the current eye.
    fn render_background(&mut self, context: &RenderContext, driver: &dyn Driver);

    /// Renders the scene graph for the current eye.
    fn render(&mut self, context: &RenderContext, driver: &dyn Driver);

    /// Sets the whole-scene opacity in `[0, 1]`.
    fn set_opacity(&mut self, opacity: f32);

    /// The current whole-scene opacity.
    fn opacity(&self) -> f32;
}

/// Lifecycle observer for a scene controller.
///
/// All hooks default to no-ops; observers override the edges they care
/// about. Hooks arrive on the render thread.
pub trait SceneDelegate: Send {
    /// The scene is about to become the active scene.
    fn on_scene_will_appear(&mut self, context: &RenderContext, driver: &dyn Driver) {
        let _ = (context, driver);
    }

    /// The scene finished appearing (any incoming transition ended).
    fn on_scene_did_appear(&mut self, context: &RenderContext, driver: &dyn Driver) {
        let _ = (context, driver);
    }

    /// The scene is about to stop being the active scene.
    fn on_scene_will_disappear(&mut self, context: &RenderContext, driver: &dyn Driver) {
        let _ = (context, driver);
    }

    /// The scene finished disappearing (any outgoing transition ended).
    fn on_scene_did_disappear(&mut self, context: &RenderContext, driver: &dyn Driver) {
        let _ = (context, driver);
    }

    /// The user triggered the reticle while this scene was active; `ray` is
    /// the camera forward vector at trigger time.
    fn on_reticle_tapped(&mut self, ray: crate::math::Vec3, context: &RenderContext) {
        let _ = (ray, context);
    }
}
