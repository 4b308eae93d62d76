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

//! The per-frame stereo render state machine.

use crate::effects::{PostEffect, PostProcessStack};
use crate::scene_controller::SceneController;
use parallax_core::frame::FrameTimer;
use parallax_core::math::{Mat4, Vec3};
use parallax_core::pose::{Camera, EyeTransform, HeadTransform};
use parallax_core::renderer::{
    Driver, RenderContext, RenderDelegate, RenderError, RenderSettings, StereoMode,
};
use parallax_core::scene::{TimingCurve, TransitionDirection, TransitionError, TransitionProgress};
use std::sync::Arc;

/// Duration of the default animated scene swap.
const DEFAULT_SCENE_TRANSITION_SECONDS: f64 = 1.0;

/// Orchestrates one frame of stereo rendering.
///
/// Each frame advances through a strict sequence on the render thread:
/// `prepare_frame` (transition advance, scheduler drain, camera update),
/// `render_eye` per eye in fixed order, then `end_frame` (transition
/// finalization, resolve/present). The renderer owns the frame's
/// [`RenderContext`] and the active/outgoing scene controllers; scene
/// content and platform concerns stay behind the [`RenderDelegate`] and
/// [`Driver`] contracts.
pub struct StereoRenderer {
    initialized: bool,
    context: RenderContext,
    delegate: Option<Box<dyn RenderDelegate>>,
    camera_position: Vec3,
    camera_base_rotation: Mat4,
    scene_controller: Option<SceneController>,
    outgoing_scene_controller: Option<SceneController>,
    transition_active: bool,
    effects: PostProcessStack,
    settings: RenderSettings,
}

impl StereoRenderer {
    /// Creates a renderer with the given session settings.
    pub fn new(settings: RenderSettings) -> Self {
        let mut enabled = Vec::new();
        if settings.enable_vignette {
            enabled.push(PostEffect::Vignette);
        }
        if settings.enable_chromatic_aberration {
            enabled.push(PostEffect::ChromaticAberrationCorrection);
        }
        Self {
            initialized: false,
            context: RenderContext::new(),
            delegate: None,
            camera_position: Vec3::ZERO,
            camera_base_rotation: Mat4::IDENTITY,
            scene_controller: None,
            outgoing_scene_controller: None,
            transition_active: false,
            effects: PostProcessStack::new(&enabled),
            settings,
        }
    }

    /// Installs the platform render delegate.
    pub fn set_delegate(&mut self, delegate: Box<dyn RenderDelegate>) {
        self.delegate = Some(delegate);
    }

    /// The session settings.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// The current frame's render context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// `true` while a scene swap is in flight.
    pub fn is_scene_transition_active(&self) -> bool {
        self.transition_active || self.outgoing_scene_controller.is_some()
    }

    // --- Camera ---

    /// Sets the application-controlled camera position. The per-frame head
    /// translation is applied on top of this.
    pub fn set_position(&mut self, position: Vec3) {
        self.camera_position = position;
    }

    /// Sets the application-controlled base rotation, composed under the
    /// per-frame head rotation.
    pub fn set_base_rotation(&mut self, rotation: Mat4) {
        self.camera_base_rotation = rotation;
    }

    // --- Frame sequence ---

    /// Step 1 of a frame: advance transitions, drain deferred work, and
    /// rebuild the camera from the head pose.
    pub fn prepare_frame(
        &mut self,
        frame: u64,
        now_seconds: f64,
        head: &HeadTransform,
        timer: &FrameTimer,
        driver: &Arc<dyn Driver>,
    ) {
        if !self.initialized {
            if let Some(delegate) = self.delegate.as_mut() {
                delegate.setup_renderer(driver.as_ref());
            }
            self.initialized = true;
            log::info!("StereoRenderer: initialized on first frame");
        }

        self.transition_active = self.process_scene_transition(now_seconds);
        self.context.set_frame(frame);

        // Deferred background work runs inside whatever budget this frame
        // has left; post-effect materials are queued here too so their
        // compilation never lands on an eye render.
        let scheduler = driver.frame_scheduler();
        self.effects.prepare(driver, &scheduler);
        scheduler.process_tasks(timer);

        let mut camera = Camera::new();
        camera.set_position(self.camera_position + head.translation());
        camera.set_base_rotation(self.camera_base_rotation);
        camera.set_head_rotation(head.rotation());
        self.context.set_camera(camera);
        self.context.set_monocular_view_matrix(camera.view_matrix());

        if let Some(outgoing) = self.outgoing_scene_controller.as_mut() {
            outgoing.scene_will_render(&self.context);
        }
        if let Some(current) = self.scene_controller.as_mut() {
            current.scene_will_render(&self.context);
        }
    }

    /// Step 2 of a frame, once per eye in fixed order: bind the eye's
    /// transform, traverse the scenes, run post effects.
    pub fn render_eye(&mut self, eye_transform: &EyeTransform, driver: &dyn Driver) {
        let eye = eye_transform.eye;
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.will_render_eye(eye, &self.context);
        }

        let camera_view = self.context.camera().view_matrix();
        self.context.set_eye(eye);
        self.context
            .set_view_matrix(eye_transform.eye_from_head * camera_view);
        self.context.set_projection_matrix(eye_transform.projection);

        // During a swap the outgoing scene renders beneath the incoming
        // one: backgrounds first, then both scene graphs.
        if let Some(outgoing) = self.outgoing_scene_controller.as_mut() {
            outgoing.render_background(&self.context, driver);
        }
        if let Some(current) = self.scene_controller.as_mut() {
            current.render_background(&self.context, driver);
        }
        if let Some(outgoing) = self.outgoing_scene_controller.as_mut() {
            outgoing.render(&self.context, driver);
        }
        if let Some(current) = self.scene_controller.as_mut() {
            current.render(&self.context, driver);
        }

        self.effects.apply(eye_transform.viewport, driver);

        if let Some(delegate) = self.delegate.as_mut() {
            delegate.did_render_eye(eye, &self.context);
        }
    }

    /// Step 3 of a frame: finalize a completed scene swap and hand the
    /// frame to the driver for resolve/present.
    pub fn end_frame(&mut self, driver: &dyn Driver) {
        if !self.transition_active {
            if let Some(mut outgoing) = self.outgoing_scene_controller.take() {
                if let Some(incoming) = self.scene_controller.as_mut() {
                    incoming.end_incoming_transition();
                    incoming.scene_did_appear(&self.context, driver);
                }
                outgoing.end_outgoing_transition();
                outgoing.scene_did_disappear(&self.context, driver);
                log::info!("StereoRenderer: scene transition complete");
            }
        }
        driver.did_render_frame(&self.context);
    }

    // --- Scene management ---

    /// Replaces the active scene immediately, with no animation.
    pub fn set_scene_controller(&mut self, mut controller: SceneController, driver: &dyn Driver) {
        controller.scene_will_appear(&self.context, driver);
        if let Some(old) = self.scene_controller.as_mut() {
            old.scene_will_disappear(&self.context, driver);
        }

        let old = self.scene_controller.replace(controller);

        if let Some(current) = self.scene_controller.as_mut() {
            current.scene_did_appear(&self.context, driver);
        }
        if let Some(mut old) = old {
            old.scene_did_disappear(&self.context, driver);
        }
    }

    /// Replaces the active scene with the default cross-fade.
    pub fn set_scene_controller_animated(
        &mut self,
        controller: SceneController,
        now_seconds: f64,
        driver: &dyn Driver,
    ) -> Result<(), RenderError> {
        self.set_scene_controller_with_transition(
            controller,
            DEFAULT_SCENE_TRANSITION_SECONDS,
            TimingCurve::EaseIn,
            now_seconds,
            driver,
        )
    }

    /// Replaces the active scene with a cross-fade of the given duration
    /// and curve.
    ///
    /// Rejected with [`TransitionError::AlreadyActive`] while a previous
    /// swap is still animating; the active scene is left untouched. With no
    /// active scene to fade from, the swap degrades to an instant set.
    pub fn set_scene_controller_with_transition(
        &mut self,
        controller: SceneController,
        duration_seconds: f64,
        curve: TimingCurve,
        now_seconds: f64,
        driver: &dyn Driver,
    ) -> Result<(), RenderError> {
        if self.outgoing_scene_controller.is_some() {
            return Err(TransitionError::AlreadyActive {
                active: TransitionDirection::Incoming,
            }
            .into());
        }
        if self.scene_controller.is_none() {
            self.set_scene_controller(controller, driver);
            return Ok(());
        }

        let mut incoming = controller;
        incoming.start_incoming_transition(duration_seconds, curve, now_seconds)?;

        let mut outgoing = self
            .scene_controller
            .take()
            .expect("active scene checked above");
        if let Err(e) = outgoing.start_outgoing_transition(duration_seconds, curve, now_seconds) {
            // The current controller has a caller-started transition in
            // flight; restore it and report.
            self.scene_controller = Some(outgoing);
            return Err(e.into());
        }

        incoming.scene_will_appear(&self.context, driver);
        outgoing.scene_will_disappear(&self.context, driver);

        self.scene_controller = Some(incoming);
        self.outgoing_scene_controller = Some(outgoing);
        self.transition_active = true;
        log::info!("StereoRenderer: animated scene swap over {duration_seconds:.2}s started");
        Ok(())
    }

    fn process_scene_transition(&mut self, now_seconds: f64) -> bool {
        if self.outgoing_scene_controller.is_none() {
            return false;
        }
        let mut active = false;
        if let Some(incoming) = self.scene_controller.as_mut() {
            active |= matches!(
                incoming.advance_transition(now_seconds),
                TransitionProgress::Active(_)
            );
        }
        if let Some(outgoing) = self.outgoing_scene_controller.as_mut() {
            active |= matches!(
                outgoing.advance_transition(now_seconds),
                TransitionProgress::Active(_)
            );
        }
        active
    }

    // --- Input ---

    /// Dispatches a reticle trigger along the camera forward ray.
    pub fn handle_tap(&mut self) {
        let ray = self.context.camera().forward();
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.reticle_tapped(ray, &self.context);
        }
        if let Some(current) = self.scene_controller.as_mut() {
            current.reticle_tapped(ray, &self.context);
        }
    }

    /// Forwards an exit request to the delegate.
    pub fn request_exit(&mut self) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.user_did_request_exit_vr();
        }
    }

    /// Notifies the delegate of a surface size change. In stereo mode the
    /// delegate sees the width of a single eye's viewport.
    pub fn update_render_view_size(&mut self, width: u32, height: u32) {
        let eye_width = match self.settings.stereo_mode {
            StereoMode::Stereo => width / 2,
            StereoMode::Monocular => width,
        };
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.render_view_did_change_size(eye_width, height, &self.context);
        }
    }

    /// Feeds the frame-rate estimate into the render context.
    pub fn set_fps_estimate(&mut self, fps: f32) {
        self.context.set_fps(fps);
    }

    /// Tears the renderer down, notifying the delegate once.
    pub fn shutdown(&mut self) {
        if self.initialized {
            if let Some(delegate) = self.delegate.as_mut() {
                delegate.shutdown_renderer();
            }
            self.initialized = false;
            log::info!("StereoRenderer: shut down");
        }
    }
}

impl Drop for StereoRenderer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for StereoRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StereoRenderer")
            .field("initialized", &self.initialized)
            .field("frame", &self.context.frame())
            .field("has_scene", &self.scene_controller.is_some())
            .field("transition_active", &self.is_scene_transition_active())
            .finish()
    }
}
