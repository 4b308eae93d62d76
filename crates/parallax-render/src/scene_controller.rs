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

//! Owns a scene, its lifecycle delegate, and its transition state.

use parallax_core::math::Vec3;
use parallax_core::renderer::{Driver, RenderContext};
use parallax_core::scene::{
    Scene, SceneDelegate, SceneTransition, TimingCurve, TransitionDirection, TransitionError,
    TransitionProgress,
};

/// Manages one scene's participation in the render loop.
///
/// The controller forwards lifecycle edges to its delegate, drives per-eye
/// traversal, and owns the scene's transition state machine. At most one
/// transition — incoming or outgoing — is in flight at a time; the machine
/// rejects a second start until the first reaches its terminal state.
pub struct SceneController {
    scene: Box<dyn Scene>,
    delegate: Option<Box<dyn SceneDelegate>>,
    transition: SceneTransition,
}

impl SceneController {
    /// Wraps a scene with no delegate.
    pub fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            delegate: None,
            transition: SceneTransition::new(),
        }
    }

    /// Installs the lifecycle delegate.
    pub fn set_delegate(&mut self, delegate: Box<dyn SceneDelegate>) {
        self.delegate = Some(delegate);
    }

    /// The controlled scene.
    pub fn scene(&self) -> &dyn Scene {
        self.scene.as_ref()
    }

    /// The controlled scene, mutably.
    pub fn scene_mut(&mut self) -> &mut dyn Scene {
        self.scene.as_mut()
    }

    /// `true` while this controller's transition is in flight.
    pub fn is_transition_active(&self) -> bool {
        self.transition.is_active()
    }

    // --- Lifecycle forwarding ---

    /// The scene is about to become active.
    pub fn scene_will_appear(&mut self, context: &RenderContext, driver: &dyn Driver) {
        log::debug!("SceneController: scene will appear");
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_scene_will_appear(context, driver);
        }
    }

    /// The scene finished appearing.
    pub fn scene_did_appear(&mut self, context: &RenderContext, driver: &dyn Driver) {
        log::debug!("SceneController: scene did appear");
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_scene_did_appear(context, driver);
        }
    }

    /// The scene is about to stop being active.
    pub fn scene_will_disappear(&mut self, context: &RenderContext, driver: &dyn Driver) {
        log::debug!("SceneController: scene will disappear");
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_scene_will_disappear(context, driver);
        }
    }

    /// The scene finished disappearing.
    pub fn scene_did_disappear(&mut self, context: &RenderContext, driver: &dyn Driver) {
        log::debug!("SceneController: scene did disappear");
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_scene_did_disappear(context, driver);
        }
    }

    // --- Per-frame forwarding ---

    /// Notifies the scene that the frame is about to render.
    pub fn scene_will_render(&mut self, context: &RenderContext) {
        self.scene.will_render(context);
    }

    /// Renders the scene's background layer for the current eye.
    pub fn render_background(&mut self, context: &RenderContext, driver: &dyn Driver) {
        self.scene.render_background(context, driver);
    }

    /// Renders the scene graph for the current eye.
    pub fn render(&mut self, context: &RenderContext, driver: &dyn Driver) {
        self.scene.render(context, driver);
    }

    /// Dispatches a reticle trigger into the scene's delegate.
    pub fn reticle_tapped(&mut self, ray: Vec3, context: &RenderContext) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_reticle_tapped(ray, context);
        }
    }

    // --- Transitions ---

    /// Begins fading this scene in. The scene starts fully transparent.
    pub fn start_incoming_transition(
        &mut self,
        duration_seconds: f64,
        curve: TimingCurve,
        now_seconds: f64,
    ) -> Result<(), TransitionError> {
        self.transition.start(
            TransitionDirection::Incoming,
            duration_seconds,
            curve,
            now_seconds,
        )?;
        self.scene.set_opacity(0.0);
        Ok(())
    }

    /// Begins fading this scene out from its current opacity.
    pub fn start_outgoing_transition(
        &mut self,
        duration_seconds: f64,
        curve: TimingCurve,
        now_seconds: f64,
    ) -> Result<(), TransitionError> {
        self.transition.start(
            TransitionDirection::Outgoing,
            duration_seconds,
            curve,
            now_seconds,
        )
    }

    /// Advances the transition to `now` and applies the resulting opacity.
    ///
    /// Incoming scenes fade 0 → 1, outgoing scenes 1 → 0. Completion
    /// applies the terminal opacity and is reported exactly once.
    pub fn advance_transition(&mut self, now_seconds: f64) -> TransitionProgress {
        let direction = self.transition.direction();
        let progress = self.transition.advance(now_seconds);
        match (progress, direction) {
            (TransitionProgress::Active(t), Some(TransitionDirection::Incoming)) => {
                self.scene.set_opacity(t);
            }
            (TransitionProgress::Active(t), Some(TransitionDirection::Outgoing)) => {
                self.scene.set_opacity(1.0 - t);
            }
            (TransitionProgress::Completed, Some(direction)) => {
                self.apply_terminal_opacity(direction);
            }
            _ => {}
        }
        progress
    }

    /// Forces an in-flight incoming transition to its end state.
    pub fn end_incoming_transition(&mut self) {
        self.transition.end();
        self.apply_terminal_opacity(TransitionDirection::Incoming);
    }

    /// Forces an in-flight outgoing transition to its end state.
    pub fn end_outgoing_transition(&mut self) {
        self.transition.end();
        self.apply_terminal_opacity(TransitionDirection::Outgoing);
    }

    fn apply_terminal_opacity(&mut self, direction: TransitionDirection) {
        let opacity = match direction {
            TransitionDirection::Incoming => 1.0,
            TransitionDirection::Outgoing => 0.0,
        };
        self.scene.set_opacity(opacity);
    }
}

impl std::fmt::Debug for SceneController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneController")
            .field("has_delegate", &self.delegate.is_some())
            .field("transition_active", &self.is_transition_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct FadeScene {
        opacity: f32,
    }

    impl Scene for FadeScene {
        fn render_background(&mut self, _context: &RenderContext, _driver: &dyn Driver) {}
        fn render(&mut self, _context: &RenderContext, _driver: &dyn Driver) {}
        fn set_opacity(&mut self, opacity: f32) {
            self.opacity = opacity;
        }
        fn opacity(&self) -> f32 {
            self.opacity
        }
    }

    fn controller() -> SceneController {
        SceneController::new(Box::new(FadeScene { opacity: 1.0 }))
    }

    #[test]
    fn incoming_transition_fades_scene_in() {
        let mut ctl = controller();
        ctl.start_incoming_transition(2.0, TimingCurve::Linear, 0.0)
            .unwrap();
        assert_eq!(ctl.scene().opacity(), 0.0, "incoming starts transparent");

        match ctl.advance_transition(1.0) {
            TransitionProgress::Active(_) => {}
            other => panic!("expected Active, got {other:?}"),
        }
        assert_relative_eq!(ctl.scene().opacity(), 0.5, epsilon = 1e-6);

        assert_eq!(ctl.advance_transition(2.5), TransitionProgress::Completed);
        assert_eq!(ctl.scene().opacity(), 1.0);
    }

    #[test]
    fn outgoing_transition_fades_scene_out() {
        let mut ctl = controller();
        ctl.start_outgoing_transition(2.0, TimingCurve::Linear, 0.0)
            .unwrap();
        ctl.advance_transition(1.0);
        assert_relative_eq!(ctl.scene().opacity(), 0.5, epsilon = 1e-6);
        ctl.advance_transition(3.0);
        assert_eq!(ctl.scene().opacity(), 0.0);
    }

    #[test]
    fn second_transition_while_active_is_rejected() {
        let mut ctl = controller();
        ctl.start_outgoing_transition(1.0, TimingCurve::Linear, 0.0)
            .unwrap();
        let err = ctl
            .start_incoming_transition(1.0, TimingCurve::Linear, 0.5)
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::AlreadyActive {
                active: TransitionDirection::Outgoing
            }
        );
        // The rejected start must not have touched the scene.
        assert_eq!(ctl.scene().opacity(), 1.0);
    }

    #[test]
    fn forced_end_applies_terminal_opacity() {
        let mut ctl = controller();
        ctl.start_incoming_transition(10.0, TimingCurve::Linear, 0.0)
            .unwrap();
        ctl.advance_transition(1.0);
        ctl.end_incoming_transition();
        assert_eq!(ctl.scene().opacity(), 1.0);
        assert!(!ctl.is_transition_active());
    }
}
