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

//! Drives the stereo renderer through one frame per call.

use crate::events::InputEvent;
use crate::renderer::StereoRenderer;
use parallax_core::event::EventBus;
use parallax_core::frame::FrameTimer;
use parallax_core::pose::{Eye, EyeCalibration, HeadPoseProvider};
use parallax_core::renderer::{Driver, RenderError, StereoMode};
use parallax_core::telemetry::FrameStats;
use parallax_core::utils::timer::Stopwatch;
use std::sync::Arc;
use std::time::Duration;

/// The render-thread frame loop.
///
/// Owns the renderer, the driver, the head pose source, and the eye
/// calibration, and composes them into strictly sequential frames:
///
/// 1. drain platform input events,
/// 2. acquire the head pose snapshot,
/// 3. `prepare_frame`,
/// 4. `render_eye` for each eye in fixed order (left, then right),
/// 5. `end_frame`.
///
/// Frames never overlap: a frame that did not run to completion (a panic
/// out of a callback) leaves the loop refusing new frames rather than
/// rendering over a half-open one.
pub struct FrameLoop {
    renderer: StereoRenderer,
    driver: Arc<dyn Driver>,
    pose_provider: Arc<dyn HeadPoseProvider>,
    calibration: EyeCalibration,
    timer: FrameTimer,
    events: EventBus<InputEvent>,
    clock: Stopwatch,
    stats: FrameStats,
    frame: u64,
    frame_open: bool,
}

impl FrameLoop {
    /// Assembles a frame loop for a render session.
    ///
    /// Applies the renderer's settings to the scheduler: the frame budget
    /// comes from `frame_budget_ms`, and budget enforcement is switched off
    /// for hosts that asked for it.
    pub fn new(
        renderer: StereoRenderer,
        driver: Arc<dyn Driver>,
        pose_provider: Arc<dyn HeadPoseProvider>,
        calibration: EyeCalibration,
    ) -> Self {
        let settings = renderer.settings();
        let timer = FrameTimer::new(Duration::from_millis(settings.frame_budget_ms));
        driver
            .frame_scheduler()
            .set_budget_enforced(settings.enforce_frame_budget);

        Self {
            renderer,
            driver,
            pose_provider,
            calibration,
            timer,
            events: EventBus::new(),
            clock: Stopwatch::new(),
            stats: FrameStats::new(),
            frame: 0,
            frame_open: false,
        }
    }

    /// The renderer being driven.
    pub fn renderer(&self) -> &StereoRenderer {
        &self.renderer
    }

    /// The renderer being driven, mutably (scene swaps, camera moves).
    pub fn renderer_mut(&mut self) -> &mut StereoRenderer {
        &mut self.renderer
    }

    /// The driver this session renders through.
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Seconds elapsed on the loop's clock; the time base for transitions.
    pub fn now_seconds(&self) -> f64 {
        self.clock.elapsed_secs_f64()
    }

    /// Rolling frame statistics.
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// A sender for publishing input events from platform threads.
    pub fn event_sender(&self) -> flume::Sender<InputEvent> {
        self.events.sender()
    }

    /// Renders one complete frame.
    ///
    /// Returns [`RenderError::FrameInProgress`] if the previous frame never
    /// reached `end_frame` on this thread.
    pub fn render_frame(&mut self) -> Result<(), RenderError> {
        if self.frame_open {
            return Err(RenderError::FrameInProgress);
        }
        self.frame_open = true;
        let watch = Stopwatch::new();

        self.timer.begin_frame();
        self.process_input_events();

        let head = self.pose_provider.head_transform();
        let now = self.clock.elapsed_secs_f64();
        self.renderer.set_fps_estimate(self.stats.fps());
        self.renderer
            .prepare_frame(self.frame, now, &head, &self.timer, &self.driver);

        self.driver.will_render_frame(self.renderer.context());

        let settings = self.renderer.settings();
        let (z_near, z_far) = (settings.z_near, settings.z_far);
        let eyes: &[Eye] = match settings.stereo_mode {
            StereoMode::Stereo => &Eye::STEREO_ORDER,
            StereoMode::Monocular => &[Eye::Monocular],
        };
        for &eye in eyes {
            let eye_transform = self.calibration.eye_transform(eye, z_near, z_far);
            self.renderer.render_eye(&eye_transform, self.driver.as_ref());
        }

        self.renderer.end_frame(self.driver.as_ref());

        self.frame += 1;
        if self.driver.frame_scheduler().starved_frame_count() > 0 {
            self.stats.starved_frames += 1;
        }
        self.stats.record_frame(watch.elapsed());
        self.frame_open = false;
        Ok(())
    }

    /// Tears down the render session.
    pub fn shutdown(&mut self) {
        self.renderer.shutdown();
    }

    fn process_input_events(&mut self) {
        for event in self.events.drain() {
            log::trace!("FrameLoop: input event {event:?}");
            match event {
                InputEvent::ReticleTriggered => self.renderer.handle_tap(),
                InputEvent::ExitRequested => self.renderer.request_exit(),
                InputEvent::ViewSizeChanged { width, height } => {
                    self.calibration.target_width = width;
                    self.calibration.target_height = height;
                    self.renderer.update_render_view_size(width, height);
                }
            }
        }
    }
}

impl std::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("frame", &self.frame)
            .field("frame_open", &self.frame_open)
            .field("fps", &self.stats.fps())
            .finish()
    }
}
