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

//! Integration tests for animated scene swaps, driven directly through the
//! stereo renderer with a synthetic clock.

mod common;

use common::*;
use parallax_core::frame::FrameTimer;
use parallax_core::pose::{EyeCalibration, HeadTransform};
use parallax_core::renderer::{Driver, RenderError, RenderSettings};
use parallax_core::scene::{SceneDelegate, TimingCurve};
use parallax_render::{SceneController, StereoRenderer};
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle observer recording the hooks a scene controller fires.
struct RecordingSceneDelegate {
    name: &'static str,
    log: CallLog,
}

impl SceneDelegate for RecordingSceneDelegate {
    fn on_scene_will_appear(
        &mut self,
        _context: &parallax_core::renderer::RenderContext,
        _driver: &dyn Driver,
    ) {
        record(&self.log, format!("scene[{}].will_appear", self.name));
    }

    fn on_scene_did_appear(
        &mut self,
        _context: &parallax_core::renderer::RenderContext,
        _driver: &dyn Driver,
    ) {
        record(&self.log, format!("scene[{}].did_appear", self.name));
    }

    fn on_scene_will_disappear(
        &mut self,
        _context: &parallax_core::renderer::RenderContext,
        _driver: &dyn Driver,
    ) {
        record(&self.log, format!("scene[{}].will_disappear", self.name));
    }

    fn on_scene_did_disappear(
        &mut self,
        _context: &parallax_core::renderer::RenderContext,
        _driver: &dyn Driver,
    ) {
        record(&self.log, format!("scene[{}].did_disappear", self.name));
    }
}

fn controller_with_delegate(
    name: &'static str,
    log: &CallLog,
) -> (SceneController, Arc<std::sync::Mutex<f32>>) {
    let (scene, opacity) = RecordingScene::new(name, log.clone());
    let mut controller = SceneController::new(Box::new(scene));
    controller.set_delegate(Box::new(RecordingSceneDelegate {
        name,
        log: log.clone(),
    }));
    (controller, opacity)
}

/// Drives one complete frame through the renderer at the given clock time.
fn run_frame(
    renderer: &mut StereoRenderer,
    driver: &Arc<dyn Driver>,
    frame: u64,
    now_seconds: f64,
) {
    let head = HeadTransform::identity();
    let mut timer = FrameTimer::new(Duration::from_secs(60));
    timer.begin_frame();
    let calibration = EyeCalibration::default();

    renderer.prepare_frame(frame, now_seconds, &head, &timer, driver);
    driver.will_render_frame(renderer.context());
    for eye in parallax_core::pose::Eye::STEREO_ORDER {
        let eye_transform = calibration.eye_transform(eye, 0.1, 100.0);
        renderer.render_eye(&eye_transform, driver.as_ref());
    }
    renderer.end_frame(driver.as_ref());
}

// ─────────────────────────────────────────────────────────────────────────────
// Instant swaps
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_instant_swap_fires_lifecycle_in_order() {
    let log = new_log();
    let driver = RecordingDriver::new(log.clone()).into_arc();
    let mut renderer = StereoRenderer::new(RenderSettings::default());

    let (first, _) = controller_with_delegate("first", &log);
    renderer.set_scene_controller(first, driver.as_ref());

    let (second, _) = controller_with_delegate("second", &log);
    renderer.set_scene_controller(second, driver.as_ref());

    let will_appear = index_of(&log, "scene[second].will_appear");
    let will_disappear = index_of(&log, "scene[first].will_disappear");
    let did_appear = index_of(&log, "scene[second].did_appear");
    let did_disappear = index_of(&log, "scene[first].did_disappear");

    assert!(will_appear < will_disappear);
    assert!(will_disappear < did_appear);
    assert!(did_appear < did_disappear);
}

// ─────────────────────────────────────────────────────────────────────────────
// Animated swaps
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_animated_swap_cross_fades_and_finalizes() {
    let log = new_log();
    let driver = RecordingDriver::new(log.clone()).into_arc();
    let mut renderer = StereoRenderer::new(RenderSettings::default());

    let (first, first_opacity) = controller_with_delegate("first", &log);
    renderer.set_scene_controller(first, driver.as_ref());
    run_frame(&mut renderer, &driver, 0, 0.0);

    let (second, second_opacity) = controller_with_delegate("second", &log);
    renderer
        .set_scene_controller_with_transition(
            second,
            1.0,
            TimingCurve::Linear,
            0.0,
            driver.as_ref(),
        )
        .unwrap();
    assert!(renderer.is_scene_transition_active());
    assert!(entries(&log).contains(&"scene[second].will_appear".to_string()));
    assert!(entries(&log).contains(&"scene[first].will_disappear".to_string()));

    // Mid-transition: both scenes render, opacities crossing.
    run_frame(&mut renderer, &driver, 1, 0.5);
    assert!(entries(&log).contains(&"scene[first].render:Left".to_string()));
    assert!(entries(&log).contains(&"scene[second].render:Left".to_string()));
    let first_mid = *first_opacity.lock().unwrap();
    let second_mid = *second_opacity.lock().unwrap();
    assert!(
        first_mid > 0.0 && first_mid < 1.0,
        "outgoing opacity should be mid-fade, got {first_mid}"
    );
    assert!(
        second_mid > 0.0 && second_mid < 1.0,
        "incoming opacity should be mid-fade, got {second_mid}"
    );

    // Past the duration: the swap completes and finalizes in end_frame.
    run_frame(&mut renderer, &driver, 2, 1.5);
    assert!(!renderer.is_scene_transition_active());
    assert_eq!(*second_opacity.lock().unwrap(), 1.0);
    assert_eq!(*first_opacity.lock().unwrap(), 0.0);
    assert!(entries(&log).contains(&"scene[second].did_appear".to_string()));
    assert!(entries(&log).contains(&"scene[first].did_disappear".to_string()));

    // The outgoing scene no longer renders.
    let before = entries(&log).len();
    run_frame(&mut renderer, &driver, 3, 2.0);
    let new_entries = entries(&log)[before..].to_vec();
    assert!(new_entries.iter().any(|e| e.contains("scene[second].render")));
    assert!(!new_entries.iter().any(|e| e.contains("scene[first].render")));
}

#[test]
fn test_outgoing_scene_renders_beneath_incoming() {
    let log = new_log();
    let driver = RecordingDriver::new(log.clone()).into_arc();
    let mut renderer = StereoRenderer::new(RenderSettings::default());

    let (first, _) = controller_with_delegate("first", &log);
    renderer.set_scene_controller(first, driver.as_ref());
    let (second, _) = controller_with_delegate("second", &log);
    renderer
        .set_scene_controller_with_transition(
            second,
            1.0,
            TimingCurve::Linear,
            0.0,
            driver.as_ref(),
        )
        .unwrap();

    run_frame(&mut renderer, &driver, 0, 0.5);

    assert!(
        index_of(&log, "scene[first].render:Left") < index_of(&log, "scene[second].render:Left"),
        "the outgoing scene must draw before the incoming one"
    );
}

#[test]
fn test_second_swap_during_transition_is_rejected() {
    let log = new_log();
    let driver = RecordingDriver::new(log.clone()).into_arc();
    let mut renderer = StereoRenderer::new(RenderSettings::default());

    let (first, _) = controller_with_delegate("first", &log);
    renderer.set_scene_controller(first, driver.as_ref());
    let (second, _) = controller_with_delegate("second", &log);
    renderer
        .set_scene_controller_with_transition(
            second,
            1.0,
            TimingCurve::Linear,
            0.0,
            driver.as_ref(),
        )
        .unwrap();

    // Swap-during-swap is deterministically rejected, not queued.
    let (third, _) = controller_with_delegate("third", &log);
    let result = renderer.set_scene_controller_with_transition(
        third,
        1.0,
        TimingCurve::Linear,
        0.2,
        driver.as_ref(),
    );
    assert!(matches!(result, Err(RenderError::Transition(_))));

    // The in-flight swap still completes normally.
    run_frame(&mut renderer, &driver, 0, 1.5);
    assert!(!renderer.is_scene_transition_active());
    assert!(entries(&log).contains(&"scene[second].did_appear".to_string()));
    assert!(!entries(&log).contains(&"scene[third].will_appear".to_string()));
}

#[test]
fn test_animated_swap_with_no_scene_degrades_to_instant() {
    let log = new_log();
    let driver = RecordingDriver::new(log.clone()).into_arc();
    let mut renderer = StereoRenderer::new(RenderSettings::default());

    let (only, opacity) = controller_with_delegate("only", &log);
    renderer
        .set_scene_controller_with_transition(only, 1.0, TimingCurve::Linear, 0.0, driver.as_ref())
        .unwrap();

    assert!(!renderer.is_scene_transition_active());
    assert!(entries(&log).contains(&"scene[only].did_appear".to_string()));
    assert_eq!(*opacity.lock().unwrap(), 1.0, "no fade without a predecessor");
}
