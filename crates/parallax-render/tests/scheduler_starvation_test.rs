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

//! End-to-end starvation behavior: the frame loop, a zero-budget timer,
//! and the scheduler's forced purge working together.

mod common;

use common::*;
use parallax_core::frame::scheduler::STARVATION_PURGE_FRAME_COUNT;
use parallax_core::pose::EyeCalibration;
use parallax_core::renderer::RenderSettings;
use parallax_render::{FrameLoop, StereoRenderer};
use std::sync::{Arc, Mutex};

fn build_loop(log: &CallLog, settings: RenderSettings) -> FrameLoop {
    let driver = RecordingDriver::new(log.clone()).into_arc();
    let renderer = StereoRenderer::new(settings);
    FrameLoop::new(renderer, driver, FixedPose::identity(), EyeCalibration::default())
}

#[test]
fn test_zero_budget_frames_starve_then_purge_in_order() {
    let log = new_log();
    // A zero frame budget means the timer is expired on entry every frame:
    // the pathological host from the scheduler's point of view.
    let settings = RenderSettings {
        frame_budget_ms: 0,
        ..Default::default()
    };
    let mut frame_loop = build_loop(&log, settings);
    let scheduler = frame_loop.driver().frame_scheduler();

    let ran = Arc::new(Mutex::new(Vec::new()));
    for key in ["a", "b", "c"] {
        let ran = Arc::clone(&ran);
        scheduler.schedule_task(key, Box::new(move || ran.lock().unwrap().push(key)));
    }

    // 59 frames: tasks pending, none processed, counter climbing.
    for frame in 1..STARVATION_PURGE_FRAME_COUNT {
        frame_loop.render_frame().unwrap();
        assert!(ran.lock().unwrap().is_empty(), "no budget, nothing may run");
        assert_eq!(scheduler.starved_frame_count(), frame);
    }

    // Frame 60: the purge drains everything, in schedule order, and the
    // counter resets.
    frame_loop.render_frame().unwrap();
    assert_eq!(*ran.lock().unwrap(), vec!["a", "b", "c"]);
    assert_eq!(scheduler.starved_frame_count(), 0);
    assert_eq!(scheduler.pending_task_count(), 0);
}

#[test]
fn test_generous_budget_drains_on_the_next_frame() {
    let log = new_log();
    let mut frame_loop = build_loop(&log, RenderSettings::default());
    let scheduler = frame_loop.driver().frame_scheduler();

    let ran = Arc::new(Mutex::new(Vec::new()));
    let r = Arc::clone(&ran);
    scheduler.schedule_task("upload", Box::new(move || r.lock().unwrap().push("upload")));

    frame_loop.render_frame().unwrap();
    assert_eq!(*ran.lock().unwrap(), vec!["upload"]);
    assert_eq!(scheduler.starved_frame_count(), 0);
}

#[test]
fn test_unenforced_budget_never_starves_a_slow_host() {
    let log = new_log();
    // The emulated-host escape hatch: zero budget, but enforcement off.
    let settings = RenderSettings {
        frame_budget_ms: 0,
        enforce_frame_budget: false,
        ..Default::default()
    };
    let mut frame_loop = build_loop(&log, settings);
    let scheduler = frame_loop.driver().frame_scheduler();

    let ran = Arc::new(Mutex::new(Vec::new()));
    let r = Arc::clone(&ran);
    scheduler.schedule_task("slow-host", Box::new(move || r.lock().unwrap().push("ran")));

    frame_loop.render_frame().unwrap();
    assert_eq!(*ran.lock().unwrap(), vec!["ran"]);
    assert_eq!(scheduler.starved_frame_count(), 0);
}

#[test]
fn test_producer_thread_work_lands_on_the_render_thread_frame() {
    let log = new_log();
    let mut frame_loop = build_loop(&log, RenderSettings::default());
    let scheduler = frame_loop.driver().frame_scheduler();

    let ran = Arc::new(Mutex::new(Vec::new()));
    let handle = {
        let scheduler = Arc::clone(&scheduler);
        let ran = Arc::clone(&ran);
        std::thread::spawn(move || {
            for key in ["t0", "t1", "t2"] {
                let ran = Arc::clone(&ran);
                scheduler.schedule_task(key, Box::new(move || ran.lock().unwrap().push(key)));
            }
        })
    };
    handle.join().unwrap();

    frame_loop.render_frame().unwrap();
    assert_eq!(*ran.lock().unwrap(), vec!["t0", "t1", "t2"]);
}
