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

// Parallax Sandbox
// Headless demo: drives the stereo frame loop with a spinning head pose,
// a deferred-upload triangle scene, and an animated scene swap.

use std::mem;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use parallax_core::math::{Mat4, Vec3};
use parallax_core::pose::{Eye, EyeCalibration};
use parallax_core::renderer::{
    Driver, GeometryDescriptor, GeometrySubstrate, RenderContext, RenderDelegate, RenderSettings,
};
use parallax_core::scene::Scene;
use parallax_core::telemetry::{FrameStats, ScopedFrameTimer};
use parallax_infra::{HeadlessDriver, SampledHeadPose, WgpuDriver};
use parallax_render::{FrameLoop, InputEvent, SceneController, StereoRenderer};

const DEMO_FRAMES: u64 = 240;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
}

const TRIANGLE: &[Vertex] = &[
    Vertex {
        position: [0.0, 0.5, -2.0],
        color: [1.0, 0.2, 0.2],
    },
    Vertex {
        position: [-0.5, -0.5, -2.0],
        color: [0.2, 1.0, 0.2],
    },
    Vertex {
        position: [0.5, -0.5, -2.0],
        color: [0.2, 0.2, 1.0],
    },
];

/// A scene holding one triangle whose upload is deferred onto the frame
/// scheduler: the first frames render nothing while the substrate builds
/// in leftover frame time.
struct TriangleScene {
    name: &'static str,
    driver: Arc<dyn Driver>,
    geometry: Arc<Mutex<Option<Box<dyn GeometrySubstrate>>>>,
    opacity: f32,
}

impl TriangleScene {
    fn new(name: &'static str, driver: Arc<dyn Driver>) -> Self {
        Self {
            name,
            driver,
            geometry: Arc::new(Mutex::new(None)),
            opacity: 1.0,
        }
    }

    fn upload_key(&self) -> String {
        format!("sandbox/{}/triangle", self.name)
    }
}

impl Scene for TriangleScene {
    fn will_render(&mut self, _context: &RenderContext) {
        if self.geometry.lock().unwrap().is_some() {
            return;
        }
        let scheduler = self.driver.frame_scheduler();
        let key = self.upload_key();
        if scheduler.is_task_queued(&key) {
            return;
        }
        let driver = Arc::clone(&self.driver);
        let slot = Arc::clone(&self.geometry);
        let label = self.name;
        scheduler.schedule_task(
            &key,
            Box::new(move || {
                let descriptor = GeometryDescriptor {
                    label: Some(format!("{label}-triangle")),
                    vertex_data: bytemuck::cast_slice(TRIANGLE).to_vec(),
                    vertex_stride: mem::size_of::<Vertex>() as u64,
                    indices: vec![0, 1, 2],
                };
                match driver.new_geometry_substrate(&descriptor) {
                    Ok(geometry) => *slot.lock().unwrap() = Some(geometry),
                    Err(e) => log::error!("sandbox: triangle upload failed: {e}"),
                }
            }),
        );
    }

    fn render_background(&mut self, _context: &RenderContext, _driver: &dyn Driver) {}

    fn render(&mut self, context: &RenderContext, _driver: &dyn Driver) {
        if let Some(geometry) = self.geometry.lock().unwrap().as_ref() {
            log::trace!(
                "sandbox: scene '{}' drawing '{}' for {:?} at opacity {:.2}",
                self.name,
                geometry.label(),
                context.eye(),
                self.opacity
            );
        }
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }
}

/// Logs the renderer lifecycle as it happens.
struct LoggingDelegate;

impl RenderDelegate for LoggingDelegate {
    fn setup_renderer(&mut self, driver: &dyn Driver) {
        log::info!("delegate: renderer set up on {:?}", driver.backend());
    }

    fn shutdown_renderer(&mut self) {
        log::info!("delegate: renderer shut down");
    }

    fn will_render_eye(&mut self, eye: Eye, context: &RenderContext) {
        log::trace!("delegate: eye {eye:?} frame {}", context.frame());
    }

    fn reticle_tapped(&mut self, ray: Vec3, _context: &RenderContext) {
        log::info!(
            "delegate: reticle tapped along ({:.2}, {:.2}, {:.2})",
            ray.x,
            ray.y,
            ray.z
        );
    }

    fn user_did_request_exit_vr(&mut self) {
        log::info!("delegate: exit requested");
    }
}

fn select_driver() -> Arc<dyn Driver> {
    match WgpuDriver::new(2048, 1024, [0.01, 0.02, 0.03, 1.0]) {
        Ok(driver) => {
            log::info!("sandbox: using wgpu adapter '{}'", driver.adapter_name());
            Arc::new(driver)
        }
        Err(e) => {
            log::warn!("sandbox: no GPU available ({e}), falling back to headless driver");
            Arc::new(HeadlessDriver::new())
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("sandbox: starting {DEMO_FRAMES}-frame headless run");

    let driver = select_driver();
    let pose = Arc::new(SampledHeadPose::new());

    // Sensor thread: publishes a slowly spinning head pose faster than the
    // frame loop consumes it.
    let sensor = {
        let pose = Arc::clone(&pose);
        thread::spawn(move || {
            for i in 0..(DEMO_FRAMES * 2) {
                let yaw = i as f32 * 0.01;
                pose.publish(Mat4::from_rotation_y(yaw));
                thread::sleep(Duration::from_millis(2));
            }
        })
    };

    let settings = RenderSettings {
        enable_vignette: true,
        ..Default::default()
    };
    let mut renderer = StereoRenderer::new(settings);
    renderer.set_delegate(Box::new(LoggingDelegate));

    let mut frame_loop = FrameLoop::new(
        renderer,
        Arc::clone(&driver),
        pose,
        EyeCalibration::default(),
    );

    let first = TriangleScene::new("first", Arc::clone(&driver));
    frame_loop
        .renderer_mut()
        .set_scene_controller(SceneController::new(Box::new(first)), driver.as_ref());

    let events = frame_loop.event_sender();
    let mut demo_stats = FrameStats::new();

    for frame in 0..DEMO_FRAMES {
        let _timer = ScopedFrameTimer::new(&mut demo_stats);

        // Mid-run: tap the reticle, then cross-fade to a second scene.
        if frame == 60 {
            events.send(InputEvent::ReticleTriggered).ok();
        }
        if frame == 120 {
            let second = TriangleScene::new("second", Arc::clone(&driver));
            let now = frame_loop.now_seconds();
            let driver_ref = Arc::clone(&driver);
            frame_loop
                .renderer_mut()
                .set_scene_controller_animated(
                    SceneController::new(Box::new(second)),
                    now,
                    driver_ref.as_ref(),
                )?;
            log::info!("sandbox: animated scene swap started");
        }

        frame_loop.render_frame()?;
    }

    sensor.join().expect("sensor thread panicked");
    frame_loop.shutdown();

    let stats = frame_loop.stats();
    log::info!(
        "sandbox: rendered {} frames, avg {:.3} ms ({:.0} fps), {} starved",
        stats.frame_number,
        stats.average_frame_ms,
        stats.fps(),
        stats.starved_frames
    );
    log::info!(
        "sandbox: demo loop avg {:.3} ms across {} iterations",
        demo_stats.average_frame_ms,
        demo_stats.frame_number
    );
    Ok(())
}
