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

//! Shared scripted doubles for the frame-pipeline integration tests.
//!
//! Every double appends a tagged entry to a shared call log, so tests can
//! assert the exact cross-component ordering of one frame.

#![allow(dead_code)]

use parallax_core::frame::FrameScheduler;
use parallax_core::math::Vec3;
use parallax_core::pose::{Eye, HeadPoseProvider, HeadTransform, Viewport};
use parallax_core::renderer::{
    Driver, DriverBackend, DriverError, GeometryDescriptor, GeometrySubstrate, MaterialDescriptor,
    MaterialSubstrate, RenderContext, RenderDelegate, TextureDescriptor, TextureSubstrate,
};
use parallax_core::scene::Scene;
use std::any::Any;
use std::sync::{Arc, Mutex};

/// Shared, thread-safe call log.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Creates an empty call log.
pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Appends an entry to the log.
pub fn record(log: &CallLog, entry: impl Into<String>) {
    log.lock().unwrap().push(entry.into());
}

/// Snapshot of the log contents.
pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Position of `entry` in the log; panics if absent.
pub fn index_of(log: &CallLog, entry: &str) -> usize {
    entries(log)
        .iter()
        .position(|e| e == entry)
        .unwrap_or_else(|| panic!("log entry '{entry}' not found in {:?}", entries(log)))
}

// --- Driver double ---

struct StubMaterial {
    label: String,
}

impl MaterialSubstrate for StubMaterial {
    fn label(&self) -> &str {
        &self.label
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct StubGeometry {
    label: String,
}

impl GeometrySubstrate for StubGeometry {
    fn label(&self) -> &str {
        &self.label
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct StubTexture {
    label: String,
}

impl TextureSubstrate for StubTexture {
    fn label(&self) -> &str {
        &self.label
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A driver that records frame bracketing and substrate factory calls.
pub struct RecordingDriver {
    scheduler: Arc<FrameScheduler>,
    log: CallLog,
}

impl RecordingDriver {
    pub fn new(log: CallLog) -> Self {
        Self {
            scheduler: Arc::new(FrameScheduler::new()),
            log,
        }
    }

    pub fn into_arc(self) -> Arc<dyn Driver> {
        Arc::new(self)
    }
}

impl Driver for RecordingDriver {
    fn backend(&self) -> DriverBackend {
        DriverBackend::Headless
    }

    fn frame_scheduler(&self) -> Arc<FrameScheduler> {
        Arc::clone(&self.scheduler)
    }

    fn will_render_frame(&self, context: &RenderContext) {
        record(&self.log, format!("driver.will_render_frame:{}", context.frame()));
    }

    fn did_render_frame(&self, context: &RenderContext) {
        record(&self.log, format!("driver.did_render_frame:{}", context.frame()));
    }

    fn new_geometry_substrate(
        &self,
        descriptor: &GeometryDescriptor,
    ) -> Result<Box<dyn GeometrySubstrate>, DriverError> {
        let label = descriptor.label.clone().unwrap_or_default();
        record(&self.log, format!("driver.new_geometry:{label}"));
        Ok(Box::new(StubGeometry { label }))
    }

    fn new_material_substrate(
        &self,
        descriptor: &MaterialDescriptor,
    ) -> Result<Box<dyn MaterialSubstrate>, DriverError> {
        let label = descriptor.label.clone().unwrap_or_default();
        record(&self.log, format!("driver.new_material:{label}"));
        Ok(Box::new(StubMaterial { label }))
    }

    fn new_texture_substrate(
        &self,
        descriptor: &TextureDescriptor,
    ) -> Result<Box<dyn TextureSubstrate>, DriverError> {
        let label = descriptor.label.clone().unwrap_or_default();
        record(&self.log, format!("driver.new_texture:{label}"));
        Ok(Box::new(StubTexture { label }))
    }

    fn run_post_process(
        &self,
        material: &dyn MaterialSubstrate,
        _viewport: Viewport,
    ) -> Result<(), DriverError> {
        record(&self.log, format!("driver.post_process:{}", material.label()));
        Ok(())
    }
}

// --- Delegate double ---

/// A render delegate that records every callback. Optionally panics inside
/// `will_render_eye` to simulate a failing platform layer.
pub struct RecordingDelegate {
    log: CallLog,
    pub panic_on_eye: Option<Eye>,
}

impl RecordingDelegate {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            panic_on_eye: None,
        }
    }
}

impl RenderDelegate for RecordingDelegate {
    fn setup_renderer(&mut self, _driver: &dyn Driver) {
        record(&self.log, "delegate.setup_renderer");
    }

    fn shutdown_renderer(&mut self) {
        record(&self.log, "delegate.shutdown_renderer");
    }

    fn render_view_did_change_size(&mut self, width: u32, height: u32, _context: &RenderContext) {
        record(&self.log, format!("delegate.size_changed:{width}x{height}"));
    }

    fn will_render_eye(&mut self, eye: Eye, _context: &RenderContext) {
        if self.panic_on_eye == Some(eye) {
            panic!("scripted panic in will_render_eye({eye:?})");
        }
        record(&self.log, format!("delegate.will_render_eye:{eye:?}"));
    }

    fn did_render_eye(&mut self, eye: Eye, _context: &RenderContext) {
        record(&self.log, format!("delegate.did_render_eye:{eye:?}"));
    }

    fn reticle_tapped(&mut self, ray: Vec3, _context: &RenderContext) {
        record(
            &self.log,
            format!("delegate.reticle_tapped:{:.2},{:.2},{:.2}", ray.x, ray.y, ray.z),
        );
    }

    fn user_did_request_exit_vr(&mut self) {
        record(&self.log, "delegate.exit_requested");
    }
}

// --- Scene double ---

/// A scene that records traversal calls and mirrors its opacity into a
/// shared cell so tests can observe transitions from outside.
pub struct RecordingScene {
    name: &'static str,
    log: CallLog,
    opacity: f32,
    opacity_mirror: Arc<Mutex<f32>>,
}

impl RecordingScene {
    pub fn new(name: &'static str, log: CallLog) -> (Self, Arc<Mutex<f32>>) {
        let mirror = Arc::new(Mutex::new(1.0));
        (
            Self {
                name,
                log,
                opacity: 1.0,
                opacity_mirror: Arc::clone(&mirror),
            },
            mirror,
        )
    }
}

impl Scene for RecordingScene {
    fn will_render(&mut self, context: &RenderContext) {
        record(
            &self.log,
            format!("scene[{}].will_render:{}", self.name, context.frame()),
        );
    }

    fn render_background(&mut self, context: &RenderContext, _driver: &dyn Driver) {
        record(
            &self.log,
            format!("scene[{}].render_background:{:?}", self.name, context.eye()),
        );
    }

    fn render(&mut self, context: &RenderContext, _driver: &dyn Driver) {
        record(
            &self.log,
            format!("scene[{}].render:{:?}", self.name, context.eye()),
        );
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        *self.opacity_mirror.lock().unwrap() = opacity;
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }
}

// --- Pose double ---

/// A pose provider returning a fixed snapshot.
pub struct FixedPose {
    head: HeadTransform,
}

impl FixedPose {
    pub fn identity() -> Arc<Self> {
        Arc::new(Self {
            head: HeadTransform::identity(),
        })
    }

    pub fn with(head: HeadTransform) -> Arc<Self> {
        Arc::new(Self { head })
    }
}

impl HeadPoseProvider for FixedPose {
    fn head_transform(&self) -> HeadTransform {
        self.head
    }
}
