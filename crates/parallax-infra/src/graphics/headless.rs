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

//! A driver with no GPU behind it.
//!
//! Validates descriptors exactly like a hardware backend and hands back
//! inert substrates, so the frame loop, scheduler, and demos can run on
//! machines without a graphics stack. A headless host has no real frame
//! budget, so the driver's scheduler defaults to unenforced draining.

use parallax_core::frame::FrameScheduler;
use parallax_core::pose::Viewport;
use parallax_core::renderer::{
    Driver, DriverBackend, DriverError, GeometryDescriptor, GeometrySubstrate, MaterialDescriptor,
    MaterialSubstrate, RenderContext, TextureDescriptor, TextureSubstrate,
};
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct HeadlessGeometry {
    label: String,
}

impl GeometrySubstrate for HeadlessGeometry {
    fn label(&self) -> &str {
        &self.label
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct HeadlessMaterial {
    label: String,
}

impl MaterialSubstrate for HeadlessMaterial {
    fn label(&self) -> &str {
        &self.label
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct HeadlessTexture {
    label: String,
}

impl TextureSubstrate for HeadlessTexture {
    fn label(&self) -> &str {
        &self.label
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Validates descriptors against the same rules as the wgpu backend.
/// Shared so both drivers fail identically on malformed input.
pub(crate) fn validate_geometry(descriptor: &GeometryDescriptor) -> Result<(), DriverError> {
    if descriptor.vertex_stride == 0 {
        return Err(DriverError::InvalidDescriptor(
            "vertex stride must be nonzero".to_string(),
        ));
    }
    if descriptor.vertex_data.len() as u64 % descriptor.vertex_stride != 0 {
        return Err(DriverError::InvalidDescriptor(format!(
            "vertex data ({} bytes) is not a multiple of the stride ({})",
            descriptor.vertex_data.len(),
            descriptor.vertex_stride
        )));
    }
    let vertex_count = descriptor.vertex_data.len() as u64 / descriptor.vertex_stride;
    if let Some(&index) = descriptor.indices.iter().find(|&&i| i as u64 >= vertex_count) {
        return Err(DriverError::InvalidDescriptor(format!(
            "index {index} out of range for {vertex_count} vertices"
        )));
    }
    Ok(())
}

/// See [`validate_geometry`].
pub(crate) fn validate_texture(descriptor: &TextureDescriptor) -> Result<(), DriverError> {
    let expected = descriptor.expected_face_count();
    if descriptor.faces.len() != expected {
        return Err(DriverError::UnsupportedTexture {
            texture_type: descriptor.texture_type,
            reason: format!("expected {expected} faces, got {}", descriptor.faces.len()),
        });
    }
    let face_bytes = descriptor.width as usize * descriptor.height as usize * 4;
    for (i, face) in descriptor.faces.iter().enumerate() {
        if face.len() != face_bytes {
            return Err(DriverError::InvalidDescriptor(format!(
                "face {i} has {} bytes, expected {face_bytes}",
                face.len()
            )));
        }
    }
    Ok(())
}

/// The no-GPU driver.
pub struct HeadlessDriver {
    scheduler: Arc<FrameScheduler>,
    frames_begun: AtomicU64,
    frames_presented: AtomicU64,
    substrates_created: AtomicU64,
}

impl HeadlessDriver {
    /// Creates a headless driver with budget enforcement off.
    pub fn new() -> Self {
        let scheduler = Arc::new(FrameScheduler::new());
        // There is no GPU pacing a headless host; an enforced budget would
        // only ever drain through starvation purges.
        scheduler.set_budget_enforced(false);
        log::info!("HeadlessDriver: initialized (no GPU)");
        Self {
            scheduler,
            frames_begun: AtomicU64::new(0),
            frames_presented: AtomicU64::new(0),
            substrates_created: AtomicU64::new(0),
        }
    }

    /// Frames that reached `will_render_frame`.
    pub fn frames_begun(&self) -> u64 {
        self.frames_begun.load(Ordering::Relaxed)
    }

    /// Frames that reached `did_render_frame`.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented.load(Ordering::Relaxed)
    }

    /// Total substrates created through the factories.
    pub fn substrates_created(&self) -> u64 {
        self.substrates_created.load(Ordering::Relaxed)
    }
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for HeadlessDriver {
    fn backend(&self) -> DriverBackend {
        DriverBackend::Headless
    }

    fn frame_scheduler(&self) -> Arc<FrameScheduler> {
        Arc::clone(&self.scheduler)
    }

    fn will_render_frame(&self, context: &RenderContext) {
        self.frames_begun.fetch_add(1, Ordering::Relaxed);
        log::trace!("HeadlessDriver: frame {} begun", context.frame());
    }

    fn did_render_frame(&self, context: &RenderContext) {
        self.frames_presented.fetch_add(1, Ordering::Relaxed);
        log::trace!("HeadlessDriver: frame {} presented", context.frame());
    }

    fn new_geometry_substrate(
        &self,
        descriptor: &GeometryDescriptor,
    ) -> Result<Box<dyn GeometrySubstrate>, DriverError> {
        validate_geometry(descriptor)?;
        self.substrates_created.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(HeadlessGeometry {
            label: descriptor.label.clone().unwrap_or_default(),
        }))
    }

    fn new_material_substrate(
        &self,
        descriptor: &MaterialDescriptor,
    ) -> Result<Box<dyn MaterialSubstrate>, DriverError> {
        self.substrates_created.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(HeadlessMaterial {
            label: descriptor.label.clone().unwrap_or_default(),
        }))
    }

    fn new_texture_substrate(
        &self,
        descriptor: &TextureDescriptor,
    ) -> Result<Box<dyn TextureSubstrate>, DriverError> {
        validate_texture(descriptor)?;
        self.substrates_created.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(HeadlessTexture {
            label: descriptor.label.clone().unwrap_or_default(),
        }))
    }

    fn run_post_process(
        &self,
        material: &dyn MaterialSubstrate,
        _viewport: Viewport,
    ) -> Result<(), DriverError> {
        log::trace!("HeadlessDriver: post-process pass '{}'", material.label());
        Ok(())
    }
}
