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

//! Per-eye post-process passes.
//!
//! Post effects render as fullscreen passes over an eye's viewport after
//! its scene traversal. Their materials are compiled through the driver,
//! but never on the eye-render path: the build is queued on the frame
//! scheduler under a stable key, so shader compilation competes with other
//! background work for leftover frame time instead of stalling an eye.

use parallax_core::frame::FrameScheduler;
use parallax_core::pose::Viewport;
use parallax_core::renderer::{Driver, MaterialDescriptor, MaterialSubstrate};
use std::sync::{Arc, Mutex};

const VIGNETTE_SHADER: &str = r#"
@group(0) @binding(0) var eye_color: texture_2d<f32>;
@group(0) @binding(1) var eye_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    var out: VertexOutput;
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(eye_color, eye_sampler, in.uv);
    let d = distance(in.uv, vec2<f32>(0.5, 0.5));
    let falloff = smoothstep(0.35, 0.75, d);
    return vec4<f32>(color.rgb * (1.0 - 0.6 * falloff), color.a);
}
"#;

const CHROMATIC_ABERRATION_SHADER: &str = r#"
@group(0) @binding(0) var eye_color: texture_2d<f32>;
@group(0) @binding(1) var eye_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    var out: VertexOutput;
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = uv;
    return out;
}

// Counter-shifts red and blue against the lens dispersion of the HMD optics.
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let center = vec2<f32>(0.5, 0.5);
    let offset = (in.uv - center) * 0.006;
    let r = textureSample(eye_color, eye_sampler, in.uv - offset).r;
    let g = textureSample(eye_color, eye_sampler, in.uv).g;
    let b = textureSample(eye_color, eye_sampler, in.uv + offset).b;
    let a = textureSample(eye_color, eye_sampler, in.uv).a;
    return vec4<f32>(r, g, b, a);
}
"#;

/// A built-in post-process pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostEffect {
    /// Darkens the viewport edges.
    Vignette,
    /// Counter-shifts color channels against lens dispersion.
    ChromaticAberrationCorrection,
}

impl PostEffect {
    /// The scheduler deduplication key for this effect's material build.
    fn scheduler_key(&self) -> &'static str {
        match self {
            PostEffect::Vignette => "post/vignette",
            PostEffect::ChromaticAberrationCorrection => "post/chromatic-aberration",
        }
    }

    fn shader_source(&self) -> &'static str {
        match self {
            PostEffect::Vignette => VIGNETTE_SHADER,
            PostEffect::ChromaticAberrationCorrection => CHROMATIC_ABERRATION_SHADER,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PostEffect::Vignette => "Vignette",
            PostEffect::ChromaticAberrationCorrection => "ChromaticAberrationCorrection",
        }
    }
}

type MaterialSlot = Arc<Mutex<Option<Box<dyn MaterialSubstrate>>>>;

/// The ordered set of enabled post effects and their lazily built
/// materials.
pub struct PostProcessStack {
    passes: Vec<(PostEffect, MaterialSlot)>,
}

impl PostProcessStack {
    /// Creates a stack running the given effects, in order.
    pub fn new(effects: &[PostEffect]) -> Self {
        Self {
            passes: effects
                .iter()
                .map(|&effect| (effect, Arc::new(Mutex::new(None))))
                .collect(),
        }
    }

    /// An empty stack.
    pub fn empty() -> Self {
        Self { passes: Vec::new() }
    }

    /// `true` once every enabled effect's material is resident.
    pub fn is_resident(&self) -> bool {
        self.passes
            .iter()
            .all(|(_, slot)| slot.lock().unwrap().is_some())
    }

    /// Queues material builds for any effect not yet resident.
    ///
    /// Safe to call every frame: builds already queued or completed are
    /// skipped (the scheduler coalesces by key). The build itself runs when
    /// the scheduler grants it frame time.
    pub fn prepare(&self, driver: &Arc<dyn Driver>, scheduler: &FrameScheduler) {
        for (effect, slot) in &self.passes {
            if slot.lock().unwrap().is_some() || scheduler.is_task_queued(effect.scheduler_key()) {
                continue;
            }
            let effect = *effect;
            let driver = Arc::clone(driver);
            let slot = Arc::clone(slot);
            scheduler.schedule_task(
                effect.scheduler_key(),
                Box::new(move || {
                    let descriptor = MaterialDescriptor {
                        label: Some(effect.label().to_string()),
                        shader_source: effect.shader_source().to_string(),
                        uniform_data: Vec::new(),
                    };
                    match driver.new_material_substrate(&descriptor) {
                        Ok(material) => {
                            *slot.lock().unwrap() = Some(material);
                            log::debug!("PostProcessStack: built material for {effect:?}");
                        }
                        Err(e) => {
                            log::error!("PostProcessStack: failed to build {effect:?}: {e}");
                        }
                    }
                }),
            );
        }
    }

    /// Runs every resident pass over the given eye viewport. Passes whose
    /// material is still building are skipped this frame.
    pub fn apply(&self, viewport: Viewport, driver: &dyn Driver) {
        for (effect, slot) in &self.passes {
            let guard = slot.lock().unwrap();
            if let Some(material) = guard.as_ref() {
                if let Err(e) = driver.run_post_process(material.as_ref(), viewport) {
                    log::error!("PostProcessStack: {effect:?} pass failed: {e}");
                }
            }
        }
    }

    /// Number of configured passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// `true` if no effects are configured.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl std::fmt::Debug for PostProcessStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostProcessStack")
            .field("passes", &self.passes.iter().map(|(e, _)| e).collect::<Vec<_>>())
            .field("resident", &self.is_resident())
            .finish()
    }
}
