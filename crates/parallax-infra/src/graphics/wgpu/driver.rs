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

//! The wgpu implementation of the core driver contract.

use super::convert::{clear_color_to_wgpu, texture_format_to_wgpu};
use super::substrates::{WgpuGeometrySubstrate, WgpuMaterialSubstrate, WgpuTextureSubstrate};
use crate::graphics::headless::{validate_geometry, validate_texture};
use anyhow::{anyhow, Result};
use parallax_core::frame::FrameScheduler;
use parallax_core::pose::Viewport;
use parallax_core::renderer::{
    Driver, DriverBackend, DriverError, GeometryDescriptor, GeometrySubstrate, MaterialDescriptor,
    MaterialSubstrate, RenderContext, TextureDescriptor, TextureSubstrate, TextureType,
};
use std::sync::{Arc, Mutex};
use wgpu::util::DeviceExt;

/// Format of the shared eye render target both eyes draw into.
const EYE_TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// The offscreen target both eyes render into, plus a scratch copy that
/// post passes sample from while writing back into the color target.
struct EyeTarget {
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    scratch: wgpu::Texture,
    scratch_view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// Hardware driver rendering through wgpu.
///
/// Owns the device, the queue, the session's frame scheduler, and the
/// shared eye render target. Command buffers produced during a frame are
/// accumulated and submitted once in `did_render_frame`, keeping queue
/// traffic off the per-eye path.
pub struct WgpuDriver {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_name: String,
    scheduler: Arc<FrameScheduler>,
    sampler: wgpu::Sampler,
    target: Mutex<Option<EyeTarget>>,
    target_size: Mutex<(u32, u32)>,
    pending: Mutex<Vec<wgpu::CommandBuffer>>,
    clear_color: wgpu::Color,
}

impl WgpuDriver {
    /// Brings up a wgpu device with no window surface, rendering into an
    /// offscreen eye target of the given size.
    ///
    /// Head-mounted pipelines composite the eye target through the
    /// platform compositor rather than a swapchain, so no surface is
    /// required here.
    pub fn new(target_width: u32, target_height: u32, clear_color: [f32; 4]) -> Result<Self> {
        log::info!("Initializing WGPU driver (offscreen eye target)...");

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| anyhow!("Failed to find a suitable graphics adapter: {e}"))?;

        let adapter_info = adapter.get_info();
        log::info!(
            "Using graphics adapter: \"{}\" (Backend: {:?})",
            adapter_info.name,
            adapter_info.backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Parallax Logical Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
        }))
        .map_err(|e| anyhow!("Failed to create logical device: {e}"))?;

        device.on_uncaptured_error(Arc::new(|e| {
            log::error!("WGPU Uncaptured Error: {e:?}");
        }));

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Parallax Eye Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            device,
            queue,
            adapter_name: adapter_info.name,
            scheduler: Arc::new(FrameScheduler::new()),
            sampler,
            target: Mutex::new(None),
            target_size: Mutex::new((target_width.max(1), target_height.max(1))),
            pending: Mutex::new(Vec::new()),
            clear_color: clear_color_to_wgpu(clear_color),
        })
    }

    /// The adapter this driver selected at startup.
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    /// Resizes the eye render target. The textures are rebuilt lazily at
    /// the next frame start.
    pub fn resize_target(&self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("WgpuDriver: ignoring resize to zero dimensions: {width}x{height}");
            return;
        }
        *self.target_size.lock().unwrap() = (width, height);
    }

    fn create_target(&self, width: u32, height: u32) -> EyeTarget {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let color = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Parallax Eye Target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: EYE_TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let scratch = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Parallax Eye Scratch"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: EYE_TARGET_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let scratch_view = scratch.create_view(&wgpu::TextureViewDescriptor::default());
        log::info!("WgpuDriver: eye target created at {width}x{height}");
        EyeTarget {
            color,
            color_view,
            scratch,
            scratch_view,
            width,
            height,
        }
    }

    /// Rebuilds the eye target if the requested size changed.
    fn ensure_target(&self) {
        let (width, height) = *self.target_size.lock().unwrap();
        let mut guard = self.target.lock().unwrap();
        let stale = guard
            .as_ref()
            .map(|t| t.width != width || t.height != height)
            .unwrap_or(true);
        if stale {
            *guard = Some(self.create_target(width, height));
        }
    }
}

impl Driver for WgpuDriver {
    fn backend(&self) -> DriverBackend {
        DriverBackend::Wgpu
    }

    fn frame_scheduler(&self) -> Arc<FrameScheduler> {
        Arc::clone(&self.scheduler)
    }

    fn will_render_frame(&self, context: &RenderContext) {
        self.ensure_target();

        // Clear the shared target once; both eyes then draw into their own
        // viewports of it.
        let guard = self.target.lock().unwrap();
        let target = guard.as_ref().expect("target ensured above");
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Parallax Frame Begin"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Parallax Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.pending.lock().unwrap().push(encoder.finish());
        log::trace!("WgpuDriver: frame {} begun", context.frame());
    }

    fn did_render_frame(&self, context: &RenderContext) {
        let buffers: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
        let count = buffers.len();
        self.queue.submit(buffers);
        // Non-blocking poll lets completed work retire without stalling
        // the render thread.
        if let Err(e) = self.device.poll(wgpu::PollType::Poll) {
            log::warn!("WgpuDriver: device poll failed: {e:?}");
        }
        log::trace!(
            "WgpuDriver: frame {} submitted ({count} command buffers)",
            context.frame()
        );
    }

    fn new_geometry_substrate(
        &self,
        descriptor: &GeometryDescriptor,
    ) -> Result<Box<dyn GeometrySubstrate>, DriverError> {
        validate_geometry(descriptor)?;
        let label = descriptor.label.clone().unwrap_or_default();

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: descriptor.label.as_deref(),
                contents: &descriptor.vertex_data,
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: descriptor.label.as_deref(),
                contents: bytemuck::cast_slice(&descriptor.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        log::debug!(
            "WgpuDriver: geometry '{label}' uploaded ({} vertices, {} indices)",
            descriptor.vertex_data.len() as u64 / descriptor.vertex_stride,
            descriptor.indices.len()
        );
        Ok(Box::new(WgpuGeometrySubstrate {
            label,
            vertex_buffer,
            index_buffer,
            index_count: descriptor.indices.len() as u32,
        }))
    }

    fn new_material_substrate(
        &self,
        descriptor: &MaterialDescriptor,
    ) -> Result<Box<dyn MaterialSubstrate>, DriverError> {
        let label = descriptor.label.clone().unwrap_or_default();

        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: descriptor.label.as_deref(),
                source: wgpu::ShaderSource::Wgsl(descriptor.shader_source.as_str().into()),
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: descriptor.label.as_deref(),
                // Derived from the shader's own binding declarations.
                layout: None,
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: EYE_TARGET_FORMAT,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        let uniform_buffer = if descriptor.uniform_data.is_empty() {
            None
        } else {
            Some(
                self.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: descriptor.label.as_deref(),
                        contents: &descriptor.uniform_data,
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    }),
            )
        };

        log::debug!("WgpuDriver: material '{label}' compiled");
        Ok(Box::new(WgpuMaterialSubstrate {
            label,
            shader,
            pipeline,
            uniform_buffer,
        }))
    }

    fn new_texture_substrate(
        &self,
        descriptor: &TextureDescriptor,
    ) -> Result<Box<dyn TextureSubstrate>, DriverError> {
        validate_texture(descriptor)?;
        let label = descriptor.label.clone().unwrap_or_default();
        let layers = descriptor.faces.len() as u32;

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: descriptor.label.as_deref(),
            size: wgpu::Extent3d {
                width: descriptor.width,
                height: descriptor.height,
                depth_or_array_layers: layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format_to_wgpu(descriptor.format),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, face) in descriptor.faces.iter().enumerate() {
            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: layer as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                face,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * descriptor.width),
                    rows_per_image: Some(descriptor.height),
                },
                wgpu::Extent3d {
                    width: descriptor.width,
                    height: descriptor.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view_dimension = match descriptor.texture_type {
            TextureType::Texture2D => wgpu::TextureViewDimension::D2,
            TextureType::TextureCube => wgpu::TextureViewDimension::Cube,
        };
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: descriptor.label.as_deref(),
            dimension: Some(view_dimension),
            ..Default::default()
        });

        log::debug!("WgpuDriver: texture '{label}' uploaded ({layers} layers)");
        Ok(Box::new(WgpuTextureSubstrate {
            label,
            texture,
            view,
        }))
    }

    fn run_post_process(
        &self,
        material: &dyn MaterialSubstrate,
        viewport: Viewport,
    ) -> Result<(), DriverError> {
        let material = material
            .as_any()
            .downcast_ref::<WgpuMaterialSubstrate>()
            .ok_or_else(|| {
                DriverError::InvalidDescriptor(
                    "material substrate does not belong to the wgpu backend".to_string(),
                )
            })?;

        let guard = self.target.lock().unwrap();
        let target = guard.as_ref().ok_or_else(|| {
            DriverError::BackendError("post-process pass outside an open frame".to_string())
        })?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Parallax Post Process"),
            });

        // The pass samples the frame rendered so far; it cannot read the
        // texture it writes, so snapshot the color target first.
        encoder.copy_texture_to_texture(
            target.color.as_image_copy(),
            target.scratch.as_image_copy(),
            wgpu::Extent3d {
                width: target.width,
                height: target.height,
                depth_or_array_layers: 1,
            },
        );

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Parallax Post Bind Group"),
            layout: &material.pipeline.get_bind_group_layout(0),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&target.scratch_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Parallax Post Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_pipeline(&material.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.set_viewport(
                viewport.x.max(0) as f32,
                viewport.y.max(0) as f32,
                viewport.width as f32,
                viewport.height as f32,
                0.0,
                1.0,
            );
            pass.set_scissor_rect(
                viewport.x.max(0) as u32,
                viewport.y.max(0) as u32,
                viewport.width,
                viewport.height,
            );
            // Fullscreen triangle generated in the vertex shader.
            pass.draw(0..3, 0..1);
        }

        self.pending.lock().unwrap().push(encoder.finish());
        log::trace!(
            "WgpuDriver: post pass '{}' over {:?}",
            material.label,
            viewport
        );
        Ok(())
    }
}

impl std::fmt::Debug for WgpuDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuDriver")
            .field("adapter", &self.adapter_name)
            .field("target_size", &*self.target_size.lock().unwrap())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Exercised only where an adapter exists; CI boxes without a GPU (or
    // lavapipe) skip the body.
    #[test]
    fn driver_initializes_when_an_adapter_exists() {
        match WgpuDriver::new(64, 64, [0.0, 0.0, 0.0, 1.0]) {
            Ok(driver) => {
                assert_eq!(driver.backend(), DriverBackend::Wgpu);
                assert_eq!(driver.frame_scheduler().pending_task_count(), 0);
            }
            Err(e) => {
                eprintln!("skipping wgpu driver test, no adapter: {e}");
            }
        }
    }
}
