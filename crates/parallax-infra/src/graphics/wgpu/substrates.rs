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

//! Concrete wgpu residences of the core's opaque substrates.

use parallax_core::renderer::{GeometrySubstrate, MaterialSubstrate, TextureSubstrate};
use std::any::Any;

/// Vertex and index buffers uploaded for one geometry.
pub struct WgpuGeometrySubstrate {
    pub(crate) label: String,
    /// The interleaved vertex buffer.
    pub vertex_buffer: wgpu::Buffer,
    /// The triangle-list index buffer.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices in `index_buffer`.
    pub index_count: u32,
}

impl GeometrySubstrate for WgpuGeometrySubstrate {
    fn label(&self) -> &str {
        &self.label
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A compiled shader and the fullscreen pipeline built from it.
pub struct WgpuMaterialSubstrate {
    pub(crate) label: String,
    /// The compiled shader module.
    pub shader: wgpu::ShaderModule,
    /// Pipeline drawing a fullscreen triangle with this material.
    ///
    /// The pipeline layout is derived from the shader; post-process
    /// materials bind the eye color at `@group(0) @binding(0)` and its
    /// sampler at `@binding(1)`.
    pub pipeline: wgpu::RenderPipeline,
    /// The material's uniform block, when it declared one.
    pub uniform_buffer: Option<wgpu::Buffer>,
}

impl MaterialSubstrate for WgpuMaterialSubstrate {
    fn label(&self) -> &str {
        &self.label
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A texture uploaded to the GPU with its default view.
pub struct WgpuTextureSubstrate {
    pub(crate) label: String,
    /// The backing texture (one layer for 2D, six for cube maps).
    pub texture: wgpu::Texture,
    /// A view matching the texture's type.
    pub view: wgpu::TextureView,
}

impl TextureSubstrate for WgpuTextureSubstrate {
    fn label(&self) -> &str {
        &self.label
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}
