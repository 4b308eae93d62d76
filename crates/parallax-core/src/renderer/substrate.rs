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

//! Opaque GPU resource substrates and the descriptors that create them.
//!
//! A substrate is the backend-specific GPU residence of a scene resource.
//! The render loop never constructs GPU objects directly; it hands a
//! descriptor to the active [`Driver`](super::Driver) and holds the
//! resulting substrate as an opaque boxed trait object. Backends downcast
//! through `as_any` to reach their own concrete types.

use std::any::Any;

/// GPU residence of a geometry: vertex and index buffers.
pub trait GeometrySubstrate: Send + Sync {
    /// A human-readable label for logs and captures.
    fn label(&self) -> &str;
    /// Downcast hook for the owning backend.
    fn as_any(&self) -> &dyn Any;
}

/// GPU residence of a material: compiled shader plus uniform storage.
pub trait MaterialSubstrate: Send + Sync {
    /// A human-readable label for logs and captures.
    fn label(&self) -> &str;
    /// Downcast hook for the owning backend.
    fn as_any(&self) -> &dyn Any;
}

/// GPU residence of a texture.
pub trait TextureSubstrate: Send + Sync {
    /// A human-readable label for logs and captures.
    fn label(&self) -> &str;
    /// Downcast hook for the owning backend.
    fn as_any(&self) -> &dyn Any;
}

/// Describes a geometry to be uploaded: interleaved vertices plus indices.
#[derive(Debug, Clone)]
pub struct GeometryDescriptor {
    /// A label carried through to the backend object.
    pub label: Option<String>,
    /// Interleaved vertex bytes.
    pub vertex_data: Vec<u8>,
    /// Size in bytes of one vertex.
    pub vertex_stride: u64,
    /// Triangle-list indices into the vertex data.
    pub indices: Vec<u32>,
}

/// Describes a material: shader source and its uniform block.
#[derive(Debug, Clone)]
pub struct MaterialDescriptor {
    /// A label carried through to the backend object.
    pub label: Option<String>,
    /// WGSL shader source for this material.
    pub shader_source: String,
    /// Initial contents of the material's uniform block.
    pub uniform_data: Vec<u8>,
}

/// The shape of a texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureType {
    /// A standard 2D texture.
    Texture2D,
    /// A six-faced cube map.
    TextureCube,
}

/// Pixel formats the core understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// 8-bit RGBA, linear.
    Rgba8Unorm,
    /// 8-bit RGBA, sRGB-encoded.
    Rgba8UnormSrgb,
}

/// Describes a texture to be uploaded.
#[derive(Debug, Clone)]
pub struct TextureDescriptor {
    /// A label carried through to the backend object.
    pub label: Option<String>,
    /// 2D or cube.
    pub texture_type: TextureType,
    /// Pixel format of the data.
    pub format: TextureFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data, one entry per face: exactly 1 for 2D textures, exactly 6
    /// for cube maps. Drivers reject any other count.
    pub faces: Vec<Vec<u8>>,
}

impl TextureDescriptor {
    /// Number of faces this texture type requires.
    pub fn expected_face_count(&self) -> usize {
        match self.texture_type {
            TextureType::Texture2D => 1,
            TextureType::TextureCube => 6,
        }
    }
}
