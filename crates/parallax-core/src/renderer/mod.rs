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

//! Renderer contracts: the driver substrate factory, the render delegate
//! callback surface, and the per-frame render context they share.

pub mod context;
pub mod error;
pub mod settings;
pub mod substrate;
pub mod traits;

pub use self::context::RenderContext;
pub use self::error::{DriverError, RenderError};
pub use self::settings::{RenderSettings, StereoMode};
pub use self::substrate::{
    GeometryDescriptor, GeometrySubstrate, MaterialDescriptor, MaterialSubstrate,
    TextureDescriptor, TextureFormat, TextureSubstrate, TextureType,
};
pub use self::traits::{Driver, DriverBackend, RenderDelegate};
