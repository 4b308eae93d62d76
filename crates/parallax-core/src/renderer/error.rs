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

//! Defines the hierarchy of error types for the rendering core.

use crate::renderer::substrate::TextureType;
use crate::scene::TransitionError;
use std::fmt;

/// An error raised at the driver boundary while creating or using backend
/// resources. Driver setup failures are fatal for the render session; the
/// core does not attempt recovery.
#[derive(Debug)]
pub enum DriverError {
    /// The graphics backend could not be brought up.
    InitializationFailed(String),
    /// The requested texture layout is not supported by the backend.
    UnsupportedTexture {
        /// The texture type that was requested.
        texture_type: TextureType,
        /// What the driver objected to.
        reason: String,
    },
    /// A descriptor failed validation before reaching the backend.
    InvalidDescriptor(String),
    /// An error originating from the specific graphics backend.
    BackendError(String),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize graphics backend: {msg}")
            }
            DriverError::UnsupportedTexture {
                texture_type,
                reason,
            } => {
                write!(f, "Unsupported texture {texture_type:?}: {reason}")
            }
            DriverError::InvalidDescriptor(msg) => {
                write!(f, "Invalid resource descriptor: {msg}")
            }
            DriverError::BackendError(msg) => {
                write!(f, "Backend-specific driver error: {msg}")
            }
        }
    }
}

impl std::error::Error for DriverError {}

/// A high-level error raised by the frame loop or stereo renderer.
#[derive(Debug)]
pub enum RenderError {
    /// An operation was attempted before the renderer was set up.
    NotInitialized,
    /// A new frame was started while the previous frame was still open.
    /// Frames are strictly sequential on the render thread.
    FrameInProgress,
    /// A scene transition could not be started.
    Transition(TransitionError),
    /// An error occurred at the driver boundary.
    Driver(DriverError),
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotInitialized => {
                write!(f, "The renderer is not initialized.")
            }
            RenderError::FrameInProgress => {
                write!(
                    f,
                    "A frame is already in progress; frames are strictly sequential."
                )
            }
            RenderError::Transition(err) => {
                write!(f, "Scene transition failed: {err}")
            }
            RenderError::Driver(err) => {
                write!(f, "Driver operation failed: {err}")
            }
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Driver(err) => Some(err),
            RenderError::Transition(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DriverError> for RenderError {
    fn from(err: DriverError) -> Self {
        RenderError::Driver(err)
    }
}

impl From<TransitionError> for RenderError {
    fn from(err: TransitionError) -> Self {
        RenderError::Transition(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn driver_error_display() {
        let err = DriverError::UnsupportedTexture {
            texture_type: TextureType::TextureCube,
            reason: "expected 6 faces, got 2".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Unsupported texture TextureCube: expected 6 faces, got 2"
        );
    }

    #[test]
    fn render_error_display_wrapping_driver_error() {
        let driver_err = DriverError::InitializationFailed("no adapter found".to_string());
        let render_err: RenderError = driver_err.into();
        assert_eq!(
            format!("{render_err}"),
            "Driver operation failed: Failed to initialize graphics backend: no adapter found"
        );
        assert!(render_err.source().is_some());
    }

    #[test]
    fn frame_in_progress_display() {
        assert_eq!(
            format!("{}", RenderError::FrameInProgress),
            "A frame is already in progress; frames are strictly sequential."
        );
    }
}
