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

//! Global settings for the render session.

use serde::{Deserialize, Serialize};

/// Whether the session renders a stereo pair or a single centered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StereoMode {
    /// Left and right eyes, rendered in fixed order.
    Stereo,
    /// A single monocular viewpoint.
    Monocular,
}

/// A collection of global settings that can affect the render session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Stereo or monocular rendering.
    pub stereo_mode: StereoMode,
    /// Distance to the near clip plane in meters.
    pub z_near: f32,
    /// Distance to the far clip plane in meters.
    pub z_far: f32,
    /// Per-frame time budget in milliseconds for the frame scheduler.
    pub frame_budget_ms: u64,
    /// If `false`, the scheduler drains without budget checks. Software and
    /// emulated hosts never have budget left, so enforcement would starve
    /// them permanently.
    pub enforce_frame_budget: bool,
    /// Enables the vignette post effect.
    pub enable_vignette: bool,
    /// Enables chromatic-aberration correction.
    pub enable_chromatic_aberration: bool,
    /// RGBA clear color for the eye target.
    pub clear_color: [f32; 4],
}

impl RenderSettings {
    /// Parses settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes settings to a pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            stereo_mode: StereoMode::Stereo,
            z_near: 0.1,
            z_far: 100.0,
            frame_budget_ms: 16,
            enforce_frame_budget: true,
            enable_vignette: false,
            enable_chromatic_aberration: false,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_json() {
        let settings = RenderSettings {
            stereo_mode: StereoMode::Monocular,
            enable_vignette: true,
            frame_budget_ms: 11,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        let parsed = RenderSettings::from_json(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn partial_json_is_rejected() {
        // Settings files must be complete; missing fields are an error, not
        // silently defaulted.
        assert!(RenderSettings::from_json("{\"z_near\": 0.1}").is_err());
    }
}
