//! Render Context Settings
//!
//! [`ContextSettings`] is handed to [`RenderContext::new`] once. Every field
//! has a default, so a settings document only needs the fields it changes.
//!
//! ```rust,ignore
//! use cinder::settings::ContextSettings;
//!
//! let settings = ContextSettings::from_json_str(r#"{
//!     "window_width": 1280,
//!     "window_height": 720,
//!     "camera": { "move_step": 0.25 }
//! }"#)?;
//! ```
//!
//! [`RenderContext::new`]: crate::context::RenderContext::new

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// First-person camera tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Distance moved per update while a movement key is held.
    pub move_step: f32,

    /// Multiplier applied to pointer motion after it is divided by the
    /// window size.
    pub look_sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_step: 0.1,
            look_sensitivity: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    // === Window ===
    /// Initial drawable width in pixels. Refreshed from the surface on every
    /// presented frame.
    pub window_width: u32,

    /// Initial drawable height in pixels.
    pub window_height: u32,

    // === Rendering Defaults ===
    /// RGBA color the framebuffer is cleared to at the start of a frame.
    pub clear_color: [f32; 4],

    pub camera: CameraSettings,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            clear_color: [0.1, 0.1, 0.1, 1.0],
            camera: CameraSettings::default(),
        }
    }
}

impl ContextSettings {
    /// Parses a JSON settings document; missing fields keep their defaults.
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Width over height, as used for the camera projection.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}
