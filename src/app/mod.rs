//! Input and presentation boundary.
//!
//! - [`Input`]: key table and pointer motion read by the FPS camera
//! - [`WindowSurface`]: what the render context presents into
//! - `input_adapter` (feature `winit`): winit event translation

pub mod input;
#[cfg(feature = "winit")]
pub mod input_adapter;
pub mod window;

pub use input::{ButtonState, Input, Key, MouseButton};
pub use window::{OffscreenSurface, WindowSurface};
