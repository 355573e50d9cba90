//! Presentation surface abstraction.
//!
//! The toolkit never creates windows or GL contexts. Whatever owns them
//! implements [`WindowSurface`] so the render context can present frames and
//! track the drawable size.

/// A drawable the render context presents into.
pub trait WindowSurface {
    /// Drawable size in pixels.
    fn size(&self) -> (u32, u32);

    /// Swaps the back buffer to the screen.
    fn present(&mut self) -> crate::errors::Result<()>;

    /// `true` once the user asked to close the window.
    fn should_close(&self) -> bool {
        false
    }
}

/// Fixed-size surface with nothing to present to. Counts presented frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffscreenSurface {
    width: u32,
    height: u32,
    frames_presented: u64,
    close_after: Option<u64>,
}

impl OffscreenSurface {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames_presented: 0,
            close_after: None,
        }
    }

    /// Reports `should_close` once `frames` frames were presented.
    #[must_use]
    pub fn close_after(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    #[must_use]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl WindowSurface for OffscreenSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self) -> crate::errors::Result<()> {
        self.frames_presented += 1;
        Ok(())
    }

    fn should_close(&self) -> bool {
        self.close_after
            .is_some_and(|frames| self.frames_presented >= frames)
    }
}
