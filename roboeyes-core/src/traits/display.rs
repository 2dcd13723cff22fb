//! Display trait for 1-bit eye frames

use crate::framebuffer::{FrameBuffer, Palette};

/// Errors that can occur while presenting a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer failed
    Communication,
    /// Frame size differs from the panel size
    DimensionMismatch,
    /// Frame presented before the panel was initialized
    NotInitialized,
}

/// Trait for panels that can show a finished frame
///
/// The frame is fully drawn before `present` is called; implementations
/// only translate it to the panel's wire format.
#[allow(async_fn_in_trait)]
pub trait EyeDisplay {
    /// Push a whole frame to the panel
    ///
    /// `palette` maps logical background/foreground to the panel's pixel
    /// bits, so an inverted panel needs no redraw.
    async fn present(&mut self, frame: &FrameBuffer, palette: Palette) -> Result<(), DisplayError>;

    /// Panel size in pixels (width, height)
    fn dimensions(&self) -> (u16, u16);

    /// Check if a frame matches the panel size
    fn accepts(&self, frame: &FrameBuffer) -> bool {
        self.dimensions() == (frame.width(), frame.height())
    }
}
