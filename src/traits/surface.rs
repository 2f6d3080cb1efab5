use thiserror::Error;

use crate::core::framebuffer::Framebuffer;

/// Errors from pushing a frame to a presentation surface.
#[derive(Debug, Error)]
pub enum PresentError {
    /// The surface cannot accept frames right now (not created yet, or the
    /// swapchain is being rebuilt). Skip this present and retry next
    /// iteration.
    #[error("presentation surface is not ready")]
    NotReady,

    #[error("presentation surface failed: {0}")]
    Failed(String),
}

/// Platform mechanism that makes a completed framebuffer visible.
///
/// `present` may block until vsync; that block is the loop's natural
/// frame-rate limiter.
pub trait PresentationSurface {
    /// Copy a completed frame out to the display.
    fn present(&mut self, frame: &Framebuffer) -> Result<(), PresentError>;
}
