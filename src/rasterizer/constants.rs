//! Rasterizer constants
//!
//! Internal framebuffer resolution. The framebuffer is scaled to the window.

/// Framebuffer width
pub const WIDTH: usize = 512;

/// Framebuffer height
pub const HEIGHT: usize = 512;
