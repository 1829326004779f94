//! Drawing commands and rasterization.
//!
//! Scenes record a [`display_list::DisplayList`] in layout pixels; a
//! [`backend::RenderBackend`] turns it into a [`backend::FrameRGBA`].

/// Backend trait and frame buffers.
pub mod backend;
/// `vello_cpu` rasterizer.
pub mod cpu;
/// Recorded draw commands.
pub mod display_list;
