//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record passes
//! into a `RenderTarget` that has already been cleared for the frame.
//!
//! Convention: CPU geometry is already in model space; the vertex shader
//! applies an MVP uniform to reach clip space.

mod ctx;
pub mod shader;
pub mod triangle;

pub use ctx::{RenderCtx, RenderTarget};
