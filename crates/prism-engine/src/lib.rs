//! Prism engine crate.
//!
//! Owns the platform + GPU runtime pieces the demo binaries are built on:
//! a winit window loop, a wgpu device bound to it, and the one renderer the
//! demos need.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod render;
pub mod transform;
