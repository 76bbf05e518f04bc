//! A rotating, vertex-colored triangle. Escape closes the window.

use anyhow::Result;
use winit::dpi::{LogicalPosition, LogicalSize};

use prism_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use prism_engine::device::{Gpu, GpuInit};
use prism_engine::input::Key;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::paint::Color;
use prism_engine::render::triangle::TriangleRenderer;
use prism_engine::transform::rotating_mvp;
use prism_engine::window::{Runtime, RuntimeConfig};

#[derive(Default)]
struct RotatingTriangle {
    renderer: Option<TriangleRenderer>,
}

impl App for RotatingTriangle {
    fn on_start(&mut self, _window: &WindowCtx<'_>, gpu: &Gpu<'_>) -> Result<()> {
        log::info!("{}", gpu.adapter_report().renderer);
        self.renderer = Some(TriangleRenderer::new(gpu)?);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let Some(renderer) = self.renderer.as_ref() else {
            return AppControl::Continue;
        };

        // Minimized: nothing to draw into.
        let Some(aspect) = ctx.viewport().aspect_ratio() else {
            return AppControl::Continue;
        };

        let mvp = rotating_mvp(ctx.time.elapsed, aspect);

        ctx.render(Color::BLACK, |rctx, target| renderer.draw(rctx, target, mvp))
    }

    fn on_exit(&mut self) {
        // Release GPU objects while the device is still alive.
        self.renderer = None;
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Simple example".to_string(),
        initial_size: LogicalSize::new(640.0, 480.0),
        position: Some(LogicalPosition::new(300.0, 100.0)),
        resizable: false,
    };

    // Default present mode is FIFO (vsync).
    Runtime::run(config, GpuInit::default(), RotatingTriangle::default())
}
