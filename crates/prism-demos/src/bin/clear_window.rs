//! Opens a window, reports the GPU in use and clears the framebuffer every frame.

use std::io::BufRead;

use anyhow::{Context, Result};
use winit::dpi::{LogicalPosition, LogicalSize};

use prism_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use prism_engine::device::{Gpu, GpuInit};
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::paint::Color;
use prism_engine::window::{Runtime, RuntimeConfig};

struct ClearWindow;

impl App for ClearWindow {
    fn on_start(&mut self, _window: &WindowCtx<'_>, gpu: &Gpu<'_>) -> Result<()> {
        println!("{}", gpu.adapter_report());
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        ctx.render(Color::BLACK, |_, _| {})
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Hello World".to_string(),
        initial_size: LogicalSize::new(640.0, 640.0),
        position: Some(LogicalPosition::new(640.0, 0.0)),
        ..Default::default()
    };

    Runtime::run(config, GpuInit::default(), ClearWindow)?;

    println!("Window closed. Press Enter to exit.");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;

    Ok(())
}
