use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    pick_format(&caps.formats, prefer_srgb)
}

fn pick_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    if formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if formats.contains(&f) {
                return Some(f);
            }
        }
    } else if let Some(f) = formats.iter().copied().find(|f| !f.is_srgb()) {
        return Some(f);
    }

    Some(formats[0])
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Falls back to FIFO, which every surface supports, when `requested` is unavailable.
pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        log::warn!("present mode {requested:?} unsupported; using Fifo");
        wgpu::PresentMode::Fifo
    }
}

pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    if update_size(config, size, new_size) {
        surface.configure(device, config);
    }
}

/// Records `new_size` and, unless it is degenerate, copies it into `config`.
///
/// Returns whether the surface must be reconfigured. wgpu rejects 0x0
/// configurations (minimized window), so those only update `size`.
fn update_size(
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) -> bool {
    *size = new_size;

    if new_size.width == 0 || new_size.height == 0 {
        return false;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    true
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    let action = SurfaceErrorAction::for_error(&err);
    match action {
        SurfaceErrorAction::Reconfigured => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
        }
        SurfaceErrorAction::SkipFrame => log::debug!("skipping frame: {err}"),
        SurfaceErrorAction::Fatal => log::debug!("fatal surface error: {err}"),
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    use crate::device::GpuInit;

    fn config(width: u32, height: u32) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: TextureFormat::Bgra8Unorm,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    #[test]
    fn default_init_picks_linear_format() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        let picked = pick_format(&formats, GpuInit::default().prefer_srgb);
        assert_eq!(picked, Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn resize_updates_config() {
        let mut cfg = config(640, 480);
        let mut size = PhysicalSize::new(640, 480);
        assert!(update_size(&mut cfg, &mut size, PhysicalSize::new(800, 600)));
        assert_eq!(size, PhysicalSize::new(800, 600));
        assert_eq!((cfg.width, cfg.height), (800, 600));
    }

    #[test]
    fn zero_resize_only_records_size() {
        let mut cfg = config(640, 480);
        let mut size = PhysicalSize::new(640, 480);
        assert!(!update_size(&mut cfg, &mut size, PhysicalSize::new(0, 0)));
        assert_eq!(size, PhysicalSize::new(0, 0));
        assert_eq!((cfg.width, cfg.height), (640, 480));
    }

    #[test]
    fn zero_height_resize_only_records_size() {
        let mut cfg = config(640, 480);
        let mut size = PhysicalSize::new(640, 480);
        assert!(!update_size(&mut cfg, &mut size, PhysicalSize::new(640, 0)));
        assert_eq!(size, PhysicalSize::new(640, 0));
        assert_eq!(cfg.height, 480);
    }

    #[test]
    fn prefers_srgb_when_available() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(pick_format(&formats, true), Some(TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn first_format_without_srgb_preference() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(pick_format(&formats, false), Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn falls_back_to_srgb_when_only_srgb_offered() {
        let formats = [TextureFormat::Bgra8UnormSrgb];
        assert_eq!(pick_format(&formats, false), Some(TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn first_format_when_no_srgb_offered() {
        let formats = [TextureFormat::Rgba16Float];
        assert_eq!(pick_format(&formats, true), Some(TextureFormat::Rgba16Float));
    }

    #[test]
    fn no_formats() {
        assert_eq!(pick_format(&[], true), None);
    }
}
