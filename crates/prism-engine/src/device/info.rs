use std::fmt;

/// Human-readable description of the selected adapter.
///
/// Mirrors the classic vendor / renderer / version triple a GL program prints
/// right after context creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterReport {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
}

impl AdapterReport {
    pub fn from_info(info: &wgpu::AdapterInfo) -> Self {
        Self::new(
            info.vendor,
            &info.name,
            &format!("{:?}", info.backend),
            &info.driver,
            &info.driver_info,
        )
    }

    /// Builds a report from raw adapter fields.
    ///
    /// Empty driver strings are dropped from `version`.
    pub fn new(vendor_id: u32, name: &str, backend: &str, driver: &str, driver_info: &str) -> Self {
        let vendor = match vendor_name(vendor_id) {
            Some(n) => format!("{n} (0x{vendor_id:04X})"),
            None => format!("0x{vendor_id:04X}"),
        };

        let mut version = backend.to_string();
        for part in [driver, driver_info] {
            let part = part.trim();
            if !part.is_empty() {
                version.push(' ');
                version.push_str(part);
            }
        }

        Self {
            vendor,
            renderer: name.to_string(),
            version,
        }
    }
}

impl fmt::Display for AdapterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GPU vendor:   {}", self.vendor)?;
        writeln!(f, "GPU renderer: {}", self.renderer)?;
        write!(f, "GPU version:  {}", self.version)
    }
}

/// Maps a PCI vendor id to a vendor name.
pub fn vendor_name(id: u32) -> Option<&'static str> {
    let name = match id {
        0x1002 | 0x1022 => "AMD",
        0x10DE => "NVIDIA",
        0x8086 => "Intel",
        0x106B => "Apple",
        0x13B5 => "ARM",
        0x5143 => "Qualcomm",
        0x1010 => "ImgTec",
        0x14E4 => "Broadcom",
        0x15AD => "VMware",
        0x1AF4 => "Red Hat (virtio)",
        0x10005 => "Mesa",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vendor_names() {
        assert_eq!(vendor_name(0x10DE), Some("NVIDIA"));
        assert_eq!(vendor_name(0x8086), Some("Intel"));
        assert_eq!(vendor_name(0x1002), Some("AMD"));
    }

    #[test]
    fn unknown_vendor_is_none() {
        assert_eq!(vendor_name(0xBEEF), None);
    }

    #[test]
    fn report_formats_known_vendor_with_id() {
        let r = AdapterReport::new(0x10DE, "GeForce RTX 3060", "Vulkan", "NVIDIA", "535.54");
        assert_eq!(r.vendor, "NVIDIA (0x10DE)");
        assert_eq!(r.renderer, "GeForce RTX 3060");
        assert_eq!(r.version, "Vulkan NVIDIA 535.54");
    }

    #[test]
    fn report_formats_unknown_vendor_as_hex() {
        let r = AdapterReport::new(0xBEEF, "mystery", "Gl", "", "");
        assert_eq!(r.vendor, "0xBEEF");
        assert_eq!(r.version, "Gl");
    }

    #[test]
    fn display_has_three_lines() {
        let r = AdapterReport::new(0x8086, "Iris Xe", "Metal", "", "");
        let text = r.to_string();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("GPU vendor:   Intel"));
    }
}
