//! Display mode, physical size and link parameters reported to the host.

use bitflags::bitflags;
use embedded_graphics_core::geometry::Size;

/// Detailed timing of one display mode.
///
/// Horizontal values are in pixels, vertical values in lines, both counted
/// from the start of the active area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMode {
    /// Pixel clock in kHz.
    pub clock_khz: u32,
    pub hdisplay: u16,
    pub hsync_start: u16,
    pub hsync_end: u16,
    pub htotal: u16,
    pub vdisplay: u16,
    pub vsync_start: u16,
    pub vsync_end: u16,
    pub vtotal: u16,
}

impl DisplayMode {
    /// Active area in pixels.
    pub fn size(&self) -> Size {
        Size::new(u32::from(self.hdisplay), u32::from(self.vdisplay))
    }

    /// Vertical refresh rate in Hz, rounded to the nearest integer.
    ///
    /// Returns 0 for a mode without blanking totals.
    pub fn refresh_rate_hz(&self) -> u32 {
        let frame = u64::from(self.htotal) * u64::from(self.vtotal);
        if frame == 0 {
            return 0;
        }
        let hz = (u64::from(self.clock_khz) * 1_000 + frame / 2) / frame;
        u32::try_from(hz).unwrap_or(u32::MAX)
    }
}

/// Identification and physical dimensions of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelInfo {
    pub name: &'static str,
    /// Width of the active area in mm.
    pub width_mm: u16,
    /// Height of the active area in mm.
    pub height_mm: u16,
}

/// Pixel format on the DSI link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb565,
    Rgb666,
    Rgb888,
}

impl PixelFormat {
    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Rgb565 => 16,
            Self::Rgb666 => 18,
            Self::Rgb888 => 24,
        }
    }
}

bitflags! {
    /// DSI link mode flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModeFlags: u32 {
        /// Video mode rather than command mode.
        const VIDEO = 1 << 0;
        /// The clock lane may stop between transmissions.
        const CLOCK_NON_CONTINUOUS = 1 << 10;
        /// Commands are sent in low-power mode.
        const LOW_POWER = 1 << 11;
    }
}

/// DSI link configuration a panel asks the host for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DsiConfig {
    /// Number of data lanes, 1 to 4.
    pub lanes: u8,
    pub format: PixelFormat,
    pub mode_flags: ModeFlags,
}
