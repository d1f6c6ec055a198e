use crate::{
    cmd,
    command::{CommandEntry, CommandTable},
    models::PanelModel,
    options::{DisplayMode, DsiConfig, ModeFlags, PanelInfo, PixelFormat},
    power::{Rail, ResetTiming},
};

/// CSOT NT36523A 2K DSI panel, as fitted to the Qualcomm SM8250 MTP.
///
/// 800x2560 video mode panel driven over three DSI lanes at 120 Hz.
/// The init sequence is the vendor blob and is replayed unmodified.
pub struct NT36523A;

const H_ACTIVE: u16 = 800;
const H_FRONT_PORCH: u16 = 100;
const H_SYNC: u16 = 20;
const H_BACK_PORCH: u16 = 26;

const V_ACTIVE: u16 = 2560;
const V_FRONT_PORCH: u16 = 26;
const V_SYNC: u16 = 4;
const V_BACK_PORCH: u16 = 168;

const REFRESH_HZ: u32 = 120;

const HTOTAL: u16 = H_ACTIVE + H_FRONT_PORCH + H_SYNC + H_BACK_PORCH;
const VTOTAL: u16 = V_ACTIVE + V_FRONT_PORCH + V_SYNC + V_BACK_PORCH;

impl PanelModel for NT36523A {
    const COMPATIBLE: &'static str = "csot,nt36523a-2K-display";

    const INFO: PanelInfo = PanelInfo {
        name: "qcom_sm8250_mtp_2k_panel",
        width_mm: 1474,
        height_mm: 2359,
    };

    const MODE: DisplayMode = DisplayMode {
        clock_khz: HTOTAL as u32 * VTOTAL as u32 * REFRESH_HZ / 1000,
        hdisplay: H_ACTIVE,
        hsync_start: H_ACTIVE + H_FRONT_PORCH,
        hsync_end: H_ACTIVE + H_FRONT_PORCH + H_SYNC,
        htotal: HTOTAL,
        vdisplay: V_ACTIVE,
        vsync_start: V_ACTIVE + V_FRONT_PORCH,
        vsync_end: V_ACTIVE + V_FRONT_PORCH + V_SYNC,
        vtotal: VTOTAL,
    };

    const DSI: DsiConfig = DsiConfig {
        lanes: 3,
        format: PixelFormat::Rgb888,
        mode_flags: ModeFlags::VIDEO
            .union(ModeFlags::LOW_POWER)
            .union(ModeFlags::CLOCK_NON_CONTINUOUS),
    };

    const RAILS: &'static [Rail] = &[
        Rail::new("vddio").with_loads(62_000, 80),
        Rail::new("vddenp").with_loads(100_000, 100),
        Rail::new("vddenn").with_loads(100_000, 100),
    ];

    const RESET: ResetTiming = ResetTiming { settle_us: 10_000 };

    const INIT_SEQUENCE: CommandTable = CommandTable::new(INIT_CMDS);
}

const INIT_CMDS: &[CommandEntry] = &[
    cmd!(0xff, 0x10),
    cmd!(0xfb, 0x01),
    cmd!(0xb9, 0x05),
    cmd!(0xff, 0x20),
    cmd!(0xfb, 0x01),
    cmd!(0x18, 0x40),
    cmd!(0xff, 0x10),
    cmd!(0xfb, 0x01),
    cmd!(0xb9, 0x02),
    cmd!(0xff, 0xd0),
    cmd!(0xfb, 0x01),
    cmd!(0x02, 0xaf),
    cmd!(0x00, 0x30),
    cmd!(0x09, 0xee),
    cmd!(0x1c, 0x99),
    cmd!(0x1d, 0x09),
    cmd!(0xff, 0xf0),
    cmd!(0xfb, 0x01),
    cmd!(0x3a, 0x08),
    cmd!(0xff, 0xe0),
    cmd!(0xfb, 0x01),
    cmd!(0x4f, 0x02),
    cmd!(0xff, 0x20),
    cmd!(0xfb, 0x01),
    cmd!(0x58, 0x40),
    cmd!(0xff, 0x10),
    cmd!(0xfb, 0x01),
    cmd!(0x35, 0x00),
    cmd!(0xff, 0x23),
    cmd!(0xfb, 0x01),
    cmd!(0x00, 0x80),
    cmd!(0x01, 0x84),
    cmd!(0x05, 0x2d),
    cmd!(0x06, 0x00),
    cmd!(0x07, 0x00),
    cmd!(0x08, 0x01),
    cmd!(0x09, 0x45),
    cmd!(0x11, 0x02),
    cmd!(0x12, 0x80),
    cmd!(0x15, 0x83),
    cmd!(0x16, 0x0c),
    cmd!(0x29, 0x0a),
    cmd!(0x30, 0xff),
    cmd!(0x31, 0xfe),
    cmd!(0x32, 0xfd),
    cmd!(0x33, 0xfb),
    cmd!(0x34, 0xf8),
    cmd!(0x35, 0xf5),
    cmd!(0x36, 0xf3),
    cmd!(0x37, 0xf2),
    cmd!(0x38, 0xf2),
    cmd!(0x39, 0xf2),
    cmd!(0x3a, 0xef),
    cmd!(0x3b, 0xec),
    cmd!(0x3d, 0xe9),
    cmd!(0x3f, 0xe5),
    cmd!(0x40, 0xe5),
    cmd!(0x41, 0xe5),
    cmd!(0x2a, 0x13),
    cmd!(0x45, 0xff),
    cmd!(0x46, 0xf4),
    cmd!(0x47, 0xe7),
    cmd!(0x48, 0xda),
    cmd!(0x49, 0xcd),
    cmd!(0x4a, 0xc0),
    cmd!(0x4b, 0xb3),
    cmd!(0x4c, 0xb2),
    cmd!(0x4d, 0xb2),
    cmd!(0x4e, 0xb2),
    cmd!(0x4f, 0x99),
    cmd!(0x50, 0x80),
    cmd!(0x51, 0x68),
    cmd!(0x52, 0x66),
    cmd!(0x53, 0x66),
    cmd!(0x54, 0x66),
    cmd!(0x2b, 0x0e),
    cmd!(0x58, 0xff),
    cmd!(0x59, 0xfb),
    cmd!(0x5a, 0xf7),
    cmd!(0x5b, 0xf3),
    cmd!(0x5c, 0xef),
    cmd!(0x5d, 0xe3),
    cmd!(0x5e, 0xda),
    cmd!(0x5f, 0xd8),
    cmd!(0x60, 0xd8),
    cmd!(0x61, 0xd8),
    cmd!(0x62, 0xcb),
    cmd!(0x63, 0xbf),
    cmd!(0x64, 0xb3),
    cmd!(0x65, 0xb2),
    cmd!(0x66, 0xb2),
    cmd!(0x67, 0xb2),
    cmd!(0xff, 0x10),
    cmd!(0xfb, 0x01),
    cmd!(0x51, 0x0f, 0xff),
    cmd!(0x53, 0x2c),
    cmd!(0x55, 0x00),
    cmd!(0xbb, 0x13),
    cmd!(0x3b, 0x03, 0xac, 0x1a, 0x04, 0x04),
    cmd!(0xff, 0x2a),
    cmd!(0xfb, 0x01),
    cmd!(0x25, 0x46),
    cmd!(0x30, 0x46),
    cmd!(0x39, 0x46),
    cmd!(0xff, 0x26),
    cmd!(0xfb, 0x01),
    cmd!(0x01, 0xb0),
    cmd!(0x19, 0x10),
    cmd!(0x1a, 0xe0),
    cmd!(0x1b, 0x10),
    cmd!(0x1c, 0x00),
    cmd!(0x2a, 0x10),
    cmd!(0x2b, 0xe0),
    cmd!(0xff, 0xf0),
    cmd!(0xfb, 0x01),
    cmd!(0x84, 0x08),
    cmd!(0x85, 0x0c),
    cmd!(0xff, 0x20),
    cmd!(0xfb, 0x01),
    cmd!(0x51, 0x00),
    cmd!(0xff, 0x25),
    cmd!(0xfb, 0x01),
    cmd!(0x91, 0x1f),
    cmd!(0x92, 0x0f),
    cmd!(0x93, 0x01),
    cmd!(0x94, 0x18),
    cmd!(0x95, 0x03),
    cmd!(0x96, 0x01),
    cmd!(0xff, 0x10),
    cmd!(0xb0, 0x01),
    cmd!(0xff, 0x25),
    cmd!(0xfb, 0x01),
    cmd!(0x19, 0x1f),
    cmd!(0x1b, 0x1b),
    cmd!(0xff, 0x24),
    cmd!(0xfb, 0x01),
    cmd!(0xb8, 0x28),
    cmd!(0xff, 0x27),
    cmd!(0xfb, 0x01),
    cmd!(0xd0, 0x31),
    cmd!(0xd1, 0x20),
    cmd!(0xd4, 0x08),
    cmd!(0xde, 0x80),
    cmd!(0xdf, 0x02),
    cmd!(0xff, 0x26),
    cmd!(0xfb, 0x01),
    cmd!(0x00, 0x81),
    cmd!(0x01, 0xb0),
    cmd!(0xff, 0x22),
    cmd!(0xfb, 0x01),
    cmd!(0x6f, 0x01),
    cmd!(0x70, 0x11),
    cmd!(0x73, 0x01),
    cmd!(0x74, 0x4d),
    cmd!(0xa0, 0x3f),
    cmd!(0xa9, 0x50),
    cmd!(0xaa, 0x28),
    cmd!(0xab, 0x28),
    cmd!(0xad, 0x10),
    cmd!(0xb8, 0x00),
    cmd!(0xb9, 0x4b),
    cmd!(0xba, 0x96),
    cmd!(0xbb, 0x4b),
    cmd!(0xbe, 0x07),
    cmd!(0xbf, 0x4b),
    cmd!(0xc0, 0x07),
    cmd!(0xc1, 0x5c),
    cmd!(0xc2, 0x00),
    cmd!(0xc5, 0x00),
    cmd!(0xc6, 0x3f),
    cmd!(0xc7, 0x00),
    cmd!(0xca, 0x08),
    cmd!(0xcb, 0x40),
    cmd!(0xce, 0x00),
    cmd!(0xcf, 0x08),
    cmd!(0xd0, 0x40),
    cmd!(0xd3, 0x08),
    cmd!(0xd4, 0x40),
    cmd!(0xff, 0x25),
    cmd!(0xfb, 0x01),
    cmd!(0xbc, 0x01),
    cmd!(0xbd, 0x1c),
    cmd!(0xff, 0x2a),
    cmd!(0xfb, 0x01),
    cmd!(0x9a, 0x03),
    cmd!(0xff, 0x10),
];
