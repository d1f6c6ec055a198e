use crate::{
    identity::IdentityTemplate,
    models::{MemoryMap, TouchModel},
    power::{Rail, ResetTiming},
    sequencer::Protocol,
};

/// Novatek NT36xxx family touch controller on SPI.
///
/// The actual chip is only known after identification, see [`ChipVariant`].
pub struct NT36XXX;

/// Chips of the NT36xxx family told apart by their trim id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipVariant {
    Nt36523,
    Nt36672a,
}

const NT36523_MAP: MemoryMap = MemoryMap {
    event_buf: 0x2FE00,
    raw_pipe0: 0x30FA0,
    raw_pipe1: 0x30FA0,
    read_flash_checksum: 0x24000,
    rw_flash_data: 0x24002,
};

const NT36672A_MAP: MemoryMap = MemoryMap {
    event_buf: 0x21C00,
    raw_pipe0: 0x20000,
    raw_pipe1: 0x23000,
    read_flash_checksum: 0x24000,
    rw_flash_data: 0x24002,
};

const EXACT: [bool; 6] = [true, false, false, true, true, true];
const PERMISSIVE: [bool; 6] = [false, false, false, true, true, true];

impl TouchModel for NT36XXX {
    type Variant = ChipVariant;

    const COMPATIBLE: &'static str = "novatek,nt36523";

    const PROTOCOL: Protocol = Protocol {
        swrst_addr: 0x03F0FE,
        boot_reset_cmd: 0x69,
        boot_reset_settle_us: 5_000,
        chip_id_addr: 0x03F004,
        page_settle_us: 200,
    };

    const TRIM_TABLE: &'static [IdentityTemplate<ChipVariant>] = &[
        IdentityTemplate::new(
            [0x20, 0xFF, 0xFF, 0x23, 0x65, 0x03],
            EXACT,
            ChipVariant::Nt36523,
        ),
        IdentityTemplate::new(
            [0x0A, 0xFF, 0xFF, 0x72, 0x66, 0x03],
            EXACT,
            ChipVariant::Nt36672a,
        ),
        IdentityTemplate::new(
            [0xFF, 0xFF, 0xFF, 0x23, 0x65, 0x03],
            PERMISSIVE,
            ChipVariant::Nt36523,
        ),
        IdentityTemplate::new(
            [0xFF, 0xFF, 0xFF, 0x72, 0x66, 0x03],
            PERMISSIVE,
            ChipVariant::Nt36672a,
        ),
    ];

    const RAILS: &'static [Rail] = &[Rail::new("vdd"), Rail::new("vio")];

    const RESET: ResetTiming = ResetTiming { settle_us: 10_000 };

    fn memory_map(variant: ChipVariant) -> MemoryMap {
        match variant {
            ChipVariant::Nt36523 => NT36523_MAP,
            ChipVariant::Nt36672a => NT36672A_MAP,
        }
    }
}
