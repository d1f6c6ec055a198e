//! Page-addressed register access.
//!
//! NT36xxx controllers expose a 24-bit register space over a transport that
//! can only carry a 7-bit offset. The upper bits are latched by writing the
//! page number to the page-select register; accesses then address the
//! selected page by offset. The channel keeps no record of the selected page:
//! callers select it immediately before every dependent access.

mod spi;
pub use spi::*;

/// Number of address bits carried by the in-page offset.
pub const PAGE_SHIFT: u32 = 7;

/// Mask of the in-page offset bits.
pub const OFFSET_MASK: u32 = (1 << PAGE_SHIFT) - 1;

/// In-page offset of the page-select register.
pub const PAGE_SELECT: u8 = 0x7F;

/// Register transport with narrow (in-page) addressing.
pub trait RegisterBus {
    /// Error type
    type Error: core::fmt::Debug;

    /// Writes `data` starting at the in-page `offset`.
    fn write(&mut self, offset: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Fills `buf` starting at the in-page `offset`.
    fn read(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, offset: u8, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, offset, data)
    }

    fn read(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read(self, offset, buf)
    }
}

/// Page number of a full register address.
pub fn page_of(address: u32) -> u16 {
    ((address >> PAGE_SHIFT) & 0xFFFF) as u16
}

/// In-page offset of a full register address.
pub fn offset_of(address: u32) -> u8 {
    (address & OFFSET_MASK) as u8
}

/// Register channel splitting full addresses into page and offset.
pub struct PageChannel<B> {
    bus: B,
}

impl<B> PageChannel<B>
where
    B: RegisterBus,
{
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Latches the page containing `address`.
    ///
    /// The controller needs a short settle time before an access to the new
    /// page is valid; waiting is up to the caller.
    pub fn select_page(&mut self, address: u32) -> Result<(), B::Error> {
        let page = page_of(address);
        log::trace!("select page {:#06x}", page);
        self.bus.write(PAGE_SELECT, &page.to_be_bytes())
    }

    /// Reads `buf.len()` bytes at `address` from the currently selected page.
    pub fn read_block(&mut self, address: u32, buf: &mut [u8]) -> Result<(), B::Error> {
        self.bus.read(offset_of(address), buf)
    }

    /// Writes `data` at `address` into the currently selected page.
    pub fn write_block(&mut self, address: u32, data: &[u8]) -> Result<(), B::Error> {
        self.bus.write(offset_of(address), data)
    }

    /// Releases the underlying transport.
    pub fn release(self) -> B {
        self.bus
    }
}
