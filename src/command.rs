//! Init command tables.
//!
//! A table is an ordered list of raw DCS write buffers. Entries are replayed
//! verbatim and in order: vendor tables interleave page-select writes
//! (`0xFF xx`) with the register writes that depend on them, so an entry is
//! only meaningful after every entry before it has been sent.

/// Longest buffer a [`CommandEntry`] can hold.
pub const MAX_COMMAND_LEN: usize = 6;

/// A single command buffer: the DCS instruction followed by its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    bytes: [u8; MAX_COMMAND_LEN],
    len: u8,
}

impl CommandEntry {
    /// Creates an entry from a 1 to [`MAX_COMMAND_LEN`] byte payload.
    ///
    /// # Panics
    ///
    /// Panics if `payload` is empty or too long. In a `const` table this is a
    /// compile error.
    pub const fn new(payload: &[u8]) -> Self {
        assert!(
            !payload.is_empty() && payload.len() <= MAX_COMMAND_LEN,
            "command entries hold 1 to 6 bytes"
        );

        let mut bytes = [0; MAX_COMMAND_LEN];
        let mut i = 0;
        while i < payload.len() {
            bytes[i] = payload[i];
            i += 1;
        }

        Self {
            bytes,
            len: payload.len() as u8,
        }
    }

    /// The bytes sent on the wire.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Builds a [`CommandEntry`] from its bytes.
///
/// ```
/// use nt36xxx::{cmd, command::CommandEntry};
///
/// const SELECT_CMD2_PAGE0: CommandEntry = cmd!(0xff, 0x20);
/// assert_eq!(SELECT_CMD2_PAGE0.payload(), &[0xff, 0x20]);
/// ```
#[macro_export]
macro_rules! cmd {
    ($($byte:expr),+ $(,)?) => {
        $crate::command::CommandEntry::new(&[$($byte),+])
    };
}

/// An ordered, read-only sequence of [`CommandEntry`].
#[derive(Debug, Clone, Copy)]
pub struct CommandTable {
    entries: &'static [CommandEntry],
}

impl CommandTable {
    pub const fn new(entries: &'static [CommandEntry]) -> Self {
        Self { entries }
    }

    /// Iterates the entries in replay order.
    pub fn iter(&self) -> core::slice::Iter<'static, CommandEntry> {
        self.entries.iter()
    }

    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static CommandEntry> {
        self.entries.get(index)
    }
}

impl IntoIterator for &CommandTable {
    type Item = &'static CommandEntry;
    type IntoIter = core::slice::Iter<'static, CommandEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
