use std::error;
use std::fmt;

/// An Error enum used throughout the Ocho crate to communicate details of runtime
/// conditions that have occurred.
///
/// Whether a given condition is recoverable (the offending instruction becomes a no-op)
/// or fatal (execution cannot meaningfully continue) is decided by the
/// [Machine](crate::Machine); fatal conditions are bubbled up to the hosting application
/// wrapped in a [MachineError].
#[derive(Debug, PartialEq)]
pub enum ErrorDetail {
    /// An attempt was made to pop an item off the call stack while it is empty
    PopEmptyStack,
    /// An attempt was made to push an item on to the call stack while it is full
    PushFullStack,
    /// An attempt was made to read/write from an address outside the addressable range
    MemoryAddressOutOfBounds { address: u16 },
    /// A key ordinal was referenced that is outside the valid keypad range (0x0 to 0xF)
    InvalidKey { key: u8 },
    /// A ROM image was supplied that does not fit in memory above the program start address
    RomTooLarge { size: usize },
    /// Error used for any file I/O issues
    FileError { file_path: String },
}

impl error::Error for ErrorDetail {}

impl fmt::Display for ErrorDetail {
    /// Returns a textual description of each enum variant for display purposes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDetail::PopEmptyStack => {
                write!(f, "an attempt was made to pop the stack while empty")
            }
            ErrorDetail::PushFullStack => {
                write!(f, "an attempt was made to push to the stack while full")
            }
            ErrorDetail::MemoryAddressOutOfBounds { address } => {
                write!(f, "invalid memory address {:#05X} was accessed", address)
            }
            ErrorDetail::InvalidKey { key } => {
                write!(f, "invalid key {:#03X} was specified", key)
            }
            ErrorDetail::RomTooLarge { size } => {
                write!(f, "a ROM of {} bytes does not fit in memory", size)
            }
            ErrorDetail::FileError { file_path } => {
                write!(f, "file {} could not be read or written", file_path)
            }
        }
    }
}

/// An Error struct used to bubble up fatal guest faults to the hosting application.
/// This wraps the more specific [ErrorDetail] enum, and identifies the program counter
/// and opcode at the point of the failure.
#[derive(Debug, PartialEq)]
pub struct MachineError {
    pub program_counter: u16,
    pub opcode: u16,
    pub inner_error: ErrorDetail,
}

impl error::Error for MachineError {}

impl fmt::Display for MachineError {
    /// Returns a textual description of the error
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fatal fault at program counter {:#05X} (opcode {:#06X}): ",
            self.program_counter, self.opcode
        )?;
        self.inner_error.fmt(f)
    }
}
