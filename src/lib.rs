mod display;
mod error;
mod font;
mod instruction;
mod keystate;
mod machine;
mod memory;
mod options;
mod program;
mod stack;

// Re-exports
pub use crate::display::Display;
pub use crate::display::{DISPLAY_HEIGHT_PIXELS, DISPLAY_WIDTH_PIXELS};
pub use crate::error::*;
pub use crate::machine::Machine;
pub use crate::machine::MachineState;
pub use crate::memory::Memory;
pub use crate::options::Options;
pub use crate::program::Program;
pub use crate::stack::Stack;
