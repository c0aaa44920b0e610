#![allow(non_snake_case)]

use crate::display::Display;
use crate::error::{ErrorDetail, MachineError};
use crate::font::Font;
use crate::instruction::Instruction;
use crate::keystate::KeyState;
use crate::memory::Memory;
use crate::program::Program;
use crate::stack::Stack;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

mod execute;


/// The address within memory at which the built-in hex font is loaded.
const FONT_START_ADDRESS: usize = 0x0;
/// The address within memory at which program execution begins.
const PROGRAM_START_ADDRESS: u16 = 0x200;
/// The number of variable registers available.
const VARIABLE_REGISTER_COUNT: usize = 16;
/// The number of bytes a program opcode occupies in memory.
const OPCODE_SIZE_BYTES: u16 = 2;

/// An enum representing the execution state of the machine.  Transitions happen only in
/// response to user input delivered by the hosting application.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MachineState {
    /// The fetch -> decode -> execute cycle is progressing normally
    Running,
    /// Execution is suspended; no guest state changes until resumed
    Paused,
    /// The user has requested termination
    Quit,
}

/// An abstraction of the CHIP-8 virtual machine, and the core public interface to the
/// Ocho crate.
///
/// This struct exclusively owns all guest state (memory, registers, stack, frame buffer,
/// keypad and timers), and exposes methods through which a program can be loaded to memory
/// and executed one cycle at a time, as well as methods for supplying input (in the form
/// of keypresses) and output to the host application (in the form of the bitmapped
/// display and the audible-tone flag).
#[derive(Debug)]
pub struct Machine {
    // CHIP-8 COMPONENT STATE FIELDS
    display: Display,     // The display frame buffer
    stack: Stack,         // The call stack (holds return addresses for subroutines)
    memory: Memory,       // The system memory
    program_counter: u16, // The program counter register (points to next opcode location)
    index_register: u16,  // The index register (used to point to memory addresses)
    variable_registers: [u8; VARIABLE_REGISTER_COUNT], // General purpose registers
    delay_timer: u8,      // Delay timer, decremented at 60hz when non-zero
    sound_timer: u8,      // Sound timer, decremented at 60hz when non-zero; tone while > 0
    cycles: usize,        // The number of machine cycles that have been executed
    // ADDITIONAL STATE FIELDS
    keystate: KeyState,  // A representation of the state (pressed/not pressed) of each key
    state: MachineState, // The current execution state of the machine
    rng: StdRng,         // Random byte source for the CXNN instruction (seedable for tests)
    traced_opcodes: HashSet<u16>, // Opcodes already reported through the trace hook
    // CONFIG AND SETUP FIELDS
    font: Font,       // The font loaded into the machine (only used during reset)
    program: Program, // The program loaded into the machine (retained for reset)
}

impl Machine {
    /// Constructor/builder function that returns a freshly-reset [Machine] instance
    /// with the supplied program data loaded into memory ready for execution.
    ///
    /// # Arguments
    ///
    /// * `program` - a [Program] instance holding the bytes of the ROM to be executed
    pub fn initialise_and_load(program: Program) -> Result<Self, ErrorDetail> {
        let mut machine = Machine {
            display: Display::new(),
            stack: Stack::new(),
            memory: Memory::new(),
            program_counter: PROGRAM_START_ADDRESS,
            index_register: 0x0,
            variable_registers: [0x0; VARIABLE_REGISTER_COUNT],
            delay_timer: 0x0,
            sound_timer: 0x0,
            cycles: 0,
            keystate: KeyState::new(),
            state: MachineState::Running,
            rng: StdRng::from_entropy(),
            traced_opcodes: HashSet::new(),
            font: Font::default(),
            program,
        };
        machine.reset()?;
        Ok(machine)
    }

    /// Resets the machine to its power-on state: memory is zeroed and the font
    /// re-loaded, all registers, stack, frame buffer, keypad and timers are cleared,
    /// the program counter returns to the program start address, the retained program
    /// is copied back into memory, and the state is set to [MachineState::Running].
    pub fn reset(&mut self) -> Result<(), ErrorDetail> {
        self.memory.clear();
        self.stack.clear();
        self.display.clear();
        self.keystate.clear();
        self.variable_registers = [0x0; VARIABLE_REGISTER_COUNT];
        self.index_register = 0x0;
        self.delay_timer = 0x0;
        self.sound_timer = 0x0;
        self.cycles = 0;
        self.program_counter = PROGRAM_START_ADDRESS;
        self.state = MachineState::Running;
        self.traced_opcodes.clear();
        self.load_font_data()?;
        self.load_program()
    }

    /// Loads the machine's font data into memory at the font start address.
    fn load_font_data(&mut self) -> Result<(), ErrorDetail> {
        self.memory
            .write_bytes(FONT_START_ADDRESS, self.font.font_data())
    }

    /// Loads the machine's program data into memory at the program start address.  If the
    /// program is too large to fit in the memory above that address, returns
    /// [ErrorDetail::RomTooLarge].
    fn load_program(&mut self) -> Result<(), ErrorDetail> {
        let size: usize = self.program.program_data_size();
        if size > self.memory.max_addressable_size() - PROGRAM_START_ADDRESS as usize {
            return Err(ErrorDetail::RomTooLarge { size });
        }
        self.memory
            .write_bytes(PROGRAM_START_ADDRESS as usize, self.program.program_data())
    }

    /// Executes one iteration of the fetch -> decode -> execute cycle.
    ///
    /// Recoverable guest conditions (unknown opcodes, reads or writes past the end of
    /// memory through a program-controlled index register) leave the instruction as a
    /// no-op and are reported to stderr once per distinct opcode.  Fatal conditions
    /// (call stack overflow or underflow, a fetch from outside memory) return a
    /// [MachineError] identifying the program counter and opcode at the fault.
    pub fn step(&mut self) -> Result<(), MachineError> {
        let entry_program_counter: u16 = self.program_counter;
        // Fetch two byte opcode from the current program counter memory location
        let opcode: u16 = match self.memory.read_two_bytes(entry_program_counter as usize) {
            Ok(opcode) => opcode,
            // The program counter has left addressable memory; there is no way to continue
            Err(inner_error) => {
                return Err(MachineError {
                    program_counter: entry_program_counter,
                    opcode: 0x0,
                    inner_error,
                })
            }
        };
        // Increment the program counter (by two bytes, as opcodes are 16-bit)
        self.program_counter += OPCODE_SIZE_BYTES;
        self.cycles += 1;
        // Decode the opcode into an instruction; decoding is total, so unrecognised
        // encodings surface here as a traced no-op rather than an error
        let instruction: Instruction = Instruction::decode_from(opcode);
        if let Instruction::Unknown { opcode } = instruction {
            self.trace_ignored_opcode(opcode, "unrecognised encoding");
            return Ok(());
        }
        // Execute the instruction, classifying any resulting condition
        match self.execute(instruction) {
            Ok(()) => Ok(()),
            Err(inner_error @ (ErrorDetail::PushFullStack | ErrorDetail::PopEmptyStack)) => {
                Err(MachineError {
                    program_counter: entry_program_counter,
                    opcode,
                    inner_error,
                })
            }
            Err(recoverable) => {
                self.trace_ignored_opcode(opcode, &recoverable.to_string());
                Ok(())
            }
        }
    }

    /// Applies one 60 Hz timer tick: each non-zero counter is decremented by one.
    /// Returns whether the tone should be audible for this tick, which the hosting
    /// application forwards to its audio sink (the pause/unpause calls there must be
    /// idempotent, as this is reported every tick).
    pub fn tick_60hz(&mut self) -> bool {
        if self.delay_timer > 0x0 {
            self.delay_timer -= 1;
        }
        let audible: bool = self.sound_timer > 0x0;
        if audible {
            self.sound_timer -= 1;
        }
        audible
    }

    /// Provides key press input to the machine, by setting the state of the specified key
    /// in the internal representation to pressed / not pressed as per the supplied value.
    ///
    /// # Arguments
    ///
    /// * `key` - the hex ordinal of the key (valid range 0x0 to 0xF inclusive)
    /// * `status` - the value to set for the specified key (true means pressed)
    pub fn set_key_status(&mut self, key: u8, status: bool) -> Result<(), ErrorDetail> {
        self.keystate.set_key_status(key, status)
    }

    /// Returns a reference to the display frame buffer, for rendering.
    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Returns the current execution state of the machine.
    pub fn state(&self) -> MachineState {
        self.state
    }

    /// Sets the execution state of the machine.  State transitions happen only in
    /// response to user input, so this is for the hosting application to call.
    pub fn set_state(&mut self, state: MachineState) {
        self.state = state;
    }

    /// Returns the current program counter.
    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    /// Returns the number of machine cycles executed since the last reset.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Re-seeds the random byte source used by the CXNN instruction, for reproducible
    /// test runs.
    ///
    /// # Arguments
    ///
    /// * `seed` - the seed value for the generator
    pub fn seed_random(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Reports an opcode whose execution was ignored, once per distinct opcode.
    fn trace_ignored_opcode(&mut self, opcode: u16, reason: &str) {
        if self.traced_opcodes.insert(opcode) {
            eprintln!("ignoring opcode {:#06X}: {}", opcode, reason);
        }
    }
}
