mod audio;
mod screen;

use audio::Beeper;
use ocho::{Machine, MachineState, Options, Program};
use screen::Screen;
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

/// The nominal frame budget: 60 frames per second.
const FRAME_DURATION: Duration = Duration::from_micros(16_667);

// Command line arguments
struct Args {
    rom: String,
    config: Option<String>,
    insts_per_second: Option<u32>,
    scale_factor: Option<u32>,
}

fn parse_args() -> Result<Args, lexopt::Error> {
    use lexopt::prelude::*;

    let help_msg = "\
USAGE:
    ocho [OPTIONS] <ROM>

ARGS:
    <ROM>    Filepath of the CHIP-8 ROM to load: a raw byte image of at
             most 3840 bytes, no header.

OPTIONS:
    -h, --help          Print this help message.
    -c, --config=FILE   Read options from a JSON configuration file.
    -i, --ips=NUM       Set the guest instruction rate in instructions
                          per second. (default: 700)
    -s, --scale=NUM     Set the size of each CHIP-8 pixel in host
                          pixels. (default: 20)

KEYMAP:
    +---+---+---+---+
    | 1 | 2 | 3 | 4 |
    +---+---+---+---+
    | Q | W | E | R |
    +---+---+---+---+
    | A | S | D | F |
    +---+---+---+---+
    | Z | X | C | V |
    +---+---+---+---+
    Space pauses and resumes; Escape quits.";

    let mut rom = None;
    let mut config = None;
    let mut insts_per_second = None;
    let mut scale_factor = None;

    let mut parser = lexopt::Parser::from_env();

    while let Some(arg) = parser.next()? {
        match arg {
            Short('c') | Long("config") => {
                config = Some(parser.value()?.string()?);
            }
            Short('i') | Long("ips") => {
                insts_per_second = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("scale") => {
                scale_factor = Some(parser.value()?.parse()?);
            }
            Value(path) if rom.is_none() => {
                rom = Some(path.string()?);
            }

            Short('h') | Long("help") => {
                println!("{}", help_msg);
                std::process::exit(0);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Args {
        rom: rom.ok_or("missing argument <ROM>\n\n  Refer to --help for more information")?,
        config,
        insts_per_second,
        scale_factor,
    })
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("ocho: {}", error);
            return ExitCode::FAILURE;
        }
    };
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("ocho: {}", error);
            ExitCode::FAILURE
        }
    }
}

/// Acquires the machine and host resources, then runs the frame loop until the user
/// quits or a fatal guest fault occurs.  All resources are released by drop on every
/// exit path.
fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut options: Options = match &args.config {
        Some(path) => Options::load_from_file(Path::new(path))?,
        None => Options::default(),
    };
    if let Some(insts_per_second) = args.insts_per_second {
        options.insts_per_second = insts_per_second;
    }
    if let Some(scale_factor) = args.scale_factor {
        options.scale_factor = scale_factor;
    }

    let rom_path = Path::new(&args.rom);
    let program: Program = Program::load_from_file(rom_path)?;
    let mut machine: Machine = Machine::initialise_and_load(program)?;

    let program_name: &str = rom_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("CHIP-8");
    let mut screen: Screen = Screen::new(program_name, &options)?;
    let beeper: Beeper = Beeper::new(&options)?;
    let cycles_per_frame: u32 = options.cycles_per_frame();

    loop {
        let frame_start: Instant = Instant::now();
        // Drain pending host input; input is observed before any guest cycle of the frame
        screen.poll_input(&mut machine)?;
        match machine.state() {
            MachineState::Quit => break,
            MachineState::Paused => {
                // No guest state changes while paused; hold the tone off
                beeper.set_audible(false);
            }
            MachineState::Running => {
                // Run this frame's batch of guest cycles; fatal faults surface here
                for _ in 0..cycles_per_frame {
                    machine.step()?;
                }
                // Timers tick after all guest cycles of the frame, driving the tone
                beeper.set_audible(machine.tick_60hz());
            }
        }
        // Present the frame buffer (this also pumps the window's event queue)
        screen.present(machine.display())?;
        // Sleep out whatever remains of this frame's 16.667 ms budget
        if let Some(remaining) = FRAME_DURATION.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    Ok(())
}
