use minifb::{Key, KeyRepeat, Window, WindowOptions};
use ocho::{
    Display, ErrorDetail, Machine, MachineState, Options, DISPLAY_HEIGHT_PIXELS,
    DISPLAY_WIDTH_PIXELS,
};

//
//    Keyboard                   CHIP-8
//    +---+---+---+---+          +---+---+---+---+
//    | 1 | 2 | 3 | 4 |          | 1 | 2 | 3 | C |
//    +---+---+---+---+          +---+---+---+---+
//    | Q | W | E | R |          | 4 | 5 | 6 | D |
//    +---+---+---+---+    =>    +---+---+---+---+
//    | A | S | D | F |          | 7 | 8 | 9 | E |
//    +---+---+---+---+          +---+---+---+---+
//    | Z | X | C | V |          | A | 0 | B | F |
//    +---+---+---+---+          +---+---+---+---+
//
const KEY_MAP: [(Key, u8); 16] = [
    (Key::Key1, 0x1),
    (Key::Key2, 0x2),
    (Key::Key3, 0x3),
    (Key::Key4, 0xC),
    (Key::Q, 0x4),
    (Key::W, 0x5),
    (Key::E, 0x6),
    (Key::R, 0xD),
    (Key::A, 0x7),
    (Key::S, 0x8),
    (Key::D, 0x9),
    (Key::F, 0xE),
    (Key::Z, 0xA),
    (Key::X, 0x0),
    (Key::C, 0xB),
    (Key::V, 0xF),
];

/// The host window on which the CHIP-8 display is rendered as a scaled pixel grid, and
/// through which keyboard input is collected.
pub(crate) struct Screen {
    // GUI window
    window: Window,
    // Auxiliary frame buffer holding the scaled-up pixel grid in the 32-bit format
    // expected by the window
    framebuf: Vec<u32>,
    // Guest cells shown horizontally / vertically
    grid_width: usize,
    grid_height: usize,
    // Side length of each guest cell in host pixels
    scale: usize,
    // Lit / unlit cell colours (host 0RGB format)
    fg_color: u32,
    bg_color: u32,
    // Whether lit cells are drawn with a one-pixel rim in the background colour
    pixel_outline: bool,
}

impl Screen {
    /// Constructor that opens a host window sized per the passed options.
    ///
    /// # Arguments
    ///
    /// * `name` - the program name to show in the window title
    /// * `options` - the configuration holding window geometry and colours
    pub(crate) fn new(name: &str, options: &Options) -> Result<Self, minifb::Error> {
        let grid_width: usize = options.window_width as usize;
        let grid_height: usize = options.window_height as usize;
        let scale: usize = options.scale_factor.max(1) as usize;
        let mut window = Window::new(
            &format!("Ocho: {}", name),
            grid_width * scale,
            grid_height * scale,
            WindowOptions::default(),
        )?;
        // The frame loop owns all pacing; the window must not add its own rate limit
        window.limit_update_rate(None);
        Ok(Screen {
            window,
            framebuf: vec![0; grid_width * scale * grid_height * scale],
            grid_width,
            grid_height,
            scale,
            fg_color: rgba_to_host(options.fg_color),
            bg_color: rgba_to_host(options.bg_color),
            pixel_outline: options.pixel_outline,
        })
    }

    /// Drains host input into the machine: the full keypad state is re-sampled from the
    /// currently-held keys, Escape (or closing the window) requests Quit, and Space
    /// toggles Running and Paused.  A single line is logged on each pause transition.
    pub(crate) fn poll_input(&mut self, machine: &mut Machine) -> Result<(), ErrorDetail> {
        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            machine.set_state(MachineState::Quit);
            return Ok(());
        }
        if self.window.is_key_pressed(Key::Space, KeyRepeat::No) {
            match machine.state() {
                MachineState::Running => {
                    machine.set_state(MachineState::Paused);
                    eprintln!("PAUSED");
                }
                MachineState::Paused => {
                    machine.set_state(MachineState::Running);
                    eprintln!("RESUME");
                }
                MachineState::Quit => (),
            }
        }
        for (host_key, guest_key) in KEY_MAP {
            machine.set_key_status(guest_key, self.window.is_key_down(host_key))?;
        }
        Ok(())
    }

    /// Renders the passed frame buffer to the window as a scaled pixel grid and presents
    /// it, pumping the window's event queue in the process.
    ///
    /// # Arguments
    ///
    /// * `display` - the machine frame buffer to render
    pub(crate) fn present(&mut self, display: &Display) -> Result<(), minifb::Error> {
        let row_pixels: usize = self.grid_width * self.scale;
        for grid_y in 0..self.grid_height {
            for grid_x in 0..self.grid_width {
                let lit: bool = grid_x < DISPLAY_WIDTH_PIXELS
                    && grid_y < DISPLAY_HEIGHT_PIXELS
                    && display.pixel(grid_x, grid_y);
                self.blit_cell(grid_x, grid_y, lit, row_pixels);
            }
        }
        self.window
            .update_with_buffer(&self.framebuf, row_pixels, self.grid_height * self.scale)
    }

    /// Fills one guest cell of the host frame buffer, applying the outline rim when
    /// configured.
    fn blit_cell(&mut self, grid_x: usize, grid_y: usize, lit: bool, row_pixels: usize) {
        for cell_y in 0..self.scale {
            for cell_x in 0..self.scale {
                let on_rim: bool = cell_x == 0
                    || cell_y == 0
                    || cell_x == self.scale - 1
                    || cell_y == self.scale - 1;
                let color: u32 = match (lit, self.pixel_outline && on_rim) {
                    (true, false) => self.fg_color,
                    _ => self.bg_color,
                };
                let host_x: usize = grid_x * self.scale + cell_x;
                let host_y: usize = grid_y * self.scale + cell_y;
                self.framebuf[host_y * row_pixels + host_x] = color;
            }
        }
    }
}

/// Converts an RGBA8888 colour from the options into the 0RGB format the window buffer
/// expects (the alpha channel is dropped).
fn rgba_to_host(color: u32) -> u32 {
    color >> 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_to_host_drops_alpha() {
        assert!(
            rgba_to_host(0xFFFF_FFFF) == 0x00FF_FFFF
                && rgba_to_host(0x1234_56FF) == 0x0012_3456
        );
    }

    #[test]
    fn test_key_map_covers_keypad() {
        let mut seen: [bool; 16] = [false; 16];
        for (_, guest_key) in KEY_MAP {
            seen[guest_key as usize] = true;
        }
        assert!(seen.iter().all(|&mapped| mapped));
    }
}
