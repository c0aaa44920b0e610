use crate::error::ErrorDetail;
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The default window size in CHIP-8 pixels (the native display resolution).
const DEFAULT_WINDOW_WIDTH: u32 = 64;
const DEFAULT_WINDOW_HEIGHT: u32 = 32;
/// The default foreground colour (RGBA8888); white.
const DEFAULT_FG_COLOR: u32 = 0xFFFF_FFFF;
/// The default background colour (RGBA8888); black.
const DEFAULT_BG_COLOR: u32 = 0x0000_00FF;
/// The default amount by which to scale each CHIP-8 pixel on the host window.
const DEFAULT_SCALE_FACTOR: u32 = 20;
/// The default CHIP-8 instruction rate in instructions per second.
const DEFAULT_INSTS_PER_SECOND: u32 = 700;
/// The default pitch of the beeper's square wave in hertz.
const DEFAULT_SQUARE_WAVE_FREQ: u32 = 440;
/// The default audio sample rate in hertz.
const DEFAULT_AUDIO_SAMPLE_RATE: u32 = 44100;
/// The default square wave amplitude (out of the signed 16-bit sample range).
const DEFAULT_VOLUME: u16 = 3000;

/// A struct to allow specification of Ocho start-up parameters.
///
/// All fields are optional when deserialised; anything absent from a configuration file
/// takes its default.  An [Options] instance is consulted by the frame loop for its
/// per-frame cycle budget, and by the host adapters when the window and beeper are
/// created.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Window width in CHIP-8 pixels (the native resolution is 64)
    pub window_width: u32,
    /// Window height in CHIP-8 pixels (the native resolution is 32)
    pub window_height: u32,
    /// Foreground (lit pixel) colour, RGBA8888
    pub fg_color: u32,
    /// Background (unlit pixel) colour, RGBA8888
    pub bg_color: u32,
    /// Side length of each CHIP-8 pixel on the host window, in host pixels
    pub scale_factor: u32,
    /// Whether to draw each lit pixel with a one-pixel outline in the background colour
    pub pixel_outline: bool,
    /// Guest instruction rate; the frame loop runs `ceil(insts_per_second / 60)` cycles
    /// per frame
    pub insts_per_second: u32,
    /// Pitch of the beeper's square wave in hertz
    pub square_wave_freq: u32,
    /// Audio sample rate in hertz
    pub audio_sample_rate: u32,
    /// Square wave amplitude (out of the signed 16-bit sample range)
    pub volume: u16,
}

impl Default for Options {
    /// Constructor that returns an [Options] instance using typical default settings.
    fn default() -> Self {
        Options {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            fg_color: DEFAULT_FG_COLOR,
            bg_color: DEFAULT_BG_COLOR,
            scale_factor: DEFAULT_SCALE_FACTOR,
            pixel_outline: true,
            insts_per_second: DEFAULT_INSTS_PER_SECOND,
            square_wave_freq: DEFAULT_SQUARE_WAVE_FREQ,
            audio_sample_rate: DEFAULT_AUDIO_SAMPLE_RATE,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl Options {
    /// Constructor that returns an [Options] instance deserialised from the JSON file at
    /// the specified path.  Returns [ErrorDetail::FileError] if the file cannot be read
    /// or does not parse.
    ///
    /// # Arguments
    ///
    /// * `file_path` - the path of the JSON options file to read
    pub fn load_from_file(file_path: &Path) -> Result<Self, ErrorDetail> {
        let file_error = || ErrorDetail::FileError {
            file_path: file_path.display().to_string(),
        };
        let json: String = fs::read_to_string(file_path).map_err(|_| file_error())?;
        serde_json::from_str(&json).map_err(|_| file_error())
    }

    /// Serialises the passed [Options] instance to a JSON file at the specified path.
    /// Returns [ErrorDetail::FileError] if the file cannot be written.
    ///
    /// # Arguments
    ///
    /// * `options` - the options to serialise
    /// * `file_path` - the path of the JSON file to write
    pub fn save_to_file(options: &Options, file_path: &Path) -> Result<(), ErrorDetail> {
        let file_error = || ErrorDetail::FileError {
            file_path: file_path.display().to_string(),
        };
        let json: String = serde_json::to_string_pretty(options).map_err(|_| file_error())?;
        fs::write(file_path, json).map_err(|_| file_error())
    }

    /// Returns the number of guest cycles the frame loop should execute per 60 Hz frame
    /// (rounded up so low instruction rates still make progress).
    pub fn cycles_per_frame(&self) -> u32 {
        self.insts_per_second.div_ceil(60).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options: Options = Options::default();
        assert!(
            options.window_width == 64
                && options.window_height == 32
                && options.scale_factor == 20
                && options.pixel_outline
                && options.insts_per_second == 700
                && options.square_wave_freq == 440
                && options.audio_sample_rate == 44100
                && options.volume == 3000
        );
    }

    #[test]
    fn test_cycles_per_frame_rounds_up() {
        let mut options: Options = Options::default();
        assert_eq!(options.cycles_per_frame(), 12);
        options.insts_per_second = 60;
        assert_eq!(options.cycles_per_frame(), 1);
        options.insts_per_second = 61;
        assert_eq!(options.cycles_per_frame(), 2);
    }

    #[test]
    fn test_deserialise_missing_fields_take_defaults() {
        let options: Options = serde_json::from_str("{\"insts_per_second\": 1000}").unwrap();
        assert!(options.insts_per_second == 1000 && options.scale_factor == 20);
    }

    #[test]
    fn test_load_from_file_missing_error() {
        let path = Path::new("this/options/file/does/not/exist.json");
        assert_eq!(
            Options::load_from_file(path).unwrap_err(),
            ErrorDetail::FileError {
                file_path: path.display().to_string()
            }
        );
    }
}
