use ocho::Options;
use rodio::source::Source;
use rodio::{OutputStream, Sink};
use std::error::Error;
use std::time::Duration;

/// An infinite square-wave audio source producing signed 16-bit mono samples.
///
/// The CHIP-8 tone is a plain square wave; the wave alternates between plus and minus
/// the configured amplitude every half period.
struct SquareWave {
    /// Pitch of the wave in hertz
    frequency: u32,
    /// Samples produced per second
    sample_rate: u32,
    /// Peak amplitude of each sample
    amplitude: i16,
    /// Running sample counter, used to derive the position within the current period
    sample_index: u32,
}

impl SquareWave {
    fn new(options: &Options) -> Self {
        SquareWave {
            frequency: options.square_wave_freq.max(1),
            sample_rate: options.audio_sample_rate.max(1),
            amplitude: options.volume.min(i16::MAX as u16) as i16,
            sample_index: 0,
        }
    }
}

impl Iterator for SquareWave {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        let period: u32 = (self.sample_rate / self.frequency).max(2);
        let high: bool = (self.sample_index % period) < period / 2;
        self.sample_index = self.sample_index.wrapping_add(1);
        match high {
            true => Some(self.amplitude),
            false => Some(-self.amplitude),
        }
    }
}

impl Source for SquareWave {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Simple struct to represent an audio stream, with a sink that can be paused and resumed
/// as required
pub(crate) struct Beeper {
    _stream: OutputStream,
    sink: Sink,
}

impl Beeper {
    /// Constructor that returns a [Beeper] instance whose audio source is a square wave
    /// configured per the passed options.  The stream begins in a paused state
    pub(crate) fn new(options: &Options) -> Result<Self, Box<dyn Error>> {
        let (_stream, stream_handle) = OutputStream::try_default()?;
        let sink: Sink = Sink::try_new(&stream_handle)?;
        sink.append(SquareWave::new(options));
        sink.pause();
        Ok(Beeper { _stream, sink })
    }

    /// Resumes or pauses playback as per the passed flag.  Both underlying sink calls
    /// are idempotent, so this is safe to drive every frame
    pub(crate) fn set_audible(&self, audible: bool) {
        match audible {
            true => self.sink.play(),
            false => self.sink.pause(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_wave_alternates_half_periods() {
        let mut options: Options = Options::default();
        options.square_wave_freq = 11025;
        options.audio_sample_rate = 44100;
        options.volume = 3000;
        // A period of four samples: two high then two low
        let samples: Vec<i16> = SquareWave::new(&options).take(8).collect();
        assert_eq!(
            samples,
            vec![3000, 3000, -3000, -3000, 3000, 3000, -3000, -3000]
        );
    }

    #[test]
    fn test_square_wave_reports_configuration() {
        let options: Options = Options::default();
        let wave: SquareWave = SquareWave::new(&options);
        assert!(wave.channels() == 1 && Source::sample_rate(&wave) == 44100);
    }
}
