//! The audio output capability the playback session drives.
use std::path::{Path, PathBuf};

/// Errors reported by an [`AudioOutput`].
#[derive(Debug)]
pub enum AudioError {
    /// The file could not be opened or decoded.
    Load { path: PathBuf, message: String },
    /// The backend can't seek within the loaded source.
    SeekUnsupported,
    /// The output device failed.
    Device(String),
}
impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::Load { path, message } => {
                write!(f, "failed to load {}: {message}", path.display())
            }
            AudioError::SeekUnsupported => write!(f, "seeking is not supported"),
            AudioError::Device(message) => write!(f, "audio device error: {message}"),
        }
    }
}
impl std::error::Error for AudioError {}

/// A device that can play one audio file at a time.
///
/// Positions are in seconds. Volume is in `0.0..=1.0`.
pub trait AudioOutput {
    /// Replaces whatever is loaded with the file at `path`, without starting it.
    fn load(&mut self, path: &Path) -> Result<(), AudioError>;
    /// Starts the loaded file from its beginning.
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self) -> Result<(), AudioError>;
    fn unpause(&mut self) -> Result<(), AudioError>;
    fn stop(&mut self) -> Result<(), AudioError>;
    fn set_volume(&mut self, volume: f32) -> Result<(), AudioError>;
    /// Moves the playhead to `seconds`. Backends that can't seek return
    /// [`AudioError::SeekUnsupported`].
    fn seek(&mut self, seconds: f64) -> Result<(), AudioError>;
}

/// An output that accepts every request and plays nothing.
///
/// Used when no audio device is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutput;
impl AudioOutput for NullOutput {
    fn load(&mut self, _path: &Path) -> Result<(), AudioError> {
        Ok(())
    }
    fn play(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
    fn pause(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
    fn unpause(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
    fn stop(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
    fn set_volume(&mut self, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
    fn seek(&mut self, _seconds: f64) -> Result<(), AudioError> {
        Ok(())
    }
}

#[cfg(feature = "audio")]
pub use rodio_output::RodioOutput;

#[cfg(feature = "audio")]
mod rodio_output {
    use std::{io::BufReader, path::Path, time::Duration};

    use super::{AudioError, AudioOutput};

    /// Plays through the default output device using `rodio`.
    pub struct RodioOutput {
        _stream: rodio::OutputStream,
        sink: rodio::Sink,
    }
    impl RodioOutput {
        pub fn new() -> Result<Self, AudioError> {
            let mut stream = rodio::OutputStreamBuilder::open_default_stream()
                .map_err(|e| AudioError::Device(e.to_string()))?;
            stream.log_on_drop(false);
            let sink = rodio::Sink::connect_new(stream.mixer());
            sink.set_volume(1.0);
            Ok(Self {
                _stream: stream,
                sink,
            })
        }
    }
    impl AudioOutput for RodioOutput {
        fn load(&mut self, path: &Path) -> Result<(), AudioError> {
            let load_error = |message: String| AudioError::Load {
                path: path.to_path_buf(),
                message,
            };
            let file = std::fs::File::open(path).map_err(|e| load_error(e.to_string()))?;
            let decoder =
                rodio::Decoder::new(BufReader::new(file)).map_err(|e| load_error(e.to_string()))?;

            // Clearing also pauses the sink until `play`
            self.sink.clear();
            self.sink.append(decoder);
            Ok(())
        }
        fn play(&mut self) -> Result<(), AudioError> {
            self.sink.play();
            Ok(())
        }
        fn pause(&mut self) -> Result<(), AudioError> {
            self.sink.pause();
            Ok(())
        }
        fn unpause(&mut self) -> Result<(), AudioError> {
            self.sink.play();
            Ok(())
        }
        fn stop(&mut self) -> Result<(), AudioError> {
            self.sink.clear();
            Ok(())
        }
        fn set_volume(&mut self, volume: f32) -> Result<(), AudioError> {
            self.sink.set_volume(volume);
            Ok(())
        }
        fn seek(&mut self, seconds: f64) -> Result<(), AudioError> {
            self.sink
                .try_seek(Duration::from_secs_f64(seconds.max(0.0)))
                .map_err(|e| {
                    tracing::debug!("seek to {seconds:.1}s failed: {e}");
                    AudioError::SeekUnsupported
                })
        }
    }
}
