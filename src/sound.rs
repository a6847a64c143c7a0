//! Clip playback for the shell. Each player owns at most one sink; a new clip
//! replaces whatever the player was still playing.

use std::path::Path;

#[cfg(any(windows, target_os = "macos"))]
mod imp {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

    pub struct Output {
        // Dropping the stream silences every sink
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sinks: Vec<Option<Sink>>,
    }

    impl Output {
        pub fn open() -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(Self {
                    _stream: stream,
                    handle,
                    sinks: Vec::new(),
                }),
                Err(e) => {
                    log::warn!("No audio output device: {e}");
                    None
                }
            }
        }

        pub fn play(&mut self, player: usize, clip: &Path) -> Result<(), Box<dyn std::error::Error>> {
            let source = Decoder::new(BufReader::new(File::open(clip)?))?;
            let sink = Sink::try_new(&self.handle)?;
            sink.append(source);
            if self.sinks.len() <= player {
                self.sinks.resize_with(player + 1, || None);
            }
            // Replacing the old sink stops it
            self.sinks[player] = Some(sink);
            Ok(())
        }
    }
}

#[cfg(not(any(windows, target_os = "macos")))]
mod imp {
    use std::path::Path;

    pub struct Output;

    impl Output {
        pub fn open() -> Option<Self> {
            log::info!("Audio playback not built for this platform; clips are logged only");
            None
        }

        pub fn play(&mut self, _player: usize, _clip: &Path) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }
    }
}

/// Audio device, if one could be opened.
#[derive(Default)]
pub struct Speaker {
    output: Option<imp::Output>,
}

impl Speaker {
    pub fn open() -> Self {
        Self {
            output: imp::Output::open(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.output.is_some()
    }

    /// Fire-and-forget: failures are logged, never returned.
    pub fn play(&mut self, player: usize, clip: &Path) {
        match &mut self.output {
            Some(output) => {
                if let Err(e) = output.play(player, clip) {
                    log::warn!("Cannot play {}: {e}", clip.display());
                }
            }
            None => log::debug!("Muted: player {player} would play {}", clip.display()),
        }
    }
}
