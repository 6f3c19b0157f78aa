//! Playback on the default output device via rodio

use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, info};

use super::{AudioError, Playback, SoundHandle};

/// Single-sink player on the system's default output
///
/// Each `play` gets a fresh sink, so a stopped sink never lingers into the
/// next sound. Dropping the player closes the output stream.
pub struct RodioPlayback {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl RodioPlayback {
    /// Open the default output device
    pub fn open_default() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()?;
        info!("Audio output opened");

        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
        })
    }
}

impl Playback for RodioPlayback {
    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            debug!("Playback stopped");
        }
    }

    fn play(&mut self, sound: &SoundHandle) -> Result<(), AudioError> {
        self.stop();

        let source = sound.decode()?;
        let sink = Sink::try_new(&self.handle)?;
        sink.append(source);
        self.sink = Some(sink);

        debug!("Playing '{}'", sound.name());
        Ok(())
    }
}

impl Drop for RodioPlayback {
    fn drop(&mut self) {
        self.stop();
    }
}
