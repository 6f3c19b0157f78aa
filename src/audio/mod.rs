//! Sound playback on a single exclusive channel
//!
//! The poll loop only talks to the [`Playback`] trait. [`RodioPlayback`]
//! drives the real output device; tests substitute a recording fake.

pub mod bank;
pub mod rodio_player;

use rodio::Decoder;
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;
use thiserror::Error;

pub use bank::SoundBank;
pub use rodio_player::RodioPlayback;

/// Audio failures
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no usable audio output device: {0}")]
    Device(#[from] rodio::StreamError),

    #[error("failed to open playback channel: {0}")]
    Channel(#[from] rodio::PlayError),

    #[error("failed to decode sound '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// A pre-loaded sound, cheap to clone
///
/// The encoded file contents are kept in memory and decoded each time the
/// sound is played.
#[derive(Clone)]
pub struct SoundHandle {
    name: String,
    data: Arc<[u8]>,
}

impl SoundHandle {
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build a fresh decoder over the in-memory file
    pub fn decode(&self) -> Result<Decoder<Cursor<Arc<[u8]>>>, AudioError> {
        Decoder::new(Cursor::new(self.data.clone())).map_err(|source| AudioError::Decode {
            name: self.name.clone(),
            source,
        })
    }
}

impl fmt::Debug for SoundHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundHandle")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Exclusive playback channel
///
/// Implementations are not required to be thread-safe; the poll loop is the
/// only caller.
pub trait Playback {
    /// Whether a sound is still playing
    fn is_busy(&self) -> bool;

    /// Stop the current sound. Safe to call when idle.
    fn stop(&mut self);

    /// Start `sound` immediately, replacing anything in flight
    fn play(&mut self, sound: &SoundHandle) -> Result<(), AudioError>;
}

#[cfg(test)]
pub(crate) mod test_support {
    /// Minimal 16-bit mono PCM WAV file containing `samples` of silence
    pub fn silent_wav(samples: u32) -> Vec<u8> {
        let sample_rate: u32 = 8000;
        let data_len = samples * 2;
        let mut wav = Vec::with_capacity(44 + data_len as usize);

        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(44 + data_len as usize, 0);

        wav
    }
}
