//! Sound files loaded at startup
//!
//! Missing or unreadable files are warnings: that direction simply stays
//! silent.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

use super::SoundHandle;
use crate::config::SoundsConfig;
use crate::input::Direction;

/// Playable sounds, keyed by direction, plus the gesture sound
#[derive(Debug, Default, Clone)]
pub struct SoundBank {
    directions: HashMap<Direction, SoundHandle>,
    gesture: Option<SoundHandle>,
}

impl SoundBank {
    /// Load every configured file that exists and decodes
    pub async fn load(config: &SoundsConfig) -> Self {
        let mut bank = Self::default();

        for (direction, file) in &config.directions {
            if let Some(handle) = load_sound(&config.dir, file).await {
                bank.directions.insert(*direction, handle);
            }
        }

        if let Some(file) = config.gesture.as_deref() {
            bank.gesture = load_sound(&config.dir, file).await;
        }

        if bank.gesture.is_none() {
            warn!("No gesture sound loaded, waggle gesture will not play anything");
        }

        info!(
            "Loaded {}/{} direction sounds from {}",
            bank.directions.len(),
            config.directions.len(),
            config.dir.display()
        );

        bank
    }

    /// Sound mapped to `direction`, if one was loaded
    pub fn for_direction(&self, direction: Direction) -> Option<&SoundHandle> {
        self.directions.get(&direction)
    }

    pub fn gesture(&self) -> Option<&SoundHandle> {
        self.gesture.as_ref()
    }

    pub fn with_direction(mut self, direction: Direction, sound: SoundHandle) -> Self {
        self.directions.insert(direction, sound);
        self
    }

    pub fn with_gesture(mut self, sound: SoundHandle) -> Self {
        self.gesture = Some(sound);
        self
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty() && self.gesture.is_none()
    }
}

async fn load_sound(dir: &Path, file: &str) -> Option<SoundHandle> {
    let path = dir.join(file);

    let data = match fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Sound file {} not found", path.display());
            return None;
        }
        Err(e) => {
            warn!("Failed to read sound file {}: {}", path.display(), e);
            return None;
        }
    };

    let handle = SoundHandle::new(file, data);
    if let Err(e) = handle.decode() {
        warn!("Skipping {}: {}", path.display(), e);
        return None;
    }

    Some(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::test_support::silent_wav;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sounds_config(dir: &Path, gesture: Option<&str>) -> SoundsConfig {
        let directions: BTreeMap<Direction, String> = [
            (Direction::North, "cow.wav"),
            (Direction::East, "pig.wav"),
            (Direction::West, "frog.wav"),
        ]
        .into_iter()
        .map(|(d, f)| (d, f.to_string()))
        .collect();

        SoundsConfig {
            dir: dir.to_path_buf(),
            directions,
            gesture: gesture.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_missing_and_broken_files_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("cow.wav"), silent_wav(100)).unwrap();
        std::fs::write(temp_dir.path().join("pig.wav"), b"garbage").unwrap();
        // frog.wav is missing entirely

        let bank = SoundBank::load(&sounds_config(temp_dir.path(), None)).await;

        assert_eq!(bank.len(), 1);
        assert_eq!(bank.for_direction(Direction::North).unwrap().name(), "cow.wav");
        assert!(bank.for_direction(Direction::East).is_none());
        assert!(bank.for_direction(Direction::West).is_none());
        assert!(bank.gesture().is_none());
    }

    #[tokio::test]
    async fn test_gesture_sound_loaded() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("feyenoord.wav"), silent_wav(100)).unwrap();

        let bank = SoundBank::load(&sounds_config(temp_dir.path(), Some("feyenoord.wav"))).await;

        assert_eq!(bank.gesture().unwrap().name(), "feyenoord.wav");
        assert_eq!(bank.len(), 0);
        assert!(!bank.is_empty());
    }

    #[tokio::test]
    async fn test_nonexistent_directory_yields_empty_bank() {
        let config = sounds_config(Path::new("/definitely/not/here"), Some("x.mp3"));
        assert!(SoundBank::load(&config).await.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_loading_yields_to_other_tasks() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("cow.wav"), silent_wav(100)).unwrap();

        let ran = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let witness = ran.clone();
        tokio::spawn(async move {
            witness.store(true, std::sync::atomic::Ordering::SeqCst);
        });

        // File reads go through the blocking pool, so the spawned task gets
        // polled while the bank is loading
        let bank = SoundBank::load(&sounds_config(temp_dir.path(), None)).await;

        assert_eq!(bank.len(), 1);
        assert!(ran.load(std::sync::atomic::Ordering::SeqCst));
    }
}
