//! Pronunciation clips generated ahead of time and kept on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use spellbee_core::error::DomainError;
use spellbee_core::provider::AudioProvider;
use tracing::debug;

/// Voice used when none is configured.
pub const DEFAULT_VOICE: &str = "en-US-Chirp3-HD-Callirrhoe";

/// File name of the clip for `word` spoken by `voice`: the lowercase hex
/// MD5 of `"{word}_{voice}"` plus `extension`. Matches the names the clip
/// generator writes.
#[must_use]
pub fn clip_file_name(word: &str, voice: &str, extension: &str) -> String {
    let digest = md5::compute(format!("{word}_{voice}"));
    format!("{digest:x}.{extension}")
}

/// Reads clips from a directory, one file per word and voice.
#[derive(Debug, Clone)]
pub struct DirectoryAudioProvider {
    root: PathBuf,
    voice: String,
    extension: String,
}

impl DirectoryAudioProvider {
    /// Creates a provider reading `{root}/{md5(word_voice)}.{extension}`.
    #[must_use]
    pub fn new(
        root: impl Into<PathBuf>,
        voice: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            voice: voice.into(),
            extension: extension.into(),
        }
    }

    /// The directory clips are read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the clip for `word`.
    #[must_use]
    pub fn clip_path(&self, word: &str) -> PathBuf {
        self.root.join(clip_file_name(word, &self.voice, &self.extension))
    }
}

#[async_trait]
impl AudioProvider for DirectoryAudioProvider {
    async fn fetch(&self, word: &str) -> Result<Vec<u8>, DomainError> {
        let path = self.clip_path(word);
        debug!(word, path = %path.display(), "reading pronunciation clip");
        tokio::fs::read(&path)
            .await
            .map_err(|e| DomainError::AudioUnavailable {
                word: word.to_owned(),
                reason: format!("{}: {e}", path.display()),
            })
    }

    fn media_type(&self) -> &'static str {
        match self.extension.to_ascii_lowercase().as_str() {
            "wav" => "audio/wav",
            "ogg" => "audio/ogg",
            "flac" => "audio/flac",
            _ => "audio/mpeg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_file_name_is_md5_of_word_and_voice() {
        assert_eq!(
            clip_file_name("notes", DEFAULT_VOICE, "mp3"),
            "357a3312406470ee643bb3e8081f6eb6.mp3"
        );
        assert_eq!(
            clip_file_name("cat", "v", "wav"),
            "c65822c319b56a567f83806156b2a446.wav"
        );
        assert_ne!(
            clip_file_name("notes", DEFAULT_VOICE, "mp3"),
            clip_file_name("notes", "other-voice", "mp3")
        );
    }

    #[tokio::test]
    async fn test_fetch_reads_clip_from_directory() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let provider = DirectoryAudioProvider::new(dir.path(), DEFAULT_VOICE, "mp3");
        std::fs::write(provider.clip_path("cat"), b"ID3fake").unwrap();

        // Act
        let bytes = provider.fetch("cat").await.unwrap();

        // Assert
        assert_eq!(bytes, b"ID3fake");
        assert_eq!(provider.media_type(), "audio/mpeg");
    }

    #[tokio::test]
    async fn test_fetch_missing_clip_is_audio_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let provider = DirectoryAudioProvider::new(dir.path(), DEFAULT_VOICE, "wav");

        let result = provider.fetch("dog").await;

        match result {
            Err(DomainError::AudioUnavailable { word, .. }) => assert_eq!(word, "dog"),
            other => panic!("expected AudioUnavailable, got {other:?}"),
        }
        assert_eq!(provider.media_type(), "audio/wav");
    }
}
