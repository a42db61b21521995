use crate::error::AssetError;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Resolved inputs for one assembly. Always holds at least one image and
/// exactly one audio track, all pointing at existing files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSet {
    pub images: Vec<PathBuf>,
    pub audio: PathBuf,
}

/// Validates and normalizes request inputs, substituting the configured
/// default assets when nothing usable was supplied.
pub struct AssetResolver {
    default_image: PathBuf,
    default_audio: PathBuf,
}

impl AssetResolver {
    pub fn new(default_image: PathBuf, default_audio: PathBuf) -> Self {
        Self {
            default_image,
            default_audio,
        }
    }

    pub fn resolve(&self, images: &[PathBuf], audio: Option<&Path>) -> Result<AssetSet, AssetError> {
        let existing: Vec<PathBuf> = images.iter().filter(|p| p.is_file()).cloned().collect();
        if existing.len() < images.len() {
            warn!(
                "filtered out {} missing image(s) from request",
                images.len() - existing.len()
            );
        }

        let images = if existing.is_empty() {
            if !self.default_image.is_file() {
                return Err(AssetError::MissingDefault(self.default_image.clone()));
            }
            info!(
                "no usable images supplied, substituting default {}",
                self.default_image.display()
            );
            vec![self.default_image.clone()]
        } else {
            existing
        };

        let audio = match audio {
            Some(path) if path.is_file() => path.to_path_buf(),
            _ => {
                if !self.default_audio.is_file() {
                    return Err(AssetError::MissingDefault(self.default_audio.clone()));
                }
                info!(
                    "no usable audio supplied, substituting default {}",
                    self.default_audio.display()
                );
                self.default_audio.clone()
            }
        };

        Ok(AssetSet { images, audio })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"x").unwrap();
        path
    }

    fn resolver_with_defaults(dir: &TempDir) -> AssetResolver {
        AssetResolver::new(touch(dir, "default.jpg"), touch(dir, "default.mp3"))
    }

    #[test]
    fn keeps_existing_images_and_audio() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver_with_defaults(&dir);
        let img = touch(&dir, "a.jpg");
        let audio = touch(&dir, "voice.mp3");

        let set = resolver
            .resolve(std::slice::from_ref(&img), Some(&audio))
            .unwrap();
        assert_eq!(set.images, vec![img]);
        assert_eq!(set.audio, audio);
    }

    #[test]
    fn filters_missing_images() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver_with_defaults(&dir);
        let img = touch(&dir, "a.jpg");
        let gone = dir.path().join("missing.jpg");
        let audio = touch(&dir, "voice.mp3");

        let set = resolver
            .resolve(&[gone, img.clone()], Some(&audio))
            .unwrap();
        assert_eq!(set.images, vec![img]);
    }

    #[test]
    fn empty_images_fall_back_to_default() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver_with_defaults(&dir);
        let audio = touch(&dir, "voice.mp3");

        let set = resolver.resolve(&[], Some(&audio)).unwrap();
        assert_eq!(set.images, vec![dir.path().join("default.jpg")]);
    }

    #[test]
    fn missing_default_image_is_fatal() {
        let dir = TempDir::new().unwrap();
        let resolver = AssetResolver::new(
            dir.path().join("nope.jpg"),
            touch(&dir, "default.mp3"),
        );
        let audio = touch(&dir, "voice.mp3");

        let err = resolver.resolve(&[], Some(&audio)).unwrap_err();
        assert!(matches!(err, AssetError::MissingDefault(p) if p.ends_with("nope.jpg")));
    }

    #[test]
    fn missing_audio_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver_with_defaults(&dir);
        let img = touch(&dir, "a.jpg");

        let set = resolver.resolve(std::slice::from_ref(&img), None).unwrap();
        assert_eq!(set.audio, dir.path().join("default.mp3"));

        let gone = dir.path().join("missing.mp3");
        let set = resolver
            .resolve(std::slice::from_ref(&img), Some(&gone))
            .unwrap();
        assert_eq!(set.audio, dir.path().join("default.mp3"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver_with_defaults(&dir);
        let img = touch(&dir, "a.jpg");
        let audio = touch(&dir, "voice.mp3");

        let first = resolver
            .resolve(std::slice::from_ref(&img), Some(&audio))
            .unwrap();
        let second = resolver
            .resolve(std::slice::from_ref(&img), Some(&audio))
            .unwrap();
        assert_eq!(first, second);
    }
}
