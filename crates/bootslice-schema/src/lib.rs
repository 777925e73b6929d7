//! Manifest parsing, application metadata, and identifier types for bootslice.
//!
//! This crate defines the input side of a build: reading the JAR manifest of an
//! unpacked Spring Boot application (`parse_manifest_file`), turning it into
//! immutable [`Metadata`] with a search-ordered classpath, the
//! [`JarDependency`] record produced by fingerprinting, and the string newtypes
//! shared by the slicers and the fingerprint engine.

pub mod dependency;
pub mod manifest;
pub mod metadata;
pub mod types;

pub use dependency::{sort_dependencies, JarDependency};
pub use manifest::{parse_manifest_file, parse_manifest_str, Manifest};
pub use metadata::{Metadata, DEFAULT_CLASSES, DEFAULT_LIB, MANIFEST_PATH};
pub use types::{LayerName, Sha256Digest};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to walk lib directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("manifest is missing required key '{0}'")]
    MissingKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_error_display_missing_key() {
        let e = ManifestError::MissingKey("Start-Class".to_owned());
        assert!(e.to_string().contains("Start-Class"));
    }

    #[test]
    fn manifest_error_display_io() {
        let e = ManifestError::Io(std::io::Error::other("disk gone"));
        let msg = e.to_string();
        assert!(msg.starts_with("failed to read manifest"));
        assert!(msg.contains("disk gone"));
    }
}
