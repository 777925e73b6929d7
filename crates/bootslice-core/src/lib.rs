//! Build orchestration for bootslice.
//!
//! This crate ties the manifest reader, the slicers, and the layer writer into
//! the [`Engine`], and owns the concurrent [`FingerprintEngine`] that hashes
//! every library jar embedded in the application. Applications made of Groovy
//! scripts are recognised by the [`GroovyScanner`] and launched through the
//! Spring Boot CLI.

pub mod command;
pub mod engine;
pub mod fingerprint;

pub use command::{GroovyCommand, GroovyScanner, COMMAND_LAYER};
pub use engine::{BuildResult, Engine, SpringBootBuild, SPRING_BOOT_LAYER};
pub use fingerprint::{FingerprintEngine, JAR_FILE_PATTERN};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] bootslice_schema::ManifestError),
    #[error("slice error: {0}")]
    Slice(#[from] bootslice_layers::SliceError),
    #[error("failed to walk lib directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("failed to hash {}: {source}", path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start hashing thread for {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid file name pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a Spring Boot application: {}", .0.display())]
    NotSpringBoot(PathBuf),
}
